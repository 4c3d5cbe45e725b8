//! Per-conversation async locks that serialise read-complete-append cycles.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use anyhow::{anyhow, Result};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockTable = Mutex<HashMap<String, Arc<AsyncMutex<()>>>>;

#[derive(Debug, Default)]
pub struct ConversationLocks {
    table: LockTable,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other holder exists for `conversation_id`.
    pub async fn acquire(&self, conversation_id: &str) -> Result<ConversationGuard<'_>> {
        let lock = {
            let mut table = self
                .table
                .lock()
                .map_err(|_| anyhow!("conversation lock table mutex is poisoned"))?;
            table
                .entry(conversation_id.to_string())
                .or_default()
                .clone()
        };
        let guard = Arc::clone(&lock).lock_owned().await;
        Ok(ConversationGuard {
            table: &self.table,
            conversation_id: conversation_id.to_string(),
            lock,
            guard: Some(guard),
        })
    }

    pub fn active_len(&self) -> usize {
        self.table.lock().map(|table| table.len()).unwrap_or_default()
    }
}

/// Held for the duration of one conversation's critical section.
#[derive(Debug)]
pub struct ConversationGuard<'a> {
    table: &'a LockTable,
    conversation_id: String,
    lock: Arc<AsyncMutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl ConversationGuard<'_> {
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }
}

impl Drop for ConversationGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        let Ok(mut table) = self.table.lock() else {
            return;
        };
        // Only the table and this guard reference the lock: nobody is waiting.
        if Arc::strong_count(&self.lock) == 2 {
            table.remove(&self.conversation_id);
        }
    }
}
