use std::sync::Mutex;

use anyhow::{anyhow, Result};
use relay_ai::ConversationTurn;

use crate::{
    ConversationGuard, ConversationLocks, HistoryStore, ProcessedMessageSet,
    DEFAULT_MAX_HISTORY_TURNS, DEFAULT_PROCESSED_MESSAGE_CAP,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Capacity bounds for the process-wide caches.
pub struct BotStateConfig {
    pub max_history_turns: usize,
    pub processed_message_cap: usize,
}

impl Default for BotStateConfig {
    fn default() -> Self {
        Self {
            max_history_turns: DEFAULT_MAX_HISTORY_TURNS,
            processed_message_cap: DEFAULT_PROCESSED_MESSAGE_CAP,
        }
    }
}

/// Process-wide conversation state, built once at startup and shared by `Arc`.
///
/// The std mutexes are never held across an await point.
#[derive(Debug)]
pub struct BotState {
    history: Mutex<HistoryStore>,
    processed: Mutex<ProcessedMessageSet>,
    locks: ConversationLocks,
}

impl Default for BotState {
    fn default() -> Self {
        Self::new(BotStateConfig::default())
    }
}

impl BotState {
    pub fn new(config: BotStateConfig) -> Self {
        Self {
            history: Mutex::new(HistoryStore::new(config.max_history_turns)),
            processed: Mutex::new(ProcessedMessageSet::new(config.processed_message_cap)),
            locks: ConversationLocks::new(),
        }
    }

    pub fn history(&self, conversation_id: &str) -> Result<Vec<ConversationTurn>> {
        Ok(self.lock_history()?.get(conversation_id))
    }

    pub fn append_exchange(
        &self,
        conversation_id: &str,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<()> {
        self.lock_history()?
            .append(conversation_id, user_text, assistant_text);
        Ok(())
    }

    pub fn reset_history(&self, conversation_id: &str) -> Result<bool> {
        Ok(self.lock_history()?.reset(conversation_id))
    }

    pub fn conversation_count(&self) -> Result<usize> {
        Ok(self.lock_history()?.conversation_count())
    }

    /// Returns `true` when `message_id` had already been handled.
    pub fn check_and_mark_processed(&self, message_id: &str) -> Result<bool> {
        Ok(self.lock_processed()?.check_and_mark(message_id))
    }

    pub fn is_processed(&self, message_id: &str) -> Result<bool> {
        Ok(self.lock_processed()?.seen(message_id))
    }

    pub fn processed_len(&self) -> Result<usize> {
        Ok(self.lock_processed()?.len())
    }

    pub async fn lock_conversation(&self, conversation_id: &str) -> Result<ConversationGuard<'_>> {
        self.locks.acquire(conversation_id).await
    }

    fn lock_history(&self) -> Result<std::sync::MutexGuard<'_, HistoryStore>> {
        self.history
            .lock()
            .map_err(|_| anyhow!("history store mutex is poisoned"))
    }

    fn lock_processed(&self) -> Result<std::sync::MutexGuard<'_, ProcessedMessageSet>> {
        self.processed
            .lock()
            .map_err(|_| anyhow!("processed message set mutex is poisoned"))
    }
}
