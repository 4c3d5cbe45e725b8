//! Per-conversation rolling history bounded by turn count.

use std::collections::HashMap;

use relay_ai::ConversationTurn;

use crate::bounded::BoundedSeq;

pub const DEFAULT_MAX_HISTORY_TURNS: usize = 10;

/// Maps a conversation id to its most recent turns, oldest first.
///
/// Eviction removes single turns from the front, so user/assistant pairing
/// only survives when `max_turns` is even.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    max_turns: usize,
    conversations: HashMap<String, BoundedSeq<ConversationTurn>>,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY_TURNS)
    }
}

impl HistoryStore {
    pub fn new(max_turns: usize) -> Self {
        Self {
            max_turns: max_turns.max(1),
            conversations: HashMap::new(),
        }
    }

    pub fn get(&self, conversation_id: &str) -> Vec<ConversationTurn> {
        self.conversations
            .get(conversation_id)
            .map(|turns| turns.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn append(
        &mut self,
        conversation_id: &str,
        user_text: impl Into<String>,
        assistant_text: impl Into<String>,
    ) {
        let max_turns = self.max_turns;
        let turns = self
            .conversations
            .entry(conversation_id.to_string())
            .or_insert_with(|| BoundedSeq::with_capacity(max_turns));
        turns.push_back(ConversationTurn::user(user_text));
        turns.push_back(ConversationTurn::assistant(assistant_text));
    }

    /// Drops the conversation. Returns whether anything was stored.
    pub fn reset(&mut self, conversation_id: &str) -> bool {
        self.conversations.remove(conversation_id).is_some()
    }

    pub fn conversation_count(&self) -> usize {
        self.conversations.len()
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }
}
