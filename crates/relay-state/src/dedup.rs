use crate::bounded::BoundedFifoSet;

pub const DEFAULT_PROCESSED_MESSAGE_CAP: usize = 100;

/// Recently handled inbound message ids, capped with insertion-ordered eviction.
#[derive(Debug, Clone)]
pub struct ProcessedMessageSet {
    ids: BoundedFifoSet<String>,
}

impl Default for ProcessedMessageSet {
    fn default() -> Self {
        Self::new(DEFAULT_PROCESSED_MESSAGE_CAP)
    }
}

impl ProcessedMessageSet {
    pub fn new(cap: usize) -> Self {
        Self {
            ids: BoundedFifoSet::with_capacity(cap),
        }
    }

    pub fn seen(&self, message_id: &str) -> bool {
        self.ids.contains(message_id)
    }

    pub fn mark_seen(&mut self, message_id: &str) -> bool {
        self.ids.insert(message_id.to_string())
    }

    /// Returns `true` if `message_id` was already seen; marks it otherwise.
    pub fn check_and_mark(&mut self, message_id: &str) -> bool {
        !self.mark_seen(message_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.ids.capacity()
    }
}
