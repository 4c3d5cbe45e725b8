//! Bounded in-memory conversation state for relaybot.
//!
//! Provides the FIFO-evicting containers, the per-channel history store, the
//! processed-message dedup set, and the `BotState` owner that the runtime
//! shares across event handlers. Nothing here is persisted.

pub mod bot_state;
pub mod bounded;
pub mod conversation_locks;
pub mod dedup;
pub mod history;

pub use bot_state::{BotState, BotStateConfig};
pub use bounded::{BoundedFifoSet, BoundedSeq};
pub use conversation_locks::{ConversationGuard, ConversationLocks};
pub use dedup::{ProcessedMessageSet, DEFAULT_PROCESSED_MESSAGE_CAP};
pub use history::{HistoryStore, DEFAULT_MAX_HISTORY_TURNS};
