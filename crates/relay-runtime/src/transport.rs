//! Platform-neutral inbound message shape and outbound transport seam.

use anyhow::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
/// An inbound chat message, already normalised away from the gateway's types.
pub struct InboundMessage {
    pub message_id: String,
    pub conversation_id: String,
    pub author_id: String,
    pub author_is_bot: bool,
    pub mentions_bot: bool,
    pub content: String,
}

#[async_trait]
/// Trait contract for sending presence and replies back to the chat platform.
pub trait ChatTransport: Send + Sync {
    async fn send_typing(&self, conversation_id: &str) -> Result<()>;

    async fn reply(&self, message: &InboundMessage, text: &str) -> Result<()>;
}
