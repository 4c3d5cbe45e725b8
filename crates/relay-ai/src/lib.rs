//! Completion-service types and HTTP adapters for relaybot.
mod http_support;
mod openai;
mod simple;
mod types;

pub use openai::{OpenAiChatClient, OpenAiChatConfig, DEFAULT_OPENAI_API_BASE};
pub use simple::{SimpleMessageClient, SimpleMessageConfig};
pub use types::{
    ChatRequest, ChatResponse, ChatUsage, CompletionClient, ConversationTurn, MessageRole,
    RelayAiError,
};
