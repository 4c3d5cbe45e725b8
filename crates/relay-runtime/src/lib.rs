//! Discord-to-completion relay runtime for relaybot.
//!
//! Hosts the response orchestrator, the transport seam it replies through,
//! the serenity gateway adapter, and the optional liveness server.

pub mod discord_gateway;
pub mod health_server;
pub mod orchestrator;
pub mod shutdown;
pub mod transport;

pub use discord_gateway::{run_discord_gateway, DiscordRelayHandler, DiscordTransport};
pub use health_server::{build_health_router, run_health_server, LIVENESS_BODY};
pub use orchestrator::{
    default_reset_keywords, HandleOutcome, IgnoreReason, RelayRuntimeConfig, ReplyKind,
    ReplyTexts, ResponseOrchestrator, DEFAULT_MODEL, DEFAULT_RESET_KEYWORDS,
};
pub use shutdown::{shutdown_channel, trigger_shutdown_on_ctrl_c, wait_for_shutdown};
pub use transport::{ChatTransport, InboundMessage};
