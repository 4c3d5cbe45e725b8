//! Command-line surface and startup wiring for the `relaybot` binary.

mod cli_args;
mod cli_types;
mod startup;

pub use cli_args::Cli;
pub use cli_types::{CliCompletionApi, CliRelayVariant};
pub use startup::{
    build_bot_state_config, build_completion_client, build_reply_texts, build_runtime_config,
    init_tracing, liveness_bind_addr, run_relaybot,
};
