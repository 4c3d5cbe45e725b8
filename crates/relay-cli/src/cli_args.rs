use clap::Parser;

use crate::{CliCompletionApi, CliRelayVariant};

fn parse_positive_usize(value: &str) -> Result<usize, String> {
    let parsed = value
        .parse::<usize>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_positive_u32(value: &str) -> Result<u32, String> {
    let parsed = value
        .parse::<u32>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_temperature(value: &str) -> Result<f32, String> {
    let parsed = value
        .trim()
        .parse::<f32>()
        .map_err(|error| format!("failed to parse temperature: {error}"))?;
    if !(0.0..=2.0).contains(&parsed) {
        return Err("temperature must be between 0 and 2".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(
    name = "relaybot",
    about = "Discord bot that relays mentions to a chat-completion endpoint",
    version
)]
/// Public struct `Cli` holding every relaybot startup option.
pub struct Cli {
    #[arg(
        long = "discord-token",
        env = "DISCORD_TOKEN",
        hide_env_values = true,
        help = "Discord bot token used to authenticate the gateway connection"
    )]
    pub discord_token: String,

    #[arg(
        long = "api-key",
        env = "API_KEY",
        hide_env_values = true,
        help = "Bearer token for the completion endpoint (required for chat-completions)"
    )]
    pub api_key: Option<String>,

    #[arg(
        long,
        env = "PORT",
        help = "Serve `GET /` liveness checks on this port when set"
    )]
    pub port: Option<u16>,

    #[arg(
        long = "bind-host",
        env = "RELAYBOT_BIND_HOST",
        default_value = "0.0.0.0",
        help = "Host address the liveness server binds to"
    )]
    pub bind_host: String,

    #[arg(
        long = "completion-api",
        env = "RELAYBOT_COMPLETION_API",
        value_enum,
        default_value = "chat-completions",
        help = "Upstream request shape: chat-completions ({model, messages}) or simple ({message})"
    )]
    pub completion_api: CliCompletionApi,

    #[arg(
        long = "api-base",
        env = "RELAYBOT_API_BASE",
        default_value = relay_ai::DEFAULT_OPENAI_API_BASE,
        help = "Base URL for the chat-completions API"
    )]
    pub api_base: String,

    #[arg(
        long = "openai-organization",
        env = "OPENAI_ORGANIZATION",
        help = "Optional OpenAI-Organization header sent with chat-completions requests"
    )]
    pub openai_organization: Option<String>,

    #[arg(
        long = "simple-endpoint",
        env = "RELAYBOT_SIMPLE_ENDPOINT",
        help = "Full URL of the simple {message} -> {response} endpoint"
    )]
    pub simple_endpoint: Option<String>,

    #[arg(
        long,
        env = "RELAYBOT_MODEL",
        default_value = relay_runtime::DEFAULT_MODEL,
        help = "Model name sent with chat-completions requests"
    )]
    pub model: String,

    #[arg(
        long,
        env = "RELAYBOT_VARIANT",
        value_enum,
        default_value = "history-dedup",
        help = "Which caches to keep: stateless, history, or history-dedup"
    )]
    pub variant: CliRelayVariant,

    #[arg(
        long = "system-prompt",
        env = "RELAYBOT_SYSTEM_PROMPT",
        help = "Optional fixed system instruction prepended to every request"
    )]
    pub system_prompt: Option<String>,

    #[arg(
        long = "max-tokens",
        env = "RELAYBOT_MAX_TOKENS",
        value_parser = parse_positive_u32,
        help = "Optional completion token limit sent with chat-completions requests"
    )]
    pub max_tokens: Option<u32>,

    #[arg(
        long,
        env = "RELAYBOT_TEMPERATURE",
        value_parser = parse_temperature,
        help = "Optional sampling temperature (0-2) sent with chat-completions requests"
    )]
    pub temperature: Option<f32>,

    #[arg(
        long = "max-history-turns",
        env = "RELAYBOT_MAX_HISTORY_TURNS",
        default_value_t = relay_state::DEFAULT_MAX_HISTORY_TURNS,
        value_parser = parse_positive_usize,
        help = "Maximum stored turns per conversation (user and assistant turns count separately)"
    )]
    pub max_history_turns: usize,

    #[arg(
        long = "processed-message-cap",
        env = "RELAYBOT_PROCESSED_MESSAGE_CAP",
        default_value_t = relay_state::DEFAULT_PROCESSED_MESSAGE_CAP,
        value_parser = parse_positive_usize,
        help = "Number of recent message ids remembered for duplicate suppression"
    )]
    pub processed_message_cap: usize,

    #[arg(
        long = "reset-keywords",
        env = "RELAYBOT_RESET_KEYWORDS",
        value_delimiter = ',',
        default_values = relay_runtime::DEFAULT_RESET_KEYWORDS,
        help = "Comma-separated keywords that clear the conversation history"
    )]
    pub reset_keywords: Vec<String>,

    #[arg(
        long = "request-timeout-ms",
        env = "RELAYBOT_REQUEST_TIMEOUT_MS",
        default_value_t = 60_000,
        value_parser = parse_positive_u64,
        help = "HTTP timeout for a single completion request"
    )]
    pub request_timeout_ms: u64,

    #[arg(
        long = "apology-text",
        env = "RELAYBOT_APOLOGY_TEXT",
        help = "Override the reply sent when the completion request fails"
    )]
    pub apology_text: Option<String>,

    #[arg(
        long = "failure-text",
        env = "RELAYBOT_FAILURE_TEXT",
        help = "Override the reply sent when handling a message fails unexpectedly"
    )]
    pub failure_text: Option<String>,

    #[arg(
        long = "reset-confirmation-text",
        env = "RELAYBOT_RESET_CONFIRMATION_TEXT",
        help = "Override the reply sent after a history reset"
    )]
    pub reset_confirmation_text: Option<String>,
}
