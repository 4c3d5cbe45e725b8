use std::{net::SocketAddr, sync::Arc};

use anyhow::{anyhow, Context, Result};
use relay_ai::{
    CompletionClient, OpenAiChatClient, OpenAiChatConfig, SimpleMessageClient,
    SimpleMessageConfig,
};
use relay_runtime::{
    run_discord_gateway, run_health_server, shutdown_channel, trigger_shutdown_on_ctrl_c,
    RelayRuntimeConfig, ReplyTexts, ResponseOrchestrator,
};
use relay_state::{BotState, BotStateConfig};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{Cli, CliCompletionApi};

pub fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub fn build_completion_client(cli: &Cli) -> Result<Arc<dyn CompletionClient>> {
    let api_key = non_empty(cli.api_key.as_deref());
    let client: Arc<dyn CompletionClient> = match cli.completion_api {
        CliCompletionApi::ChatCompletions => {
            let api_key = api_key.ok_or_else(|| {
                anyhow!("--api-key (or API_KEY) is required for --completion-api=chat-completions")
            })?;
            Arc::new(
                OpenAiChatClient::new(OpenAiChatConfig {
                    api_base: cli.api_base.clone(),
                    api_key,
                    organization: non_empty(cli.openai_organization.as_deref()),
                    request_timeout_ms: cli.request_timeout_ms,
                })
                .context("failed to build chat-completions client")?,
            )
        }
        CliCompletionApi::Simple => {
            let endpoint = non_empty(cli.simple_endpoint.as_deref()).ok_or_else(|| {
                anyhow!("--simple-endpoint (or RELAYBOT_SIMPLE_ENDPOINT) is required for --completion-api=simple")
            })?;
            Arc::new(
                SimpleMessageClient::new(SimpleMessageConfig {
                    endpoint,
                    api_key,
                    request_timeout_ms: cli.request_timeout_ms,
                })
                .context("failed to build simple completion client")?,
            )
        }
    };
    Ok(client)
}

pub fn build_reply_texts(cli: &Cli) -> ReplyTexts {
    let mut replies = ReplyTexts::default();
    if let Some(text) = non_empty(cli.apology_text.as_deref()) {
        replies.apology = text;
    }
    if let Some(text) = non_empty(cli.failure_text.as_deref()) {
        replies.handler_failure = text;
    }
    if let Some(text) = non_empty(cli.reset_confirmation_text.as_deref()) {
        replies.reset_confirmation = text;
    }
    replies
}

pub fn build_runtime_config(cli: &Cli, client: Arc<dyn CompletionClient>) -> RelayRuntimeConfig {
    let reset_keywords = cli
        .reset_keywords
        .iter()
        .filter_map(|keyword| non_empty(Some(keyword.as_str())))
        .collect();
    RelayRuntimeConfig {
        client,
        model: cli.model.trim().to_string(),
        system_prompt: non_empty(cli.system_prompt.as_deref()),
        max_tokens: cli.max_tokens,
        temperature: cli.temperature,
        history_enabled: cli.variant.history_enabled(),
        dedup_enabled: cli.variant.dedup_enabled(),
        reset_keywords,
        replies: build_reply_texts(cli),
    }
}

pub fn build_bot_state_config(cli: &Cli) -> BotStateConfig {
    BotStateConfig {
        max_history_turns: cli.max_history_turns,
        processed_message_cap: cli.processed_message_cap,
    }
}

pub fn liveness_bind_addr(cli: &Cli) -> Result<Option<SocketAddr>> {
    let Some(port) = cli.port else {
        return Ok(None);
    };
    let raw = format!("{}:{port}", cli.bind_host.trim());
    let addr = raw
        .parse::<SocketAddr>()
        .with_context(|| format!("invalid liveness bind address '{raw}'"))?;
    Ok(Some(addr))
}

/// Builds the shared state and runs the Discord gateway, plus the liveness
/// server when a port is configured. Ctrl-c stops both; the liveness server
/// also stops when the gateway exits.
pub async fn run_relaybot(cli: Cli) -> Result<()> {
    let client = build_completion_client(&cli)?;
    let runtime_config = build_runtime_config(&cli, client);
    let state = Arc::new(BotState::new(build_bot_state_config(&cli)));
    tracing::info!(
        variant = ?cli.variant,
        completion_api = ?cli.completion_api,
        model = %runtime_config.model,
        max_history_turns = cli.max_history_turns,
        processed_message_cap = cli.processed_message_cap,
        "starting relaybot"
    );
    let orchestrator = Arc::new(ResponseOrchestrator::new(runtime_config, state));

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let shutdown_tx = Arc::new(shutdown_tx);
    let liveness = match liveness_bind_addr(&cli)? {
        Some(bind) => {
            let shutdown_rx = shutdown_rx.clone();
            Some(tokio::spawn(async move {
                if let Err(error) = run_health_server(bind, shutdown_rx).await {
                    tracing::error!(error = %format!("{error:#}"), "liveness server failed");
                }
            }))
        }
        None => None,
    };
    let ctrl_c = tokio::spawn(trigger_shutdown_on_ctrl_c(Arc::clone(&shutdown_tx)));

    let gateway_result = run_discord_gateway(&cli.discord_token, orchestrator, shutdown_rx).await;

    ctrl_c.abort();
    shutdown_tx.send_replace(true);
    if let Some(liveness) = liveness {
        if let Err(error) = liveness.await {
            tracing::warn!(error = %error, "liveness server task did not finish cleanly");
        }
    }
    gateway_result
}
