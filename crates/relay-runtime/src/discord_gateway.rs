//! Serenity gateway adapter: converts Discord events into `InboundMessage`s
//! and sends replies back through the Discord HTTP API.

use std::{
    num::NonZeroU64,
    sync::{Arc, OnceLock},
};

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use serenity::all::{
    ChannelId, Client, Context, CreateMessage, EventHandler, GatewayIntents, Http, Message,
    MessageId, Ready, UserId,
};
use tokio::sync::watch;

use crate::orchestrator::{truncate_for_chat, ResponseOrchestrator, DISCORD_SAFE_MAX_CHARS};
use crate::shutdown::wait_for_shutdown;
use crate::transport::{ChatTransport, InboundMessage};

pub fn relay_gateway_intents() -> GatewayIntents {
    GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
}

/// Connects to the Discord gateway and dispatches events until the client
/// stops or the shutdown signal fires.
pub async fn run_discord_gateway(
    token: &str,
    orchestrator: Arc<ResponseOrchestrator>,
    shutdown_rx: watch::Receiver<bool>,
) -> Result<()> {
    let handler = DiscordRelayHandler::new(orchestrator);
    let mut client = Client::builder(token.trim(), relay_gateway_intents())
        .event_handler(handler)
        .await
        .context("failed to build discord gateway client")?;

    let shard_manager = Arc::clone(&client.shard_manager);
    let shutdown_watcher = tokio::spawn(async move {
        wait_for_shutdown(shutdown_rx).await;
        tracing::info!("stopping discord gateway shards");
        shard_manager.shutdown_all().await;
    });

    let result = client
        .start()
        .await
        .context("discord gateway client stopped with an error");
    shutdown_watcher.abort();
    result
}

pub struct DiscordRelayHandler {
    orchestrator: Arc<ResponseOrchestrator>,
    bot_user_id: OnceLock<UserId>,
}

impl DiscordRelayHandler {
    pub fn new(orchestrator: Arc<ResponseOrchestrator>) -> Self {
        Self {
            orchestrator,
            bot_user_id: OnceLock::new(),
        }
    }
}

#[async_trait]
impl EventHandler for DiscordRelayHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        let _ = self.bot_user_id.set(ready.user.id);
        tracing::info!(
            user = %ready.user.tag(),
            guilds = ready.guilds.len(),
            "logged in to discord gateway"
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let Some(bot_user_id) = self.bot_user_id.get().copied() else {
            tracing::debug!(message_id = %msg.id, "message received before ready; skipping");
            return;
        };

        let inbound = inbound_from_discord(&msg, bot_user_id);
        let transport = DiscordTransport::new(Arc::clone(&ctx.http));
        let outcome = self.orchestrator.handle_message(&transport, &inbound).await;
        tracing::debug!(
            conversation_id = %inbound.conversation_id,
            message_id = %inbound.message_id,
            ?outcome,
            "discord message handled"
        );
    }
}

fn inbound_from_discord(msg: &Message, bot_user_id: UserId) -> InboundMessage {
    InboundMessage {
        message_id: msg.id.to_string(),
        conversation_id: msg.channel_id.to_string(),
        author_id: msg.author.id.to_string(),
        author_is_bot: msg.author.bot || msg.author.id == bot_user_id,
        mentions_bot: msg.mentions_user_id(bot_user_id),
        content: msg.content.clone(),
    }
}

/// Sends typing indicators and threaded replies through Discord's HTTP API.
pub struct DiscordTransport {
    http: Arc<Http>,
}

impl DiscordTransport {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

fn parse_snowflake(raw: &str, label: &str) -> Result<NonZeroU64> {
    raw.trim()
        .parse::<NonZeroU64>()
        .with_context(|| format!("invalid discord {label} id '{raw}'"))
}

#[async_trait]
impl ChatTransport for DiscordTransport {
    async fn send_typing(&self, conversation_id: &str) -> Result<()> {
        let channel_id = ChannelId::from(parse_snowflake(conversation_id, "channel")?);
        channel_id
            .broadcast_typing(&self.http)
            .await
            .context("failed to send discord typing indicator")
    }

    async fn reply(&self, message: &InboundMessage, text: &str) -> Result<()> {
        let channel_id = ChannelId::from(parse_snowflake(&message.conversation_id, "channel")?);
        let message_id = MessageId::from(parse_snowflake(&message.message_id, "message")?);
        let body = CreateMessage::new()
            .content(truncate_for_chat(text, DISCORD_SAFE_MAX_CHARS))
            .reference_message((channel_id, message_id));
        channel_id
            .send_message(&self.http, body)
            .await
            .context("failed to send discord reply")?;
        Ok(())
    }
}
