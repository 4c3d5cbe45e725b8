//! Response orchestrator: decides whether to answer an inbound message and
//! relays completion output back to the originating conversation.
//!
//! Every handled event ends in exactly one of: assistant reply, apology,
//! reset confirmation, generic failure reply, or silence.

use std::sync::Arc;

use anyhow::Result;
use relay_ai::CompletionClient;
use relay_state::BotState;

use crate::transport::{ChatTransport, InboundMessage};

mod command_helpers;
mod render_helpers;

pub use command_helpers::{default_reset_keywords, DEFAULT_RESET_KEYWORDS};
pub use render_helpers::{
    normalize_message_text, truncate_for_chat, ReplyTexts, DISCORD_SAFE_MAX_CHARS,
};

use command_helpers::{parse_relay_command, RelayCommand};
use render_helpers::build_completion_request;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Clone)]
/// Runtime configuration for the response orchestrator.
pub struct RelayRuntimeConfig {
    pub client: Arc<dyn CompletionClient>,
    pub model: String,
    pub system_prompt: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub history_enabled: bool,
    pub dedup_enabled: bool,
    pub reset_keywords: Vec<String>,
    pub replies: ReplyTexts,
}

impl RelayRuntimeConfig {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
            system_prompt: None,
            max_tokens: None,
            temperature: None,
            history_enabled: true,
            dedup_enabled: true,
            reset_keywords: default_reset_keywords(),
            replies: ReplyTexts::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates why an inbound message produced no reply.
pub enum IgnoreReason {
    BotAuthor,
    NotMentioned,
    Duplicate,
    EmptyContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates which reply an inbound message produced.
pub enum ReplyKind {
    Assistant,
    Apology,
    ResetConfirmed,
    HandlerFailure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Terminal outcome of one inbound message.
pub enum HandleOutcome {
    Ignored(IgnoreReason),
    Replied(ReplyKind),
}

pub struct ResponseOrchestrator {
    config: RelayRuntimeConfig,
    state: Arc<BotState>,
}

impl ResponseOrchestrator {
    pub fn new(config: RelayRuntimeConfig, state: Arc<BotState>) -> Self {
        Self { config, state }
    }

    pub fn state(&self) -> &Arc<BotState> {
        &self.state
    }

    pub fn config(&self) -> &RelayRuntimeConfig {
        &self.config
    }

    /// Handles one inbound message. Errors escaping the handler body are
    /// logged and answered with the generic failure text.
    pub async fn handle_message<T>(&self, transport: &T, message: &InboundMessage) -> HandleOutcome
    where
        T: ChatTransport + ?Sized,
    {
        match self.handle_message_inner(transport, message).await {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::error!(
                    conversation_id = %message.conversation_id,
                    message_id = %message.message_id,
                    error = %format!("{error:#}"),
                    "relay handler failed"
                );
                if let Err(reply_error) = transport
                    .reply(message, &self.config.replies.handler_failure)
                    .await
                {
                    tracing::error!(
                        conversation_id = %message.conversation_id,
                        error = %format!("{reply_error:#}"),
                        "failed to send handler failure reply"
                    );
                }
                HandleOutcome::Replied(ReplyKind::HandlerFailure)
            }
        }
    }

    async fn handle_message_inner<T>(
        &self,
        transport: &T,
        message: &InboundMessage,
    ) -> Result<HandleOutcome>
    where
        T: ChatTransport + ?Sized,
    {
        if let Some(reason) = self.filter_message(message)? {
            tracing::debug!(
                conversation_id = %message.conversation_id,
                message_id = %message.message_id,
                ?reason,
                "ignoring inbound message"
            );
            return Ok(HandleOutcome::Ignored(reason));
        }

        let text = normalize_message_text(&message.content);
        if text.is_empty() {
            return Ok(HandleOutcome::Ignored(IgnoreReason::EmptyContent));
        }

        let conversation_id = message.conversation_id.as_str();
        if let Some(RelayCommand::ResetHistory) =
            parse_relay_command(&text, &self.config.reset_keywords)
        {
            {
                let guard = self.state.lock_conversation(conversation_id).await?;
                let existed = self.state.reset_history(guard.conversation_id())?;
                tracing::info!(
                    conversation_id = guard.conversation_id(),
                    existed,
                    "conversation history reset"
                );
            }
            transport
                .reply(message, &self.config.replies.reset_confirmation)
                .await?;
            return Ok(HandleOutcome::Replied(ReplyKind::ResetConfirmed));
        }

        if let Err(error) = transport.send_typing(conversation_id).await {
            tracing::debug!(conversation_id, error = %error, "failed to send typing indicator");
        }

        let assistant_text = {
            let _guard = if self.config.history_enabled {
                Some(self.state.lock_conversation(conversation_id).await?)
            } else {
                None
            };
            let prior_turns = if self.config.history_enabled {
                self.state.history(conversation_id)?
            } else {
                Vec::new()
            };
            let mut request = build_completion_request(
                &self.config.model,
                self.config.system_prompt.as_deref(),
                prior_turns,
                &text,
            );
            request.max_tokens = self.config.max_tokens;
            request.temperature = self.config.temperature;

            match self.config.client.complete(request).await {
                Ok(response) => {
                    let assistant_text = response.text().to_string();
                    if self.config.history_enabled {
                        self.state
                            .append_exchange(conversation_id, &text, &assistant_text)?;
                    }
                    tracing::debug!(
                        conversation_id,
                        total_tokens = response.usage.total_tokens,
                        "completion succeeded"
                    );
                    Some(assistant_text)
                }
                Err(error) => {
                    tracing::warn!(conversation_id, error = %error, "completion request failed");
                    None
                }
            }
        };

        match assistant_text {
            Some(assistant_text) => {
                transport.reply(message, &assistant_text).await?;
                Ok(HandleOutcome::Replied(ReplyKind::Assistant))
            }
            None => {
                transport
                    .reply(message, &self.config.replies.apology)
                    .await?;
                Ok(HandleOutcome::Replied(ReplyKind::Apology))
            }
        }
    }

    fn filter_message(&self, message: &InboundMessage) -> Result<Option<IgnoreReason>> {
        if message.author_is_bot {
            return Ok(Some(IgnoreReason::BotAuthor));
        }
        if !message.mentions_bot {
            return Ok(Some(IgnoreReason::NotMentioned));
        }
        if self.config.dedup_enabled && self.state.check_and_mark_processed(&message.message_id)? {
            return Ok(Some(IgnoreReason::Duplicate));
        }
        Ok(None)
    }
}
