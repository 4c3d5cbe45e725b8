use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::http_support::{bearer_headers, build_http_client, non_empty_reply, read_success_body};
use crate::{ChatRequest, ChatResponse, ChatUsage, CompletionClient, ConversationTurn, RelayAiError};

pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
/// Public struct `OpenAiChatConfig` for chat-completions compatible endpoints.
pub struct OpenAiChatConfig {
    pub api_base: String,
    pub api_key: String,
    pub organization: Option<String>,
    pub request_timeout_ms: u64,
}

impl Default for OpenAiChatConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            api_key: String::new(),
            organization: None,
            request_timeout_ms: 60_000,
        }
    }
}

#[derive(Debug, Clone)]
/// Completion adapter for the `{model, messages}` chat-completions schema.
pub struct OpenAiChatClient {
    client: reqwest::Client,
    config: OpenAiChatConfig,
}

impl OpenAiChatClient {
    pub fn new(config: OpenAiChatConfig) -> Result<Self, RelayAiError> {
        if config.api_key.trim().is_empty() {
            return Err(RelayAiError::MissingApiKey);
        }

        let mut headers = bearer_headers(Some(&config.api_key))?;
        if let Some(org) = &config.organization {
            headers.insert(
                "OpenAI-Organization",
                reqwest::header::HeaderValue::from_str(org).map_err(|e| {
                    RelayAiError::InvalidConfig(format!("invalid organization header: {e}"))
                })?,
            );
        }
        let client = build_http_client(headers, config.request_timeout_ms)?;

        Ok(Self { client, config })
    }

    fn chat_completions_url(&self) -> String {
        let base = self.config.api_base.trim_end_matches('/');
        if base.ends_with("/chat/completions") {
            return base.to_string();
        }

        format!("{base}/chat/completions")
    }
}

#[async_trait]
impl CompletionClient for OpenAiChatClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, RelayAiError> {
        let body = build_chat_request_body(&request);
        let response = self
            .client
            .post(self.chat_completions_url())
            .json(&body)
            .send()
            .await?;
        let raw = read_success_body("openai", response).await?;
        parse_chat_response(&raw)
    }
}

fn build_chat_request_body(request: &ChatRequest) -> Value {
    let messages = request
        .messages
        .iter()
        .map(|turn| {
            json!({
                "role": turn.role().as_str(),
                "content": turn.content(),
            })
        })
        .collect::<Vec<_>>();
    let mut body = json!({
        "model": request.model,
        "messages": messages,
    });
    if let Some(max_tokens) = request.max_tokens {
        body["max_tokens"] = json!(max_tokens);
    }
    if let Some(temperature) = request.temperature {
        body["temperature"] = json!(temperature);
    }
    body
}

#[derive(Debug, Deserialize)]
struct OpenAiChatResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
}

fn parse_chat_response(raw: &str) -> Result<ChatResponse, RelayAiError> {
    let parsed: OpenAiChatResponse = serde_json::from_str(raw)?;
    let choice =
        parsed.choices.into_iter().next().ok_or_else(|| {
            RelayAiError::InvalidResponse("response contained no choices".to_string())
        })?;
    let text = non_empty_reply(choice.message.content)?;

    let usage = parsed
        .usage
        .map(|usage| ChatUsage {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        })
        .unwrap_or_default();

    Ok(ChatResponse {
        message: ConversationTurn::assistant(text),
        finish_reason: choice.finish_reason,
        usage,
    })
}
