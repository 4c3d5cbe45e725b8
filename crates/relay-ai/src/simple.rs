use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::http_support::{bearer_headers, build_http_client, non_empty_reply, read_success_body};
use crate::{ChatRequest, ChatResponse, ChatUsage, CompletionClient, ConversationTurn, RelayAiError};

#[derive(Debug, Clone)]
/// Public struct `SimpleMessageConfig` for `{message}` -> `{response}` endpoints.
pub struct SimpleMessageConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub request_timeout_ms: u64,
}

/// Completion adapter for endpoints that accept a single message and return
/// a single response string. Prior turns and system instructions are not
/// representable in this schema and are dropped.
#[derive(Debug, Clone)]
pub struct SimpleMessageClient {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct SimpleMessageRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct SimpleMessageResponse {
    #[serde(default)]
    response: Option<String>,
}

impl SimpleMessageClient {
    pub fn new(config: SimpleMessageConfig) -> Result<Self, RelayAiError> {
        let endpoint = config.endpoint.trim().to_string();
        if endpoint.is_empty() {
            return Err(RelayAiError::InvalidConfig(
                "simple completion endpoint cannot be empty".to_string(),
            ));
        }
        let headers = bearer_headers(config.api_key.as_deref())?;
        let client = build_http_client(headers, config.request_timeout_ms)?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl CompletionClient for SimpleMessageClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, RelayAiError> {
        let message = request.latest_user_text().ok_or_else(|| {
            RelayAiError::InvalidResponse("request contained no user turn".to_string())
        })?;
        let response = self
            .client
            .post(&self.endpoint)
            .json(&SimpleMessageRequest { message })
            .send()
            .await?;
        let raw = read_success_body("simple", response).await?;
        parse_simple_response(&raw)
    }
}

fn parse_simple_response(raw: &str) -> Result<ChatResponse, RelayAiError> {
    let parsed: SimpleMessageResponse = serde_json::from_str(raw)?;
    let text = non_empty_reply(parsed.response)?;
    Ok(ChatResponse {
        message: ConversationTurn::assistant(text),
        finish_reason: None,
        usage: ChatUsage::default(),
    })
}
