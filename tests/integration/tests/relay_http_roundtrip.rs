use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use httpmock::prelude::*;
use relay_ai::{
    CompletionClient, OpenAiChatClient, OpenAiChatConfig, SimpleMessageClient,
    SimpleMessageConfig,
};
use relay_runtime::{
    ChatTransport, HandleOutcome, IgnoreReason, InboundMessage, RelayRuntimeConfig, ReplyKind,
    ReplyTexts, ResponseOrchestrator,
};
use relay_state::{BotState, BotStateConfig};
use serde_json::json;

#[derive(Default)]
struct RecordingTransport {
    replies: Mutex<Vec<String>>,
    typing: Mutex<usize>,
}

impl RecordingTransport {
    fn replies(&self) -> Vec<String> {
        self.replies.lock().expect("replies").clone()
    }

    fn typing_count(&self) -> usize {
        *self.typing.lock().expect("typing")
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_typing(&self, _conversation_id: &str) -> Result<()> {
        *self.typing.lock().expect("typing") += 1;
        Ok(())
    }

    async fn reply(&self, _message: &InboundMessage, text: &str) -> Result<()> {
        self.replies.lock().expect("replies").push(text.to_string());
        Ok(())
    }
}

fn openai_client(server: &MockServer) -> Arc<dyn CompletionClient> {
    Arc::new(
        OpenAiChatClient::new(OpenAiChatConfig {
            api_base: format!("{}/v1", server.base_url()),
            api_key: "test-key".to_string(),
            organization: None,
            request_timeout_ms: 5_000,
        })
        .expect("openai client"),
    )
}

fn relay(client: Arc<dyn CompletionClient>) -> (ResponseOrchestrator, Arc<BotState>) {
    let state = Arc::new(BotState::new(BotStateConfig::default()));
    let orchestrator = ResponseOrchestrator::new(RelayRuntimeConfig::new(client), Arc::clone(&state));
    (orchestrator, state)
}

fn mention(message_id: &str, content: &str) -> InboundMessage {
    InboundMessage {
        message_id: message_id.to_string(),
        conversation_id: "chan1".to_string(),
        author_id: "42".to_string(),
        author_is_bot: false,
        mentions_bot: true,
        content: format!("<@!1000> {content}"),
    }
}

fn completion_body(text: &str) -> serde_json::Value {
    json!({
        "choices": [{
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn integration_second_mention_carries_first_exchange_upstream() {
    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer test-key")
            .json_body(json!({
                "model": "gpt-4o-mini",
                "messages": [{"role": "user", "content": "hello"}]
            }));
        then.status(200).json_body(completion_body("hi there"));
    });
    let second = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .json_body(json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "user", "content": "hello"},
                    {"role": "assistant", "content": "hi there"},
                    {"role": "user", "content": "how are you"}
                ]
            }));
        then.status(200).json_body(completion_body("fine"));
    });

    let (orchestrator, state) = relay(openai_client(&server));
    let transport = RecordingTransport::default();

    assert_eq!(
        orchestrator.handle_message(&transport, &mention("m1", "hello")).await,
        HandleOutcome::Replied(ReplyKind::Assistant)
    );
    assert_eq!(
        orchestrator
            .handle_message(&transport, &mention("m2", "how are you"))
            .await,
        HandleOutcome::Replied(ReplyKind::Assistant)
    );

    first.assert();
    second.assert();
    assert_eq!(transport.replies(), vec!["hi there", "fine"]);
    assert_eq!(transport.typing_count(), 2);
    assert_eq!(state.history("chan1").expect("history").len(), 4);
}

#[tokio::test]
async fn integration_upstream_failure_sends_apology_and_keeps_history() {
    let server = MockServer::start();
    let failing = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(500).body("upstream exploded");
    });

    let (orchestrator, state) = relay(openai_client(&server));
    let transport = RecordingTransport::default();

    let outcome = orchestrator
        .handle_message(&transport, &mention("m1", "hello"))
        .await;

    assert_eq!(outcome, HandleOutcome::Replied(ReplyKind::Apology));
    assert_eq!(failing.calls(), 1);
    assert_eq!(transport.replies(), vec![ReplyTexts::default().apology]);
    assert!(state.history("chan1").expect("history").is_empty());
}

#[tokio::test]
async fn integration_reset_and_duplicates_never_reach_upstream() {
    let server = MockServer::start();
    let completions = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(completion_body("hi there"));
    });

    let (orchestrator, state) = relay(openai_client(&server));
    let transport = RecordingTransport::default();

    orchestrator
        .handle_message(&transport, &mention("m1", "hello"))
        .await;
    assert_eq!(
        orchestrator
            .handle_message(&transport, &mention("m1", "hello"))
            .await,
        HandleOutcome::Ignored(IgnoreReason::Duplicate)
    );
    assert_eq!(
        orchestrator
            .handle_message(&transport, &mention("m2", "RESET"))
            .await,
        HandleOutcome::Replied(ReplyKind::ResetConfirmed)
    );

    assert_eq!(completions.calls(), 1);
    assert!(state.history("chan1").expect("history").is_empty());
    assert_eq!(
        transport.replies(),
        vec![
            "hi there".to_string(),
            ReplyTexts::default().reset_confirmation
        ]
    );
}

#[tokio::test]
async fn integration_simple_endpoint_relays_latest_message_only() {
    let server = MockServer::start();
    let simple = server.mock(|when, then| {
        when.method(POST)
            .path("/chat")
            .json_body(json!({"message": "how are you"}));
        then.status(200).json_body(json!({"response": "great"}));
    });
    let bootstrap = server.mock(|when, then| {
        when.method(POST)
            .path("/chat")
            .json_body(json!({"message": "hello"}));
        then.status(200).json_body(json!({"response": "hi"}));
    });

    let client: Arc<dyn CompletionClient> = Arc::new(
        SimpleMessageClient::new(SimpleMessageConfig {
            endpoint: format!("{}/chat", server.base_url()),
            api_key: None,
            request_timeout_ms: 5_000,
        })
        .expect("simple client"),
    );
    let (orchestrator, state) = relay(client);
    let transport = RecordingTransport::default();

    orchestrator
        .handle_message(&transport, &mention("m1", "hello"))
        .await;
    orchestrator
        .handle_message(&transport, &mention("m2", "how are you"))
        .await;

    bootstrap.assert();
    simple.assert();
    assert_eq!(transport.replies(), vec!["hi", "great"]);
    assert_eq!(state.history("chan1").expect("history").len(), 4);
}

#[tokio::test]
async fn integration_unmentioned_and_bot_messages_stay_silent() {
    let server = MockServer::start();
    let completions = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(completion_body("unused"));
    });

    let (orchestrator, _state) = relay(openai_client(&server));
    let transport = RecordingTransport::default();

    let mut unmentioned = mention("m1", "hello");
    unmentioned.mentions_bot = false;
    let mut from_bot = mention("m2", "hello");
    from_bot.author_is_bot = true;

    assert_eq!(
        orchestrator.handle_message(&transport, &unmentioned).await,
        HandleOutcome::Ignored(IgnoreReason::NotMentioned)
    );
    assert_eq!(
        orchestrator.handle_message(&transport, &from_bot).await,
        HandleOutcome::Ignored(IgnoreReason::BotAuthor)
    );
    assert_eq!(completions.calls(), 0);
    assert!(transport.replies().is_empty());
    assert_eq!(transport.typing_count(), 0);
}
