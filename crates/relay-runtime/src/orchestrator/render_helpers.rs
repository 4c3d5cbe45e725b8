//! Message-text normalisation, request assembly, and fixed reply texts.

use std::sync::OnceLock;

use regex::Regex;
use relay_ai::{ChatRequest, ConversationTurn};

pub const DISCORD_SAFE_MAX_CHARS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Fixed user-facing texts for the non-assistant replies.
pub struct ReplyTexts {
    pub apology: String,
    pub handler_failure: String,
    pub reset_confirmation: String,
}

impl Default for ReplyTexts {
    fn default() -> Self {
        Self {
            apology: "すみません、APIとの通信中にエラーが発生しました。".to_string(),
            handler_failure: "エラーが発生しました。しばらく待ってからお試しください。"
                .to_string(),
            reset_confirmation: "会話履歴をリセットしました。".to_string(),
        }
    }
}

fn user_mention_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<@!?\d+>").expect("hardcoded regex"))
}

/// Removes `<@id>` / `<@!id>` mention markup and trims the result.
pub fn normalize_message_text(raw: &str) -> String {
    user_mention_pattern().replace_all(raw, "").trim().to_string()
}

pub(super) fn build_completion_request(
    model: &str,
    system_prompt: Option<&str>,
    prior_turns: Vec<ConversationTurn>,
    user_text: &str,
) -> ChatRequest {
    let mut messages = Vec::with_capacity(prior_turns.len().saturating_add(2));
    if let Some(prompt) = system_prompt.map(str::trim).filter(|prompt| !prompt.is_empty()) {
        messages.push(ConversationTurn::system(prompt));
    }
    messages.extend(prior_turns);
    messages.push(ConversationTurn::user(user_text));
    ChatRequest::new(model, messages)
}

/// Truncates on a char boundary so the result fits a single chat message.
pub fn truncate_for_chat(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let suffix = "…";
    let keep = max_chars.saturating_sub(suffix.chars().count());
    let mut truncated = text.chars().take(keep).collect::<String>();
    truncated.push_str(suffix);
    truncated
}
