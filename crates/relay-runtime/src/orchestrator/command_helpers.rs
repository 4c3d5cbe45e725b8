//! Reset-command detection for normalized message text.

pub const DEFAULT_RESET_KEYWORDS: [&str; 2] = ["reset", "リセット"];

pub fn default_reset_keywords() -> Vec<String> {
    DEFAULT_RESET_KEYWORDS
        .iter()
        .map(|keyword| keyword.to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum RelayCommand {
    ResetHistory,
}

/// Matches the whole normalized text against the configured keywords,
/// ignoring case.
pub(super) fn parse_relay_command(text: &str, reset_keywords: &[String]) -> Option<RelayCommand> {
    let candidate = text.trim().to_lowercase();
    if candidate.is_empty() {
        return None;
    }
    reset_keywords
        .iter()
        .map(|keyword| keyword.trim().to_lowercase())
        .any(|keyword| !keyword.is_empty() && keyword == candidate)
        .then_some(RelayCommand::ResetHistory)
}
