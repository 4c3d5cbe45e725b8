use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
/// Which caches the orchestrator keeps.
pub enum CliRelayVariant {
    Stateless,
    History,
    HistoryDedup,
}

impl CliRelayVariant {
    pub fn history_enabled(self) -> bool {
        matches!(self, Self::History | Self::HistoryDedup)
    }

    pub fn dedup_enabled(self) -> bool {
        matches!(self, Self::HistoryDedup)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
/// Upstream request/response shape.
pub enum CliCompletionApi {
    ChatCompletions,
    Simple,
}
