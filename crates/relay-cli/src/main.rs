use anyhow::Result;
use clap::Parser;
use relay_cli::{init_tracing, run_relaybot, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    run_relaybot(cli).await
}
