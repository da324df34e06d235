use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use contract_screener::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    match dotenv::dotenv() {
        Ok(path) => info!("📄 Loaded .env from {:?}", path),
        Err(e) => warn!("⚠️  Could not load .env file: {e}"),
    }

    let cli = Cli::parse();
    contract_screener::run(cli).await
}
