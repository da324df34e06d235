use clap::{ArgGroup, Parser};

use crate::domain::Mode;

/// Screens a block explorer for new contract transactions and alerts via
/// Telegram when they satisfy the configured filter criteria.
#[derive(Debug, Parser)]
#[command(name = "contract-screener", version)]
#[command(group(ArgGroup::new("mode").required(true).multiple(false).args(["transactions", "erc20tokentxns"])))]
pub struct Cli {
    /// Screen for new contract transactions.
    #[arg(short = 't', long)]
    pub transactions: bool,

    /// Screen for new ERC-20 token transactions.
    #[arg(short = 'e', long)]
    pub erc20tokentxns: bool,

    /// Path to a JSON configuration file, or an inline JSON payload.
    #[arg(value_name = "CONFIG")]
    pub config: String,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.transactions {
            Mode::Transactions
        } else {
            Mode::TokenTransfers
        }
    }
}
