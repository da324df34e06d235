use std::collections::BTreeMap;
use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::Target;
use crate::network::Network;

/// Structured configuration document supplied on the command line, either as
/// a path to a JSON file or as an inline JSON payload. Consumed once at
/// startup; no hot-reload.
#[derive(Debug, Clone, Deserialize)]
pub struct ScreenerConfig {
    pub contracts: BTreeMap<String, ContractEntry>,
    pub settings: Settings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContractEntry {
    pub network: Network,
    pub contract_address: String,
    #[serde(default)]
    pub token_address: Option<String>,
    pub min_amount: f64,
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Optional (field, value) pair narrowing alerts, eg. `["to", "0x..."]`.
    #[serde(default)]
    pub filter_by: Option<(String, String)>,
    /// Seconds to wait between polling cycles.
    pub sleep_time: u64,
    /// Transactions fetched per target per cycle.
    #[serde(default = "default_txn_count")]
    pub txn_count: usize,
    /// Per-request timeout for explorer fetches.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_txn_count() -> usize {
    100
}

fn default_fetch_timeout_secs() -> u64 {
    3
}

impl ScreenerConfig {
    pub fn load(payload: &str) -> Result<Self> {
        let text = if Path::new(payload).is_file() {
            std::fs::read_to_string(payload)
                .with_context(|| format!("could not read config file {payload}"))?
        } else {
            payload.to_string()
        };

        let config: Self =
            serde_json::from_str(&text).context("malformed screener configuration")?;
        if config.contracts.is_empty() {
            anyhow::bail!("configuration contains no contracts to screen");
        }
        Ok(config)
    }

    /// Targets in stable configuration order; alert and log ordering follows
    /// this order across the run.
    pub fn targets(&self) -> Vec<Target> {
        self.contracts
            .iter()
            .map(|(name, entry)| Target {
                name: name.clone(),
                network: entry.network,
                contract_address: entry.contract_address.to_lowercase(),
                token_address: entry.token_address.as_ref().map(|a| a.to_lowercase()),
                min_amount: entry.min_amount,
                symbol: entry.token.clone(),
            })
            .collect()
    }
}

/// Environment-derived settings, loaded once. Missing Telegram credentials
/// disable Telegram delivery rather than failing startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_alerts: Option<String>,
    pub telegram_chat_debug: Option<String>,
    pub txn_log_file: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN").ok(),
            telegram_chat_alerts: env::var("TELEGRAM_CHAT_ID_ALERTS").ok(),
            telegram_chat_debug: env::var("TELEGRAM_CHAT_ID_DEBUG").ok(),
            txn_log_file: env::var("TXN_LOG_FILE")
                .unwrap_or_else(|_| "screener_txns.log".to_string()),
        }
    }
}
