pub mod alert;
pub mod audit;
pub mod cli;
pub mod config;
pub mod contract;
pub mod diff;
pub mod domain;
pub mod error;
pub mod explorer;
pub mod filter;
pub mod network;
pub mod notifier;
pub mod screener;
pub mod utils;

use std::time::Duration;

use anyhow::{bail, Result};
use tracing::info;

use alert::AlertDispatcher;
use audit::AuditLog;
use cli::Cli;
use config::{AppConfig, ScreenerConfig};
use domain::Mode;
use explorer::ExplorerClient;
use filter::FieldFilter;
use notifier::{ConsoleNotifier, NotifierHub, TelegramNotifier};
use screener::Screener;

pub async fn run(cli: Cli) -> Result<()> {
    let mode = cli.mode();
    let config = ScreenerConfig::load(&cli.config)?;
    let app = AppConfig::from_env();

    let telegram = TelegramNotifier::maybe_from_config(&app);
    if telegram.is_some() {
        info!("📱 Telegram notifications enabled");
    } else {
        info!("📱 Telegram notifications disabled (no credentials)");
    }
    let hub = NotifierHub::new(ConsoleNotifier::new(), telegram);

    let fetcher = ExplorerClient::new(Duration::from_secs(config.settings.fetch_timeout_secs));

    let targets = config.targets();
    info!("🔍 Started screening {} contracts:", targets.len());
    for target in &targets {
        let token = target
            .token_address
            .as_deref()
            .map(utils::short_hex)
            .unwrap_or_else(|| "n/a".to_string());
        info!(
            "   - {} | {} | min {} {} | contract {} | token {}",
            target.name,
            target.network,
            target.min_amount,
            target.symbol,
            utils::short_hex(&target.contract_address),
            token,
        );
    }

    let targets = contract::initialize_targets(&fetcher, targets).await;
    if targets.is_empty() {
        hub.debug("⚠️ contract-screener could not initialise any targets.").await;
        bail!("no contract could be initialised, nothing to screen");
    }

    match mode {
        Mode::Transactions => info!(
            "Screening for 'Transactions' and filtering by {:?}",
            config.settings.filter_by
        ),
        Mode::TokenTransfers => info!(
            "Screening for 'Erc20 Token Txns' and filtering by {:?}",
            config.settings.filter_by
        ),
    }

    // The filter field is schema-guaranteed on raw txlist entries only.
    let required = mode == Mode::Transactions;
    let field_filter = config
        .settings
        .filter_by
        .clone()
        .map(|(field, value)| FieldFilter::new(field, value, required));

    let audit_log = AuditLog::open(&app.txn_log_file)?;
    let dispatcher = AlertDispatcher::new(hub.clone(), audit_log);

    let mut screener = Screener::new(
        mode,
        targets,
        fetcher,
        field_filter,
        dispatcher,
        Duration::from_secs(config.settings.sleep_time),
        config.settings.txn_count,
    );

    hub.debug("✅ contract-screener has started.").await;

    let outcome = tokio::select! {
        result = screener.run() => result.map_err(anyhow::Error::from),
        _ = tokio::signal::ctrl_c() => {
            info!("Received ctrl-c, shutting down");
            Ok(())
        }
    };

    // Best-effort shutdown notice, sent on clean exits and escalated errors alike.
    hub.debug("⚠️ contract-screener has stopped.").await;
    outcome
}
