use tracing::warn;

use crate::audit::AuditLog;
use crate::domain::{Target, Transaction};
use crate::error::ScreenerError;
use crate::filter::{amount_rounding, meets_minimum, token_amount};
use crate::network::Network;
use crate::notifier::NotifierHub;
use crate::utils::{format_utc_stamp, group_thousands, now_stamp, short_hex};

/// Turns alert candidates into messages. Every candidate is written to the
/// audit log; only the ones crossing the target's threshold (all of them, in
/// raw transaction mode) reach the live notification channel.
pub struct AlertDispatcher {
    notifier: NotifierHub,
    audit: AuditLog,
}

impl AlertDispatcher {
    pub fn new(notifier: NotifierHub, audit: AuditLog) -> Self {
        Self { notifier, audit }
    }

    pub async fn dispatch_transactions(
        &self,
        target: &Target,
        txns: &[Transaction],
    ) -> Result<(), ScreenerError> {
        for txn in txns {
            let hash = txn.require("hash", "txlist")?;
            let message = format_transaction(target, txn)?;

            self.audit.record(&format!("{hash}, {}", target.network));
            if let Err(e) = self.notifier.alert(&message).await {
                warn!("Failed to deliver alert for {hash}: {e}");
            }
        }
        Ok(())
    }

    pub async fn dispatch_token_transfers(
        &self,
        target: &Target,
        txns: &[Transaction],
    ) -> Result<(), ScreenerError> {
        for txn in txns {
            let hash = txn.require("hash", "tokentx")?;
            let amount = token_amount(txn)?;
            let symbol = txn.require("tokenSymbol", "tokentx")?;
            let places = amount_rounding(
                txn.require("tokenDecimal", "tokentx")?
                    .parse()
                    .map_err(|_| ScreenerError::schema("tokenDecimal", "tokentx"))?,
            );
            let amount_display = group_thousands(amount, places as usize);

            self.audit.record(&format!(
                "{hash}, {amount_display} {symbol} swapped on {}",
                target.network.name().to_uppercase()
            ));

            if meets_minimum(amount, target.min_amount) {
                let message = format_token_transfer(target, hash, &amount_display, symbol);
                if let Err(e) = self.notifier.alert(&message).await {
                    warn!("Failed to deliver alert for {hash}: {e}");
                }
            }
        }
        Ok(())
    }
}

fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn tx_link(network: Network, hash: &str) -> String {
    format!("{}/tx/{hash}", network.explorer_url())
}

fn format_transaction(target: &Target, txn: &Transaction) -> Result<String, ScreenerError> {
    let hash = txn.require("hash", "txlist")?;
    let value: f64 = txn
        .require("value", "txlist")?
        .parse()
        .map_err(|_| ScreenerError::schema("value", "txlist"))?;
    let from_addr = txn.require("from", "txlist")?;
    let to_addr = txn.require("to", "txlist")?;
    let stamp_secs: i64 = txn
        .require("timeStamp", "txlist")?
        .parse()
        .map_err(|_| ScreenerError::schema("timeStamp", "txlist"))?;

    let function_name = match txn.field("functionName") {
        Some(name) => name.split('(').next().unwrap_or(name).to_string(),
        None => "n/a".to_string(),
    };

    Ok(format!(
        "{}\n<a href='{}'>{} on {}</a>\nFrom {} -> To {}\nStamp:  {}\nType: {}\nValue: {}",
        now_stamp(),
        tx_link(target.network, hash),
        short_hex(hash),
        title_case(target.network.name()),
        short_hex(from_addr),
        short_hex(to_addr),
        format_utc_stamp(stamp_secs),
        function_name,
        group_thousands(value, 3),
    ))
}

fn format_token_transfer(target: &Target, hash: &str, amount_display: &str, symbol: &str) -> String {
    format!(
        "{} - contract-screener\n-> {amount_display} {symbol} swapped on <a href='{}'>{} {}</a>",
        now_stamp(),
        tx_link(target.network, hash),
        target.network.name().to_uppercase(),
        target.network.badge(),
    )
}
