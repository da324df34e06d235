use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::domain::{Snapshot, Target, Transaction};
use crate::network::Network;

/// JSON envelope every etherscan-family endpoint wraps its payload in.
#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Value,
}

/// Fetches recent transaction pages from explorer APIs.
///
/// All fetch-time failures (connection errors, malformed bodies, non-success
/// envelope status, unexpected payload shape) resolve to an empty snapshot
/// with a logged warning. One unreachable explorer must never abort the
/// polling cycle for the other targets.
pub struct ExplorerClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl ExplorerClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Most recent `count` transactions against the target contract,
    /// descending recency order as returned by the explorer.
    pub async fn last_transactions(&self, target: &Target, count: usize) -> Snapshot {
        let query = [
            ("module", "account".to_string()),
            ("action", "txlist".to_string()),
            ("address", target.contract_address.clone()),
            ("startblock", "0".to_string()),
            ("endblock", "99999999".to_string()),
            ("sort", "desc".to_string()),
        ];
        self.fetch_page(target.network, &query, count).await
    }

    /// Most recent `count` ERC-20 token transactions between the target's
    /// token contract and the screened contract.
    pub async fn last_token_transfers(&self, target: &Target, count: usize) -> Snapshot {
        let token_address = target
            .token_address
            .as_deref()
            .unwrap_or(&target.contract_address);
        let query = [
            ("module", "account".to_string()),
            ("action", "tokentx".to_string()),
            ("contractaddress", token_address.to_string()),
            ("address", target.contract_address.clone()),
            ("page", "1".to_string()),
            ("offset", "100".to_string()),
            ("sort", "desc".to_string()),
        ];
        self.fetch_page(target.network, &query, count).await
    }

    /// The contract's ABI, used once at startup to validate a target is
    /// queryable. Unlike page fetches this propagates failures so the caller
    /// can exclude the target.
    pub async fn contract_abi(&self, network: Network, address: &str) -> Result<String> {
        let mut request = self
            .client
            .get(network.api_url())
            .query(&[
                ("module", "contract"),
                ("action", "getabi"),
                ("address", address),
            ])
            .timeout(self.timeout);
        if let Some(key) = network.api_key() {
            request = request.query(&[("apikey", key)]);
        }

        let envelope: Envelope = request.send().await?.json().await?;
        if envelope.status != "1" {
            return Err(anyhow!(
                "explorer rejected ABI request for {address} on {network}: {}",
                envelope.message
            ));
        }
        envelope
            .result
            .as_str()
            .map(|abi| abi.to_string())
            .ok_or_else(|| anyhow!("unexpected ABI payload for {address} on {network}"))
    }

    async fn fetch_page(&self, network: Network, query: &[(&str, String)], count: usize) -> Snapshot {
        let mut request = self
            .client
            .get(network.api_url())
            .query(query)
            .timeout(self.timeout);
        if let Some(key) = network.api_key() {
            request = request.query(&[("apikey", key)]);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("'ConnectionError': unable to fetch transaction data for {network} - {e}");
                return Vec::new();
            }
        };

        let envelope: Envelope = match response.json().await {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("'JSONError' - {network} - {e}");
                return Vec::new();
            }
        };

        page_from_envelope(envelope, count, network)
    }
}

/// Extracts the most recent `count` transactions out of a response envelope,
/// resolving every unexpected shape to an empty page.
fn page_from_envelope(envelope: Envelope, count: usize, network: Network) -> Snapshot {
    if envelope.status != "1" {
        warn!(
            "'ResponseError' {network} - status {} - {}",
            envelope.status, envelope.message
        );
        return Vec::new();
    }

    let Some(entries) = envelope.result.as_array() else {
        warn!("'ResponseError' {network} - unexpected result shape");
        return Vec::new();
    };

    entries
        .iter()
        .take(count)
        .filter_map(|entry| entry.as_object().cloned().map(Transaction::new))
        .collect()
}
