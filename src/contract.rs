use anyhow::{anyhow, Context, Result};
use ethers_core::abi::Abi;
use ethers_core::types::Address;
use ethers_providers::{Http, Provider};
use futures::future::join_all;
use tracing::{info, warn};

use crate::domain::Target;
use crate::explorer::ExplorerClient;
use crate::utils::mask_url;

/// A validated, queryable contract: checksum address, parsed ABI and a node
/// provider for its network. Built once at startup per target.
#[derive(Debug)]
pub struct ContractHandle {
    pub address: Address,
    pub abi: Abi,
    pub provider: Provider<Http>,
}

impl ContractHandle {
    pub fn function_count(&self) -> usize {
        self.abi.functions().count()
    }
}

async fn initialize(client: &ExplorerClient, target: &Target) -> Result<ContractHandle> {
    let abi_text = client
        .contract_abi(target.network, &target.contract_address)
        .await?;
    build_handle(target, &abi_text)
}

fn build_handle(target: &Target, abi_text: &str) -> Result<ContractHandle> {
    let abi: Abi = serde_json::from_str(abi_text)
        .with_context(|| format!("invalid ABI for {}", target.contract_address))?;

    let address: Address = target
        .contract_address
        .parse()
        .map_err(|e| anyhow!("invalid contract address {}: {e}", target.contract_address))?;

    let rpc_url = target
        .network
        .rpc_url()
        .ok_or_else(|| anyhow!("WEB3_{} endpoint not set", target.network.name().to_uppercase()))?;
    let provider = Provider::<Http>::try_from(rpc_url.as_str())
        .with_context(|| format!("invalid node endpoint {}", mask_url(&rpc_url)))?;

    Ok(ContractHandle {
        address,
        abi,
        provider,
    })
}

/// Validates every target concurrently and returns the ones that are
/// queryable, in configuration order. A target whose contract handle cannot
/// be constructed is excluded from polling with a logged warning; the
/// remaining targets carry on.
pub async fn initialize_targets(client: &ExplorerClient, targets: Vec<Target>) -> Vec<Target> {
    let handles = join_all(
        targets
            .iter()
            .map(|target| initialize(client, target)),
    )
    .await;

    let total = targets.len();
    let mut active = Vec::with_capacity(total);
    for (target, handle) in targets.into_iter().zip(handles) {
        match handle {
            Ok(handle) => {
                info!(
                    "🔗 {} ({}, {}): contract validated, {} functions, node {}",
                    target.name,
                    target.network,
                    crate::utils::short_hex(&target.contract_address),
                    handle.function_count(),
                    mask_url(handle.provider.url().as_str()),
                );
                active.push(target);
            }
            Err(e) => {
                warn!(
                    "Contract instance not created for {}, {}. {e}",
                    target.network, target.contract_address
                );
            }
        }
    }

    info!("Initialised {}/{total} contract instances", active.len());
    active
}

#[cfg(test)]
mod tests {
    use super::build_handle;
    use crate::domain::Target;
    use crate::network::Network;

    const TRANSFER_ABI: &str = r#"[{
        "constant": false,
        "inputs": [
            {"name": "to", "type": "address"},
            {"name": "value", "type": "uint256"}
        ],
        "name": "transfer",
        "outputs": [{"name": "", "type": "bool"}],
        "type": "function"
    }]"#;

    fn target(network: Network, address: &str) -> Target {
        Target {
            name: "test".to_string(),
            network,
            contract_address: address.to_string(),
            token_address: None,
            min_amount: 1.0,
            symbol: "TST".to_string(),
        }
    }

    #[test]
    fn builds_handle_from_valid_abi_and_address() {
        std::env::set_var("WEB3_GNOSIS", "https://rpc.gnosischain.com");
        let target = target(Network::Gnosis, "0xdac17f958d2ee523a2206206994597c13d831ec7");

        let handle = build_handle(&target, TRANSFER_ABI).unwrap();
        assert_eq!(handle.function_count(), 1);
    }

    #[test]
    fn rejects_malformed_abi() {
        std::env::set_var("WEB3_ARBITRUM", "https://arb1.arbitrum.io/rpc");
        let target = target(Network::Arbitrum, "0xdac17f958d2ee523a2206206994597c13d831ec7");

        assert!(build_handle(&target, "not an abi").is_err());
    }

    #[test]
    fn rejects_invalid_contract_address() {
        std::env::set_var("WEB3_POLYGON", "https://polygon-rpc.com");
        let target = target(Network::Polygon, "not-an-address");

        assert!(build_handle(&target, "[]").is_err());
    }

    #[test]
    fn requires_node_endpoint() {
        std::env::remove_var("WEB3_OPTIMISM");
        let target = target(Network::Optimism, "0xdac17f958d2ee523a2206206994597c13d831ec7");

        let err = build_handle(&target, "[]").unwrap_err();
        assert!(err.to_string().contains("WEB3_OPTIMISM"));
    }
}
