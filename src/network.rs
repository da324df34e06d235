use std::env;

use anyhow::{anyhow, Result};
use serde::Deserialize;

/// Networks with a supported etherscan-family explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Network {
    Ethereum,
    Arbitrum,
    Optimism,
    Polygon,
    Gnosis,
}

impl Network {
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "ethereum" => Ok(Self::Ethereum),
            "arbitrum" => Ok(Self::Arbitrum),
            "optimism" => Ok(Self::Optimism),
            "polygon" => Ok(Self::Polygon),
            "gnosis" => Ok(Self::Gnosis),
            other => Err(anyhow!(
                "no such network `{other}`, choose from: ethereum, arbitrum, optimism, polygon, gnosis"
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Arbitrum => "arbitrum",
            Self::Optimism => "optimism",
            Self::Polygon => "polygon",
            Self::Gnosis => "gnosis",
        }
    }

    /// Explorer API base, eg. `https://api.etherscan.io/api`.
    pub fn api_url(&self) -> String {
        let base = match self {
            Self::Ethereum => "https://api.etherscan.io",
            Self::Arbitrum => "https://api.arbiscan.io",
            Self::Optimism => "https://api-optimistic.etherscan.io",
            Self::Polygon => "https://api.polygonscan.com",
            Self::Gnosis => "https://api.gnosisscan.io",
        };
        format!("{base}/api")
    }

    /// Explorer web page base, used to build transaction links.
    pub fn explorer_url(&self) -> &'static str {
        match self {
            Self::Ethereum => "https://etherscan.io",
            Self::Arbitrum => "https://arbiscan.io",
            Self::Optimism => "https://optimistic.etherscan.io",
            Self::Polygon => "https://polygonscan.com",
            Self::Gnosis => "https://gnosisscan.io",
        }
    }

    /// Badge shown next to the network name in alert messages.
    pub fn badge(&self) -> &'static str {
        match self {
            Self::Ethereum => "🔲",
            Self::Arbitrum => "🟦",
            Self::Optimism => "🟥",
            Self::Polygon => "🟪",
            Self::Gnosis => "🟫",
        }
    }

    /// Explorer API key, eg. `ETHEREUM_API_KEY`.
    pub fn api_key(&self) -> Option<String> {
        env::var(format!("{}_API_KEY", self.name().to_uppercase())).ok()
    }

    /// Node RPC endpoint, eg. `WEB3_ETHEREUM`.
    pub fn rpc_url(&self) -> Option<String> {
        env::var(format!("WEB3_{}", self.name().to_uppercase())).ok()
    }
}

impl TryFrom<String> for Network {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).map_err(|e| e.to_string())
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
