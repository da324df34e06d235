use serde_json::{Map, Value};

use crate::error::ScreenerError;
use crate::network::Network;

/// Field used to determine transaction uniqueness across fetches.
pub const IDENTITY_FIELD: &str = "hash";

/// One transaction as returned by the explorer, kept as opaque key-value
/// data except for the fields the differ and filters read explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction(Map<String, Value>);

impl Transaction {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Explorer payloads encode every field as a string.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Accessor for fields the explorer schema guarantees; absence means a
    /// breaking upstream change rather than an ordinary empty field.
    pub fn require(&self, name: &str, context: &str) -> Result<&str, ScreenerError> {
        self.field(name)
            .ok_or_else(|| ScreenerError::schema(name, context))
    }

    pub fn hash(&self) -> Option<&str> {
        self.field(IDENTITY_FIELD)
    }
}

#[cfg(test)]
impl Transaction {
    /// Test helper: build a transaction from string field pairs.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        Self(map)
    }
}

/// Last-observed page of transactions for one target. Replaced wholesale,
/// never merged.
pub type Snapshot = Vec<Transaction>;

/// What kind of transactions a run screens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Transactions,
    TokenTransfers,
}

/// One configured (network, contract) polling stream. Immutable after load.
#[derive(Debug, Clone)]
pub struct Target {
    pub name: String,
    pub network: Network,
    pub contract_address: String,
    pub token_address: Option<String>,
    pub min_amount: f64,
    pub symbol: String,
}
