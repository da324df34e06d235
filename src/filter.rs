use crate::domain::Transaction;
use crate::error::ScreenerError;

/// Narrows new transactions to the ones matching a configured (field, value)
/// pair, eg. `("to", "0x...")`.
#[derive(Debug, Clone)]
pub struct FieldFilter {
    field: String,
    value: String,
    /// Raw txlist entries are schema-guaranteed to carry the address fields a
    /// filter targets, so a miss there is an upstream schema break. Token
    /// transfer entries tolerate absent fields as "no match".
    required: bool,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, value: impl Into<String>, required: bool) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            required,
        }
    }

    pub fn matches(&self, txn: &Transaction) -> Result<bool, ScreenerError> {
        match txn.field(&self.field) {
            Some(value) => Ok(value == self.value),
            None if self.required => Err(ScreenerError::schema(&self.field, "txlist")),
            None => Ok(false),
        }
    }
}

/// Human-readable token amount: raw integer `value` scaled down by
/// `tokenDecimal` and rounded to `tokenDecimal / 6` decimal places.
pub fn token_amount(txn: &Transaction) -> Result<f64, ScreenerError> {
    let raw: f64 = txn
        .require("value", "tokentx")?
        .parse()
        .map_err(|_| ScreenerError::schema("value", "tokentx"))?;
    let decimals: u32 = txn
        .require("tokenDecimal", "tokentx")?
        .parse()
        .map_err(|_| ScreenerError::schema("tokenDecimal", "tokentx"))?;

    let amount = raw / 10f64.powi(decimals as i32);
    Ok(round_to(amount, decimals / 6))
}

/// Number of decimal places token amounts are rounded to.
pub fn amount_rounding(decimals: u32) -> u32 {
    decimals / 6
}

/// The alert threshold is inclusive.
pub fn meets_minimum(amount: f64, min_amount: f64) -> bool {
    amount >= min_amount
}

fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
