use thiserror::Error;

/// Errors that are allowed to escalate past a single target's processing.
///
/// Soft fetch failures (connection errors, malformed payloads, non-success
/// envelopes) are intentionally *not* represented here: the fetcher resolves
/// them to empty snapshots so one unreachable explorer never aborts the cycle
/// for the remaining targets.
#[derive(Debug, Error)]
pub enum ScreenerError {
    /// A field the explorer schema guarantees was missing from an entry.
    /// This signals a breaking upstream API change, so it terminates the
    /// process instead of being swallowed like an ordinary absent field.
    #[error("required field `{field}` missing from {context} entry")]
    Schema { field: String, context: String },
}

impl ScreenerError {
    pub fn schema(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Schema {
            field: field.into(),
            context: context.into(),
        }
    }
}
