use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::warn;

use crate::utils::now_stamp;

/// Append-only record of every candidate transaction, whether or not it
/// crossed the alert threshold. Lives outside the process logs so operators
/// keep a durable trail of everything the screener observed.
pub struct AuditLog {
    file: Mutex<File>,
}

impl AuditLog {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())
            .with_context(|| format!("could not open audit log {}", path.as_ref().display()))?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Writes one compact line record. An IO failure is warned and swallowed;
    /// a full disk must not take the polling loop down.
    pub fn record(&self, line: &str) {
        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(file, "{} - {line}", now_stamp()) {
            warn!("Failed to write audit record: {e}");
        }
    }
}
