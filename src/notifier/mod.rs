mod console;
mod telegram;

pub use console::ConsoleNotifier;
pub use telegram::TelegramNotifier;

use anyhow::Result;
use tracing::warn;

/// Fans one message out to the console and, when configured, Telegram.
/// Telegram delivery is best-effort; a failed send is warned, never escalated.
#[derive(Clone)]
pub struct NotifierHub {
    console: ConsoleNotifier,
    telegram: Option<TelegramNotifier>,
}

impl NotifierHub {
    pub fn new(console: ConsoleNotifier, telegram: Option<TelegramNotifier>) -> Self {
        Self { console, telegram }
    }

    pub async fn alert(&self, message: &str) -> Result<()> {
        self.console.send(message).await?;

        if let Some(telegram) = &self.telegram {
            if let Err(e) = telegram.send_alert(message).await {
                warn!("Telegram notification failed: {e}");
            }
        }

        Ok(())
    }

    /// Operational messages (started / stopped / terminated abnormally) go to
    /// the debug channel, fire-and-forget.
    pub async fn debug(&self, message: &str) {
        if let Some(telegram) = &self.telegram {
            if let Err(e) = telegram.send_debug(message).await {
                warn!("Telegram debug notification failed: {e}");
            }
        }
    }
}
