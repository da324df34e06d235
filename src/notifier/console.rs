use anyhow::Result;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }

    pub async fn send(&self, message: &str) -> Result<()> {
        println!("{message}");
        info!("Alert sent to console");
        Ok(())
    }
}
