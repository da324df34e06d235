use anyhow::{anyhow, Result};
use tracing::{info, warn};

use crate::config::AppConfig;

/// Sends messages through the Telegram Bot API. Alert and debug traffic go to
/// separate chats so operational chatter never drowns out live alerts.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    bot_token: String,
    chat_alerts: String,
    chat_debug: Option<String>,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_alerts: String, chat_debug: Option<String>) -> Self {
        Self {
            bot_token,
            chat_alerts,
            chat_debug,
            client: reqwest::Client::new(),
        }
    }

    pub fn maybe_from_config(config: &AppConfig) -> Option<Self> {
        match (&config.telegram_bot_token, &config.telegram_chat_alerts) {
            (Some(token), Some(chat_id)) if !token.is_empty() && !chat_id.is_empty() => Some(
                Self::new(token.clone(), chat_id.clone(), config.telegram_chat_debug.clone()),
            ),
            _ => None,
        }
    }

    pub async fn send_alert(&self, text: &str) -> Result<()> {
        self.send_to(&self.chat_alerts, text).await
    }

    pub async fn send_debug(&self, text: &str) -> Result<()> {
        let chat_id = self.chat_debug.as_ref().unwrap_or(&self.chat_alerts);
        self.send_to(chat_id, text).await
    }

    /// Messages carry HTML anchors linking to the explorer, so parse mode is
    /// HTML and link previews are suppressed.
    async fn send_to(&self, chat_id: &str, text: &str) -> Result<()> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let payload = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
            "disable_web_page_preview": true
        });

        let response = self.client.post(&url).json(&payload).send().await?;

        if response.status().is_success() {
            info!("Message sent to Telegram chat {chat_id}");
            Ok(())
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("Failed to send Telegram message: {error_text}");
            Err(anyhow!("Failed to send Telegram message"))
        }
    }
}
