use async_trait::async_trait;
use screener_core::ScreenerError;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Trait for outbound notification channels.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), ScreenerError>;
    fn name(&self) -> &str;
}

/// Telegram bot configuration.
#[derive(Debug, Clone, Default)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
}

impl TelegramConfig {
    /// Load from environment variables.
    pub fn from_env() -> Self {
        Self {
            bot_token: std::env::var("TELEGRAM_BOT_TOKEN")
                .ok()
                .filter(|s| !s.is_empty()),
            chat_id: std::env::var("TELEGRAM_CHAT_ID")
                .ok()
                .filter(|s| !s.is_empty()),
        }
    }
}

/// Telegram notifier posting plain-text messages via the Bot API.
///
/// Delivery failures surface as errors for the caller to log; there is no
/// retry and no rate-limit backoff.
pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    /// Build from config; `None` when the bot token or chat id is missing.
    pub fn from_config(config: &TelegramConfig) -> Option<Self> {
        match (&config.bot_token, &config.chat_id) {
            (Some(token), Some(chat_id)) => {
                tracing::info!("Telegram notifications enabled (chat {})", chat_id);
                Some(Self {
                    bot_token: token.clone(),
                    chat_id: chat_id.clone(),
                    client: reqwest::Client::new(),
                })
            }
            _ => {
                tracing::info!(
                    "Telegram notifications disabled (set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID)"
                );
                None
            }
        }
    }
}

fn send_message_payload(chat_id: &str, text: &str) -> serde_json::Value {
    serde_json::json!({
        "chat_id": chat_id,
        "text": text,
    })
}

#[async_trait]
impl NotificationChannel for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), ScreenerError> {
        let url = format!("{}/bot{}/sendMessage", TELEGRAM_API_BASE, self.bot_token);

        let response = self
            .client
            .post(&url)
            .json(&send_message_payload(&self.chat_id, text))
            .send()
            .await
            .map_err(|e| ScreenerError::Notify(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ScreenerError::Notify(format!(
                "Telegram sendMessage failed: HTTP {status}: {body}"
            )));
        }

        tracing::debug!("Sent Telegram message to chat {}", self.chat_id);
        Ok(())
    }

    fn name(&self) -> &str {
        "telegram"
    }
}
