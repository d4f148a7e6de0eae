//! Delivery gateway — outbound calls to the Telegram Bot API.
//!
//! Every failure path here is captured, logged, and converted to `false`;
//! nothing raised by the platform or the transport crosses this boundary.

use std::time::Duration;

use taskherald_common::config::AppConfig;
use taskherald_common::error::AppError;

/// Explicit gateway configuration, passed into the constructor rather than
/// read from global state.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub api_url: String,
    pub send_timeout: Duration,
    /// Skip TLS verification for constrained environments. Selected by
    /// configuration, never hardcoded.
    pub accept_invalid_certs: bool,
}

impl From<&AppConfig> for TelegramConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            bot_token: config.telegram_bot_token.clone(),
            api_url: config.telegram_api_url.clone(),
            send_timeout: Duration::from_secs(config.telegram_send_timeout_secs),
            accept_invalid_certs: config.telegram_accept_invalid_certs,
        }
    }
}

/// Client for the per-bot Telegram message endpoint.
#[derive(Clone, Debug)]
pub struct TelegramClient {
    client: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    /// Build the client. An empty token is a configuration error, not a
    /// delivery failure.
    pub fn new(config: &TelegramConfig) -> Result<Self, AppError> {
        if config.bot_token.is_empty() {
            return Err(AppError::Config("Telegram bot token is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.send_timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build Telegram HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: format!(
                "{}/bot{}",
                config.api_url.trim_end_matches('/'),
                config.bot_token
            ),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    /// Send one HTML-mode message to a chat. Returns `true` iff the platform
    /// accepted it (2xx).
    pub async fn send_message(&self, chat_id: &str, text: &str) -> bool {
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });

        match self
            .client
            .post(self.method_url("sendMessage"))
            .json(&body)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(chat_id, "Message delivered");
                true
            }
            Ok(response) => {
                tracing::error!(
                    chat_id,
                    status = %response.status(),
                    "Telegram rejected sendMessage"
                );
                false
            }
            Err(err) => {
                tracing::error!(chat_id, error = %err, "sendMessage transport error");
                false
            }
        }
    }

    /// Register the inbound webhook callback URL. Re-registering the same
    /// URL is a no-op success on the platform side.
    pub async fn set_webhook(&self, url: &str) -> bool {
        let body = serde_json::json!({ "url": url });

        match self
            .client
            .post(self.method_url("setWebhook"))
            .json(&body)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                tracing::info!(url, "Webhook registered");
                true
            }
            Ok(response) => {
                tracing::error!(url, status = %response.status(), "Webhook registration rejected");
                false
            }
            Err(err) => {
                tracing::error!(url, error = %err, "Webhook registration transport error");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(token: &str) -> TelegramConfig {
        TelegramConfig {
            bot_token: token.to_string(),
            api_url: "https://api.telegram.org".to_string(),
            send_timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
        }
    }

    #[test]
    fn test_empty_token_fails_fast() {
        let err = TelegramClient::new(&test_config("")).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_method_url_includes_token_path() {
        let client = TelegramClient::new(&test_config("123:abc")).unwrap();
        assert_eq!(
            client.method_url("sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_trailing_slash_in_api_url_is_tolerated() {
        let mut config = test_config("123:abc");
        config.api_url = "https://api.telegram.org/".to_string();
        let client = TelegramClient::new(&config).unwrap();
        assert_eq!(
            client.method_url("setWebhook"),
            "https://api.telegram.org/bot123:abc/setWebhook"
        );
    }
}
