// src/services/telegram_client.rs
// DOCUMENTATION: Telegram Bot API client
// PURPOSE: Deliver shop notifications through sendMessage

use crate::errors::StoreError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const TELEGRAM_API_URL: &str = "https://api.telegram.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Telegram Bot API client
/// DOCUMENTATION: Credentials are passed per call since they can change at runtime via admin settings
#[derive(Clone)]
pub struct TelegramClient {
    /// HTTP client for making requests
    client: Client,
    /// Base URL for the Bot API
    base_url: String,
}

/// Form body for sendMessage
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Envelope returned by every Bot API method
#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    description: Option<String>,
}

impl TelegramClient {
    pub fn new() -> Self {
        Self::with_base_url(TELEGRAM_API_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Send an HTML-formatted message
    /// DOCUMENTATION: Caller is responsible for escaping user-provided text
    pub async fn send_message(
        &self,
        token: &str,
        chat_id: &str,
        text: &str,
    ) -> Result<(), StoreError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, token);
        let form = SendMessageRequest {
            chat_id,
            text,
            parse_mode: "HTML",
        };

        log::debug!("Telegram sendMessage to chat {}", chat_id);

        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                // the URL embeds the bot token, keep it out of the logs
                let e = e.without_url();
                log::error!("Telegram API request failed: {}", e);
                StoreError::ExternalApiError(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Telegram API error {}: {}", status, body);
            return Err(StoreError::ExternalApiError(format!("API error {}", status)));
        }

        let api_response: TelegramResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse Telegram response: {}", e);
            StoreError::ExternalApiError("Parse error".to_string())
        })?;

        if !api_response.ok {
            let description = api_response.description.unwrap_or_default();
            log::error!("Telegram rejected message: {}", description);
            return Err(StoreError::ExternalApiError(description));
        }

        Ok(())
    }
}

impl Default for TelegramClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = TelegramClient::with_base_url("http://localhost:9999/");
        assert_eq!(client.base_url, "http://localhost:9999");
    }

    #[test]
    fn test_response_envelope_parses() {
        let parsed: TelegramResponse =
            serde_json::from_str(r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#)
                .unwrap();
        assert!(!parsed.ok);
        assert_eq!(parsed.description.as_deref(), Some("Bad Request: chat not found"));
    }

    #[tokio::test]
    async fn test_unreachable_api_is_external_error() {
        // nothing listens on port 9 locally
        let client = TelegramClient::with_base_url("http://127.0.0.1:9");
        let result = client.send_message("123:abc", "42", "hello").await;
        assert!(matches!(result, Err(StoreError::ExternalApiError(_))));
    }
}
