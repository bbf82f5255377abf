//! A thin client for the Telegram Bot API.
//!
//! Only the `sendMessage` method is used: plain text for replies and delivery messages, and a
//! single-button inline keyboard for payment links. Delivery failures are reported to the caller;
//! the fulfilment record stays undelivered so an operator can resend the credentials by hand.

use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::config::TelegramConfig;

#[derive(Debug, Clone, Error)]
pub enum TelegramApiError {
    #[error("Could not initialize TelegramApi. {0}")]
    Initialization(String),
    #[error("Error sending request to Telegram. {0}")]
    RequestError(String),
    #[error("Telegram rejected the message. {0}")]
    SendRejected(String),
}

#[derive(Clone)]
pub struct TelegramApi {
    base_url: String,
    client: Arc<Client>,
}

impl std::fmt::Debug for TelegramApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramApi").field("base_url", &"https://api.telegram.org/bot****").finish()
    }
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// A single url button, rendered under the message as an inline keyboard.
#[derive(Clone, Debug, Serialize)]
pub struct InlineButton {
    pub text: String,
    pub url: String,
}

impl TelegramApi {
    pub fn new(config: &TelegramConfig) -> Result<Self, TelegramApiError> {
        let base = config.api_base.trim_end_matches('/');
        let base_url = format!("{base}/bot{}", config.bot_token.reveal());
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| TelegramApiError::Initialization(e.to_string()))?;
        Ok(Self { base_url, client: Arc::new(client) })
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramApiError> {
        let body = json!({ "chat_id": chat_id, "text": text });
        self.post_send_message(body).await
    }

    pub async fn send_message_with_button(
        &self,
        chat_id: i64,
        text: &str,
        button: &InlineButton,
    ) -> Result<(), TelegramApiError> {
        let body = json!({
            "chat_id": chat_id,
            "text": text,
            "reply_markup": { "inline_keyboard": [[ button ]] },
        });
        self.post_send_message(body).await
    }

    /// Sends the purchased credentials to the buyer after a confirmed payment.
    pub async fn deliver(&self, buyer_id: i64, product_name: &str, credentials: &[String]) -> Result<(), TelegramApiError> {
        let message = delivery_message(product_name, credentials);
        debug!("📨️ Delivering {} credential(s) for {product_name} to buyer {buyer_id}", credentials.len());
        self.send_message(buyer_id, &message).await
    }

    async fn post_send_message(&self, body: serde_json::Value) -> Result<(), TelegramApiError> {
        let url = format!("{}/sendMessage", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TelegramApiError::RequestError(e.to_string()))?;
        let status = response.status();
        let result =
            response.json::<SendMessageResponse>().await.map_err(|e| TelegramApiError::RequestError(e.to_string()))?;
        if !status.is_success() || !result.ok {
            let description = result.description.unwrap_or_else(|| format!("HTTP {status}"));
            return Err(TelegramApiError::SendRejected(description));
        }
        Ok(())
    }
}

fn delivery_message(product_name: &str, credentials: &[String]) -> String {
    let mut message = "🎉 Pembayaran Berhasil! 🎉\n\n".to_string();
    message.push_str(&format!("Produk: {product_name}\n"));
    message.push_str(&format!("Jumlah: {}\n\n", credentials.len()));
    message.push_str("📦 Detail Produk:\n\n");
    for (i, credential) in credentials.iter().enumerate() {
        message.push_str(&format!("Item #{}:\n{credential}\n\n", i + 1));
    }
    message.push_str("Terima kasih telah berbelanja! 🙏");
    message
}

#[cfg(test)]
mod test {
    use super::delivery_message;

    #[test]
    fn delivery_message_numbers_credentials() {
        let msg = delivery_message("Netflix Premium", &["a@mail.com:pw1".into(), "b@mail.com:pw2".into()]);
        assert!(msg.starts_with("🎉 Pembayaran Berhasil! 🎉"));
        assert!(msg.contains("Produk: Netflix Premium\n"));
        assert!(msg.contains("Jumlah: 2\n"));
        assert!(msg.contains("Item #1:\na@mail.com:pw1\n"));
        assert!(msg.contains("Item #2:\nb@mail.com:pw2\n"));
        assert!(msg.ends_with("Terima kasih telah berbelanja! 🙏"));
    }
}
