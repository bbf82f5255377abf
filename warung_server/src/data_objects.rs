use serde::{Deserialize, Serialize};
use warung_engine::db_types::PaymentStatus;

/// The payment notification Tripay posts to the callback endpoint once a transaction changes
/// state. Only the fields the reconciliation flow needs are deserialized; the rest of the payload
/// is ignored.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PaymentNotification {
    /// Tripay's own transaction reference.
    #[serde(default)]
    pub reference: Option<String>,
    /// The order reference token this server generated when the payment intent was created.
    pub merchant_ref: String,
    pub status: PaymentStatus,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Into<String>>(message: S) -> Self {
        Self { success: true, message: message.into() }
    }

    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self { success: false, message: message.into() }
    }
}

/// A single message from the Telegram Bot API webhook. Telegram sends many update kinds; only
/// plain text messages are handled, everything else deserializes with `message: None` and is
/// acknowledged without action.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IncomingMessage {
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<Sender>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Sender {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
}
