use serde::{Deserialize, Serialize};
use warung_common::Rupiah;

/// One line item on a payment intent, echoed back to the buyer on the Tripay checkout page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub price: Rupiah,
    pub quantity: u32,
}

/// The body of a `POST /transaction/create` request (closed transaction).
#[derive(Debug, Clone, Serialize)]
pub struct NewTransactionRequest {
    pub method: String,
    pub merchant_ref: String,
    pub amount: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub order_items: Vec<OrderItem>,
    pub callback_url: String,
    pub return_url: String,
    /// Unix timestamp after which the checkout page stops accepting payment. Advisory: the
    /// storefront does not enforce expiry locally.
    pub expired_time: i64,
    pub signature: String,
}

/// The slice of Tripay's transaction-detail response the storefront cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDetail {
    pub reference: String,
    pub merchant_ref: String,
    pub checkout_url: String,
    #[serde(default)]
    pub qr_url: Option<String>,
    pub expired_time: i64,
}

/// Tripay wraps every response in a `{success, message, data}` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct TripayEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}
