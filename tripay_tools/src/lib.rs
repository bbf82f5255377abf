//! A thin client for the Tripay payment gateway.
//!
//! The storefront uses exactly two slices of Tripay's surface:
//! * creating a closed payment transaction (a payment intent with an embedded merchant
//!   reference), which yields a checkout URL and QR code for the buyer, and
//! * authenticating the payment-status callbacks Tripay posts back to the server.
//!
//! Both the transaction-create request and the callback use HMAC-SHA256 signatures keyed with
//! the merchant's private key; see [`signature`] for the details and the constant-time
//! verification used on the callback path.
mod api;
mod config;
mod data_objects;
mod error;

pub mod signature;

pub use api::TripayApi;
pub use config::TripayConfig;
pub use data_objects::{NewTransactionRequest, OrderItem, TransactionDetail, TripayEnvelope};
pub use error::TripayApiError;
