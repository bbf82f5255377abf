use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use warung_common::Rupiah;

use crate::helpers::order_reference::OrderRef;

//--------------------------------------      Product       ----------------------------------------------------------
/// A product in the catalogue. `stock` always equals the number of undelivered credentials held
/// for the product; `sold` only ever increases.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub code: String,
    pub name: String,
    pub price: Rupiah,
    pub description: String,
    pub stock: i64,
    pub sold: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The fields an administrator supplies when creating a new product. Stock always starts at zero
/// and is added credential-by-credential afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub code: String,
    pub name: String,
    pub price: Rupiah,
    pub description: String,
}

//--------------------------------------   PaymentStatus    ----------------------------------------------------------
/// The payment state reported by the gateway in a callback. Anything other than `Paid` never
/// mutates the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Paid,
    Failed,
    Expired,
    Pending,
}

#[derive(Debug, Clone, Error)]
#[error("{0} is not a valid payment status")]
pub struct PaymentStatusError(String);

impl FromStr for PaymentStatus {
    type Err = PaymentStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PAID" => Ok(Self::Paid),
            "FAILED" => Ok(Self::Failed),
            "EXPIRED" => Ok(Self::Expired),
            "PENDING" => Ok(Self::Pending),
            _ => Err(PaymentStatusError(s.to_string())),
        }
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Paid => "PAID",
            Self::Failed => "FAILED",
            Self::Expired => "EXPIRED",
            Self::Pending => "PENDING",
        };
        f.write_str(s)
    }
}

//--------------------------------------     Fulfilment     ----------------------------------------------------------
/// A row in the idempotency ledger. Once a reference token appears here, it can never cause a
/// second stock deduction. `delivered` tracks whether the credentials actually reached the buyer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Fulfilment {
    pub reference: String,
    pub buyer_id: String,
    pub product_code: String,
    pub quantity: i64,
    pub delivered: bool,
    pub created_at: DateTime<Utc>,
}

//-------------------------------------- FulfilmentOutcome  ----------------------------------------------------------
/// The result of reconciling a payment notification against the store.
#[derive(Debug, Clone)]
pub enum FulfilmentOutcome {
    /// Stock was deducted and the credentials withdrawn, exactly once, for this reference.
    Fulfilled { order: OrderRef, product_name: String, credentials: Vec<String> },
    /// The reference was already in the ledger. Nothing was changed.
    AlreadyFulfilled { reference: String },
    /// Payment arrived, but the stock was sold in the meantime. Nothing was changed; the buyer
    /// must be refunded manually.
    InsufficientStock { order: OrderRef, available: i64 },
    /// The gateway reported a terminal non-payment status. Nothing was changed.
    Cancelled { order: OrderRef, status: PaymentStatus },
    /// The gateway reported an intermediate status. Nothing was changed.
    Pending { reference: String },
}

//--------------------------------------    SalesSummary    ----------------------------------------------------------
/// Per-product sales statistics, as shown by the admin `/stats` command.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SalesSummary {
    pub code: String,
    pub name: String,
    pub sold: i64,
    pub revenue: Rupiah,
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::PaymentStatus;

    #[test]
    fn payment_status_round_trip() {
        for status in [PaymentStatus::Paid, PaymentStatus::Failed, PaymentStatus::Expired, PaymentStatus::Pending] {
            assert_eq!(PaymentStatus::from_str(&status.to_string()).unwrap(), status);
        }
        assert!(PaymentStatus::from_str("REFUNDED").is_err());
    }

    #[test]
    fn payment_status_deserializes_from_gateway_casing() {
        let status: PaymentStatus = serde_json::from_str("\"PAID\"").unwrap();
        assert_eq!(status, PaymentStatus::Paid);
    }
}
