//! The stateless order-reference codec.
//!
//! When a buyer starts a purchase, the server creates a payment intent with the gateway and then
//! forgets about the order entirely. The only record of the in-flight order is the reference
//! token embedded in the intent, which the gateway echoes back in its payment callback. The token
//! therefore has to carry everything needed to fulfil the order: when it was created, who is
//! buying, what they are buying, and how many.
//!
//! Token layout: `ORDER.<timestamp_ms>.<quantity>.<buyer>.<code>`, where the buyer id and product
//! code are base64url (no padding) encoded. The free-form fields are armoured so that they can
//! never collide with the `.` delimiter, which makes the split on decode unambiguous. A naive
//! `join("-")` scheme silently truncates product codes containing the delimiter; this codec is
//! the exact inverse of itself for every valid input.

use std::fmt::Display;

use base64::{decode_config, encode_config, URL_SAFE_NO_PAD};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const TOKEN_PREFIX: &str = "ORDER";
const TOKEN_DELIMITER: char = '.';
const TOKEN_FIELDS: usize = 5;

#[derive(Debug, Clone, Error)]
pub enum OrderRefError {
    #[error("Malformed order reference: {0}")]
    Malformed(String),
}

/// A decoded order reference. Equality includes the creation timestamp, which is truncated to
/// millisecond precision so that a decoded token compares equal to the reference it was encoded
/// from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRef {
    pub created_at: DateTime<Utc>,
    pub buyer_id: String,
    pub product_code: String,
    pub quantity: u32,
}

impl OrderRef {
    /// Creates a reference for a new order, timestamped now. The timestamp makes tokens unique
    /// per call under single-process issuance.
    pub fn new<S1, S2>(buyer_id: S1, product_code: S2, quantity: u32) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self {
            created_at: truncate_to_millis(Utc::now()),
            buyer_id: buyer_id.into(),
            product_code: product_code.into(),
            quantity,
        }
    }

    /// Encodes the reference into its token form.
    pub fn token(&self) -> String {
        let buyer = encode_config(self.buyer_id.as_bytes(), URL_SAFE_NO_PAD);
        let code = encode_config(self.product_code.as_bytes(), URL_SAFE_NO_PAD);
        format!(
            "{TOKEN_PREFIX}{TOKEN_DELIMITER}{}{TOKEN_DELIMITER}{}{TOKEN_DELIMITER}{buyer}{TOKEN_DELIMITER}{code}",
            self.created_at.timestamp_millis(),
            self.quantity,
        )
    }

    /// Decodes a token back into an order reference. This is the exact inverse of [`Self::token`]
    /// for all valid inputs, including buyer ids and product codes that contain the delimiter.
    pub fn from_token(token: &str) -> Result<Self, OrderRefError> {
        let parts = token.split(TOKEN_DELIMITER).collect::<Vec<&str>>();
        if parts.len() != TOKEN_FIELDS {
            return Err(OrderRefError::Malformed(format!(
                "expected {TOKEN_FIELDS} fields, found {}",
                parts.len()
            )));
        }
        if parts[0] != TOKEN_PREFIX {
            return Err(OrderRefError::Malformed(format!("unknown prefix '{}'", parts[0])));
        }
        let millis = parts[1]
            .parse::<i64>()
            .map_err(|e| OrderRefError::Malformed(format!("invalid timestamp: {e}")))?;
        let created_at = Utc
            .timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| OrderRefError::Malformed(format!("timestamp {millis} is out of range")))?;
        let quantity =
            parts[2].parse::<u32>().map_err(|e| OrderRefError::Malformed(format!("invalid quantity: {e}")))?;
        let buyer_id = decode_field(parts[3], "buyer id")?;
        let product_code = decode_field(parts[4], "product code")?;
        Ok(Self { created_at, buyer_id, product_code, quantity })
    }
}

impl Display for OrderRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x{} for buyer [{}]", self.product_code, self.quantity, self.buyer_id)
    }
}

fn decode_field(encoded: &str, field: &str) -> Result<String, OrderRefError> {
    let bytes = decode_config(encoded, URL_SAFE_NO_PAD)
        .map_err(|e| OrderRefError::Malformed(format!("invalid {field} encoding: {e}")))?;
    String::from_utf8(bytes).map_err(|e| OrderRefError::Malformed(format!("{field} is not valid UTF-8: {e}")))
}

fn truncate_to_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ts.timestamp_millis()).single().unwrap_or(ts)
}

#[cfg(test)]
mod test {
    use chrono::{TimeZone, Utc};

    use super::{OrderRef, OrderRefError};

    #[test]
    fn round_trip() {
        let order = OrderRef::new("123456789", "do3pp", 2);
        let token = order.token();
        let decoded = OrderRef::from_token(&token).unwrap();
        assert_eq!(decoded, order);
    }

    #[test]
    fn round_trip_with_delimiter_in_fields() {
        // Fields containing the delimiter (and the legacy '-' separator) must survive intact.
        let order = OrderRef::new("user.name-77", "promo.do3-pp", 1);
        let decoded = OrderRef::from_token(&order.token()).unwrap();
        assert_eq!(decoded.buyer_id, "user.name-77");
        assert_eq!(decoded.product_code, "promo.do3-pp");
        assert_eq!(decoded, order);
    }

    #[test]
    fn token_is_stable_for_fixed_inputs() {
        let order = OrderRef {
            created_at: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            buyer_id: "42".into(),
            product_code: "do3pp".into(),
            quantity: 3,
        };
        assert_eq!(order.token(), "ORDER.1700000000000.3.NDI.ZG8zcHA");
    }

    #[test]
    fn rejects_malformed_tokens() {
        for token in [
            "",
            "ORDER",
            "ORDER.123.1.YQ",
            "ORDER.123.1.YQ.YQ.extra",
            "BESTELL.123.1.YQ.YQ",
            "ORDER.notatime.1.YQ.YQ",
            "ORDER.123.many.YQ.YQ",
            "ORDER.123.1.!!!.YQ",
        ] {
            let err = OrderRef::from_token(token).unwrap_err();
            assert!(matches!(err, OrderRefError::Malformed(_)), "{token} should be malformed");
        }
    }

    #[test]
    fn timestamps_make_tokens_unique() {
        let a = OrderRef {
            created_at: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            ..OrderRef::new("1", "x", 1)
        };
        let b = OrderRef {
            created_at: Utc.timestamp_millis_opt(1_700_000_000_001).unwrap(),
            ..OrderRef::new("1", "x", 1)
        };
        assert_ne!(a.token(), b.token());
    }
}
