//! HMAC-SHA256 signatures for the two Tripay authentication points.
//!
//! * Outgoing transaction-create requests are signed over the concatenation
//!   `merchant_code + merchant_ref + amount`.
//! * Incoming callbacks carry an `X-Callback-Signature` header computed over the **exact raw
//!   bytes** of the request body. Verification must therefore run against the bytes as received;
//!   re-serializing the JSON (key reordering, whitespace changes) would break authenticity.
//!
//! Callback verification fails closed: an empty secret or a signature that is not valid hex
//! rejects the request. The comparison itself is constant-time via the `hmac` crate's verifier.
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Hex-encoded HMAC-SHA256 of `data` under `secret`.
pub fn hmac_sha256_hex(secret: &str, data: &[u8]) -> String {
    let mut mac = new_mac(secret);
    mac.update(data);
    to_hex(&mac.finalize().into_bytes())
}

/// The signature Tripay expects on a transaction-create request.
pub fn transaction_signature(private_key: &str, merchant_code: &str, merchant_ref: &str, amount: i64) -> String {
    let payload = format!("{merchant_code}{merchant_ref}{amount}");
    hmac_sha256_hex(private_key, payload.as_bytes())
}

/// Verifies a callback signature against the raw request body. Constant-time; fails closed on an
/// empty secret or a malformed signature.
pub fn verify_callback_signature(private_key: &str, raw_body: &[u8], provided: &str) -> bool {
    if private_key.is_empty() {
        return false;
    }
    let provided = match from_hex(provided) {
        Some(bytes) => bytes,
        None => return false,
    };
    let mut mac = new_mac(private_key);
    mac.update(raw_body);
    mac.verify_slice(&provided).is_ok()
}

fn new_mac(secret: &str) -> HmacSha256 {
    // Infallible; HMAC accepts keys of any length.
    HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size")
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn from_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len()).step_by(2).map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok()).collect()
}

#[cfg(test)]
mod test {
    use super::{hmac_sha256_hex, transaction_signature, verify_callback_signature};

    #[test]
    fn known_hmac_vector() {
        // RFC 4231, test case 2.
        let mac = hmac_sha256_hex("Jefe", b"what do ya want for nothing?");
        assert_eq!(mac, "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843");
    }

    #[test]
    fn transaction_signature_is_deterministic() {
        let a = transaction_signature("pk", "T0001", "ORDER.1.1.YQ.YQ", 20000);
        let b = transaction_signature("pk", "T0001", "ORDER.1.1.YQ.YQ", 20000);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, transaction_signature("pk", "T0001", "ORDER.1.1.YQ.YQ", 20001));
    }

    #[test]
    fn callback_verification_round_trip() {
        let body = br#"{"merchant_ref":"ORDER.1.1.YQ.YQ","status":"PAID"}"#;
        let signature = hmac_sha256_hex("secret", body);
        assert!(verify_callback_signature("secret", body, &signature));
    }

    #[test]
    fn callback_verification_rejects_tampering() {
        let body = br#"{"merchant_ref":"ORDER.1.1.YQ.YQ","status":"PAID"}"#;
        let tampered = br#"{"merchant_ref":"ORDER.1.9.YQ.YQ","status":"PAID"}"#;
        let signature = hmac_sha256_hex("secret", body);
        assert!(!verify_callback_signature("secret", tampered, &signature));
        assert!(!verify_callback_signature("other-secret", body, &signature));
    }

    #[test]
    fn callback_verification_fails_closed() {
        let body = b"{}";
        let signature = hmac_sha256_hex("", body);
        // Even a "correct" signature under an empty secret is refused.
        assert!(!verify_callback_signature("", body, &signature));
        assert!(!verify_callback_signature("secret", body, "not-hex"));
        assert!(!verify_callback_signature("secret", body, "abc"));
    }
}
