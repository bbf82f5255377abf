use std::env;

use log::*;
use warung_common::Secret;

pub const DEFAULT_TRIPAY_BASE_URL: &str = "https://tripay.co.id/api";

/// Tripay merchant credentials and endpoint configuration.
///
/// The private key signs outgoing transaction-create requests and authenticates incoming
/// callbacks. If it is left unset, transaction creation will fail at the gateway and callback
/// verification fails closed, so the store cannot be tricked into unsigned operation.
#[derive(Clone, Debug, Default)]
pub struct TripayConfig {
    pub api_key: Secret<String>,
    pub private_key: Secret<String>,
    pub merchant_code: String,
    pub base_url: String,
}

impl TripayConfig {
    pub fn from_env_or_default() -> Self {
        let api_key = env::var("TRIPAY_API_KEY").ok().unwrap_or_else(|| {
            error!("🔌️ TRIPAY_API_KEY is not set. Please set it to your Tripay API key.");
            String::default()
        });
        let private_key = env::var("TRIPAY_PRIVATE_KEY").ok().unwrap_or_else(|| {
            error!("🔌️ TRIPAY_PRIVATE_KEY is not set. Transaction signing and callback verification will fail.");
            String::default()
        });
        let merchant_code = env::var("TRIPAY_MERCHANT_CODE").ok().unwrap_or_else(|| {
            error!("🔌️ TRIPAY_MERCHANT_CODE is not set. Please set it to your Tripay merchant code.");
            String::default()
        });
        let base_url = env::var("TRIPAY_BASE_URL").ok().unwrap_or_else(|| {
            info!("🔌️ TRIPAY_BASE_URL is not set. Using the production endpoint, {DEFAULT_TRIPAY_BASE_URL}.");
            DEFAULT_TRIPAY_BASE_URL.to_string()
        });
        Self { api_key: Secret::new(api_key), private_key: Secret::new(private_key), merchant_code, base_url }
    }
}
