use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};

use crate::{
    config::TripayConfig,
    data_objects::{NewTransactionRequest, TransactionDetail, TripayEnvelope},
    signature::transaction_signature,
    TripayApiError,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// A client for the Tripay REST API. Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct TripayApi {
    config: TripayConfig,
    client: Arc<Client>,
}

impl TripayApi {
    pub fn new(config: TripayConfig) -> Result<Self, TripayApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let bearer = format!("Bearer {}", config.api_key.reveal());
        let val = HeaderValue::from_str(&bearer).map_err(|e| TripayApiError::Initialization(e.to_string()))?;
        headers.insert("Authorization", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TripayApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Creates a closed payment transaction and returns the checkout handle. The request is
    /// signed in place; callers fill in every other field.
    ///
    /// A timeout counts as a retryable failure, never as success; nothing is persisted locally
    /// either way, so the buyer can simply be asked to try again.
    pub async fn create_transaction(
        &self,
        mut request: NewTransactionRequest,
    ) -> Result<TransactionDetail, TripayApiError> {
        request.signature = transaction_signature(
            self.config.private_key.reveal(),
            &self.config.merchant_code,
            &request.merchant_ref,
            request.amount,
        );
        let url = format!("{}/transaction/create", self.config.base_url);
        trace!("🔌️ Creating Tripay transaction for [{}]", request.merchant_ref);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TripayApiError::RequestError(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| TripayApiError::RequestError(e.to_string()))?;
            warn!("🔌️ Tripay rejected the transaction request for [{}]. {status}: {message}", request.merchant_ref);
            return Err(TripayApiError::QueryError { status, message });
        }
        let envelope = response
            .json::<TripayEnvelope<TransactionDetail>>()
            .await
            .map_err(|e| TripayApiError::JsonError(e.to_string()))?;
        match (envelope.success, envelope.data) {
            (true, Some(detail)) => {
                debug!(
                    "🔌️ Tripay transaction [{}] created for [{}]. Checkout at {}",
                    detail.reference, detail.merchant_ref, detail.checkout_url
                );
                Ok(detail)
            },
            (true, None) => Err(TripayApiError::JsonError("Tripay reported success without data".to_string())),
            (false, _) => Err(TripayApiError::TransactionRejected(envelope.message)),
        }
    }

    pub fn merchant_code(&self) -> &str {
        &self.config.merchant_code
    }
}
