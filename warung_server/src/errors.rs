use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use thiserror::Error;
use tripay_tools::TripayApiError;
use warung_engine::traits::{AdminApiError, FulfilmentError, InventoryError};

use crate::integrations::TelegramApiError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("Callback signature invalid or not provided")]
    CallbackAuthorizationError,
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Payment gateway error. {0}")]
    GatewayError(#[from] TripayApiError),
    #[error("Could not deliver the order to the buyer. {0}")]
    DeliveryError(#[from] TelegramApiError),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::CallbackAuthorizationError => StatusCode::FORBIDDEN,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::GatewayError(_) => StatusCode::BAD_GATEWAY,
            Self::DeliveryError(_) => StatusCode::BAD_GATEWAY,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<InventoryError> for ServerError {
    fn from(e: InventoryError) -> Self {
        match e {
            InventoryError::ProductNotFound(code) => Self::NoRecordFound(format!("Product {code} does not exist")),
            InventoryError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            e => Self::BackendError(e.to_string()),
        }
    }
}

impl From<FulfilmentError> for ServerError {
    fn from(e: FulfilmentError) -> Self {
        match e {
            FulfilmentError::InvalidReference(e) => Self::InvalidRequestBody(e.to_string()),
            FulfilmentError::FulfilmentNotFound(r) => Self::NoRecordFound(format!("No fulfilment for {r}")),
            FulfilmentError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            e => Self::BackendError(e.to_string()),
        }
    }
}

impl From<AdminApiError> for ServerError {
    fn from(e: AdminApiError) -> Self {
        match e {
            AdminApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}
