use thiserror::Error;

use crate::helpers::order_reference::OrderRefError;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Product [{0}] does not exist")]
    ProductNotFound(String),
    #[error("Product [{0}] already exists")]
    DuplicateProduct(String),
    #[error("Insufficient stock for [{code}]: {requested} requested, {available} available")]
    InsufficientStock { code: String, requested: u32, available: i64 },
    #[error("Price must be a positive amount")]
    InvalidPrice,
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for InventoryError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum FulfilmentError {
    #[error("Invalid order reference. {0}")]
    InvalidReference(#[from] OrderRefError),
    #[error("Order refers to unknown product [{0}]")]
    ProductNotFound(String),
    #[error("Stock ledger diverged for [{0}]: stock count and credential count disagree")]
    StockLedgerDiverged(String),
    #[error("No fulfilment recorded for reference [{0}]")]
    FulfilmentNotFound(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for FulfilmentError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum AdminApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for AdminApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}
