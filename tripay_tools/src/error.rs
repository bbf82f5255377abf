use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum TripayApiError {
    #[error("Could not initialize the Tripay client. {0}")]
    Initialization(String),
    #[error("Error sending request to Tripay. {0}")]
    RequestError(String),
    #[error("Tripay returned an error response. Code {status}: {message}")]
    QueryError { status: u16, message: String },
    #[error("Tripay rejected the transaction. {0}")]
    TransactionRejected(String),
    #[error("Error deserializing Tripay response. {0}")]
    JsonError(String),
}
