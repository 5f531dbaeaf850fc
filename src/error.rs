use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Configuration Errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid deviation tolerance: {0}")]
    InvalidTolerance(String),

    #[error("Invalid feed id: {0}")]
    InvalidFeedId(String),

    // Quote Source Errors
    #[error("Price service request failed: {0}")]
    QuoteRequestFailed(String),

    #[error("Price feed not found: {0}")]
    FeedNotFound(String),

    #[error("Quote deserialization failed: {0}")]
    QuoteDeserializationFailed(String),

    // Ledger Errors
    #[error("Ledger RPC failed: {0}")]
    LedgerRpcFailed(String),

    #[error("Malformed ledger response: {0}")]
    MalformedLedgerResponse(String),

    #[error("Price update submission failed: {0}")]
    SubmissionFailed(String),

    // Decision Errors
    #[error("Invalid price encoding: {0}")]
    InvalidPriceEncoding(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Message safe to surface outside the process. Endpoint URLs, RPC
    /// payloads and transport detail stay in the full `Display` form,
    /// which is only ever logged.
    pub fn sanitized(&self) -> String {
        match self {
            Error::ConfigError(_) | Error::InvalidTolerance(_) | Error::InvalidFeedId(_) => {
                "invalid configuration".to_string()
            }
            Error::QuoteRequestFailed(_) | Error::QuoteDeserializationFailed(_) => {
                "price service unavailable".to_string()
            }
            Error::FeedNotFound(_) => "price feed not found".to_string(),
            Error::LedgerRpcFailed(_) | Error::MalformedLedgerResponse(_) => {
                "ledger query failed".to_string()
            }
            Error::SubmissionFailed(_) => "price update submission failed".to_string(),
            Error::InvalidPriceEncoding(_) => "malformed price data".to_string(),
        }
    }
}
