use thiserror::Error;

use crate::domain::entities::issuer_status::IssuerStatus;

/// Errors surfaced by the validation core.
///
/// Cloneable so that callers joining an in-flight validation observe the same
/// outcome as the caller that started it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiptValidationError {
    /// No receipt bytes exist, even after a refresh attempt.
    #[error("no receipt is available on this device")]
    MissingReceipt,

    /// A receipt exists after refreshing, but it is empty.
    #[error("receipt was refreshed but is empty")]
    EmptyReceipt,

    /// The receipt source could not refresh the receipt.
    #[error("receipt refresh failed: {0}")]
    RefreshFailed(String),

    /// The issuer (or relay) could not be reached, timed out, or answered with
    /// a non-success HTTP status.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    /// The issuer answered, but with a status other than valid.
    #[error("issuer rejected receipt with status {}: {}", .0.code(), .0.message())]
    IssuerRejected(IssuerStatus),

    /// The response body could not be read as a verification response.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ReceiptValidationError {
    /// Returns true if retrying later could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ReceiptValidationError::TransportFailure(_)
            | ReceiptValidationError::RefreshFailed(_) => true,
            ReceiptValidationError::IssuerRejected(status) => status.is_retryable(),
            _ => false,
        }
    }
}

pub type ValidationResult<T> = Result<T, ReceiptValidationError>;
