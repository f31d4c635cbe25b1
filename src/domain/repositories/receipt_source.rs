use async_trait::async_trait;

use crate::{
    domain::entities::receipt::Receipt,
    errors::{ReceiptValidationError, ValidationResult},
};

/// Provider of the device-local receipt.
#[async_trait]
pub trait ReceiptSource: Send + Sync {
    /// Reads the stored receipt, or `None` if there is none. Fails with
    /// [`ReceiptValidationError::MissingReceipt`] when storage exists but
    /// cannot be read.
    async fn read_receipt(&self) -> ValidationResult<Option<Vec<u8>>>;

    /// Asks the platform for a fresh receipt. Fails with
    /// [`ReceiptValidationError::RefreshFailed`].
    async fn refresh(&self) -> ValidationResult<()>;

    /// Returns the stored receipt, refreshing once if it is missing, empty or
    /// unreadable.
    async fn load_receipt(&self) -> ValidationResult<Receipt> {
        if let Ok(Some(bytes)) = self.read_receipt().await {
            if !bytes.is_empty() {
                return Ok(Receipt::from_bytes(&bytes));
            }
        }
        self.refresh().await?;
        match self.read_receipt().await? {
            None => Err(ReceiptValidationError::MissingReceipt),
            Some(bytes) if bytes.is_empty() => Err(ReceiptValidationError::EmptyReceipt),
            Some(bytes) => Ok(Receipt::from_bytes(&bytes)),
        }
    }
}
