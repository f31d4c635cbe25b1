use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{
    domain::repositories::receipt_source::ReceiptSource,
    errors::{ReceiptValidationError, ValidationResult},
};

/// Receipt source backed by the receipt file the platform keeps on disk.
///
/// There is no upstream to ask for a new receipt, so `refresh` only gives the
/// platform the chance to have written the file before the second read.
#[derive(Debug, Clone)]
pub struct FileReceiptSource {
    path: PathBuf,
}

impl FileReceiptSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReceiptSource for FileReceiptSource {
    async fn read_receipt(&self) -> ValidationResult<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "receipt could not be read");
                Err(ReceiptValidationError::MissingReceipt)
            }
        }
    }

    async fn refresh(&self) -> ValidationResult<()> {
        debug!(path = %self.path.display(), "receipt missing or empty, re-reading");
        Ok(())
    }
}
