use super::{issuer_status::IssuerStatus, verification_environment::VerificationEnvironment};

/// Narrow, typed view over the issuer's verifyReceipt response.
///
/// Only the fields needed for entitlement resolution are extracted; the full
/// document is kept in `raw_body` for callers (such as the relay) that pass it
/// through.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationResponse {
    pub status: IssuerStatus,
    /// Environment that produced this response.
    pub environment: VerificationEnvironment,
    /// Entries of `latest_receipt_info`, in the order the issuer returned
    /// them. Entries without a product ID are dropped.
    pub latest_receipt_info: Vec<TransactionRecord>,
    pub raw_body: serde_json::Value,
}

/// One entry of `latest_receipt_info`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub product_id: String,
    /// Expiry in epoch milliseconds, as sent by the issuer (usually a string,
    /// sometimes a number).
    pub expires_date_ms: Option<serde_json::Value>,
    /// Expiry as a formatted date, e.g. "2025-01-01 12:00:00 Etc/GMT".
    pub expires_date: Option<String>,
}

impl TransactionRecord {
    /// Whether the record carries any expiry information at all.
    pub fn has_expiry(&self) -> bool {
        self.expires_date_ms.is_some() || self.expires_date.is_some()
    }
}
