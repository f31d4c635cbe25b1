use super::issuer_status::VerificationStatus;

/// Normalized verdict returned by the relay service.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayResponse {
    pub valid: bool,
    pub status: VerificationStatus,
    /// Human-readable reason, present when `valid` is false.
    pub error: Option<String>,
    /// The decoded receipt, passed through from the issuer.
    pub receipt: Option<serde_json::Value>,
    pub latest_receipt_info: Option<Vec<serde_json::Value>>,
    pub pending_renewal_info: Option<Vec<serde_json::Value>>,
}
