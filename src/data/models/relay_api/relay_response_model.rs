use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of every `POST /verify` reply from the relay service, for both the 200
/// (valid) and 400 (rejected) shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RelayResponseModel {
    pub(crate) valid: bool,
    /// Issuer status, or -1 when the issuer could not be reached.
    pub(crate) status: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) receipt: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) latest_receipt_info: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) pending_renewal_info: Option<Vec<Value>>,
}

impl RelayResponseModel {
    pub(crate) fn rejected(status: i64, error: impl Into<String>) -> Self {
        Self {
            valid: false,
            status,
            error: Some(error.into()),
            receipt: None,
            latest_receipt_info: None,
            pending_renewal_info: None,
        }
    }
}
