use serde::Serialize;

/// Request body for the verifyReceipt endpoint.
///
/// https://developer.apple.com/documentation/appstorereceipts/requestbody
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct VerifyReceiptRequestModel {
    /// The Base64-encoded receipt data.
    #[serde(rename = "receipt-data")]
    pub(crate) receipt_data: String,
    /// Your app's shared secret. Required for receipts that contain
    /// auto-renewable subscriptions; omitted entirely otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) password: Option<String>,
    /// Set this value to true for the response to include only the latest
    /// renewal transaction for any subscriptions.
    #[serde(
        rename = "exclude-old-transactions",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) exclude_old_transactions: Option<bool>,
}
