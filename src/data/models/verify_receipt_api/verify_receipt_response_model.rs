use serde::Deserialize;
use serde_json::Value;

use crate::errors::{ReceiptValidationError, ValidationResult};

/// Response body of the verifyReceipt endpoint.
///
/// https://developer.apple.com/documentation/appstorereceipts/responsebody
///
/// The document is large and gains fields over time, so only `status` and
/// `latest_receipt_info` are read; everything else stays in `raw`.
#[derive(Debug)]
pub(crate) struct VerifyReceiptResponseModel {
    /// Either 0 if the receipt is valid, or a status code if there is an
    /// error.
    pub(crate) status: i64,
    /// An array that contains all in-app purchase transactions. Entries that
    /// cannot be read are dropped.
    pub(crate) latest_receipt_info: Vec<LatestReceiptInfoModel>,
    pub(crate) raw: Value,
}

/// https://developer.apple.com/documentation/appstorereceipts/responsebody/latest_receipt_info
#[derive(Debug, Deserialize)]
pub(crate) struct LatestReceiptInfoModel {
    /// The unique identifier of the product purchased.
    pub(crate) product_id: String,
    /// The time a subscription expires or when it will renew, in UNIX epoch
    /// time format, in milliseconds. Sent as a string, occasionally as a
    /// number, so it is kept unparsed.
    pub(crate) expires_date_ms: Option<Value>,
    /// The time a subscription expires or when it will renew, in a date-time
    /// format similar to the ISO 8601.
    pub(crate) expires_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    status: i64,
    #[serde(default)]
    latest_receipt_info: Option<Value>,
}

impl VerifyReceiptResponseModel {
    pub(crate) fn parse(body: &[u8]) -> ValidationResult<Self> {
        let raw: Value = serde_json::from_slice(body).map_err(|e| {
            ReceiptValidationError::MalformedResponse(format!(
                "verifyReceipt body is not JSON; {e}"
            ))
        })?;
        let envelope = Envelope::deserialize(&raw).map_err(|e| {
            ReceiptValidationError::MalformedResponse(format!(
                "verifyReceipt body has no integer status; {e}"
            ))
        })?;
        let latest_receipt_info = match envelope.latest_receipt_info {
            Some(Value::Array(entries)) => entries
                .into_iter()
                .filter_map(|entry| LatestReceiptInfoModel::deserialize(entry).ok())
                .collect(),
            _ => Vec::new(),
        };
        Ok(Self {
            status: envelope.status,
            latest_receipt_info,
            raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_and_unreadable_entries_are_tolerated() {
        let body = br#"{
            "status": 0,
            "environment": "Sandbox",
            "receipt": { "bundle_id": "com.example" },
            "latest_receipt_info": [
                { "product_id": "p.monthly", "expires_date_ms": "1700000000000", "quantity": "1" },
                { "transaction_id": "no product id" },
                { "product_id": "p.coffee" }
            ]
        }"#;
        let model = VerifyReceiptResponseModel::parse(body).unwrap();
        assert_eq!(model.status, 0);
        assert_eq!(model.latest_receipt_info.len(), 2);
        assert_eq!(model.latest_receipt_info[0].product_id, "p.monthly");
        assert!(model.latest_receipt_info[1].expires_date_ms.is_none());
        assert_eq!(model.raw["receipt"]["bundle_id"], "com.example");
    }

    #[test]
    fn missing_status_is_malformed() {
        let err = VerifyReceiptResponseModel::parse(br#"{ "latest_receipt_info": [] }"#).unwrap_err();
        assert!(matches!(err, ReceiptValidationError::MalformedResponse(_)));
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = VerifyReceiptResponseModel::parse(b"<html>busy</html>").unwrap_err();
        assert!(matches!(err, ReceiptValidationError::MalformedResponse(_)));
    }
}
