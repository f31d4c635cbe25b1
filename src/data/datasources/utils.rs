use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::errors::{ReceiptValidationError, ValidationResult};

/// Builds the HTTP client used for callouts. Every request made through it is
/// bounded by `timeout`.
pub(crate) fn build_client(timeout: Duration) -> ValidationResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ReceiptValidationError::Config(format!("HTTP client could not be built; {e}")))
}

/// POSTs `body` as JSON. Failing to get any response (including timing out)
/// is a transport failure; the HTTP status is left to the caller.
pub(crate) async fn post_json<B: Serialize + ?Sized>(
    client: &reqwest::Client,
    url: &str,
    body: &B,
    function_name: &str,
) -> ValidationResult<reqwest::Response> {
    debug!(url, function_name, "sending callout");
    client.post(url).json(body).send().await.map_err(|e| {
        let reason = if e.is_timeout() {
            "callout timed out"
        } else {
            "callout failed to send"
        };
        ReceiptValidationError::TransportFailure(format!("{function_name}; {reason}; {e}"))
    })
}

/// Reads the full response body.
pub(crate) async fn read_body(
    response: reqwest::Response,
    function_name: &str,
) -> ValidationResult<Vec<u8>> {
    response
        .bytes()
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|e| {
            ReceiptValidationError::TransportFailure(format!(
                "{function_name}; failed to read callout response; {e}"
            ))
        })
}
