use std::time::Duration;

use async_trait::async_trait;

use crate::{
    data::models::relay_api::{
        relay_request_model::RelayRequestModel, relay_response_model::RelayResponseModel,
    },
    errors::{ReceiptValidationError, ValidationResult},
};

use super::utils::{build_client, post_json, read_body};

#[async_trait]
pub(crate) trait RelayServerDatasource: Send + Sync {
    /// POST /verify on the relay service.
    ///
    /// The relay answers 200 for valid receipts and 400 for everything else,
    /// with the same body shape; both are returned as `Ok`.
    async fn verify(&self, request: &RelayRequestModel) -> ValidationResult<RelayResponseModel>;
}

pub(crate) struct RelayServerDatasourceImpl {
    client: reqwest::Client,
    verify_url: String,
}

#[async_trait]
impl RelayServerDatasource for RelayServerDatasourceImpl {
    async fn verify(&self, request: &RelayRequestModel) -> ValidationResult<RelayResponseModel> {
        let response = post_json(&self.client, &self.verify_url, request, "relay verify").await?;
        let status = response.status();
        let body = read_body(response, "relay verify").await?;
        serde_json::from_slice(&body).map_err(|e| {
            ReceiptValidationError::MalformedResponse(format!(
                "relay verify; failed to parse callout response with {status} status code; {e}"
            ))
        })
    }
}

impl RelayServerDatasourceImpl {
    pub(crate) fn new(relay_url: &str, timeout: Duration) -> ValidationResult<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            verify_url: format!("{}/verify", relay_url.trim_end_matches('/')),
        })
    }
}
