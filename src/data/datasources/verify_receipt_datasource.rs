use async_trait::async_trait;

use crate::{
    config::IssuerConfig,
    data::models::verify_receipt_api::{
        verify_receipt_request_model::VerifyReceiptRequestModel,
        verify_receipt_response_model::VerifyReceiptResponseModel,
    },
    domain::entities::verification_environment::VerificationEnvironment,
    errors::{ReceiptValidationError, ValidationResult},
};

use super::utils::{build_client, post_json, read_body};

#[async_trait]
pub(crate) trait VerifyReceiptDatasource: Send + Sync {
    /// verifyReceipt:
    /// https://developer.apple.com/documentation/appstorereceipts/verifyreceipt
    ///
    /// environment:
    ///   Selects the production or sandbox endpoint. No fallback happens at
    ///   this level; exactly one request is sent.
    async fn verify_receipt(
        &self,
        environment: VerificationEnvironment,
        request: &VerifyReceiptRequestModel,
    ) -> ValidationResult<VerifyReceiptResponseModel>;
}

pub(crate) struct VerifyReceiptDatasourceImpl {
    client: reqwest::Client,
    config: IssuerConfig,
}

#[async_trait]
impl VerifyReceiptDatasource for VerifyReceiptDatasourceImpl {
    async fn verify_receipt(
        &self,
        environment: VerificationEnvironment,
        request: &VerifyReceiptRequestModel,
    ) -> ValidationResult<VerifyReceiptResponseModel> {
        let url = environment.url(&self.config);
        let response = post_json(&self.client, url, request, "verifyReceipt").await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReceiptValidationError::TransportFailure(format!(
                "verifyReceipt; callout returned with {status} status code; {body}"
            )));
        }
        VerifyReceiptResponseModel::parse(&read_body(response, "verifyReceipt").await?)
    }
}

impl VerifyReceiptDatasourceImpl {
    pub(crate) fn new(config: &IssuerConfig) -> ValidationResult<Self> {
        Ok(Self {
            client: build_client(config.timeout)?,
            config: config.clone(),
        })
    }
}
