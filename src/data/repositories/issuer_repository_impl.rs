use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
    config::{IssuerConfig, SharedSecret},
    data::{
        datasources::verify_receipt_datasource::{
            VerifyReceiptDatasource, VerifyReceiptDatasourceImpl,
        },
        models::verify_receipt_api::{
            verify_receipt_request_model::VerifyReceiptRequestModel,
            verify_receipt_response_model::VerifyReceiptResponseModel,
        },
    },
    domain::{
        entities::{
            issuer_status::IssuerStatus,
            receipt::Receipt,
            verification_environment::VerificationEnvironment,
            verification_response::{TransactionRecord, VerificationResponse},
        },
        repositories::issuer_repository::IssuerRepository,
    },
    errors::ValidationResult,
};

pub(crate) struct IssuerRepositoryImpl<D: VerifyReceiptDatasource> {
    verify_receipt_datasource: D,
    exclude_old_transactions: bool,
}

#[async_trait]
impl<D: VerifyReceiptDatasource> IssuerRepository for IssuerRepositoryImpl<D> {
    async fn verify_starting_at(
        &self,
        receipt: &Receipt,
        shared_secret: Option<&SharedSecret>,
        environment: VerificationEnvironment,
    ) -> ValidationResult<VerificationResponse> {
        let request = VerifyReceiptRequestModel {
            receipt_data: receipt.as_base64().to_string(),
            password: shared_secret.map(|s| s.expose().to_string()),
            exclude_old_transactions: self.exclude_old_transactions.then_some(true),
        };

        let response = self.attempt(environment, &request).await?;
        if response.environment == VerificationEnvironment::Production
            && response.status == IssuerStatus::SandboxReceiptInProduction
        {
            // Sandbox is terminal: its answer is returned whatever it is.
            info!("sandbox receipt sent to production, retrying against sandbox");
            return self.attempt(VerificationEnvironment::Sandbox, &request).await;
        }
        Ok(response)
    }
}

impl IssuerRepositoryImpl<VerifyReceiptDatasourceImpl> {
    pub(crate) fn new(config: &IssuerConfig) -> ValidationResult<Self> {
        Ok(Self::with_datasource(
            VerifyReceiptDatasourceImpl::new(config)?,
            config.exclude_old_transactions,
        ))
    }
}

impl<D: VerifyReceiptDatasource> IssuerRepositoryImpl<D> {
    pub(crate) fn with_datasource(verify_receipt_datasource: D, exclude_old_transactions: bool) -> Self {
        Self {
            verify_receipt_datasource,
            exclude_old_transactions,
        }
    }

    async fn attempt(
        &self,
        environment: VerificationEnvironment,
        request: &VerifyReceiptRequestModel,
    ) -> ValidationResult<VerificationResponse> {
        let m = self
            .verify_receipt_datasource
            .verify_receipt(environment, request)
            .await?;
        debug!(%environment, status = m.status, "verifyReceipt answered");
        Ok(VerificationResponse::from_verify_receipt_response(m, environment))
    }
}

impl VerificationResponse {
    fn from_verify_receipt_response(
        m: VerifyReceiptResponseModel,
        environment: VerificationEnvironment,
    ) -> Self {
        VerificationResponse {
            status: IssuerStatus::from_code(m.status),
            environment,
            latest_receipt_info: m
                .latest_receipt_info
                .into_iter()
                .map(|info| TransactionRecord {
                    product_id: info.product_id,
                    expires_date_ms: info.expires_date_ms,
                    expires_date: info.expires_date,
                })
                .collect(),
            raw_body: m.raw,
        }
    }
}
