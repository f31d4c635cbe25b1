use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::{
    data::{
        datasources::relay_server_datasource::{
            RelayServerDatasource, RelayServerDatasourceImpl,
        },
        models::relay_api::{
            relay_request_model::RelayRequestModel, relay_response_model::RelayResponseModel,
        },
    },
    domain::{
        entities::{
            issuer_status::VerificationStatus, receipt::Receipt, relay_response::RelayResponse,
        },
        repositories::relay_repository::RelayRepository,
    },
    errors::ValidationResult,
};

pub(crate) struct RelayRepositoryImpl<D: RelayServerDatasource> {
    relay_server_datasource: D,
}

#[async_trait]
impl<D: RelayServerDatasource> RelayRepository for RelayRepositoryImpl<D> {
    async fn validate(&self, receipt: &Receipt, sandbox: bool) -> ValidationResult<RelayResponse> {
        // The shared secret stays server-side; the relay injects its own.
        let request = RelayRequestModel {
            receipt: Some(receipt.as_base64().to_string()),
            shared_secret: None,
            sandbox,
        };
        let m = self.relay_server_datasource.verify(&request).await?;
        debug!(status = m.status, valid = m.valid, "relay answered");
        Ok(RelayResponse::from_relay_response(m))
    }
}

impl RelayRepositoryImpl<RelayServerDatasourceImpl> {
    pub(crate) fn new(relay_url: &str, timeout: Duration) -> ValidationResult<Self> {
        Ok(Self {
            relay_server_datasource: RelayServerDatasourceImpl::new(relay_url, timeout)?,
        })
    }
}

impl RelayResponse {
    fn from_relay_response(m: RelayResponseModel) -> Self {
        RelayResponse {
            valid: m.valid,
            status: VerificationStatus::from_code(m.status),
            error: m.error,
            receipt: m.receipt,
            latest_receipt_info: m.latest_receipt_info,
            pending_renewal_info: m.pending_renewal_info,
        }
    }
}
