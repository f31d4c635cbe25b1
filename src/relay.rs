//! HTTP relay that verifies receipts on behalf of devices.
//!
//! The relay is the only holder of the issuer shared secret: devices send a
//! bare receipt, the relay adds its configured secret and forwards it to the
//! issuer, then normalizes the answer into a stable wire shape. It keeps no
//! state between requests.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    config::{RelayConfig, SharedSecret},
    constants::TRANSPORT_FAILURE_STATUS,
    data::{
        models::relay_api::{
            relay_request_model::RelayRequestModel, relay_response_model::RelayResponseModel,
        },
        repositories::issuer_repository_impl::IssuerRepositoryImpl,
    },
    domain::{
        entities::{
            issuer_status::IssuerStatus, receipt::Receipt,
            verification_environment::VerificationEnvironment,
            verification_response::VerificationResponse,
        },
        repositories::issuer_repository::IssuerRepository,
    },
    errors::ValidationResult,
};

const MISSING_RECEIPT_MESSAGE: &str = "Missing receipt data";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

/// Process-wide relay state, read-only after startup.
pub struct RelayState {
    issuer_repository: Arc<dyn IssuerRepository>,
    shared_secret: Option<SharedSecret>,
    honor_sandbox_hint: bool,
}

impl RelayState {
    pub fn new(config: &RelayConfig) -> ValidationResult<Self> {
        Ok(Self::with_issuer_repository(
            Arc::new(IssuerRepositoryImpl::new(&config.issuer)?),
            config,
        ))
    }

    /// Uses a custom issuer implementation instead of calling out over HTTP.
    pub fn with_issuer_repository(
        issuer_repository: Arc<dyn IssuerRepository>,
        config: &RelayConfig,
    ) -> Self {
        Self {
            issuer_repository,
            shared_secret: config.shared_secret.clone(),
            honor_sandbox_hint: config.honor_sandbox_hint,
        }
    }
}

/// Build the HTTP router with the given relay state.
pub fn build_router(state: Arc<RelayState>) -> Router {
    Router::new()
        .route("/verify", post(verify_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn verify_handler(
    State(state): State<Arc<RelayState>>,
    payload: Result<Json<RelayRequestModel>, JsonRejection>,
) -> (StatusCode, Json<RelayResponseModel>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(%rejection, "unreadable verify request");
            return missing_receipt();
        }
    };
    let Some(receipt) = request.receipt.filter(|r| !r.is_empty()) else {
        return missing_receipt();
    };
    let receipt = Receipt::from_base64(receipt);
    if request.shared_secret.is_some() {
        debug!("ignoring caller-supplied shared secret");
    }

    let environment = if request.sandbox && state.honor_sandbox_hint {
        VerificationEnvironment::Sandbox
    } else {
        VerificationEnvironment::Production
    };
    let result = state
        .issuer_repository
        .verify_starting_at(&receipt, state.shared_secret.as_ref(), environment)
        .await;

    match result {
        Ok(response) if response.status.is_valid() => {
            info!(environment = %response.environment, "receipt valid");
            (StatusCode::OK, Json(RelayResponseModel::valid(&response)))
        }
        Ok(response) => {
            info!(
                environment = %response.environment,
                status = response.status.code(),
                "receipt rejected by issuer"
            );
            (
                StatusCode::BAD_REQUEST,
                Json(RelayResponseModel::rejected(
                    response.status.code(),
                    response.status.message(),
                )),
            )
        }
        Err(e) => {
            warn!(error = %e, "verification failed before the issuer answered");
            (
                StatusCode::BAD_REQUEST,
                Json(RelayResponseModel::rejected(TRANSPORT_FAILURE_STATUS, e.to_string())),
            )
        }
    }
}

fn missing_receipt() -> (StatusCode, Json<RelayResponseModel>) {
    (
        StatusCode::BAD_REQUEST,
        Json(RelayResponseModel::rejected(
            IssuerStatus::MalformedReceiptData.code(),
            MISSING_RECEIPT_MESSAGE,
        )),
    )
}

impl RelayResponseModel {
    fn valid(response: &VerificationResponse) -> Self {
        let array = |key: &str| response.raw_body.get(key).and_then(Value::as_array).cloned();
        Self {
            valid: true,
            status: response.status.code(),
            error: None,
            receipt: response.raw_body.get("receipt").cloned(),
            latest_receipt_info: array("latest_receipt_info"),
            pending_renewal_info: array("pending_renewal_info"),
        }
    }
}
