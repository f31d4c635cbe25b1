use async_trait::async_trait;

use crate::{
    domain::entities::{receipt::Receipt, relay_response::RelayResponse},
    errors::ValidationResult,
};

#[async_trait]
pub trait RelayRepository: Send + Sync {
    /// Submits the receipt to the relay service.
    ///
    /// Both verdicts (valid and rejected) are returned as `Ok`; only an
    /// unreachable relay or an unreadable reply is an error.
    async fn validate(&self, receipt: &Receipt, sandbox: bool) -> ValidationResult<RelayResponse>;
}
