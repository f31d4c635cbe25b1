use async_trait::async_trait;

use crate::{
    config::SharedSecret,
    domain::entities::{
        receipt::Receipt, verification_environment::VerificationEnvironment,
        verification_response::VerificationResponse,
    },
    errors::ValidationResult,
};

#[async_trait]
pub trait IssuerRepository: Send + Sync {
    /// Verifies the receipt with the issuer, entering the environment
    /// fallback at `environment`.
    ///
    /// Starting at production, a "sandbox receipt sent to production" status
    /// is retried once against the sandbox with an identical payload. Starting
    /// at the sandbox, exactly one attempt is made.
    ///
    /// Issuer rejections are returned as a response with a non-valid status;
    /// only transport and parsing problems are errors.
    async fn verify_starting_at(
        &self,
        receipt: &Receipt,
        shared_secret: Option<&SharedSecret>,
        environment: VerificationEnvironment,
    ) -> ValidationResult<VerificationResponse>;

    async fn verify(
        &self,
        receipt: &Receipt,
        shared_secret: Option<&SharedSecret>,
    ) -> ValidationResult<VerificationResponse> {
        self.verify_starting_at(receipt, shared_secret, VerificationEnvironment::Production)
            .await
    }
}
