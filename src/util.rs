use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use chrono::Utc;
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::{
    config::{IssuerConfig, ValidationConfig},
    data::repositories::{
        issuer_repository_impl::IssuerRepositoryImpl, relay_repository_impl::RelayRepositoryImpl,
    },
    domain::{
        entities::{entitlement_set::EntitlementSet, relay_response::RelayResponse},
        repositories::{
            issuer_repository::IssuerRepository, receipt_source::ReceiptSource,
            relay_repository::RelayRepository,
        },
        services::entitlement_resolver,
    },
    errors::{ReceiptValidationError, ValidationResult},
};

/// Issuer client for the configured verifyReceipt endpoints, usable on its own
/// by servers that do their own entitlement handling.
pub fn issuer_client(config: &IssuerConfig) -> ValidationResult<impl IssuerRepository> {
    IssuerRepositoryImpl::new(config)
}

/// Entry point for apps: validates the device receipt either directly with
/// the issuer or through the relay, and keeps the last known-good
/// entitlements.
///
/// Each operation is single-flight: calling it while an attempt is already
/// running joins that attempt instead of starting another one.
pub struct ReceiptValidationUtil<S: ReceiptSource + 'static> {
    inner: Arc<Inner<S>>,
    direct: SingleFlight<EntitlementSet>,
    relay: SingleFlight<RelayResponse>,
}

struct Inner<S: ReceiptSource> {
    config: ValidationConfig,
    issuer_repository: Arc<dyn IssuerRepository>,
    relay_repository: Arc<dyn RelayRepository>,
    receipt_source: S,
    attempts: AtomicU64,
    /// Last successful result, tagged with the attempt that produced it.
    published: RwLock<Option<(u64, EntitlementSet)>>,
}

impl<S: ReceiptSource + 'static> ReceiptValidationUtil<S> {
    pub fn new(config: ValidationConfig, receipt_source: S) -> ValidationResult<Self> {
        let issuer_repository = Arc::new(IssuerRepositoryImpl::new(&config.issuer)?);
        let relay_repository = Arc::new(RelayRepositoryImpl::new(
            &config.relay_url,
            config.relay_timeout,
        )?);
        Ok(Self::with_repositories(
            config,
            issuer_repository,
            relay_repository,
            receipt_source,
        ))
    }

    pub fn with_repositories(
        config: ValidationConfig,
        issuer_repository: Arc<dyn IssuerRepository>,
        relay_repository: Arc<dyn RelayRepository>,
        receipt_source: S,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                issuer_repository,
                relay_repository,
                receipt_source,
                attempts: AtomicU64::new(0),
                published: RwLock::new(None),
            }),
            direct: SingleFlight::new(),
            relay: SingleFlight::new(),
        }
    }

    /// Validates the receipt with the issuer using the locally configured
    /// shared secret, and publishes the resolved entitlements.
    ///
    /// On failure the previously published entitlements are left untouched.
    pub async fn validate_direct(
        &self,
        product_id_hint: Option<&str>,
    ) -> ValidationResult<EntitlementSet> {
        let inner = self.inner.clone();
        let hint = product_id_hint.map(str::to_owned);
        self.direct
            .run(move || async move { inner.validate_direct(hint).await }.boxed())
            .await
    }

    /// Submits the receipt to the relay and returns its verdict as-is.
    pub async fn validate_via_relay(
        &self,
        product_id_hint: Option<&str>,
    ) -> ValidationResult<RelayResponse> {
        let inner = self.inner.clone();
        let hint = product_id_hint.map(str::to_owned);
        self.relay
            .run(move || async move { inner.validate_via_relay(hint).await }.boxed())
            .await
    }

    pub async fn published_entitlements(&self) -> Option<EntitlementSet> {
        self.inner
            .published
            .read()
            .await
            .as_ref()
            .map(|(_, set)| set.clone())
    }

    pub async fn is_validating(&self) -> bool {
        self.direct.is_running().await || self.relay.is_running().await
    }
}

impl<S: ReceiptSource> Inner<S> {
    async fn validate_direct(&self, hint: Option<String>) -> ValidationResult<EntitlementSet> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.resolve_direct().await;
        match &result {
            Ok(set) => {
                info!(
                    product = hint.as_deref().unwrap_or("unknown"),
                    environment = %set.environment,
                    active = set.active_product_ids.len(),
                    entitled = set.has_any(),
                    "direct validation completed"
                );
                self.publish(attempt, set.clone()).await;
            }
            Err(e) => warn!(
                product = hint.as_deref().unwrap_or("unknown"),
                error = %e,
                "direct validation failed"
            ),
        }
        result
    }

    async fn resolve_direct(&self) -> ValidationResult<EntitlementSet> {
        let receipt = self.receipt_source.load_receipt().await?;
        let response = self
            .issuer_repository
            .verify(&receipt, self.config.shared_secret.as_ref())
            .await?;
        if !response.status.is_valid() {
            return Err(ReceiptValidationError::IssuerRejected(response.status));
        }
        Ok(EntitlementSet {
            active_product_ids: entitlement_resolver::resolve(
                &response,
                &self.config.subscription_product_ids,
                Utc::now(),
            ),
            environment: response.environment,
            resolved_at: Utc::now(),
        })
    }

    async fn publish(&self, attempt: u64, set: EntitlementSet) {
        let mut published = self.published.write().await;
        let superseded = matches!(published.as_ref(), Some((current, _)) if *current > attempt);
        if !superseded {
            *published = Some((attempt, set));
        }
    }

    async fn validate_via_relay(&self, hint: Option<String>) -> ValidationResult<RelayResponse> {
        let receipt = self.receipt_source.load_receipt().await?;
        info!(
            product = hint.as_deref().unwrap_or("unknown"),
            length = receipt.len(),
            "receipt prepared for relay"
        );
        let response = self
            .relay_repository
            .validate(&receipt, self.config.relay_sandbox_hint)
            .await?;
        info!(
            status = response.status.code(),
            valid = response.valid,
            "relay validation completed"
        );
        Ok(response)
    }
}

type Flight<T> = Shared<BoxFuture<'static, ValidationResult<T>>>;

/// Coalesces concurrent calls onto one in-flight future.
///
/// The flight is driven by a spawned task, so it runs to completion and frees
/// the slot even when every caller has gone away.
struct SingleFlight<T: Clone> {
    in_flight: Arc<Mutex<Option<Flight<T>>>>,
}

impl<T: Clone + Send + Sync + 'static> SingleFlight<T> {
    fn new() -> Self {
        Self {
            in_flight: Arc::new(Mutex::new(None)),
        }
    }

    async fn run<F>(&self, start: F) -> ValidationResult<T>
    where
        F: FnOnce() -> BoxFuture<'static, ValidationResult<T>>,
    {
        let flight = {
            let mut slot = self.in_flight.lock().await;
            match slot.as_ref() {
                Some(flight) => flight.clone(),
                None => {
                    let flight = start().shared();
                    *slot = Some(flight.clone());
                    let driver = flight.clone();
                    let in_flight = self.in_flight.clone();
                    tokio::spawn(async move {
                        let _ = driver.clone().await;
                        Self::clear(&in_flight, &driver).await;
                    });
                    flight
                }
            }
        };
        let result = flight.clone().await;
        Self::clear(&self.in_flight, &flight).await;
        result
    }

    async fn clear(in_flight: &Mutex<Option<Flight<T>>>, flight: &Flight<T>) {
        let mut slot = in_flight.lock().await;
        if slot.as_ref().is_some_and(|current| current.ptr_eq(flight)) {
            *slot = None;
        }
    }

    async fn is_running(&self) -> bool {
        self.in_flight.lock().await.is_some()
    }
}
