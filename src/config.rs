use std::{collections::HashSet, fmt, time::Duration};

use crate::constants::{
    DEFAULT_CALLOUT_TIMEOUT, DEFAULT_RELAY_PORT, DEFAULT_RELAY_URL, PRODUCTION_VERIFY_RECEIPT_URL,
    SANDBOX_VERIFY_RECEIPT_URL,
};

/// Pre-shared credential identifying the app to the issuer.
///
/// Debug output is redacted so the value cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret(String);

impl SharedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}

/// How to reach the issuer.
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    pub production_url: String,
    pub sandbox_url: String,
    /// Bound on each individual callout (production and sandbox each get
    /// their own).
    pub timeout: Duration,
    /// Ask the issuer to only return the latest renewal transaction of each
    /// auto-renewable subscription.
    pub exclude_old_transactions: bool,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            production_url: PRODUCTION_VERIFY_RECEIPT_URL.to_string(),
            sandbox_url: SANDBOX_VERIFY_RECEIPT_URL.to_string(),
            timeout: DEFAULT_CALLOUT_TIMEOUT,
            exclude_old_transactions: true,
        }
    }
}

/// Relay service configuration, fixed at startup.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub port: u16,
    /// The only secret ever sent to the issuer by the relay. Caller-supplied
    /// secrets are ignored.
    pub shared_secret: Option<SharedSecret>,
    /// Start at the sandbox environment when the caller sets `sandbox: true`.
    pub honor_sandbox_hint: bool,
    pub issuer: IssuerConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_RELAY_PORT,
            shared_secret: None,
            honor_sandbox_hint: true,
            issuer: IssuerConfig::default(),
        }
    }
}

/// Client-side validation configuration, fixed at startup.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Product identifiers considered during entitlement resolution.
    pub subscription_product_ids: HashSet<String>,
    /// Secret used by direct validation. Never sent to the relay.
    pub shared_secret: Option<SharedSecret>,
    pub issuer: IssuerConfig,
    /// Base URL of the relay service.
    pub relay_url: String,
    /// Sandbox hint forwarded to the relay.
    pub relay_sandbox_hint: bool,
    pub relay_timeout: Duration,
}

impl ValidationConfig {
    pub fn new<I, S>(subscription_product_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subscription_product_ids: subscription_product_ids
                .into_iter()
                .map(Into::into)
                .collect(),
            shared_secret: None,
            issuer: IssuerConfig::default(),
            relay_url: DEFAULT_RELAY_URL.to_string(),
            relay_sandbox_hint: false,
            relay_timeout: DEFAULT_CALLOUT_TIMEOUT,
        }
    }

    pub fn with_shared_secret(mut self, secret: impl Into<String>) -> Self {
        self.shared_secret = Some(SharedSecret::new(secret));
        self
    }
}
