#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use fractic_receipt_validation::{
    config::{IssuerConfig, RelayConfig},
    domain::repositories::receipt_source::ReceiptSource,
    errors::{ReceiptValidationError, ValidationResult},
    relay::{build_router, RelayState},
};
use wiremock::MockServer;

pub const PRODUCTION_PATH: &str = "/production/verifyReceipt";
pub const SANDBOX_PATH: &str = "/sandbox/verifyReceipt";

/// Issuer configuration pointing both environments at the mock server.
pub fn issuer_config(server: &MockServer) -> IssuerConfig {
    IssuerConfig {
        production_url: format!("{}{}", server.uri(), PRODUCTION_PATH),
        sandbox_url: format!("{}{}", server.uri(), SANDBOX_PATH),
        timeout: Duration::from_secs(5),
        exclude_old_transactions: true,
    }
}

/// Spin up the relay on an OS-assigned port, returning the base URL.
pub async fn spawn_relay(config: RelayConfig) -> String {
    let app = build_router(Arc::new(RelayState::new(&config).unwrap()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

/// A URL on which nothing is listening.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Receipt source that serves fixed contents before and after a refresh.
pub struct InMemoryReceiptSource {
    before_refresh: Option<Vec<u8>>,
    after_refresh: Option<Vec<u8>>,
    refresh_fails: bool,
    refreshes: AtomicUsize,
}

impl InMemoryReceiptSource {
    pub fn with_receipt(bytes: &[u8]) -> Self {
        Self {
            before_refresh: Some(bytes.to_vec()),
            after_refresh: Some(bytes.to_vec()),
            refresh_fails: false,
            refreshes: AtomicUsize::new(0),
        }
    }

    pub fn refreshing_to(before: Option<&[u8]>, after: Option<&[u8]>) -> Self {
        Self {
            before_refresh: before.map(<[u8]>::to_vec),
            after_refresh: after.map(<[u8]>::to_vec),
            refresh_fails: false,
            refreshes: AtomicUsize::new(0),
        }
    }

    pub fn failing_refresh() -> Self {
        Self {
            before_refresh: None,
            after_refresh: None,
            refresh_fails: true,
            refreshes: AtomicUsize::new(0),
        }
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReceiptSource for InMemoryReceiptSource {
    async fn read_receipt(&self) -> ValidationResult<Option<Vec<u8>>> {
        if self.refreshes() == 0 {
            Ok(self.before_refresh.clone())
        } else {
            Ok(self.after_refresh.clone())
        }
    }

    async fn refresh(&self) -> ValidationResult<()> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        if self.refresh_fails {
            return Err(ReceiptValidationError::RefreshFailed(
                "store unreachable".to_string(),
            ));
        }
        Ok(())
    }
}
