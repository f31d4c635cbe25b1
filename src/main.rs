//! Receipt validation relay.
//!
//! Accepts receipts from devices over HTTP and verifies them with Apple,
//! keeping the shared secret on the server.
//!
//! Usage:
//!   APPLE_SHARED_SECRET=... receipt-relay --port 3000

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use fractic_receipt_validation::{
    config::{IssuerConfig, RelayConfig, SharedSecret},
    relay::{build_router, RelayState},
};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "receipt-relay")]
#[command(about = "Verifies App Store receipts on behalf of devices")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Shared secret sent to the issuer with every receipt
    #[arg(long, env = "APPLE_SHARED_SECRET", hide_env_values = true)]
    shared_secret: Option<String>,

    /// Always try production first, even when the caller says the receipt is
    /// from the sandbox
    #[arg(long, env = "IGNORE_SANDBOX_HINT")]
    ignore_sandbox_hint: bool,

    /// Timeout for each call to the issuer, in seconds
    #[arg(
        long,
        env = "ISSUER_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> RelayConfig {
        RelayConfig {
            port: self.port,
            shared_secret: self
                .shared_secret
                .filter(|s| !s.is_empty())
                .map(SharedSecret::new),
            honor_sandbox_hint: !self.ignore_sandbox_hint,
            issuer: IssuerConfig {
                timeout: Duration::from_secs(self.timeout_secs),
                ..IssuerConfig::default()
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let config = args.into_config();
    if config.shared_secret.is_none() {
        warn!("no shared secret configured; subscription receipts will be rejected by the issuer");
    }

    let state = RelayState::new(&config).context("Failed to initialize relay")?;
    let app = build_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    info!("Receipt relay listening on port {}", config.port);
    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(Args::try_parse_from(["receipt-relay", "--timeout-secs", "0"]).is_err());
    }

    #[test]
    fn flags_map_onto_relay_config() {
        let config = Args::try_parse_from([
            "receipt-relay",
            "--port",
            "8080",
            "--shared-secret",
            "s3cret",
            "--ignore-sandbox-hint",
            "--timeout-secs",
            "3",
        ])
        .unwrap()
        .into_config();
        assert_eq!(config.port, 8080);
        assert_eq!(config.shared_secret.unwrap().expose(), "s3cret");
        assert!(!config.honor_sandbox_hint);
        assert_eq!(config.issuer.timeout, Duration::from_secs(3));
    }
}
