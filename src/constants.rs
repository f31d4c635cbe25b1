use std::time::Duration;

/// Apple's verifyReceipt endpoint for receipts issued by the App Store.
pub const PRODUCTION_VERIFY_RECEIPT_URL: &str = "https://buy.itunes.apple.com/verifyReceipt";

/// Apple's verifyReceipt endpoint for receipts issued in the sandbox.
pub const SANDBOX_VERIFY_RECEIPT_URL: &str = "https://sandbox.itunes.apple.com/verifyReceipt";

/// Upper bound for any single outbound verification callout.
pub const DEFAULT_CALLOUT_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_RELAY_PORT: u16 = 3000;

pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3000";

/// Status reported on the relay wire when the issuer could not be reached at
/// all (or replied with something unreadable).
pub const TRANSPORT_FAILURE_STATUS: i64 = -1;
