use crate::constants::TRANSPORT_FAILURE_STATUS;

/// Status returned by the verifyReceipt endpoint.
///
/// https://developer.apple.com/documentation/appstorereceipts/status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssuerStatus {
    /// 0: The receipt is valid.
    Valid,
    /// 21000: The request to the App Store didn't use the HTTP POST method, or
    /// the body could not be read as JSON.
    MalformedJson,
    /// 21002: The data in the receipt-data property is malformed or missing.
    MalformedReceiptData,
    /// 21003: The system couldn't authenticate the receipt.
    UnauthenticatedReceipt,
    /// 21004: The shared secret doesn't match the shared secret on file for
    /// the account.
    SharedSecretMismatch,
    /// 21005: The receipt server was temporarily unable to provide the
    /// receipt.
    ServerUnavailable,
    /// 21006: The receipt is valid, but the subscription is in an expired
    /// state.
    SubscriptionExpired,
    /// 21007: The receipt is from the test environment, but was sent to the
    /// production environment for verification.
    SandboxReceiptInProduction,
    /// 21008: The receipt is from the production environment, but was sent to
    /// the test environment for verification.
    ProductionReceiptInSandbox,
    /// 21009: Internal data access error.
    InternalDataAccessError,
    /// 21010: The system can't find the user account or the user account has
    /// been deleted.
    AccountNotFound,

    Unknown(i64),
}

impl IssuerStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => IssuerStatus::Valid,
            21000 => IssuerStatus::MalformedJson,
            21002 => IssuerStatus::MalformedReceiptData,
            21003 => IssuerStatus::UnauthenticatedReceipt,
            21004 => IssuerStatus::SharedSecretMismatch,
            21005 => IssuerStatus::ServerUnavailable,
            21006 => IssuerStatus::SubscriptionExpired,
            21007 => IssuerStatus::SandboxReceiptInProduction,
            21008 => IssuerStatus::ProductionReceiptInSandbox,
            21009 => IssuerStatus::InternalDataAccessError,
            21010 => IssuerStatus::AccountNotFound,
            other => IssuerStatus::Unknown(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            IssuerStatus::Valid => 0,
            IssuerStatus::MalformedJson => 21000,
            IssuerStatus::MalformedReceiptData => 21002,
            IssuerStatus::UnauthenticatedReceipt => 21003,
            IssuerStatus::SharedSecretMismatch => 21004,
            IssuerStatus::ServerUnavailable => 21005,
            IssuerStatus::SubscriptionExpired => 21006,
            IssuerStatus::SandboxReceiptInProduction => 21007,
            IssuerStatus::ProductionReceiptInSandbox => 21008,
            IssuerStatus::InternalDataAccessError => 21009,
            IssuerStatus::AccountNotFound => 21010,
            IssuerStatus::Unknown(code) => *code,
        }
    }

    /// Human-readable description, as reported on the relay wire.
    pub fn message(&self) -> String {
        match self {
            IssuerStatus::Valid => "Valid receipt",
            IssuerStatus::MalformedJson => "The App Store could not read the JSON object",
            IssuerStatus::MalformedReceiptData => {
                "The receipt-data property was malformed or missing"
            }
            IssuerStatus::UnauthenticatedReceipt => "The receipt could not be authenticated",
            IssuerStatus::SharedSecretMismatch => "The shared secret does not match",
            IssuerStatus::ServerUnavailable => "The receipt server is not currently available",
            IssuerStatus::SubscriptionExpired => "Valid but subscription has expired",
            IssuerStatus::SandboxReceiptInProduction => "This receipt is from the test environment",
            IssuerStatus::ProductionReceiptInSandbox => {
                "This receipt is from the production environment"
            }
            IssuerStatus::InternalDataAccessError => "Internal data access error",
            IssuerStatus::AccountNotFound => "User account cannot be found or has been deleted",
            IssuerStatus::Unknown(code) => return format!("Unknown status code: {code}"),
        }
        .to_string()
    }

    pub fn is_valid(&self) -> bool {
        *self == IssuerStatus::Valid
    }

    /// Whether the issuer itself considers the condition temporary.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            IssuerStatus::ServerUnavailable | IssuerStatus::InternalDataAccessError
        )
    }
}

/// Outcome of a verification attempt as seen at the relay boundary, where
/// transport failures and issuer rejections share one numeric channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    Issuer(IssuerStatus),
    TransportFailure,
}

impl VerificationStatus {
    pub fn from_code(code: i64) -> Self {
        if code == TRANSPORT_FAILURE_STATUS {
            VerificationStatus::TransportFailure
        } else {
            VerificationStatus::Issuer(IssuerStatus::from_code(code))
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            VerificationStatus::Issuer(status) => status.code(),
            VerificationStatus::TransportFailure => TRANSPORT_FAILURE_STATUS,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationStatus::Issuer(IssuerStatus::Valid))
    }
}
