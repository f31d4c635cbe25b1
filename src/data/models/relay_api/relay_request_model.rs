use serde::{Deserialize, Serialize};

/// Body of `POST /verify` on the relay service.
///
/// The relay accepts `shared_secret` for wire compatibility with older
/// clients but never forwards it. This crate's own client never sends one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct RelayRequestModel {
    /// Base64-encoded receipt.
    #[serde(default)]
    pub(crate) receipt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) shared_secret: Option<String>,
    /// Advisory: the caller believes the receipt was issued in the sandbox.
    #[serde(default)]
    pub(crate) sandbox: bool,
}
