use base64::{engine::general_purpose::STANDARD, Engine};

/// Opaque proof-of-purchase blob.
///
/// The receipt is never inspected locally; only its base64 transport form is
/// kept, exactly as it will be handed to the issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    base64: String,
}

impl Receipt {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            base64: STANDARD.encode(bytes),
        }
    }

    /// Wraps an already-encoded receipt without decoding it.
    pub fn from_base64(base64: impl Into<String>) -> Self {
        Self {
            base64: base64.into(),
        }
    }

    pub fn as_base64(&self) -> &str {
        &self.base64
    }

    pub fn is_empty(&self) -> bool {
        self.base64.is_empty()
    }

    /// Length of the transport form.
    pub fn len(&self) -> usize {
        self.base64.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_are_carried_as_standard_base64() {
        let receipt = Receipt::from_bytes(b"ABC");
        assert_eq!(receipt.as_base64(), "QUJD");
        assert_eq!(receipt.len(), 4);
    }

    #[test]
    fn encoded_form_is_kept_verbatim() {
        let receipt = Receipt::from_base64("not base64 at all!");
        assert_eq!(receipt.as_base64(), "not base64 at all!");
        assert!(Receipt::from_base64("").is_empty());
    }
}
