use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::verification_environment::VerificationEnvironment;

/// Products currently granted to the holder of a receipt.
///
/// Derived on every validation and owned by the caller that requested it;
/// never persisted as an authoritative record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitlementSet {
    pub active_product_ids: HashSet<String>,
    pub environment: VerificationEnvironment,
    pub resolved_at: DateTime<Utc>,
}

impl EntitlementSet {
    pub fn is_active(&self, product_id: &str) -> bool {
        self.active_product_ids.contains(product_id)
    }

    pub fn has_any(&self) -> bool {
        !self.active_product_ids.is_empty()
    }
}
