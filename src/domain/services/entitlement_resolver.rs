use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::entities::verification_response::{TransactionRecord, VerificationResponse};

/// Computes the set of subscription products active at `now`.
///
/// Only meaningful for a valid response; any other status yields an empty set
/// and must be treated by the caller as a failed validation rather than as "no
/// entitlements".
///
/// A product is active if any of its records is unexpired, or carries no
/// expiry at all (a non-expiring grant). Records whose expiry cannot be read
/// are skipped individually.
pub fn resolve(
    response: &VerificationResponse,
    subscription_ids: &HashSet<String>,
    now: DateTime<Utc>,
) -> HashSet<String> {
    if !response.status.is_valid() {
        return HashSet::new();
    }
    let now_millis = now.timestamp_millis();
    response
        .latest_receipt_info
        .iter()
        .filter(|record| subscription_ids.contains(&record.product_id))
        .filter(|record| is_active(record, now_millis))
        .map(|record| record.product_id.clone())
        .collect()
}

fn is_active(record: &TransactionRecord, now_millis: i64) -> bool {
    if !record.has_expiry() {
        return true;
    }
    // Only the millisecond field is trusted; a formatted date alone is skipped.
    record
        .expires_date_ms
        .as_ref()
        .and_then(parse_expiry_millis)
        .is_some_and(|expires_at| expires_at > now_millis)
}

fn parse_expiry_millis(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| float_to_millis(s.parse().ok()?))
        }
        Value::Number(n) => n.as_i64().or_else(|| float_to_millis(n.as_f64()?)),
        _ => None,
    }
}

fn float_to_millis(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.trunc() as i64)
}
