//! Monotonic `created` timestamps.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

static LAST_CREATED_MILLIS: AtomicI64 = AtomicI64::new(i64::MIN);

/// Returns the current UTC time at millisecond precision.
///
/// Successive calls within one process never go backwards, even if the
/// system clock is stepped back between them.
pub fn created_timestamp() -> DateTime<Utc> {
    let now = Utc::now().timestamp_millis();
    let previous = LAST_CREATED_MILLIS.fetch_max(now, Ordering::AcqRel);
    let millis = now.max(previous);
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or_else(Utc::now)
}
