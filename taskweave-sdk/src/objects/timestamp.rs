//! Epoch-millisecond timestamp helpers.
//!
//! The task service encodes every date field as epoch milliseconds, either
//! as a JSON number or as a numeric string, and uses `null`/absence for
//! "unset". These helpers are the single place that conversion lives.

use serde_json::Value;
use time::OffsetDateTime;

/// Extract epoch milliseconds from a JSON value (number or numeric string).
///
/// Returns `None` for `null`, non-numeric strings, and any other shape.
pub fn parse_millis_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Parse a JSON value into an [`OffsetDateTime`] (UTC).
pub fn parse_millis(value: &Value) -> Option<OffsetDateTime> {
    let ms = parse_millis_i64(value)?;
    from_millis(ms)
}

/// Convert epoch milliseconds into an [`OffsetDateTime`] (UTC).
pub fn from_millis(ms: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000).ok()
}

/// Convert a timestamp to epoch milliseconds.
pub fn to_millis(ts: OffsetDateTime) -> i64 {
    (ts.unix_timestamp_nanos() / 1_000_000) as i64
}
