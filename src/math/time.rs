//! Timestamp arithmetic used by speed and interpolation.

use chrono::{DateTime, Duration, Utc};

/// Seconds elapsed from `from` to `to` (negative if `to` is earlier).
#[must_use]
pub fn elapsed_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    duration_seconds(to - from)
}

/// A duration expressed as fractional seconds.
#[must_use]
pub fn duration_seconds(delta: Duration) -> f64 {
    delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) * 1e-9
}

/// Linear blend between two timestamps, unclamped.
///
/// Results that would leave chrono's representable range saturate to the
/// nearer endpoint.
#[must_use]
pub fn lerp_timestamp(a: DateTime<Utc>, b: DateTime<Utc>, fraction: f64) -> DateTime<Utc> {
    let delta = b - a;
    let offset = match delta.num_nanoseconds() {
        Some(nanos) => Duration::nanoseconds((nanos as f64 * fraction).round() as i64),
        None => Duration::milliseconds((delta.num_milliseconds() as f64 * fraction).round() as i64),
    };
    a.checked_add_signed(offset)
        .unwrap_or(if fraction < 0.5 { a } else { b })
}
