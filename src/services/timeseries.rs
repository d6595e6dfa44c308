//! NWS gridpoint time-series expansion.
//!
//! Gridpoint series are run-length encoded: each entry carries a start
//! instant, an ISO-8601 duration ("PT6H", "P1DT6H", ...) and a constant
//! value covering that span. Downstream derivation wants one value per hour,
//! so every series is replayed onto a dense hourly grid and truncated to the
//! forecast horizon.
//!
//! Entries are assumed chronologically ordered and non-overlapping (the NWS
//! API guarantees this); the expander does not re-sort or deduplicate.

use chrono::{DateTime, Duration, Utc};

/// One run-length-encoded series entry.
#[derive(Debug, Clone)]
pub struct RleEntry<T> {
    /// Start of the span this entry covers
    pub start: DateTime<Utc>,
    /// ISO-8601 duration token (e.g. "PT6H")
    pub duration: String,
    /// Constant value across the span
    pub value: T,
}

/// One hour of an expanded series.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyValue<T> {
    pub time: DateTime<Utc>,
    pub value: T,
}

/// Split an NWS `validTime` ("2026-03-01T06:00:00+00:00/PT6H") into start
/// instant and duration token. Returns `None` when the instant is unparseable.
pub fn parse_valid_time(valid_time: &str) -> Option<(DateTime<Utc>, String)> {
    let (time_str, duration) = match valid_time.split_once('/') {
        Some((t, d)) => (t, d.to_string()),
        // No duration component — treat the whole string as the instant.
        None => (valid_time, String::new()),
    };

    match DateTime::parse_from_rfc3339(time_str) {
        Ok(dt) => Some((dt.with_timezone(&Utc), duration)),
        Err(e) => {
            tracing::warn!("Unparseable validTime instant '{}': {}", time_str, e);
            None
        }
    }
}

/// Parse an ISO-8601 duration token into whole hours.
///
/// Handles day and hour components (`P<d>DT<h>H`, `PT<h>H`, `P<d>D`);
/// minute/second components are ignored. Defaults to 1 hour when neither a
/// day nor an hour component can be extracted, silently under-expanding a
/// malformed entry rather than failing.
pub fn parse_iso_duration_hours(duration: &str) -> i64 {
    let Some(rest) = duration.strip_prefix('P') else {
        return 1;
    };

    let (date_part, time_part) = match rest.split_once('T') {
        Some((d, t)) => (d, t),
        None => (rest, ""),
    };

    let days = component_value(date_part, 'D');
    let hours = component_value(time_part, 'H');

    match (days, hours) {
        (None, None) => 1,
        (d, h) => d.unwrap_or(0) * 24 + h.unwrap_or(0),
    }
}

/// Extract the integer preceding `marker` in an ISO-8601 duration fragment.
///
/// A fractional value like "1.5" is not an integer component and yields
/// `None` rather than its digits after the decimal point.
fn component_value(fragment: &str, marker: char) -> Option<i64> {
    let idx = fragment.find(marker)?;
    let prefix = &fragment[..idx];
    let start = prefix
        .rfind(|c: char| !c.is_ascii_digit())
        .map(|i| i + 1)
        .unwrap_or(0);
    if prefix[..start].ends_with('.') {
        return None;
    }
    prefix[start..].parse().ok()
}

/// Expand a run-length-encoded series onto a dense hourly grid.
///
/// Each entry is replayed for its declared hour count starting at its start
/// instant; the result is truncated to `hours_needed`. An empty or malformed
/// input yields an empty or short output, never an error.
pub fn expand_series<T: Clone>(entries: &[RleEntry<T>], hours_needed: usize) -> Vec<HourlyValue<T>> {
    let mut result = Vec::with_capacity(hours_needed);

    for entry in entries {
        let hours = parse_iso_duration_hours(&entry.duration);
        for h in 0..hours {
            if result.len() >= hours_needed {
                return result;
            }
            result.push(HourlyValue {
                time: entry.start + Duration::hours(h),
                value: entry.value.clone(),
            });
        }
    }

    result
}
