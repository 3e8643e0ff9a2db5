use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

// ── Timestamp parsing ─────────────────────────────────────────────────────────

/// Naive date-time layouts tried in order before the date-only fallbacks.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a purchase timestamp into a naive date-time.
///
/// Accepted forms, in order of preference:
///
/// * `2017-10-02 10:56:33` (optionally with fractional seconds or a `T`)
/// * RFC 3339 with an offset, e.g. `2017-10-02T10:56:33Z`; converted to UTC
///   and stripped of its zone
/// * `2017-10-02` (midnight)
/// * `2017-10` (first instant of the month)
/// * compact digits: `2017` (January 1st) or `20171002` (midnight)
/// * an integer of nine or more digits, read as seconds since the Unix epoch
///
/// Shorter digit strings other than the compact forms are rejected rather
/// than read as epoch seconds near 1970.
///
/// Returns `None` for empty or unrecognised input.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    // Replace trailing 'Z' with '+00:00'.
    let normalised = if let Some(stripped) = s.strip_suffix('Z') {
        format!("{}+00:00", stripped)
    } else {
        s.to_string()
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
        return Some(dt.naive_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    if let Ok(month) = s.parse::<crate::month::YearMonth>() {
        return Some(month.first_instant());
    }

    let digits = s.strip_prefix('-').unwrap_or(s);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return parse_digits(s, digits.len());
    }

    debug!("could not parse timestamp \"{}\"", s);
    None
}

/// All-digit input (with an optional leading `-` for epoch values).
fn parse_digits(s: &str, len: usize) -> Option<NaiveDateTime> {
    let parsed = match (s.starts_with('-'), len) {
        (false, 4) => s
            .parse::<i32>()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
            .and_then(|date| date.and_hms_opt(0, 0, 0)),
        (false, 8) => NaiveDate::parse_from_str(s, "%Y%m%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0)),
        (_, n) if n >= EPOCH_MIN_DIGITS => s
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.naive_utc()),
        _ => None,
    };
    if parsed.is_none() {
        debug!("could not parse numeric timestamp \"{}\"", s);
    }
    parsed
}

/// Fewest digits read as epoch seconds; `100000000` is 1973-03-03.
const EPOCH_MIN_DIGITS: usize = 9;

/// `true` when `raw` carries no value at all (empty or whitespace only).
pub fn is_missing(raw: &str) -> bool {
    raw.trim().is_empty()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
