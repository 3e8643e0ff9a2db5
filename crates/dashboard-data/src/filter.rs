//! Month-range selection over unified rows.

use chrono::NaiveDateTime;
use dashboard_core::models::UnifiedRecord;
use dashboard_core::month::{MonthRange, YearMonth};

pub use dashboard_core::options::EndBoundary;

// ── TimeWindow ────────────────────────────────────────────────────────────────

/// Concrete instants a [`MonthRange`] resolves to under an [`EndBoundary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
    end_inclusive: bool,
}

impl TimeWindow {
    pub fn new(range: MonthRange, boundary: EndBoundary) -> Self {
        let start = range.start.first_instant();
        match boundary {
            EndBoundary::EndOfMonth => Self {
                start,
                end: range.end.next().first_instant(),
                end_inclusive: false,
            },
            EndBoundary::MonthStart => Self {
                start,
                end: range.end.first_instant(),
                end_inclusive: true,
            },
        }
    }

    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        if ts < self.start {
            return false;
        }
        if self.end_inclusive {
            ts <= self.end
        } else {
            ts < self.end
        }
    }
}

// ── Filtering ─────────────────────────────────────────────────────────────────

/// Rows whose purchase timestamp falls inside `range`.
///
/// An inverted range (`start > end`) selects nothing. Filtering the result
/// again with the same range returns the same rows.
pub fn filter_by_range<'a>(
    records: impl IntoIterator<Item = &'a UnifiedRecord>,
    range: MonthRange,
    boundary: EndBoundary,
) -> Vec<&'a UnifiedRecord> {
    if range.is_inverted() {
        return Vec::new();
    }
    let window = TimeWindow::new(range, boundary);
    records
        .into_iter()
        .filter(|r| window.contains(r.purchase_timestamp))
        .collect()
}

/// Every month from the one holding the earliest purchase through the one
/// holding the latest, over the full (unfiltered) set.
///
/// These are the choices offered by the start/end month selectors.
pub fn available_months<'a>(records: impl IntoIterator<Item = &'a UnifiedRecord>) -> Vec<YearMonth> {
    let mut bounds: Option<(NaiveDateTime, NaiveDateTime)> = None;
    for r in records {
        let ts = r.purchase_timestamp;
        bounds = Some(match bounds {
            None => (ts, ts),
            Some((lo, hi)) => (lo.min(ts), hi.max(ts)),
        });
    }
    match bounds {
        Some((lo, hi)) => YearMonth::range_inclusive(YearMonth::of(lo), YearMonth::of(hi)),
        None => Vec::new(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
