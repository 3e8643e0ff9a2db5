//! Purchase-timestamp parsing for merged rows.

use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{MergedRecord, UnifiedRecord};
use dashboard_core::time_utils::{is_missing, parse_timestamp};
use tracing::warn;

pub use dashboard_core::options::InvalidTimestampPolicy;

// ── NormalizedRecords ─────────────────────────────────────────────────────────

/// Parsed rows plus counts of what was left out.
#[derive(Debug, Clone, Default)]
pub struct NormalizedRecords {
    pub records: Vec<UnifiedRecord>,
    /// Rows skipped because the timestamp was malformed.
    pub dropped_malformed: usize,
    /// Rows skipped because the timestamp was empty.
    pub dropped_missing: usize,
}

impl NormalizedRecords {
    /// Total rows that did not make it into `records`.
    pub fn dropped(&self) -> usize {
        self.dropped_malformed + self.dropped_missing
    }
}

// ── normalize_timestamps ──────────────────────────────────────────────────────

/// Parse the purchase timestamp of every merged row.
pub fn normalize_timestamps(
    merged: Vec<MergedRecord>,
    policy: InvalidTimestampPolicy,
) -> Result<NormalizedRecords> {
    let mut out = NormalizedRecords {
        records: Vec::with_capacity(merged.len()),
        ..Default::default()
    };

    for row in merged {
        if is_missing(&row.purchase_timestamp) {
            out.dropped_missing += 1;
            continue;
        }

        let Some(purchase_timestamp) = parse_timestamp(&row.purchase_timestamp) else {
            match policy {
                InvalidTimestampPolicy::Reject => {
                    return Err(DashboardError::UnparsableTimestamp {
                        order_id: row.order_id,
                        value: row.purchase_timestamp,
                    });
                }
                InvalidTimestampPolicy::Drop => {
                    warn!(
                        order_id = %row.order_id,
                        value = %row.purchase_timestamp,
                        "dropping row with unparsable purchase timestamp"
                    );
                    out.dropped_malformed += 1;
                    continue;
                }
            }
        };

        out.records.push(UnifiedRecord {
            order_id: row.order_id,
            purchase_timestamp,
            review_id: row.review_id,
            review_score: row.review_score,
            payment_type: row.payment_type,
        });
    }

    if out.dropped() > 0 {
        warn!(
            malformed = out.dropped_malformed,
            missing = out.dropped_missing,
            "rows without a usable purchase timestamp were skipped"
        );
    }

    Ok(out)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
