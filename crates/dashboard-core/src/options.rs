//! Load and filter options chosen on the command line.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

// ── EndBoundary ───────────────────────────────────────────────────────────────

/// How the end month of a range bounds the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndBoundary {
    /// The whole end month is included: `ts < first instant of end + 1`.
    #[default]
    EndOfMonth,
    /// Only the end month's first instant is included: `ts <= first instant
    /// of end`. Matches the legacy dashboard, which compared against the raw
    /// month-start timestamp.
    MonthStart,
}

impl EndBoundary {
    /// The CLI spelling, also shown in the dashboard header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EndOfMonth => "end-of-month",
            Self::MonthStart => "month-start",
        }
    }
}

// ── InvalidTimestampPolicy ────────────────────────────────────────────────────

/// What to do with a row whose purchase timestamp is present but malformed.
///
/// Empty timestamps are never an error: such rows can match no month range,
/// so they are dropped under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidTimestampPolicy {
    /// Skip the row and keep loading.
    #[default]
    Drop,
    /// Abort the load with `UnparsableTimestamp`.
    Reject,
}

impl InvalidTimestampPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drop => "drop",
            Self::Reject => "reject",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
