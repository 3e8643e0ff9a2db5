use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{DashboardError, Result};
use crate::month::YearMonth;

/// Name of the column every input table is joined on.
pub const ORDER_ID_COLUMN: &str = "order_id";

// ── Source rows ───────────────────────────────────────────────────────────────

// Field names match the CSV headers; the reader deserializes rows straight
// into these types.

/// One purchase, as read from the orders table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier.
    pub order_id: String,
    /// Purchase timestamp exactly as stored in the source file.
    #[serde(rename = "order_purchase_timestamp")]
    pub purchase_timestamp: String,
}

/// A customer review attached to an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub review_id: Option<String>,
    pub order_id: String,
    /// Review score, observed range 1–5.
    #[serde(deserialize_with = "deserialize_review_score")]
    pub review_score: Option<u8>,
}

/// A single payment record; an order may have several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub order_id: String,
    pub payment_type: Option<String>,
}

/// Parse a review score; accepts `"4"` and `"4.0"`.
///
/// Anything else is treated as a missing score.
pub fn parse_review_score(raw: &str) -> Option<u8> {
    let raw = raw.trim();
    if let Ok(score) = raw.parse::<u8>() {
        return Some(score);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && (0.0..=255.0).contains(&v) => Some(v as u8),
        _ => {
            tracing::debug!("ignoring unparsable review score \"{}\"", raw);
            None
        }
    }
}

fn deserialize_review_score<'de, D>(deserializer: D) -> std::result::Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_review_score))
}

// ── Table ─────────────────────────────────────────────────────────────────────

/// Typed rows plus the column names the source declared.
#[derive(Debug, Clone)]
pub struct Table<T> {
    /// Table name used in error messages, e.g. `"payments"`.
    pub name: String,
    /// Column names from the header row.
    pub columns: Vec<String>,
    pub rows: Vec<T>,
}

impl<T> Table<T> {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<T>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Build a table whose declared columns are `columns`.
    pub fn with_columns(name: impl Into<String>, columns: &[&str], rows: Vec<T>) -> Self {
        Self::new(
            name,
            columns.iter().map(|c| c.to_string()).collect(),
            rows,
        )
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Fail with [`DashboardError::SchemaMismatch`] when `column` is absent.
    pub fn require_column(&self, column: &str) -> Result<()> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(DashboardError::SchemaMismatch {
                table: self.name.clone(),
                column: column.to_string(),
            })
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ── Joined rows ───────────────────────────────────────────────────────────────

/// A left-joined row whose purchase timestamp has not been parsed yet.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    pub order_id: String,
    pub purchase_timestamp: String,
    pub review_id: Option<String>,
    pub review_score: Option<u8>,
    pub payment_type: Option<String>,
}

/// A left-joined row with a parsed purchase timestamp.
///
/// Orders with several payments appear once per payment (fan-out), so any
/// per-order count must de-duplicate on `order_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedRecord {
    pub order_id: String,
    pub purchase_timestamp: NaiveDateTime,
    pub review_id: Option<String>,
    pub review_score: Option<u8>,
    pub payment_type: Option<String>,
}

impl UnifiedRecord {
    /// Calendar month the purchase falls in.
    pub fn purchase_month(&self) -> YearMonth {
        YearMonth::of(self.purchase_timestamp)
    }

    /// `true` when the row carries a submitted review.
    pub fn has_review(&self) -> bool {
        self.review_id.is_some() && self.review_score.is_some()
    }
}

// ── Summaries ─────────────────────────────────────────────────────────────────

/// Distinct orders purchased in one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyOrderCount {
    pub month: YearMonth,
    pub order_count: usize,
}

/// Monthly order counts in ascending month order.
pub type MonthlySummary = Vec<MonthlyOrderCount>;

/// Number of reviews given with one score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewScoreCount {
    pub score: u8,
    pub count: usize,
}

/// Review counts by score, largest count first.
pub type ReviewScoreSummary = Vec<ReviewScoreCount>;

/// Number of payment records made with one payment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTypeCount {
    pub payment_type: String,
    pub count: usize,
}

/// Payment record counts by type, largest count first.
pub type PaymentTypeSummary = Vec<PaymentTypeCount>;

// ── Tests ─────────────────────────────────────────────────────────────────────
