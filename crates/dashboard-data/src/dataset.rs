//! Startup pipeline: load, join and normalise the source tables once.
//!
//! The resulting [`Dataset`] is immutable; filters and aggregations borrow it.

use std::time::Instant;

use chrono::NaiveDateTime;
use dashboard_core::error::Result;
use dashboard_core::models::UnifiedRecord;
use dashboard_core::month::{MonthRange, YearMonth};
use tracing::info;

use crate::filter::available_months;
use crate::merger::merge_tables;
use crate::normalizer::{normalize_timestamps, InvalidTimestampPolicy};
use crate::reader::{load_tables, SourcePaths, SourceTables};

// ── Public types ──────────────────────────────────────────────────────────────

/// Facts about how a [`Dataset`] was built.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DatasetMetadata {
    /// Rows in the orders table.
    pub orders_read: usize,
    /// Rows in the reviews table.
    pub reviews_read: usize,
    /// Rows in the payments table.
    pub payments_read: usize,
    /// Rows produced by the left join, before timestamp parsing.
    pub merged_rows: usize,
    /// Rows dropped because their timestamp was malformed.
    pub dropped_malformed: usize,
    /// Rows dropped because their timestamp was empty.
    pub dropped_missing: usize,
    /// Wall-clock seconds spent reading the CSV files.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent joining and parsing.
    pub transform_time_seconds: f64,
}

/// The unified, read-only table every dashboard view is computed from.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<UnifiedRecord>,
    months: Vec<YearMonth>,
    metadata: DatasetMetadata,
}

impl Dataset {
    /// Build a dataset from rows that are already joined and parsed.
    pub fn from_records(records: Vec<UnifiedRecord>) -> Self {
        let metadata = DatasetMetadata {
            orders_read: 0,
            reviews_read: 0,
            payments_read: 0,
            merged_rows: records.len(),
            dropped_malformed: 0,
            dropped_missing: 0,
            load_time_seconds: 0.0,
            transform_time_seconds: 0.0,
        };
        Self::with_metadata(records, metadata)
    }

    fn with_metadata(records: Vec<UnifiedRecord>, metadata: DatasetMetadata) -> Self {
        let months = available_months(&records);
        Self {
            records,
            months,
            metadata,
        }
    }

    /// Join and normalise tables that have already been read.
    pub fn from_tables(tables: &SourceTables, policy: InvalidTimestampPolicy) -> Result<Self> {
        let transform_start = Instant::now();
        let merged = merge_tables(&tables.orders, &tables.reviews, &tables.payments)?;
        let merged_rows = merged.len();
        let normalized = normalize_timestamps(merged, policy)?;
        let transform_time = transform_start.elapsed().as_secs_f64();

        let metadata = DatasetMetadata {
            orders_read: tables.orders.len(),
            reviews_read: tables.reviews.len(),
            payments_read: tables.payments.len(),
            merged_rows,
            dropped_malformed: normalized.dropped_malformed,
            dropped_missing: normalized.dropped_missing,
            load_time_seconds: 0.0,
            transform_time_seconds: transform_time,
        };
        Ok(Self::with_metadata(normalized.records, metadata))
    }

    /// All unified rows, in join order.
    pub fn records(&self) -> &[UnifiedRecord] {
        &self.records
    }

    /// Months offered by the range selectors, earliest first.
    pub fn months(&self) -> &[YearMonth] {
        &self.months
    }

    pub fn metadata(&self) -> &DatasetMetadata {
        &self.metadata
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The range spanning every available month, or `None` when empty.
    pub fn full_range(&self) -> Option<MonthRange> {
        match (self.months.first(), self.months.last()) {
            (Some(&start), Some(&end)) => Some(MonthRange::new(start, end)),
            _ => None,
        }
    }

    /// Earliest and latest purchase timestamps.
    pub fn time_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let min = self.records.iter().map(|r| r.purchase_timestamp).min()?;
        let max = self.records.iter().map(|r| r.purchase_timestamp).max()?;
        Some((min, max))
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full startup pipeline.
///
/// 1. Read the three CSV tables.
/// 2. Left-join them on `order_id`.
/// 3. Parse purchase timestamps under `policy`.
/// 4. Derive the available month list.
pub fn load_dataset(paths: &SourcePaths, policy: InvalidTimestampPolicy) -> Result<Dataset> {
    let load_start = Instant::now();
    let tables = load_tables(paths)?;
    let load_time = load_start.elapsed().as_secs_f64();

    let mut dataset = Dataset::from_tables(&tables, policy)?;
    dataset.metadata.load_time_seconds = load_time;

    let meta = dataset.metadata();
    info!(
        rows = dataset.records.len(),
        months = dataset.months.len(),
        dropped = meta.dropped_malformed + meta.dropped_missing,
        load_secs = meta.load_time_seconds,
        transform_secs = meta.transform_time_seconds,
        "dataset ready"
    );

    Ok(dataset)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
