//! Range-to-snapshot recomputation.
//!
//! [`DashboardController::render`] is the single entry point the UI calls
//! whenever the selected month range changes. It filters the shared dataset
//! and runs the three aggregators; nothing is cached between calls.

use std::sync::Arc;
use std::time::Instant;

use dashboard_core::models::{MonthlySummary, PaymentTypeSummary, ReviewScoreSummary};
use dashboard_core::month::{MonthRange, YearMonth};
use dashboard_data::aggregator::OrderAggregator;
use dashboard_data::dataset::Dataset;
use dashboard_data::filter::{filter_by_range, EndBoundary};
use serde::Serialize;

use crate::selector::RangeSelector;

// ── DashboardSnapshot ─────────────────────────────────────────────────────────

/// Everything the dashboard draws for one month range.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// Range the snapshot was computed for; `None` when no months exist.
    pub range: Option<MonthRange>,
    /// Unified rows that fell inside the range.
    pub row_count: usize,
    /// Sum of the monthly distinct order counts.
    pub total_orders: usize,
    pub monthly: MonthlySummary,
    pub review_scores: ReviewScoreSummary,
    pub payment_types: PaymentTypeSummary,
}

impl DashboardSnapshot {
    /// A snapshot with no rows, for an empty dataset.
    pub fn empty(range: Option<MonthRange>) -> Self {
        Self {
            range,
            ..Default::default()
        }
    }

    /// `true` when no order fell inside the range.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn total_reviews(&self) -> usize {
        OrderAggregator::total_reviews(&self.review_scores)
    }

    pub fn total_payments(&self) -> usize {
        OrderAggregator::total_payments(&self.payment_types)
    }
}

// ── DashboardController ───────────────────────────────────────────────────────

/// Recomputes dashboard snapshots from an immutable [`Dataset`].
#[derive(Debug, Clone)]
pub struct DashboardController {
    dataset: Arc<Dataset>,
    boundary: EndBoundary,
}

impl DashboardController {
    pub fn new(dataset: Arc<Dataset>, boundary: EndBoundary) -> Self {
        Self { dataset, boundary }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn boundary(&self) -> EndBoundary {
        self.boundary
    }

    /// A selector over the dataset's available months.
    pub fn selector(&self, start: Option<YearMonth>, end: Option<YearMonth>) -> RangeSelector {
        RangeSelector::new(self.dataset.months().to_vec(), start, end)
    }

    /// Filter to `range` and aggregate.
    pub fn render(&self, range: MonthRange) -> DashboardSnapshot {
        let started = Instant::now();

        let rows = filter_by_range(self.dataset.records(), range, self.boundary);
        let monthly = OrderAggregator::monthly_order_counts(rows.iter().copied());
        let review_scores = OrderAggregator::review_score_counts(rows.iter().copied());
        let payment_types = OrderAggregator::payment_type_counts(rows.iter().copied());

        let snapshot = DashboardSnapshot {
            range: Some(range),
            row_count: rows.len(),
            total_orders: OrderAggregator::total_orders(&monthly),
            monthly,
            review_scores,
            payment_types,
        };

        tracing::debug!(
            %range,
            rows = snapshot.row_count,
            orders = snapshot.total_orders,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "snapshot recomputed"
        );

        snapshot
    }

    /// Render whatever `selector` currently points at.
    pub fn render_selection(&self, selector: &RangeSelector) -> DashboardSnapshot {
        match selector.range() {
            Some(range) => self.render(range),
            None => DashboardSnapshot::empty(None),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
