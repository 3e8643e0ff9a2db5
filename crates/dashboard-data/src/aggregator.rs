//! Summary tables derived from a (filtered) set of unified rows.

use std::collections::{BTreeMap, HashSet};

use dashboard_core::models::{
    MonthlyOrderCount, MonthlySummary, PaymentTypeCount, PaymentTypeSummary, ReviewScoreCount,
    ReviewScoreSummary, UnifiedRecord,
};
use dashboard_core::month::YearMonth;

// ── OrderAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that reduces unified rows to dashboard summaries.
pub struct OrderAggregator;

impl OrderAggregator {
    /// Distinct orders per calendar month, ascending by month.
    ///
    /// Every month between the earliest and latest month present in
    /// `records` is emitted, with a zero count when no order falls in it.
    /// Orders fanned out over several payment rows are counted once.
    pub fn monthly_order_counts<'a>(
        records: impl IntoIterator<Item = &'a UnifiedRecord>,
    ) -> MonthlySummary {
        let mut buckets: BTreeMap<YearMonth, HashSet<&'a str>> = BTreeMap::new();
        for record in records {
            buckets
                .entry(record.purchase_month())
                .or_default()
                .insert(record.order_id.as_str());
        }

        let (Some(first), Some(last)) = (
            buckets.keys().next().copied(),
            buckets.keys().next_back().copied(),
        ) else {
            return Vec::new();
        };

        YearMonth::range_inclusive(first, last)
            .into_iter()
            .map(|month| MonthlyOrderCount {
                month,
                order_count: buckets.get(&month).map_or(0, HashSet::len),
            })
            .collect()
    }

    /// Review rows per score, largest count first; ties by ascending score.
    ///
    /// Rows without a review (no id or no score) are skipped. Fan-out rows
    /// are counted as they appear.
    pub fn review_score_counts<'a>(
        records: impl IntoIterator<Item = &'a UnifiedRecord>,
    ) -> ReviewScoreSummary {
        let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
        for record in records {
            if let (Some(_), Some(score)) = (&record.review_id, record.review_score) {
                *counts.entry(score).or_default() += 1;
            }
        }

        let mut summary: ReviewScoreSummary = counts
            .into_iter()
            .map(|(score, count)| ReviewScoreCount { score, count })
            .collect();
        // Stable sort keeps the ascending key order for equal counts.
        summary.sort_by(|a, b| b.count.cmp(&a.count));
        summary
    }

    /// Payment records per payment type, largest count first; ties by
    /// ascending type name.
    ///
    /// Counts rows, not distinct orders: a split payment contributes one row
    /// per payment record.
    pub fn payment_type_counts<'a>(
        records: impl IntoIterator<Item = &'a UnifiedRecord>,
    ) -> PaymentTypeSummary {
        let mut counts: BTreeMap<&'a str, usize> = BTreeMap::new();
        for record in records {
            if let Some(kind) = record.payment_type.as_deref() {
                *counts.entry(kind).or_default() += 1;
            }
        }

        let mut summary: PaymentTypeSummary = counts
            .into_iter()
            .map(|(kind, count)| PaymentTypeCount {
                payment_type: kind.to_string(),
                count,
            })
            .collect();
        summary.sort_by(|a, b| b.count.cmp(&a.count));
        summary
    }

    /// The "total orders" metric: sum of the monthly distinct counts.
    pub fn total_orders(monthly: &[MonthlyOrderCount]) -> usize {
        monthly.iter().map(|m| m.order_count).sum()
    }

    /// Sum of all review counts in a summary.
    pub fn total_reviews(reviews: &[ReviewScoreCount]) -> usize {
        reviews.iter().map(|r| r.count).sum()
    }

    /// Sum of all payment record counts in a summary.
    pub fn total_payments(payments: &[PaymentTypeCount]) -> usize {
        payments.iter().map(|p| p.count).sum()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
