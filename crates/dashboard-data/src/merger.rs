//! Left join of orders with reviews and payments.

use std::collections::HashMap;

use dashboard_core::error::Result;
use dashboard_core::models::{MergedRecord, Order, Payment, Review, Table, ORDER_ID_COLUMN};
use tracing::debug;

/// Left-join `orders` with `reviews`, then with `payments`, on `order_id`.
///
/// Every order appears at least once. An order with `r` matching reviews and
/// `p` matching payments yields `max(r, 1) * max(p, 1)` rows; missing sides
/// are `None`. Rows keep the order table's ordering, then the review and
/// payment tables' orderings within one order. Nothing is de-duplicated.
///
/// Fails with `SchemaMismatch` when any table lacks the `order_id` column.
pub fn merge_tables(
    orders: &Table<Order>,
    reviews: &Table<Review>,
    payments: &Table<Payment>,
) -> Result<Vec<MergedRecord>> {
    orders.require_column(ORDER_ID_COLUMN)?;
    reviews.require_column(ORDER_ID_COLUMN)?;
    payments.require_column(ORDER_ID_COLUMN)?;

    let reviews_by_order = group_by_order(&reviews.rows, |r| &r.order_id);
    let payments_by_order = group_by_order(&payments.rows, |p| &p.order_id);

    let mut merged = Vec::with_capacity(orders.len().max(payments.len()));

    for order in &orders.rows {
        let order_reviews = reviews_by_order
            .get(order.order_id.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();
        let order_payments = payments_by_order
            .get(order.order_id.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();

        for review in one_or_none(order_reviews) {
            for payment in one_or_none(order_payments) {
                merged.push(MergedRecord {
                    order_id: order.order_id.clone(),
                    purchase_timestamp: order.purchase_timestamp.clone(),
                    review_id: review.and_then(|r| r.review_id.clone()),
                    review_score: review.and_then(|r| r.review_score),
                    payment_type: payment.and_then(|p| p.payment_type.clone()),
                });
            }
        }
    }

    debug!(
        orders = orders.len(),
        merged = merged.len(),
        "left join complete"
    );

    Ok(merged)
}

/// Index rows by order id, keeping file order within each group.
fn group_by_order<'a, T>(
    rows: &'a [T],
    key: impl Fn(&'a T) -> &'a String,
) -> HashMap<&'a str, Vec<&'a T>> {
    let mut map: HashMap<&'a str, Vec<&'a T>> = HashMap::new();
    for row in rows {
        map.entry(key(row).as_str()).or_default().push(row);
    }
    map
}

/// Matches as `Some`, or a single `None` when there are no matches.
fn one_or_none<'a, T>(matches: &'a [&'a T]) -> Vec<Option<&'a T>> {
    if matches.is_empty() {
        vec![None]
    } else {
        matches.iter().map(|m| Some(*m)).collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
