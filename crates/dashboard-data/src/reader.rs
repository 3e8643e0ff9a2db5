//! CSV loading for the three input tables.
//!
//! Each table must carry a header row. Only the columns the dashboard uses
//! are required; any other columns are ignored.

use std::io::Read;
use std::path::{Path, PathBuf};

use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{Order, Payment, Review, Table, ORDER_ID_COLUMN};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Columns the orders table must declare.
pub const ORDER_COLUMNS: &[&str] = &[ORDER_ID_COLUMN, "order_purchase_timestamp"];
/// Columns the reviews table must declare.
pub const REVIEW_COLUMNS: &[&str] = &["review_id", ORDER_ID_COLUMN, "review_score"];
/// Columns the payments table must declare.
pub const PAYMENT_COLUMNS: &[&str] = &[ORDER_ID_COLUMN, "payment_type"];

// ── Public API ────────────────────────────────────────────────────────────────

/// Locations of the three input files.
#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub orders: PathBuf,
    pub reviews: PathBuf,
    pub payments: PathBuf,
}

/// The three tables as read from disk, before joining.
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub orders: Table<Order>,
    pub reviews: Table<Review>,
    pub payments: Table<Payment>,
}

/// Read all three tables. Any missing file or column is fatal.
pub fn load_tables(paths: &SourcePaths) -> Result<SourceTables> {
    let orders = read_orders(&paths.orders)?;
    let reviews = read_reviews(&paths.reviews)?;
    let payments = read_payments(&paths.payments)?;

    info!(
        orders = orders.len(),
        reviews = reviews.len(),
        payments = payments.len(),
        "source tables loaded"
    );

    Ok(SourceTables {
        orders,
        reviews,
        payments,
    })
}

/// Read the orders table from a CSV file.
pub fn read_orders(path: &Path) -> Result<Table<Order>> {
    read_orders_from(open(path)?)
}

/// Read the reviews table from a CSV file.
pub fn read_reviews(path: &Path) -> Result<Table<Review>> {
    read_reviews_from(open(path)?)
}

/// Read the payments table from a CSV file.
pub fn read_payments(path: &Path) -> Result<Table<Payment>> {
    read_payments_from(open(path)?)
}

/// Read the orders table from any CSV source.
pub fn read_orders_from<R: Read>(source: R) -> Result<Table<Order>> {
    read_table("orders", source, ORDER_COLUMNS)
}

/// Read the reviews table from any CSV source.
///
/// Scores such as `"4.0"` read as `4`; unparsable scores read as missing.
pub fn read_reviews_from<R: Read>(source: R) -> Result<Table<Review>> {
    read_table("reviews", source, REVIEW_COLUMNS)
}

/// Read the payments table from any CSV source.
pub fn read_payments_from<R: Read>(source: R) -> Result<Table<Payment>> {
    read_table("payments", source, PAYMENT_COLUMNS)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn open(path: &Path) -> Result<std::fs::File> {
    std::fs::File::open(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Generic table driver: validates the header against `required`, then
/// deserializes every record by column name.
///
/// Cells are trimmed, and empty cells read as `None` for optional fields.
fn read_table<R, T>(name: &str, source: R, required: &[&str]) -> Result<Table<T>>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut table: Table<T> = Table::new(name, columns, Vec::new());
    for column in required {
        table.require_column(column)?;
    }
    reader.set_headers(csv::StringRecord::from(table.columns.clone()));

    for row in reader.deserialize::<T>() {
        table.rows.push(row?);
    }

    debug!("table {}: {} rows read", name, table.len());

    Ok(table)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
