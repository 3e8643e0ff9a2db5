//! Data preparation and aggregation for the orders dashboard.
//!
//! Reads the orders, reviews and payments CSV tables, left-joins them on the
//! order id, parses purchase timestamps, filters by month range and reduces
//! the result to the three summaries the dashboard draws.

pub mod aggregator;
pub mod dataset;
pub mod filter;
pub mod merger;
pub mod normalizer;
pub mod reader;

pub use dashboard_core as core;
