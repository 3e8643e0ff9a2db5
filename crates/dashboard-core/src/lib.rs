//! Shared domain types for the orders dashboard.
//!
//! Holds the record and summary models, calendar-month arithmetic, timestamp
//! parsing, number formatting, load options, CLI settings and the crate-wide
//! error type.

pub mod error;
pub mod formatting;
pub mod models;
pub mod month;
pub mod options;
pub mod settings;
pub mod time_utils;

pub use error::{DashboardError, Result};
