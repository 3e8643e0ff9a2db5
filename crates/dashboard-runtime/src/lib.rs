//! Interactive state for the orders dashboard.
//!
//! Owns the month-range selection and turns a range into a
//! [`controller::DashboardSnapshot`] the UI layer can draw.

pub mod controller;
pub mod selector;

pub use dashboard_core as core;
pub use dashboard_data as data;
