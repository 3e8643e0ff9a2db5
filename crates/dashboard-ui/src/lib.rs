//! Terminal UI layer for the orders dashboard.
//!
//! Provides themes, bar and header components, the interactive dashboard and
//! static table views, and the application event loop built on top of
//! [`ratatui`].

pub mod app;
pub mod components;
pub mod dashboard_view;
pub mod table_view;
pub mod themes;

pub use dashboard_core as core;
