//! Reusable line builders shared by the dashboard and table views.

pub mod bar;
pub mod header;
pub mod month_selector;
