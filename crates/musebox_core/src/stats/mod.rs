//! Dashboard statistics over the capture store.

pub mod dashboard;

pub use dashboard::{dashboard_snapshot, snapshot_for_day, DashboardSnapshot};
