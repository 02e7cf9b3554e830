//! Resource managers
//!
//! One manager per backend resource. All follow the same shape: an
//! explicit record list plus [`DataMode`](crate::sync::DataMode) owned
//! by the manager, refresh through the sync reconciler, and mutations
//! that try the API first and mutate the local cache when it is down.

pub mod dashboard;
pub mod doctors;
pub mod expenses;
pub mod notifications;
pub mod roster;
pub mod stock;
pub mod targets;
pub mod tasks;
pub mod visit_reports;
pub mod zones;

pub use dashboard::DashboardManager;
pub use doctors::{DoctorFilter, DoctorManager};
pub use expenses::{ExpenseFilter, ExpenseManager, ExpenseSummary};
pub use notifications::{NotificationFilter, NotificationManager};
pub use roster::RosterManager;
pub use stock::{StockBand, StockFilter, StockManager};
pub use targets::{TargetFilter, TargetManager};
pub use tasks::{TaskFilter, TaskManager};
pub use visit_reports::{DraftBasket, VisitReportManager};
pub use zones::ZoneManager;

/// Fallback-mode ID assignment: max-plus-one over the cached list,
/// starting at 1.
pub(crate) fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().unwrap_or(0) + 1
}

/// Today's date in the wire form (YYYY-MM-DD).
pub(crate) fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Submission timestamp in the wire form (RFC 3339, seconds).
pub(crate) fn now_stamp() -> String {
    chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
