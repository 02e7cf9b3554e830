//! Data models
//!
//! Shared between the client runtime and anything that replays its
//! cached JSON. Field names follow the backend's camelCase wire format.
//! Numeric entities use `i64` IDs; users, stock items, and
//! notifications carry string IDs.

pub mod dashboard;
pub mod doctor;
pub mod expense;
pub mod notification;
pub mod stock;
pub mod target;
pub mod task;
pub mod user;
pub mod visit_report;
pub mod zone;

// Re-exports
pub use dashboard::*;
pub use doctor::*;
pub use expense::*;
pub use notification::*;
pub use stock::*;
pub use target::*;
pub use task::*;
pub use user::*;
pub use visit_report::*;
pub use zone::*;
