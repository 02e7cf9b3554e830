//! Fieldforce Client - offline-tolerant client core for the field-sales API
//!
//! Typed REST access with a local JSON-store fallback: every resource
//! refreshes through one generic sync reconciler, mutations try the API
//! first and mutate the cache when the backend is down, and list views
//! come out of a pure filter/paginate engine.

pub mod config;
pub mod error;
pub mod http;
pub mod resources;
pub mod store;
pub mod sync;
pub mod view;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::ApiClient;
pub use store::{LocalStore, StoreError, keys};
pub use sync::{DataMode, MergePolicy, SyncedResource};

// Re-export shared types for convenience
pub use shared::list::{Page, PageButton, Pagination, page_window, paginate};
pub use shared::{DomainError, DomainResult};
