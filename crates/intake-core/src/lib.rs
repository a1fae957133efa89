//! intake-core
//!
//! Validation schemas, the order-form reducer and step controller, draft
//! persistence, auth and address-lookup seams, and the dashboard session.
//! Depends on intake-domain. No terminal I/O and no concrete storage backend.

pub mod address_lookup;
pub mod auth;
pub mod controller;
pub mod dashboard;
pub mod error;
pub mod items;
pub mod persistence;
pub mod reducer;
pub mod storage;
pub mod summary;
pub mod validation;

pub use address_lookup::*;
pub use auth::*;
pub use controller::*;
pub use dashboard::*;
pub use error::CoreError;
pub use items::*;
pub use persistence::*;
pub use reducer::*;
pub use storage::*;
pub use summary::*;
pub use validation::*;

#[cfg(test)]
mod tests;
