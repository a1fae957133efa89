//! intake-domain
//!
//! Pure domain models for the moving-order intake (addresses, contacts, items,
//! the order draft, catalog reference data and relational record shapes).
//! No I/O, no CLI, no storage.

pub mod address;
pub mod catalog;
pub mod common;
pub mod contact;
pub mod item;
pub mod order;
pub mod record;

pub use address::*;
pub use catalog::*;
pub use common::*;
pub use contact::*;
pub use item::*;
pub use order::*;
pub use record::*;
