//! Domain logic for the motor master-data portal.
//!
//! Pure code only: no database, no HTTP, no async. The `db` and `api`
//! crates build on these types.

pub mod clean;
pub mod csv;
pub mod ensuredit;
pub mod error;
pub mod import;
pub mod insurer;
pub mod mapping;
pub mod master;
pub mod product;
pub mod search;
pub mod types;
