//! SQLite storage layer
//!
//! - `schema`: table definitions and schema versioning
//! - `error`: typed storage errors

pub mod error;
pub mod schema;

pub use error::{StoreError, StoreResult};
