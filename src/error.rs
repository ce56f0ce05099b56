//! Errors surfaced by table construction.
//!
//! Lookups and removals of absent keys are not errors: they return `None`.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// A table needs at least one bucket.
    #[error("invalid capacity: a hash table needs at least one bucket")]
    InvalidCapacity,
}
