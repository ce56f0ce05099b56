//! chain-hashtable: a string-keyed hash table built from scratch, with
//! DJB2 hashing and collision chains, exposing the mechanics a built-in
//! map hides.
//!
//! Internal Design:
//!
//! Summary
//! - Layers:
//!   - `hash`: DJB2 `Hasher`/`BuildHasher` and the hash-to-bucket step.
//!   - `HashTable<V, S>`: fixed-length bucket array whose slots name the head
//!     of a singly linked chain; nodes live in a `SlotMap` arena and link to
//!     their successor by arena key.
//!
//! Constraints
//! - Single-threaded: mutation takes `&mut self`; wrap the table in a lock
//!   for shared mutation.
//! - Keys are `String`s and unique across the table.
//! - Deterministic placement: the default strategy is DJB2, never the
//!   randomized std hasher, so bucket contents are reproducible.
//! - `len()` never exceeds `capacity()`; capacity only ever doubles.
//!
//! Growth and rehashing
//! - An insert that finds `len() == capacity()` first doubles the bucket
//!   count, even if it goes on to overwrite an existing key.
//! - Bucket indices depend on capacity, so growth rebuilds the bucket array
//!   and relinks every node into it.
//! - The hasher is only called while computing new placements; relinking
//!   starts after that and runs no user code, so growth either completes or
//!   leaves the table as it was.
//!
//! Not-found is not an error
//! - `retrieve`/`remove` of an absent key return `None`. The only error is
//!   `TableError::InvalidCapacity` from construction with zero buckets.
//!
//! Logging
//! - Growth and removal misses are reported through the `log` facade at
//!   `debug` level; per-insert detail at `trace`. The crate never installs a
//!   logger.

mod error;
pub mod hash;
mod hash_table;
mod hash_table_proptest;

// Public surface
pub use error::TableError;
pub use hash::{Djb2Hasher, Djb2State};
pub use hash_table::{Chain, HashTable, Iter, IterMut};
