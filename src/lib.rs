//! dh-hashmap: a single-threaded, open-addressing map from `String` keys to
//! `String` values using double hashing over prime-sized slot arrays.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep collision resolution, resizing and tombstones simple enough
//!   that their interaction can be checked by small invariants.
//! - Layers:
//!   - `prime`: primality test and next-prime rounding for slot array sizes,
//!     plus the two hash bases.
//!   - `hashing`: polynomial string hash and the double-hash `ProbeSeq`.
//!   - `slot`: `Slot::{Empty, Tombstone, Occupied(Entry)}`.
//!   - `HashTable`: insert/get/remove/resize on top of the above.
//!
//! Constraints
//! - Single-threaded; no interior mutability, no locking.
//! - `capacity == next_prime(base_capacity)` at all times.
//! - For every stored key, walking its probe sequence reaches the key's slot
//!   before any `Empty` slot. Tombstones never end a walk.
//!
//! Probing
//! - Index for attempt `i` is `(hash_a + i * step) mod capacity` with
//!   `step = hash_b + 1`, or 1 when that would equal the capacity. With a
//!   prime capacity every step in `1..capacity` is coprime to it, so one
//!   pass of `capacity` attempts visits every slot exactly once.
//! - Walks are bounded by that pass: a table with no `Empty` slot left
//!   (possible after many removals) still answers misses.
//! - Hashes are reduced modulo the capacity at every multiplication, so
//!   long keys never overflow.
//!
//! Resizing
//! - Before an insert, a load above `grow_above_percent` (default 70)
//!   doubles the base capacity. Before a remove, a load below
//!   `shrink_below_percent` (default 10) halves it.
//! - Requests below the initial base capacity (default 53) are ignored.
//! - A resize moves every live entry into a fresh array and drops the old
//!   one; all tombstones disappear.
//!
//! Removal semantics
//! - `remove` buries every matching slot on the walk and lowers `len()` only
//!   by the number of entries actually removed. Removing an absent key is a
//!   no-op apart from a possible shrink.
//!
//! Notes and non-goals
//! - Iteration order is unspecified and changes across resizes.
//! - No generic keys or values, no custom hashers.
//! - Allocation failures of the slot array surface as `TableError::Alloc`
//!   from the fallible constructors, `insert` and `remove`.

mod config;
mod error;
pub mod hashing;
pub mod prime;
mod slot;
mod table;
mod table_proptest;

// Public surface
pub use config::{TableConfig, HT_INITIAL_BASE_SIZE};
pub use error::TableError;
pub use table::{HashTable, Iter, TableStats};
