//! Error type shared by all fallible table operations.

use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    /// The slot array could not be allocated. The table is unchanged.
    #[error("failed to allocate slot array: {0}")]
    Alloc(#[from] TryReserveError),
    /// Growing the base capacity or rounding it to a prime overflowed `usize`.
    #[error("table capacity overflow")]
    CapacityOverflow,
    #[error("invalid table configuration: {0}")]
    InvalidConfig(&'static str),
    /// Every slot on the probe sequence is occupied by another key.
    #[error("no free slot on probe sequence (capacity {capacity})")]
    NoFreeSlot { capacity: usize },
}
