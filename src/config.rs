//! Table sizing and load thresholds.

use crate::error::TableError;

/// Default nominal capacity of a fresh table. Also the floor for shrinking.
pub const HT_INITIAL_BASE_SIZE: usize = 53;
/// Grow when `count * 100 / capacity` exceeds this before an insert.
pub const DEFAULT_GROW_ABOVE_PERCENT: usize = 70;
/// Shrink when `count * 100 / capacity` falls below this before a remove.
pub const DEFAULT_SHRINK_BELOW_PERCENT: usize = 10;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TableConfig {
    /// Nominal capacity of a fresh table. Resizes never go below it.
    pub initial_base_capacity: usize,
    /// Insert grows the table when the load percentage is above this.
    pub grow_above_percent: usize,
    /// Remove shrinks the table when the load percentage is below this.
    pub shrink_below_percent: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_base_capacity: HT_INITIAL_BASE_SIZE,
            grow_above_percent: DEFAULT_GROW_ABOVE_PERCENT,
            shrink_below_percent: DEFAULT_SHRINK_BELOW_PERCENT,
        }
    }
}

impl TableConfig {
    pub fn with_base_capacity(initial_base_capacity: usize) -> Self {
        Self {
            initial_base_capacity,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), TableError> {
        if self.initial_base_capacity == 0 {
            return Err(TableError::InvalidConfig(
                "initial_base_capacity must be at least 1",
            ));
        }
        if !(1..=99).contains(&self.grow_above_percent) {
            return Err(TableError::InvalidConfig(
                "grow_above_percent must be within 1..=99",
            ));
        }
        if self.shrink_below_percent >= self.grow_above_percent {
            return Err(TableError::InvalidConfig(
                "shrink_below_percent must be below grow_above_percent",
            ));
        }
        Ok(())
    }
}
