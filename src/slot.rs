//! Slot states of the open-addressing array.

/// Owned key/value pair stored in an occupied slot.
#[derive(Debug, Eq, PartialEq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

impl Entry {
    pub fn new(key: String, value: String) -> Self {
        Self { key, value }
    }
}

/// One bucket of the table.
///
/// `Empty` ends a probe walk. `Tombstone` marks a slot that held an entry
/// which was removed: walks continue past it, and insert may reuse it.
#[derive(Debug, Default, Eq, PartialEq)]
pub enum Slot {
    #[default]
    Empty,
    Tombstone,
    Occupied(Entry),
}

impl Slot {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    #[inline]
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone)
    }

    #[inline]
    pub fn entry(&self) -> Option<&Entry> {
        match self {
            Slot::Occupied(e) => Some(e),
            _ => None,
        }
    }

    /// True if this slot holds an entry whose key equals `key`.
    #[inline]
    pub fn holds(&self, key: &str) -> bool {
        self.entry().map(|e| e.key == key).unwrap_or(false)
    }

    /// Replace an occupied slot with a tombstone, returning the entry.
    /// Empty slots and tombstones are left untouched.
    pub fn bury(&mut self) -> Option<Entry> {
        match core::mem::replace(self, Slot::Tombstone) {
            Slot::Occupied(e) => Some(e),
            other => {
                *self = other;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: burying an occupied slot yields its entry and leaves a tombstone.
    #[test]
    fn bury_occupied() {
        let mut s = Slot::Occupied(Entry::new("k".into(), "v".into()));
        assert!(s.holds("k"));
        let e = s.bury().expect("entry");
        assert_eq!(e.value, "v");
        assert!(s.is_tombstone());
        assert!(!s.holds("k"));
    }

    /// Invariant: burying an empty slot does not turn it into a tombstone.
    #[test]
    fn bury_empty_is_noop() {
        let mut s = Slot::Empty;
        assert!(s.bury().is_none());
        assert!(s.is_empty());

        let mut t = Slot::Tombstone;
        assert!(t.bury().is_none());
        assert!(t.is_tombstone());
    }
}
