//! HashTable: open-addressing string map with double hashing, tombstones and
//! load-driven resizing.

use crate::config::{TableConfig, HT_INITIAL_BASE_SIZE};
use crate::error::TableError;
use crate::hashing::ProbeSeq;
use crate::prime::next_prime;
use crate::slot::{Entry, Slot};
use log::{debug, trace, warn};

/// Outcome of walking a key's probe sequence for insertion.
enum Probe {
    /// Slot holding an entry with the same key.
    Found(usize),
    /// First reusable slot: the earliest tombstone seen, else the empty slot
    /// that ended the walk.
    Vacant(usize),
    /// Neither a match nor a free slot on the whole sequence.
    Exhausted,
}

/// Point-in-time counters of a table.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TableStats {
    pub count: usize,
    pub capacity: usize,
    pub base_capacity: usize,
    pub tombstones: usize,
    /// `count * 100 / capacity`, the figure resize decisions use.
    pub load_percent: usize,
}

pub struct HashTable {
    slots: Vec<Slot>,
    count: usize,
    base_capacity: usize,
    tombstones: usize,
    config: TableConfig,
}

fn alloc_slots(base_capacity: usize) -> Result<Vec<Slot>, TableError> {
    let capacity = next_prime(base_capacity).ok_or(TableError::CapacityOverflow)?;
    let mut slots = Vec::new();
    slots.try_reserve_exact(capacity)?;
    slots.resize_with(capacity, Slot::default);
    Ok(slots)
}

fn probe(slots: &[Slot], key: &str) -> Probe {
    let mut first_tombstone = None;
    for idx in ProbeSeq::new(key, slots.len()) {
        match &slots[idx] {
            Slot::Empty => return Probe::Vacant(first_tombstone.unwrap_or(idx)),
            Slot::Tombstone => {
                first_tombstone.get_or_insert(idx);
            }
            Slot::Occupied(e) if e.key == key => return Probe::Found(idx),
            Slot::Occupied(_) => {}
        }
    }
    match first_tombstone {
        Some(idx) => Probe::Vacant(idx),
        None => Probe::Exhausted,
    }
}

impl HashTable {
    /// Empty table at the default base capacity (53).
    ///
    /// Like std collections, aborts if the initial allocation fails; use
    /// [`HashTable::with_config`] to observe allocation errors.
    pub fn new() -> Self {
        let config = TableConfig::default();
        let capacity = next_prime(HT_INITIAL_BASE_SIZE).unwrap_or(HT_INITIAL_BASE_SIZE);
        Self {
            slots: (0..capacity).map(|_| Slot::Empty).collect(),
            count: 0,
            base_capacity: HT_INITIAL_BASE_SIZE,
            tombstones: 0,
            config,
        }
    }

    /// Empty table whose capacity is `next_prime(base_capacity)`. The table
    /// never shrinks below this base.
    pub fn with_base_capacity(base_capacity: usize) -> Result<Self, TableError> {
        Self::with_config(TableConfig::with_base_capacity(base_capacity))
    }

    pub fn with_config(config: TableConfig) -> Result<Self, TableError> {
        config.validate()?;
        let slots = alloc_slots(config.initial_base_capacity)?;
        Ok(Self {
            slots,
            count: 0,
            base_capacity: config.initial_base_capacity,
            tombstones: 0,
            config,
        })
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Length of the slot array; always prime.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Nominal capacity the slot array was rounded up from.
    pub fn base_capacity(&self) -> usize {
        self.base_capacity
    }

    /// Integer load percentage used by the resize triggers.
    pub fn load_percent(&self) -> usize {
        self.count * 100 / self.slots.len()
    }

    pub fn stats(&self) -> TableStats {
        TableStats {
            count: self.count,
            capacity: self.capacity(),
            base_capacity: self.base_capacity,
            tombstones: self.tombstones,
            load_percent: self.load_percent(),
        }
    }

    fn find_index(&self, key: &str) -> Option<usize> {
        for idx in ProbeSeq::new(key, self.slots.len()) {
            match &self.slots[idx] {
                Slot::Empty => return None,
                Slot::Occupied(e) if e.key == key => return Some(idx),
                _ => {}
            }
        }
        None
    }

    /// Value stored under `key`. Never resizes.
    pub fn get(&self, key: &str) -> Option<&str> {
        let idx = self.find_index(key)?;
        self.slots[idx].entry().map(|e| e.value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find_index(key).is_some()
    }

    /// Insert or overwrite. Returns the previous value for `key`, if any.
    ///
    /// Grows the table first when the load is above the configured
    /// threshold.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Result<Option<String>, TableError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        if self.load_percent() > self.config.grow_above_percent {
            let grown = self.grown_base()?;
            self.resize(grown)?;
        }

        let key = key.into();
        match probe(&self.slots, &key) {
            Probe::Found(idx) => {
                let new = Slot::Occupied(Entry::new(key, value.into()));
                match core::mem::replace(&mut self.slots[idx], new) {
                    Slot::Occupied(old) => Ok(Some(old.value)),
                    _ => Ok(None),
                }
            }
            Probe::Vacant(idx) => {
                if self.slots[idx].is_tombstone() {
                    self.tombstones -= 1;
                }
                self.slots[idx] = Slot::Occupied(Entry::new(key, value.into()));
                self.count += 1;
                Ok(None)
            }
            Probe::Exhausted => {
                warn!(
                    "insert exhausted probe sequence: capacity={} count={}",
                    self.capacity(),
                    self.count
                );
                Err(TableError::NoFreeSlot {
                    capacity: self.capacity(),
                })
            }
        }
    }

    /// Remove `key`, returning its value if it was present.
    ///
    /// Shrinks the table first when the load is below the configured
    /// threshold. `len()` only drops when an entry was actually removed.
    pub fn remove(&mut self, key: &str) -> Result<Option<String>, TableError> {
        if self.load_percent() < self.config.shrink_below_percent {
            self.resize(self.base_capacity / 2)?;
        }

        let mut removed = None;
        for idx in ProbeSeq::new(key, self.slots.len()) {
            let slot = &mut self.slots[idx];
            if slot.is_empty() {
                break;
            }
            if !slot.holds(key) {
                continue;
            }
            if let Some(entry) = slot.bury() {
                self.count -= 1;
                self.tombstones += 1;
                removed = Some(entry.value);
            }
        }
        Ok(removed)
    }

    /// Drop every entry and tombstone; capacity is kept.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.count = 0;
        self.tombstones = 0;
    }

    /// Doubled base capacity, doubled again until it rounds to a prime above
    /// the current capacity. Base 1 doubles to 2, which is still capacity 2.
    fn grown_base(&self) -> Result<usize, TableError> {
        let mut base = self.base_capacity;
        loop {
            base = base.checked_mul(2).ok_or(TableError::CapacityOverflow)?;
            let capacity = next_prime(base).ok_or(TableError::CapacityOverflow)?;
            if capacity > self.capacity() {
                return Ok(base);
            }
        }
    }

    /// Rebuild into `next_prime(base_capacity)` slots, dropping tombstones.
    /// Requests below the configured initial base are ignored.
    pub(crate) fn resize(&mut self, base_capacity: usize) -> Result<(), TableError> {
        if base_capacity < self.config.initial_base_capacity {
            trace!(
                "resize to base {} skipped: below minimum base {}",
                base_capacity,
                self.config.initial_base_capacity
            );
            return Ok(());
        }
        let mut fresh = alloc_slots(base_capacity)?;
        if self.count >= fresh.len() {
            trace!(
                "resize to capacity {} skipped: {} entries would not fit",
                fresh.len(),
                self.count
            );
            return Ok(());
        }

        for slot in core::mem::take(&mut self.slots) {
            if let Slot::Occupied(entry) = slot {
                // Keys are unique and the fresh array has an empty slot left,
                // so a full-coverage probe sequence always finds one.
                let idx = ProbeSeq::new(&entry.key, fresh.len())
                    .find(|&i| fresh[i].is_empty());
                match idx {
                    Some(i) => fresh[i] = Slot::Occupied(entry),
                    None => unreachable!("rehash target has fewer entries than slots"),
                }
            }
        }

        debug!(
            "resized: base {} -> {}, capacity -> {}, count={}, dropped tombstones={}",
            self.base_capacity,
            base_capacity,
            fresh.len(),
            self.count,
            self.tombstones
        );
        self.slots = fresh;
        self.base_capacity = base_capacity;
        self.tombstones = 0;
        Ok(())
    }

    /// Iterate over `(key, value)` pairs in slot order (unspecified).
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            it: self.slots.iter(),
            remaining: self.count,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Structural invariants, checked by tests after every operation.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        use std::collections::BTreeSet;

        assert_eq!(Some(self.capacity()), next_prime(self.base_capacity));
        assert!(self.count <= self.capacity());
        let occupied = self.slots.iter().filter(|s| s.entry().is_some()).count();
        let buried = self.slots.iter().filter(|s| s.is_tombstone()).count();
        assert_eq!(occupied, self.count, "count drifted from occupied slots");
        assert_eq!(buried, self.tombstones, "tombstone counter drifted");

        let mut keys = BTreeSet::new();
        for (idx, slot) in self.slots.iter().enumerate() {
            if let Some(e) = slot.entry() {
                assert!(keys.insert(e.key.clone()), "duplicate key {:?}", e.key);
                assert_eq!(self.find_index(&e.key), Some(idx), "unreachable {:?}", e.key);
            }
        }
    }
}

impl Default for HashTable {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for HashTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over entries of a `HashTable`.
pub struct Iter<'a> {
    it: core::slice::Iter<'a, Slot>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.it.by_ref() {
            if let Slot::Occupied(e) = slot {
                self.remaining -= 1;
                return Some((e.key.as_str(), e.value.as_str()));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a HashTable {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// Invariant: the driver scenario leaves three entries with the latest values.
    #[test]
    fn driver_scenario() {
        let mut t = HashTable::new();
        t.insert("code", "forces").unwrap();
        t.insert("name", "sankalp").unwrap();
        t.insert("dept", "ECE").unwrap();
        t.insert("dept", "ECE").unwrap();
        assert_eq!(t.len(), 3);
        assert_eq!(t.get("code"), Some("forces"));

        let prev = t.insert("name", "sank").unwrap();
        assert_eq!(prev.as_deref(), Some("sankalp"));
        assert_eq!(t.get("name"), Some("sank"));
        assert_eq!(t.len(), 3);
        t.check_invariants();
    }

    /// Invariant: a fresh table has prime capacity 53 and no entries.
    #[test]
    fn new_table_shape() {
        let t = HashTable::new();
        assert_eq!(t.capacity(), 53);
        assert_eq!(t.base_capacity(), 53);
        assert!(t.is_empty());
        assert_eq!(t.get("missing"), None);
        t.check_invariants();
    }

    /// Invariant: a requested base capacity is rounded up to the next prime.
    #[test]
    fn custom_base_rounds_to_prime() {
        let t = HashTable::with_base_capacity(100).unwrap();
        assert_eq!(t.capacity(), 101);
        assert_eq!(t.base_capacity(), 100);
        t.check_invariants();
    }

    /// Invariant: an insert into a tombstone that precedes the key's live slot
    /// must not create a duplicate; the walk continues past tombstones.
    #[test]
    fn tombstone_does_not_shadow_later_key() {
        let mut t = HashTable::new();
        let cap = t.capacity();
        // Find two keys whose probe sequences start at the same slot.
        let target = ProbeSeq::new("k0", cap).next().unwrap();
        let mut colliding = vec!["k0".to_string()];
        let mut i = 1;
        while colliding.len() < 2 {
            let k = format!("k{}", i);
            if ProbeSeq::new(&k, cap).next() == Some(target) {
                colliding.push(k);
            }
            i += 1;
        }
        let (a, b) = (&colliding[0], &colliding[1]);
        t.insert(a.as_str(), "a").unwrap();
        t.insert(b.as_str(), "b").unwrap();
        assert_eq!(t.remove(a).unwrap().as_deref(), Some("a"));
        assert_eq!(t.stats().tombstones, 1);

        // b sits after a's tombstone; overwriting b must find it, not reuse
        // the tombstone.
        let prev = t.insert(b.as_str(), "b2").unwrap();
        assert_eq!(prev.as_deref(), Some("b"));
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(b), Some("b2"));
        assert_eq!(t.stats().tombstones, 1);
        t.check_invariants();

        // A brand-new key reuses the tombstone.
        t.insert(a.as_str(), "again").unwrap();
        assert_eq!(t.stats().tombstones, 0);
        assert_eq!(t.get(a), Some("again"));
        t.check_invariants();
    }

    /// Invariant: removing an absent key returns `None` and leaves `len()`
    /// unchanged. Deliberate departure from decrementing unconditionally.
    #[test]
    fn remove_absent_key_keeps_count() {
        let mut t = HashTable::new();
        t.insert("a", "1").unwrap();
        t.insert("b", "2").unwrap();
        assert_eq!(t.remove("zzz").unwrap(), None);
        assert_eq!(t.len(), 2);
        assert_eq!(t.remove("a").unwrap().as_deref(), Some("1"));
        assert_eq!(t.remove("a").unwrap(), None);
        assert_eq!(t.len(), 1);
        t.check_invariants();
    }

    /// Invariant: growth happens before the insert that observes load > 70%.
    #[test]
    fn grows_past_seventy_percent() {
        let mut t = HashTable::new();
        // 38 * 100 / 53 = 71 > 70, so the 39th insert grows the table.
        for i in 0..38 {
            t.insert(format!("key{}", i), "v").unwrap();
        }
        assert_eq!(t.capacity(), 53);
        assert_eq!(t.load_percent(), 71);
        t.insert("key38", "v").unwrap();
        assert_eq!(t.base_capacity(), 106);
        assert_eq!(t.capacity(), 107);
        for i in 0..39 {
            assert_eq!(t.get(&format!("key{}", i)), Some("v"));
        }
        t.check_invariants();
    }

    /// Invariant: resize drops tombstones and keeps every live entry reachable.
    #[test]
    fn resize_drops_tombstones() {
        let mut t = HashTable::new();
        for i in 0..30 {
            t.insert(format!("k{}", i), format!("v{}", i)).unwrap();
        }
        for i in 0..10 {
            t.remove(&format!("k{}", i)).unwrap();
        }
        assert_eq!(t.stats().tombstones, 10);
        t.resize(200).unwrap();
        assert_eq!(t.capacity(), 211);
        assert_eq!(t.stats().tombstones, 0);
        assert_eq!(t.len(), 20);
        for i in 10..30 {
            assert_eq!(t.get(&format!("k{}", i)), Some(format!("v{}", i).as_str()));
        }
        t.check_invariants();
    }

    /// Invariant: resize below the minimum base is a silent no-op.
    #[test]
    fn resize_below_minimum_is_noop() {
        let mut t = HashTable::new();
        t.insert("a", "1").unwrap();
        t.resize(26).unwrap();
        assert_eq!(t.capacity(), 53);
        assert_eq!(t.base_capacity(), 53);
        assert_eq!(t.get("a"), Some("1"));
    }

    /// Invariant: shrinking after growth returns toward, but never below, base 53.
    #[test]
    fn shrinks_to_floor() {
        let mut t = HashTable::new();
        for i in 0..200 {
            t.insert(format!("k{}", i), "v").unwrap();
        }
        let grown = t.capacity();
        assert!(grown > 53);
        for i in 0..200 {
            assert_eq!(t.remove(&format!("k{}", i)).unwrap().as_deref(), Some("v"));
            t.check_invariants();
        }
        assert!(t.is_empty());
        assert!(t.capacity() < grown);
        assert_eq!(t.base_capacity(), 53);
        assert_eq!(t.capacity(), 53);
    }

    /// Invariant: a tiny table with a degenerate step still probes every slot.
    #[test]
    fn capacity_two_table() {
        let cfg = TableConfig {
            initial_base_capacity: 2,
            grow_above_percent: 99,
            shrink_below_percent: 0,
        };
        let mut t = HashTable::with_config(cfg).unwrap();
        assert_eq!(t.capacity(), 2);
        t.insert("x", "1").unwrap();
        t.insert("y", "2").unwrap();
        assert_eq!(t.capacity(), 2);
        assert_eq!(t.get("x"), Some("1"));
        assert_eq!(t.get("y"), Some("2"));
        // Full table: misses terminate instead of spinning.
        assert_eq!(t.get("z"), None);
        // Load 100 > 99, so the table grows before placing z.
        t.insert("z", "3").unwrap();
        assert_eq!(t.capacity(), 5);
        t.check_invariants();
    }

    /// Invariant: a base of 1 still grows; doubling skips bases that round
    /// to the current capacity.
    #[test]
    fn base_one_keeps_growing() {
        let mut t = HashTable::with_base_capacity(1).unwrap();
        assert_eq!(t.capacity(), 2);
        for i in 0..20 {
            assert_eq!(t.insert(format!("k{}", i), "v").unwrap(), None);
            t.check_invariants();
        }
        assert_eq!(t.len(), 20);
        assert!(t.capacity() > 20);
        // 1 -> 4 (not 2, which is still capacity 2) -> 8 -> 16 -> 32.
        assert_eq!(t.base_capacity(), 32);
        for i in 0..20 {
            assert_eq!(t.get(&format!("k{}", i)), Some("v"));
        }
    }

    /// Invariant: `iter` yields each live entry exactly once; `clear` empties.
    #[test]
    fn iter_and_clear() {
        let mut t = HashTable::new();
        for k in ["a", "b", "c"] {
            t.insert(k, k.to_uppercase()).unwrap();
        }
        t.remove("b").unwrap();
        let seen: BTreeSet<(String, String)> = t
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let expected: BTreeSet<(String, String)> = [("a", "A"), ("c", "C")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(seen, expected);
        assert_eq!(t.iter().len(), 2);
        assert_eq!(t.keys().count(), 2);
        assert!(t.values().all(|v| v == "A" || v == "C"));

        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.stats().tombstones, 0);
        assert_eq!(t.iter().next(), None);
        t.check_invariants();
    }

    /// Invariant: invalid configurations are rejected at construction.
    #[test]
    fn with_config_validates() {
        assert!(matches!(
            HashTable::with_base_capacity(0),
            Err(TableError::InvalidConfig(_))
        ));
    }
}
