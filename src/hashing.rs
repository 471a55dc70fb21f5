//! String hashing and the double-hash probe sequence.
//!
//! Every intermediate is reduced modulo the table capacity with `u128`
//! products, so the hash of an arbitrarily long key is well defined and
//! never overflows.

use crate::prime::{HT_PRIME_1, HT_PRIME_2};

/// `base^exp mod modulus` by binary exponentiation.
pub fn pow_mod(base: usize, mut exp: usize, modulus: usize) -> usize {
    debug_assert!(modulus > 0);
    let m = modulus as u128;
    let mut result = 1u128 % m;
    let mut b = base as u128 % m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * b % m;
        }
        b = b * b % m;
        exp >>= 1;
    }
    result as usize
}

/// Polynomial hash of `s` over `prime_base`, reduced modulo `modulus`:
/// `sum(s[i] * prime_base^(len - 1 - i)) mod modulus` over the UTF-8 bytes.
///
/// Panics if `modulus` is zero.
pub fn hash(s: &str, prime_base: usize, modulus: usize) -> usize {
    debug_assert!(modulus > 0);
    let bytes = s.as_bytes();
    let len = bytes.len();
    let m = modulus as u128;
    let mut acc = 0u128;
    for (i, &byte) in bytes.iter().enumerate() {
        let power = pow_mod(prime_base, len - (i + 1), modulus) as u128;
        acc = (acc + power * byte as u128) % m;
    }
    acc as usize
}

/// Step between successive probes: `hash_b + 1`, never a multiple of
/// `capacity`.
#[inline]
fn step_for(hash_b: usize, capacity: usize) -> usize {
    let step = hash_b + 1;
    if step >= capacity {
        1
    } else {
        step
    }
}

/// Slot index for the given `attempt`: `(hash_a + attempt * step) mod capacity`.
pub fn probe_index(key: &str, capacity: usize, attempt: usize) -> usize {
    let hash_a = hash(key, HT_PRIME_1, capacity);
    let hash_b = hash(key, HT_PRIME_2, capacity);
    let step = step_for(hash_b, capacity) as u128;
    ((hash_a as u128 + attempt as u128 * step) % capacity as u128) as usize
}

/// Probe sequence for one key. Both hashes are computed once; the iterator
/// yields exactly `capacity` indices, which for a prime capacity are all
/// distinct.
#[derive(Clone, Debug)]
pub struct ProbeSeq {
    next: usize,
    step: usize,
    capacity: usize,
    remaining: usize,
}

impl ProbeSeq {
    pub fn new(key: &str, capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        let hash_a = hash(key, HT_PRIME_1, capacity);
        let hash_b = hash(key, HT_PRIME_2, capacity);
        Self {
            next: hash_a,
            step: step_for(hash_b, capacity),
            capacity,
            remaining: capacity,
        }
    }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let idx = self.next;
        // idx < capacity and step < capacity, so the sum cannot overflow for
        // any capacity a Vec can hold.
        let advanced = idx + self.step;
        self.next = if advanced >= self.capacity {
            advanced - self.capacity
        } else {
            advanced
        };
        Some(idx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ProbeSeq {}
