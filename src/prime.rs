//! Prime sizing helpers for the slot array.
//!
//! Double hashing only reaches every slot when the step is coprime to the
//! table length, so the table length is always prime.

/// First hash base. Larger than the printable ASCII range.
pub const HT_PRIME_1: usize = 151;
/// Second hash base, distinct from `HT_PRIME_1`.
pub const HT_PRIME_2: usize = 163;

/// Result of a primality test. Values below 2 are neither prime nor composite.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Primality {
    Undefined,
    Prime,
    Composite,
}

impl Primality {
    #[inline]
    pub fn is_prime(self) -> bool {
        matches!(self, Primality::Prime)
    }
}

/// Trial division up to `sqrt(n)`.
pub fn is_prime(n: usize) -> Primality {
    if n < 2 {
        return Primality::Undefined;
    }
    if n < 4 {
        return Primality::Prime;
    }
    if n % 2 == 0 {
        return Primality::Composite;
    }
    let mut d = 3usize;
    // d <= n / d avoids squaring d near usize::MAX.
    while d <= n / d {
        if n % d == 0 {
            return Primality::Composite;
        }
        d += 2;
    }
    Primality::Prime
}

/// Smallest prime `>= n`, or `None` if it does not fit in `usize`.
pub fn next_prime(n: usize) -> Option<usize> {
    let mut candidate = n.max(2);
    loop {
        if is_prime(candidate).is_prime() {
            return Some(candidate);
        }
        candidate = candidate.checked_add(1)?;
    }
}
