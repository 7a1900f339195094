//! Prime capacity generation.
//!
//! [`PrimeSequence`] yields the largest prime strictly below a moving upper
//! bound. After each prime `p` the bound becomes `p * factor`, so a factor of
//! 2 produces roughly doubling prime capacities, which is what
//! [`ProbeTable`](crate::table::ProbeTable) uses to grow.

use crate::error::{Error, Result};

/// Returns `true` if `n` is prime, by trial division.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Stateful supplier of descending-then-rescaled primes.
///
/// # Examples
///
/// ```
/// use u_allocore::primes::PrimeSequence;
///
/// let mut seq = PrimeSequence::new(10, 2);
/// assert_eq!(seq.next_prime().unwrap(), 7);
/// assert_eq!(seq.next_prime().unwrap(), 13); // below 7 * 2
/// assert_eq!(seq.bound(), 26);
/// ```
#[derive(Debug, Clone)]
pub struct PrimeSequence {
    bound: usize,
    factor: usize,
}

impl PrimeSequence {
    /// Creates a sequence whose first prime will be below `bound`.
    pub fn new(bound: usize, factor: usize) -> Self {
        Self { bound, factor }
    }

    /// Bound in effect for the next call.
    pub fn bound(&self) -> usize {
        self.bound
    }

    /// Growth factor applied to each produced prime.
    pub fn factor(&self) -> usize {
        self.factor
    }

    /// Returns the largest prime strictly below the current bound and
    /// rescales the bound to `prime * factor`.
    ///
    /// Fails with [`Error::NoPrimeBelow`] when the bound is 2 or less; the
    /// sequence is left unchanged in that case.
    pub fn next_prime(&mut self) -> Result<usize> {
        if self.bound <= 2 {
            return Err(Error::NoPrimeBelow { bound: self.bound });
        }
        let mut candidate = self.bound - 1;
        while !is_prime(candidate) {
            candidate -= 1;
        }
        self.bound = candidate.saturating_mul(self.factor);
        Ok(candidate)
    }
}

impl Iterator for PrimeSequence {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        self.next_prime().ok()
    }
}
