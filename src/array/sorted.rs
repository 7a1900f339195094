//! Yield-ordered allocation options.

use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::growable::GrowableArray;
use crate::error::{Error, Result};

/// Three-way comparison treating values closer than `epsilon` as equal.
pub fn compare_with_epsilon(a: f64, b: f64, epsilon: f64) -> Ordering {
    if (a - b).abs() < epsilon {
        Ordering::Equal
    } else if a < b {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

/// One way of extracting from a resource during a round.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AllocationOption {
    /// Index of the resource within the round's resource slice.
    pub resource: usize,
    /// Units extracted by whoever claims this option.
    pub quantity: f64,
    /// `price * quantity`.
    pub yield_value: f64,
    /// Consumers that may still claim this exact quantity and yield.
    pub multiplicity: usize,
}

/// [`AllocationOption`]s kept in non-decreasing yield order.
///
/// Consumers always claim from the tail (highest yield), so draining the
/// array through [`claim_best`](Self::claim_best) never shifts elements.
///
/// # Examples
///
/// ```
/// use u_allocore::array::{AllocationOption, SortedAllocations};
///
/// let mut options = SortedAllocations::new(2, 1e-6);
/// options.add(AllocationOption { resource: 0, quantity: 4.0, yield_value: 39.12, multiplicity: 1 }).unwrap();
/// options.add(AllocationOption { resource: 1, quantity: 15.5, yield_value: 119.8, multiplicity: 2 }).unwrap();
///
/// assert_eq!(options.best().map(|o| o.resource), Some(1));
/// assert!(options.claim_best().unwrap().is_none()); // 2 -> 1, kept
/// assert!(options.claim_best().unwrap().is_some()); // 1 -> 0, removed
/// assert_eq!(options.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SortedAllocations {
    entries: GrowableArray<AllocationOption>,
    epsilon: f64,
}

impl SortedAllocations {
    /// Creates an empty array with room for `capacity` options.
    pub fn new(capacity: usize, epsilon: f64) -> Self {
        Self {
            entries: GrowableArray::new(capacity),
            epsilon,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AllocationOption> {
        self.entries.get(index)
    }

    /// Highest-yield option.
    pub fn best(&self) -> Option<&AllocationOption> {
        self.entries.last()
    }

    /// Options in ascending yield order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &AllocationOption> + '_ {
        self.entries.iter()
    }

    /// Inserts `option` before the first entry whose yield is not less than
    /// its own (within epsilon).
    pub fn add(&mut self, option: AllocationOption) -> Result<()> {
        let position = self.insertion_point(option.yield_value);
        self.entries.insert(position, option)
    }

    /// Uses up one claim of the option at `index`.
    ///
    /// The multiplicity is decremented. Once it reaches zero the option is
    /// removed and returned; otherwise it stays in place and `None` is
    /// returned.
    pub fn delete_at_index(&mut self, index: usize) -> Result<Option<AllocationOption>> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(Error::OutOfBounds { index, len })?;
        entry.multiplicity = entry.multiplicity.saturating_sub(1);
        if entry.multiplicity > 0 {
            return Ok(None);
        }
        self.entries.delete_at_index(index).map(Some)
    }

    /// [`delete_at_index`](Self::delete_at_index) on the tail entry.
    pub fn claim_best(&mut self) -> Result<Option<AllocationOption>> {
        let len = self.entries.len();
        match len.checked_sub(1) {
            Some(last) => self.delete_at_index(last),
            None => Err(Error::OutOfBounds { index: 0, len }),
        }
    }

    /// Binary search for the first position whose yield is not less than
    /// `yield_value`.
    fn insertion_point(&self, yield_value: f64) -> usize {
        let mut low = 0;
        let mut high = self.entries.len();
        while low < high {
            let mid = low + (high - low) / 2;
            let at_mid = self.entries.get(mid).map_or(f64::INFINITY, |e| e.yield_value);
            if compare_with_epsilon(at_mid, yield_value, self.epsilon) == Ordering::Less {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        low
    }
}
