//! Probe statistics and the name-keyed record trait.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Any record that can be stored under its own name.
///
/// Implemented by collaborator records so the table's `*_named`
/// convenience methods can derive the string key from the record itself.
pub trait Named {
    /// The key this record is stored under.
    fn name(&self) -> &str;
}

impl Named for str {
    fn name(&self) -> &str {
        self
    }
}

impl Named for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}

/// Lifetime probe instrumentation of a [`ProbeTable`](super::ProbeTable).
///
/// Counters are never reset, not even by a rehash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProbeStats {
    /// Insertions whose first probed slot was occupied by another key.
    /// Counted once per insertion, however long the chain.
    pub conflicts: usize,
    /// Probe steps taken across all insertions and lookups.
    pub total_probes: usize,
    /// Longest probe chain observed by any single operation.
    pub max_probe_chain: usize,
    /// Number of times the table was rebuilt into a larger capacity.
    pub rehashes: usize,
}

impl ProbeStats {
    pub(crate) fn record(&mut self, steps: usize, is_insert: bool) {
        if is_insert && steps > 0 {
            self.conflicts += 1;
        }
        self.total_probes += steps;
        self.max_probe_chain = self.max_probe_chain.max(steps);
    }
}
