//! Open-addressing string-keyed table with prime-sized growth.
//!
//! Keys are hashed with a shifting-base polynomial digest and collisions are
//! resolved by linear probing. Capacities always come from a
//! [`PrimeSequence`](crate::primes::PrimeSequence); the table rehashes into
//! the next prime before an insertion would push the load factor past the
//! configured limit (0.5 by default).
//!
//! Every probe is instrumented. [`ProbeTable::statistics`] returns a snapshot
//! of conflicts, total probe steps, the longest probe chain and the number of
//! rehashes accumulated over the table's whole lifetime.

mod config;
mod probe;
mod types;

pub use config::TableConfig;
pub use probe::ProbeTable;
pub use types::{Named, ProbeStats};
