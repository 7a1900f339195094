//! In-memory indexing structures and a greedy allocator for depleting
//! shared resources.
//!
//! - **RankedTree**: AVL tree with 1-indexed in-order rank window queries.
//! - **ProbeTable**: string-keyed linear-probe table whose capacities come
//!   from a descending prime search, with probe instrumentation.
//! - **PrimeSequence**: prime capacity generator with geometric bounds.
//! - **GrowableArray / SortedAllocations**: order-preserving arrays; the
//!   sorted variant keeps allocation options by yield and consumes them
//!   through multiplicity-aware removal.
//! - **Allocator**: per-round greedy assignment of consumers to the
//!   highest-yield options, re-validated and committed atomically.
//! - **Market**: a seeded day-by-day simulation driving the allocator.
//!
//! # Architecture
//!
//! Leaves first: `primes` feeds `table`; `tree` and `array` stand alone;
//! `alloc` composes `table` and `array`; `market` drives `alloc` and uses
//! `tree` for its traders. Nothing holds global state, and every random
//! choice goes through an RNG handle passed in by the caller.

pub mod alloc;
pub mod array;
pub mod error;
pub mod market;
pub mod primes;
pub mod table;
pub mod tree;

pub use error::{Error, Result, ValidationError};
