//! Index-addressable arrays with an explicit growth policy.
//!
//! - [`GrowableArray`]: fixed-capacity backing store plus a logical length;
//!   grows before an insertion that would overflow it.
//! - [`SortedAllocations`]: a [`GrowableArray`] of [`AllocationOption`]s
//!   kept in non-decreasing yield order, with multiplicity-aware removal.

mod growable;
mod sorted;

pub use growable::GrowableArray;
pub use sorted::{compare_with_epsilon, AllocationOption, SortedAllocations};
