//! Greedy per-round resource allocation.
//!
//! Each round every consumer may buy one [`ConsumptionBudget`], spend its
//! capacity extracting a commodity from one [`Resource`], and sell the haul at
//! the best [`ExchangeOffer`] for that commodity. The [`Allocator`]:
//!
//! 1. indexes the best price per commodity in a
//!    [`ProbeTable`](crate::table::ProbeTable),
//! 2. enumerates extraction options into a yield-ordered
//!    [`SortedAllocations`](crate::array::SortedAllocations),
//! 3. walks consumers in order, handing each the highest-yield option still
//!    available if it is affordable and profitable,
//! 4. re-validates the whole proposal from scratch and commits it atomically.
//!
//! A rejected proposal leaves the [`Economy`] exactly as it was.
//!
//! A single consumer can also plan alone with
//! [`Allocator::select_solo`]: given several budgets it fills each from the
//! resources with the best price per unit of capacity, possibly spanning
//! many resources, and keeps the most profitable one as a [`SoloProposal`].

mod config;
mod runner;
mod solo;
mod types;

pub use config::{AllocatorConfig, DEFAULT_EPSILON};
pub use runner::Allocator;
pub use types::{
    Assignment, Commodity, Consumer, ConsumerOutcome, ConsumptionBudget, Economy, ExchangeOffer,
    Resource, RoundProposal, SoloProposal,
};
