//! Seeded market simulation around the [`Allocator`](crate::alloc::Allocator).
//!
//! A market owns commodities, resources, consumers and [`Trader`]s. Each day
//! every trader posts one offer according to its [`DealStrategy`], a single
//! random budget is offered to all consumers, the allocator assigns and
//! commits the round, and resource stocks drift. On a solo day one consumer
//! instead chooses among several random budgets.
//!
//! Randomness is always explicit: generation functions take `&mut impl Rng`,
//! and [`MarketDay`] owns a `StdRng` seeded from [`MarketConfig::seed`].

mod config;
mod day;
mod generate;
mod names;
mod trader;

pub use config::MarketConfig;
pub use day::MarketDay;
pub use generate::{
    random_budget, random_budgets, random_commodities, random_consumers, random_resources,
    random_traders,
};
pub use trader::{DealStrategy, Trader, MIN_PRICE, PRICE_SPAN};
