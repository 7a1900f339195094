//! Traders and their deal strategies.

use std::cmp::Ordering;

use rand::seq::IndexedRandom;
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::alloc::{Commodity, ExchangeOffer};
use crate::array::GrowableArray;
use crate::error::Result;
use crate::table::Named;
use crate::tree::RankedTree;

/// Lowest price a trader will offer.
pub const MIN_PRICE: f64 = 2.0;

/// Width of the uniform price band above [`MIN_PRICE`].
pub const PRICE_SPAN: f64 = 8.0;

/// How a trader picks the commodity it buys each day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DealStrategy {
    /// Any commodity in the catalog, uniformly.
    Random,
    /// A random rank window over the catalog ordered by cost rate, then a
    /// uniform pick inside the window. Cheap-to-extract commodities are
    /// favoured.
    Ranged,
    /// The commodity with the highest cost rate.
    Hardest,
}

impl DealStrategy {
    pub const ALL: [DealStrategy; 3] = [Self::Random, Self::Ranged, Self::Hardest];
}

/// Total order over cost rates for indexing commodities in a [`RankedTree`].
#[derive(Debug, Clone, Copy)]
struct CostRate(f64);

impl PartialEq for CostRate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CostRate {}

impl PartialOrd for CostRate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CostRate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// An exchange participant holding at most one active offer.
#[derive(Debug, Clone)]
pub struct Trader {
    name: String,
    strategy: DealStrategy,
    catalog: GrowableArray<Commodity>,
    deal: Option<ExchangeOffer>,
}

impl Trader {
    pub fn new(name: impl Into<String>, strategy: DealStrategy) -> Self {
        Self {
            name: name.into(),
            strategy,
            catalog: GrowableArray::new(1),
            deal: None,
        }
    }

    pub fn strategy(&self) -> DealStrategy {
        self.strategy
    }

    /// Commodities this trader may buy.
    pub fn catalog(&self) -> impl Iterator<Item = &Commodity> + '_ {
        self.catalog.iter()
    }

    /// Replaces the catalog.
    pub fn set_commodities<T: IntoIterator<Item = Commodity>>(&mut self, commodities: T) {
        self.catalog = commodities.into_iter().collect();
    }

    pub fn add_commodity(&mut self, commodity: Commodity) {
        self.catalog.append(commodity);
    }

    /// Removes `commodity` from the catalog. Returns whether it was listed.
    pub fn remove_commodity(&mut self, commodity: &Commodity) -> bool {
        self.catalog.remove(commodity).is_some()
    }

    pub fn is_selling(&self) -> bool {
        self.deal.is_some()
    }

    pub fn current_deal(&self) -> Option<&ExchangeOffer> {
        self.deal.as_ref()
    }

    pub fn stop_deal(&mut self) {
        self.deal = None;
    }

    /// Replaces the active offer with a fresh one chosen by the trader's
    /// strategy. With an empty catalog the trader stops dealing.
    pub fn generate_deal<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Option<&ExchangeOffer>> {
        let commodity = match self.strategy {
            DealStrategy::Random => self.pick_random(rng),
            DealStrategy::Ranged => self.pick_ranged(rng)?,
            DealStrategy::Hardest => self.pick_hardest()?,
        }
        .cloned();

        self.deal = commodity.map(|commodity| ExchangeOffer {
            commodity,
            price: round_cents(MIN_PRICE + PRICE_SPAN * rng.random_range(0.0..1.0)),
        });
        Ok(self.deal.as_ref())
    }

    fn pick_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Commodity> {
        if self.catalog.is_empty() {
            return None;
        }
        self.catalog.get(rng.random_range(0..self.catalog.len()))
    }

    fn pick_ranged<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Option<&Commodity>> {
        let index = self.rate_index()?;
        let n = index.len();
        if n == 0 {
            return Ok(None);
        }
        let i = rng.random_range(1..=n);
        let j = rng.random_range(i..=n);
        Ok(index.range_between(i, j).choose(rng).map(|c| **c))
    }

    fn pick_hardest(&self) -> Result<Option<&Commodity>> {
        Ok(self.rate_index()?.last().map(|(_, c)| *c))
    }

    /// Catalog keyed by cost rate. On equal rates the first listed
    /// commodity wins.
    fn rate_index(&self) -> Result<RankedTree<CostRate, &Commodity>> {
        let mut index = RankedTree::new();
        for commodity in self.catalog.iter() {
            let rate = CostRate(commodity.cost_rate);
            if index.contains_key(&rate) {
                continue;
            }
            index.insert(rate, commodity)?;
        }
        Ok(index)
    }
}

impl Named for Trader {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Rounds to two decimal places, ties to even.
pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
