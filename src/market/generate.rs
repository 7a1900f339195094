//! Random entity generation.
//!
//! Every function draws from the caller's RNG, so a seeded generator
//! reproduces the same market.

use rand::seq::IndexedRandom;
use rand::Rng;

use super::config::MarketConfig;
use super::names::{BUDGET_NAMES, COMMODITY_NAMES, CONSUMER_NAMES, RESOURCE_NAMES, TRADER_NAMES};
use super::trader::{DealStrategy, Trader};
use crate::alloc::{Commodity, Consumer, ConsumptionBudget, Resource};
use crate::error::{Error, Result};

/// Picks `count` distinct names from `pool`.
fn distinct_names<R: Rng + ?Sized>(
    rng: &mut R,
    pool: &[&str],
    count: usize,
    what: &str,
) -> Result<Vec<String>> {
    if count > pool.len() {
        return Err(Error::InvalidConfig(format!(
            "cannot pick {count} unique {what} names from a pool of {}",
            pool.len()
        )));
    }
    Ok(pool
        .choose_multiple(rng, count)
        .map(|name| name.to_string())
        .collect())
}

/// `count` commodities with distinct names and distinct cost rates drawn
/// from `[0, max_cost_rate)`.
pub fn random_commodities<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    config: &MarketConfig,
) -> Result<Vec<Commodity>> {
    let names = distinct_names(rng, COMMODITY_NAMES, count, "commodity")?;
    let mut rates: Vec<f64> = Vec::with_capacity(count);
    while rates.len() < count {
        let rate = rng.random_range(0.0..1.0) * config.max_cost_rate;
        if !rates.contains(&rate) {
            rates.push(rate);
        }
    }
    Ok(names
        .into_iter()
        .zip(rates)
        .map(|(name, rate)| Commodity::new(name, rate))
        .collect())
}

/// `count` uniquely named resources, each holding a random commodity.
pub fn random_resources<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    commodities: &[Commodity],
    config: &MarketConfig,
) -> Result<Vec<Resource>> {
    if commodities.is_empty() {
        return Err(Error::InvalidConfig(
            "resources need at least one commodity".into(),
        ));
    }
    let names = distinct_names(rng, RESOURCE_NAMES, count, "resource")?;
    let mut resources = Vec::with_capacity(count);
    for name in names {
        let commodity = commodities
            .choose(rng)
            .cloned()
            .ok_or_else(|| Error::InvalidConfig("no commodity to choose".into()))?;
        let stock = f64::from(rng.random_range(config.stock.clone())) + rng.random_range(0.0..1.0);
        resources.push(Resource::new(name, commodity, stock));
    }
    Ok(resources)
}

/// `count` uniquely named traders with random strategies.
///
/// Each trader's catalog is a contiguous slice `[lo, hi)` of `commodities`
/// where `lo` is at most half the list and `hi > lo`.
pub fn random_traders<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    commodities: &[Commodity],
) -> Result<Vec<Trader>> {
    let n = commodities.len();
    if n == 0 {
        return Err(Error::InvalidConfig("traders need at least one commodity".into()));
    }
    let names = distinct_names(rng, TRADER_NAMES, count, "trader")?;
    let mut traders = Vec::with_capacity(count);
    for name in names {
        let strategy = DealStrategy::ALL[rng.random_range(0..DealStrategy::ALL.len())];
        let lo = rng.random_range(0..=n / 2);
        let hi = rng.random_range(lo + 1..=n);
        let mut trader = Trader::new(name, strategy);
        trader.set_commodities(commodities[lo..hi].iter().cloned());
        traders.push(trader);
    }
    Ok(traders)
}

/// `count` uniquely named consumers with random starting balances.
pub fn random_consumers<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    config: &MarketConfig,
) -> Result<Vec<Consumer>> {
    let names = distinct_names(rng, CONSUMER_NAMES, count, "consumer")?;
    Ok(names
        .into_iter()
        .map(|name| Consumer::new(name, f64::from(rng.random_range(config.balance.clone()))))
        .collect())
}

/// The single budget offered to every consumer on one day.
pub fn random_budget<R: Rng + ?Sized>(rng: &mut R, config: &MarketConfig) -> ConsumptionBudget {
    let name = BUDGET_NAMES
        .choose(rng)
        .map_or_else(String::new, |name| name.to_string());
    let cost = f64::from(rng.random_range(config.budget_cost.clone()));
    let capacity = f64::from(rng.random_range(config.budget_capacity.clone()));
    ConsumptionBudget::new(name, capacity, cost)
}

/// The budgets offered to a lone consumer on a solo day; how many is drawn
/// from `config.solo_budgets`.
pub fn random_budgets<R: Rng + ?Sized>(
    rng: &mut R,
    config: &MarketConfig,
) -> Vec<ConsumptionBudget> {
    let count = rng.random_range(config.solo_budgets.clone());
    (0..count).map(|_| random_budget(rng, config)).collect()
}
