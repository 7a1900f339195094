//! Market simulation configuration.

use std::ops::RangeInclusive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::names::{COMMODITY_NAMES, CONSUMER_NAMES, RESOURCE_NAMES, TRADER_NAMES};

/// Configuration for generating and running a [`MarketDay`](super::MarketDay).
///
/// Count ranges are inclusive and sampled once when the market is
/// generated. Every other range is sampled per entity.
///
/// The `u32` ranges (`stock`, `balance`, `budget_cost`, `budget_capacity`)
/// are in whole units: each draw is an integer, converted to `f64` on use.
/// Only `stock` receives a fractional part on top.
///
/// # Examples
///
/// ```
/// use u_allocore::market::MarketConfig;
///
/// let config = MarketConfig::default()
///     .with_consumers(3..=3)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MarketConfig {
    /// Number of distinct commodities.
    pub commodities: RangeInclusive<usize>,

    /// Number of resources.
    pub resources: RangeInclusive<usize>,

    /// Number of traders posting offers.
    pub traders: RangeInclusive<usize>,

    /// Number of consumers.
    pub consumers: RangeInclusive<usize>,

    /// Cost rates are drawn uniformly from `[0, max_cost_rate)`.
    pub max_cost_rate: f64,

    /// Whole part of a resource's starting stock; a uniform fraction is
    /// added on top.
    pub stock: RangeInclusive<u32>,

    /// Starting consumer balances, in whole units.
    pub balance: RangeInclusive<u32>,

    /// Daily budget price, in whole units.
    pub budget_cost: RangeInclusive<u32>,

    /// Daily budget capacity, in whole units.
    pub budget_capacity: RangeInclusive<u32>,

    /// Number of budgets offered to a consumer on a solo day.
    pub solo_budgets: RangeInclusive<usize>,

    /// Chance that a non-empty resource loses a random share of its stock at
    /// the end of a day instead of being restocked.
    pub depletion_chance: f64,

    /// Upper bound on the stock added to a resource at the end of a day.
    pub max_restock: f64,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            commodities: 5..=10,
            resources: 5..=10,
            traders: 4..=8,
            consumers: 2..=5,
            max_cost_rate: 30.0,
            stock: 1..=10,
            balance: 14..=40,
            budget_cost: 1..=50,
            budget_capacity: 1..=100,
            solo_budgets: 2..=5,
            depletion_chance: 0.2,
            max_restock: 10.0,
            seed: None,
        }
    }
}

impl MarketConfig {
    pub fn with_commodities(mut self, range: RangeInclusive<usize>) -> Self {
        self.commodities = range;
        self
    }

    pub fn with_resources(mut self, range: RangeInclusive<usize>) -> Self {
        self.resources = range;
        self
    }

    pub fn with_traders(mut self, range: RangeInclusive<usize>) -> Self {
        self.traders = range;
        self
    }

    pub fn with_consumers(mut self, range: RangeInclusive<usize>) -> Self {
        self.consumers = range;
        self
    }

    pub fn with_max_cost_rate(mut self, rate: f64) -> Self {
        self.max_cost_rate = rate;
        self
    }

    pub fn with_stock(mut self, range: RangeInclusive<u32>) -> Self {
        self.stock = range;
        self
    }

    pub fn with_balance(mut self, range: RangeInclusive<u32>) -> Self {
        self.balance = range;
        self
    }

    pub fn with_budget_cost(mut self, range: RangeInclusive<u32>) -> Self {
        self.budget_cost = range;
        self
    }

    pub fn with_budget_capacity(mut self, range: RangeInclusive<u32>) -> Self {
        self.budget_capacity = range;
        self
    }

    pub fn with_solo_budgets(mut self, range: RangeInclusive<usize>) -> Self {
        self.solo_budgets = range;
        self
    }

    pub fn with_depletion_chance(mut self, chance: f64) -> Self {
        self.depletion_chance = chance;
        self
    }

    pub fn with_max_restock(mut self, amount: f64) -> Self {
        self.max_restock = amount;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        check_count("commodities", &self.commodities, COMMODITY_NAMES.len())?;
        check_count("resources", &self.resources, RESOURCE_NAMES.len())?;
        check_count("traders", &self.traders, TRADER_NAMES.len())?;
        check_count("consumers", &self.consumers, CONSUMER_NAMES.len())?;
        if !(self.max_cost_rate.is_finite() && self.max_cost_rate > 0.0) {
            return Err(format!(
                "max_cost_rate must be positive, got {}",
                self.max_cost_rate
            ));
        }
        for (name, range) in [
            ("stock", &self.stock),
            ("balance", &self.balance),
            ("budget_cost", &self.budget_cost),
            ("budget_capacity", &self.budget_capacity),
        ] {
            if range.is_empty() {
                return Err(format!("{name} range is empty"));
            }
        }
        if *self.budget_capacity.start() == 0 {
            return Err("budget_capacity must start at 1 or above".into());
        }
        if self.solo_budgets.is_empty() || *self.solo_budgets.start() == 0 {
            return Err("solo_budgets range must be non-empty and start at 1 or above".into());
        }
        if !(0.0..=1.0).contains(&self.depletion_chance) {
            return Err(format!(
                "depletion_chance must be in [0, 1], got {}",
                self.depletion_chance
            ));
        }
        if !(self.max_restock.is_finite() && self.max_restock >= 0.0) {
            return Err(format!(
                "max_restock must be non-negative, got {}",
                self.max_restock
            ));
        }
        Ok(())
    }
}

fn check_count(name: &str, range: &RangeInclusive<usize>, pool: usize) -> Result<(), String> {
    if range.is_empty() || *range.start() == 0 {
        return Err(format!("{name} range must be non-empty and start at 1 or above"));
    }
    if *range.end() > pool {
        return Err(format!(
            "{name} range reaches {} but only {pool} unique names exist",
            range.end()
        ));
    }
    Ok(())
}
