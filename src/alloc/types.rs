//! Round inputs and outputs.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::table::Named;

/// A tradeable material and what it costs to extract one unit of it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Commodity {
    pub name: String,
    /// Budget capacity consumed per unit extracted.
    pub cost_rate: f64,
}

impl Commodity {
    pub fn new(name: impl Into<String>, cost_rate: f64) -> Self {
        Self {
            name: name.into(),
            cost_rate,
        }
    }
}

impl Named for Commodity {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A depletable stock of one commodity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Resource {
    pub name: String,
    pub commodity: Commodity,
    pub stock: f64,
}

impl Resource {
    pub fn new(name: impl Into<String>, commodity: Commodity, stock: f64) -> Self {
        Self {
            name: name.into(),
            commodity,
            stock,
        }
    }

    pub fn commodity(&self) -> &Commodity {
        &self.commodity
    }

    pub fn stock(&self) -> f64 {
        self.stock
    }

    pub fn remove_stock(&mut self, amount: f64) {
        self.stock -= amount;
    }

    pub fn add_stock(&mut self, amount: f64) {
        self.stock += amount;
    }
}

impl Named for Resource {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A purchasable grant of extraction capacity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConsumptionBudget {
    pub name: String,
    /// Capacity granted; extracting `q` units of a commodity uses
    /// `q * cost_rate` of it.
    pub capacity: f64,
    /// Price paid out of the consumer's balance.
    pub cost: f64,
}

impl ConsumptionBudget {
    pub fn new(name: impl Into<String>, capacity: f64, cost: f64) -> Self {
        Self {
            name: name.into(),
            capacity,
            cost,
        }
    }
}

impl Named for ConsumptionBudget {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A standing offer to buy one commodity at a price per unit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExchangeOffer {
    pub commodity: Commodity,
    pub price: f64,
}

/// An actor with a balance who may buy a budget and extract.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Consumer {
    pub name: String,
    pub balance: f64,
}

impl Consumer {
    pub fn new(name: impl Into<String>, balance: f64) -> Self {
        Self {
            name: name.into(),
            balance,
        }
    }
}

impl Named for Consumer {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Shared mutable state of the allocation rounds.
///
/// Only [`Allocator::validate_and_commit`](super::Allocator::validate_and_commit)
/// and [`Allocator::validate_and_commit_solo`](super::Allocator::validate_and_commit_solo)
/// mutate balances and stocks.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Economy {
    pub resources: Vec<Resource>,
    /// Processed in this order every round.
    pub consumers: Vec<Consumer>,
    /// At most one active offer per exchange participant.
    pub offers: Vec<ExchangeOffer>,
}

/// Extraction granted to one consumer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assignment {
    /// Index into [`Economy::resources`].
    pub resource: usize,
    pub quantity: f64,
}

/// What one consumer does in a round.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConsumerOutcome {
    /// Whether the consumer bought the round's budget.
    pub purchased: bool,
    /// Balance after buying, extracting and selling.
    pub balance: f64,
    pub assignment: Option<Assignment>,
}

impl ConsumerOutcome {
    /// The consumer sits the round out.
    pub fn idle(balance: f64) -> Self {
        Self {
            purchased: false,
            balance,
            assignment: None,
        }
    }
}

/// A full round's assignment, awaiting validation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoundProposal {
    pub budget: ConsumptionBudget,
    /// One entry per consumer, in consumer order.
    pub outcomes: Vec<ConsumerOutcome>,
}

impl RoundProposal {
    /// Number of consumers that were granted an extraction.
    pub fn assigned_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.assignment.is_some())
            .count()
    }
}

/// A single consumer's plan for one day: at most one budget, spread over
/// as many resources as its capacity reaches.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SoloProposal {
    /// Index into [`Economy::consumers`].
    pub consumer: usize,
    /// The budget bought, if any.
    pub budget: Option<ConsumptionBudget>,
    /// Balance after buying, extracting and selling.
    pub balance: f64,
    /// Extractions in the order they fill the budget.
    pub extractions: Vec<Assignment>,
}

impl SoloProposal {
    /// The consumer buys nothing.
    pub fn idle(consumer: usize, balance: f64) -> Self {
        Self {
            consumer,
            budget: None,
            balance,
            extractions: Vec::new(),
        }
    }
}
