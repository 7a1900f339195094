//! Single-consumer planning over several offered budgets.
//!
//! A lone consumer may spread one budget across many resources. Resources
//! are ranked by sale price per unit of capacity, each offered budget is
//! filled from the best-ranked resource down, and the budget with the
//! highest profit wins.

use tracing::{debug, trace, warn};

use super::runner::Allocator;
use super::types::{Assignment, ConsumptionBudget, Economy, SoloProposal};
use crate::array::{AllocationOption, SortedAllocations};
use crate::error::{Error, Result, ValidationError};

impl Allocator {
    /// Resources with an active offer, ranked by `price / cost_rate`.
    ///
    /// The option's `yield_value` carries that efficiency and `quantity` the
    /// resource's current stock. Best-ranked resources sit at the tail.
    pub fn rank_by_efficiency(&self, economy: &Economy) -> Result<SortedAllocations> {
        let rates = self.best_rates(&economy.offers)?;
        let mut ranking = SortedAllocations::new(economy.resources.len(), self.config().epsilon);
        for (index, resource) in economy.resources.iter().enumerate() {
            let Some(&price) = rates.lookup_named(&resource.commodity) else {
                continue;
            };
            ranking.add(AllocationOption {
                resource: index,
                quantity: resource.stock,
                yield_value: price / resource.commodity.cost_rate,
                multiplicity: 1,
            })?;
        }
        Ok(ranking)
    }

    /// Chooses the most profitable of `budgets` for `consumer`, along with
    /// the extractions that fill it.
    ///
    /// A budget is considered only if the consumer's balance exceeds its
    /// cost by more than epsilon. If no budget turns a profit the consumer
    /// stays idle. Nothing in `economy` changes.
    pub fn select_solo(
        &self,
        economy: &Economy,
        consumer: usize,
        budgets: &[ConsumptionBudget],
    ) -> Result<SoloProposal> {
        let eps = self.config().epsilon;
        let balance = economy
            .consumers
            .get(consumer)
            .ok_or(Error::OutOfBounds {
                index: consumer,
                len: economy.consumers.len(),
            })?
            .balance;
        let rates = self.best_rates(&economy.offers)?;
        let ranking = self.rank_by_efficiency(economy)?;

        let mut best_profit = 0.0;
        let mut best: Option<(&ConsumptionBudget, Vec<Assignment>)> = None;

        for budget in budgets {
            if !(balance - eps > budget.cost) {
                trace!(budget = %budget.name, balance, "cannot afford budget");
                continue;
            }

            let mut capacity = budget.capacity;
            let mut earnings = 0.0;
            let mut extractions = Vec::new();
            for option in ranking.iter().rev() {
                if !(capacity - eps > 0.0) {
                    break;
                }
                let resource = &economy.resources[option.resource];
                let Some(&price) = rates.lookup_named(&resource.commodity) else {
                    continue;
                };
                let rate = resource.commodity.cost_rate;
                let quantity = (capacity / rate).min(resource.stock);
                if quantity <= 0.0 {
                    continue;
                }
                capacity -= quantity * rate;
                earnings += price * quantity;
                extractions.push(Assignment {
                    resource: option.resource,
                    quantity,
                });
            }

            let profit = earnings - budget.cost;
            trace!(budget = %budget.name, profit, "budget evaluated");
            if best_profit < profit - eps {
                best_profit = profit;
                best = Some((budget, extractions));
            }
        }

        let proposal = match best {
            Some((budget, extractions)) => SoloProposal {
                consumer,
                budget: Some(budget.clone()),
                balance: balance + best_profit,
                extractions,
            },
            None => SoloProposal::idle(consumer, balance),
        };
        debug!(
            consumer,
            budget = proposal.budget.as_ref().map(|b| b.name.as_str()),
            extractions = proposal.extractions.len(),
            "solo plan selected"
        );
        Ok(proposal)
    }

    /// Re-checks a solo plan against `economy` and the budgets that were
    /// actually offered.
    pub fn validate_solo(
        &self,
        economy: &Economy,
        offered: &[ConsumptionBudget],
        proposal: &SoloProposal,
    ) -> Result<()> {
        let eps = self.config().epsilon;
        let consumer = proposal.consumer;
        let current = economy
            .consumers
            .get(consumer)
            .ok_or(Error::OutOfBounds {
                index: consumer,
                len: economy.consumers.len(),
            })?
            .balance;

        if proposal.balance < -eps {
            return Err(ValidationError::NegativeBalance {
                consumer,
                balance: proposal.balance,
            }
            .into());
        }

        let mut expected = current;
        let capacity = match &proposal.budget {
            None if !proposal.extractions.is_empty() => {
                return Err(ValidationError::ExtractionWithoutPurchase { consumer }.into());
            }
            None => 0.0,
            Some(budget) => {
                if !offered.contains(budget) {
                    return Err(ValidationError::UnknownBudget {
                        name: budget.name.clone(),
                    }
                    .into());
                }
                if budget.cost - eps > current {
                    return Err(ValidationError::Unaffordable {
                        consumer,
                        cost: budget.cost,
                        balance: current,
                    }
                    .into());
                }
                expected -= budget.cost;
                budget.capacity
            }
        };

        let rates = self.best_rates(&economy.offers)?;
        let mut remaining: Vec<f64> = economy.resources.iter().map(|r| r.stock).collect();
        let mut required = 0.0;
        for extraction in &proposal.extractions {
            let resource = economy.resources.get(extraction.resource).ok_or(
                ValidationError::UnknownResource {
                    index: extraction.resource,
                },
            )?;
            let price = *rates.lookup_named(&resource.commodity).ok_or_else(|| {
                ValidationError::NoExchangeOffer {
                    commodity: resource.commodity.name.clone(),
                }
            })?;
            remaining[extraction.resource] -= extraction.quantity;
            if remaining[extraction.resource] < -eps {
                return Err(ValidationError::InsufficientStock {
                    resource: resource.name.clone(),
                    remaining: remaining[extraction.resource],
                }
                .into());
            }
            required += resource.commodity.cost_rate * extraction.quantity;
            expected += price * extraction.quantity;
        }

        if required - eps > capacity {
            return Err(ValidationError::InsufficientCapacity {
                consumer,
                required,
                available: capacity,
            }
            .into());
        }
        if (expected - proposal.balance).abs() > eps {
            return Err(ValidationError::BalanceMismatch {
                consumer,
                proposed: proposal.balance,
                expected,
            }
            .into());
        }
        Ok(())
    }

    /// Validates a solo plan and, only if every check passes, applies the
    /// new balance and removes the extracted stock.
    pub fn validate_and_commit_solo(
        &self,
        economy: &mut Economy,
        offered: &[ConsumptionBudget],
        proposal: &SoloProposal,
    ) -> Result<()> {
        if let Err(err) = self.validate_solo(economy, offered, proposal) {
            warn!(%err, consumer = proposal.consumer, "solo plan rejected");
            return Err(err);
        }

        if let Some(consumer) = economy.consumers.get_mut(proposal.consumer) {
            consumer.balance = proposal.balance;
        }
        for extraction in &proposal.extractions {
            if let Some(resource) = economy.resources.get_mut(extraction.resource) {
                resource.remove_stock(extraction.quantity);
            }
        }
        debug!(consumer = proposal.consumer, "solo plan committed");
        Ok(())
    }

    /// [`select_solo`](Self::select_solo) followed by
    /// [`validate_and_commit_solo`](Self::validate_and_commit_solo).
    pub fn run_solo(
        &self,
        economy: &mut Economy,
        consumer: usize,
        budgets: &[ConsumptionBudget],
    ) -> Result<SoloProposal> {
        let proposal = self.select_solo(economy, consumer, budgets)?;
        self.validate_and_commit_solo(economy, budgets, &proposal)?;
        Ok(proposal)
    }
}
