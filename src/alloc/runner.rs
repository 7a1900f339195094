//! Greedy round assignment, validation and commit.

use tracing::{debug, trace, warn};

use super::config::AllocatorConfig;
use super::types::{
    Assignment, ConsumerOutcome, ConsumptionBudget, Economy, ExchangeOffer, RoundProposal,
};
use crate::array::{AllocationOption, SortedAllocations};
use crate::error::{Error, Result, ValidationError};
use crate::table::ProbeTable;

/// Assigns each round's extraction options to consumers, highest yield
/// first, and commits the outcome only after it re-validates.
///
/// # Examples
///
/// ```
/// use u_allocore::alloc::{
///     Allocator, AllocatorConfig, Commodity, Consumer, ConsumptionBudget, Economy,
///     ExchangeOffer, Resource,
/// };
///
/// let gold = Commodity::new("Gold Nugget", 2.0);
/// let mut economy = Economy {
///     resources: vec![Resource::new("Glacial Cave", gold.clone(), 100.0)],
///     consumers: vec![Consumer::new("Johnny", 20.0)],
///     offers: vec![ExchangeOffer { commodity: gold, price: 3.0 }],
/// };
/// let bread = ConsumptionBudget::new("Bread", 10.0, 5.0);
///
/// let allocator = Allocator::new(AllocatorConfig::default()).unwrap();
/// let proposal = allocator.assign_round(&economy, &bread).unwrap();
/// allocator.validate_and_commit(&mut economy, &proposal).unwrap();
///
/// // 10 capacity / 2.0 per unit = 5 units sold at 3.0
/// assert!((economy.consumers[0].balance - 30.0).abs() < 1e-9);
/// assert!((economy.resources[0].stock - 95.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct Allocator {
    config: AllocatorConfig,
}

impl Allocator {
    /// Creates an allocator after validating `config`.
    pub fn new(config: AllocatorConfig) -> Result<Self> {
        config.validate().map_err(Error::InvalidConfig)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Highest offered price per commodity name.
    pub fn best_rates(&self, offers: &[ExchangeOffer]) -> Result<ProbeTable<f64>> {
        let mut rates = ProbeTable::with_config(offers.len(), self.config.table.clone())?;
        for offer in offers {
            match rates.lookup_named(&offer.commodity) {
                Some(&best) if offer.price <= best => {}
                _ => rates.set_named(&offer.commodity, offer.price)?,
            }
        }
        Ok(rates)
    }

    /// Enumerates every way one consumer could spend `budget` this round.
    ///
    /// Resources whose commodity nobody buys are skipped. A resource too
    /// small for a single full budget yields one option for its whole
    /// stock. Otherwise it yields one full-budget option claimable by as many
    /// consumers as fit in the stock, plus a single option for the
    /// remainder when not every consumer can get a full-budget slot.
    pub fn build_options(
        &self,
        economy: &Economy,
        budget: &ConsumptionBudget,
    ) -> Result<SortedAllocations> {
        let eps = self.config.epsilon;
        let rates = self.best_rates(&economy.offers)?;
        let consumer_count = economy.consumers.len();
        let mut options = SortedAllocations::new(economy.resources.len(), eps);

        for (index, resource) in economy.resources.iter().enumerate() {
            let Some(&price) = rates.lookup_named(&resource.commodity) else {
                continue;
            };
            let extractable = budget.capacity / resource.commodity.cost_rate;
            let slots = if extractable - eps > resource.stock {
                0
            } else {
                (resource.stock / extractable).floor() as usize
            };

            if slots == 0 {
                options.add(AllocationOption {
                    resource: index,
                    quantity: resource.stock,
                    yield_value: price * resource.stock,
                    multiplicity: 1,
                })?;
                continue;
            }

            options.add(AllocationOption {
                resource: index,
                quantity: extractable,
                yield_value: price * extractable,
                multiplicity: slots,
            })?;

            if slots < consumer_count {
                let remainder = resource.stock - extractable * slots as f64;
                if remainder > eps {
                    options.add(AllocationOption {
                        resource: index,
                        quantity: remainder,
                        yield_value: price * remainder,
                        multiplicity: 1,
                    })?;
                }
            }
        }

        trace!(options = options.len(), "built allocation options");
        Ok(options)
    }

    /// Walks the consumers in order, giving each the best remaining option
    /// when they can afford the budget and the option turns a profit.
    ///
    /// Nothing in `economy` changes; see
    /// [`validate_and_commit`](Self::validate_and_commit).
    pub fn assign_round(
        &self,
        economy: &Economy,
        budget: &ConsumptionBudget,
    ) -> Result<RoundProposal> {
        let eps = self.config.epsilon;
        let mut options = self.build_options(economy, budget)?;
        let mut outcomes = Vec::with_capacity(economy.consumers.len());

        for consumer in &economy.consumers {
            let balance = consumer.balance;
            if !(budget.cost < balance - eps) {
                trace!(consumer = %consumer.name, balance, "cannot afford budget");
                outcomes.push(ConsumerOutcome::idle(balance));
                continue;
            }

            let claim = match options.best() {
                Some(best) if best.yield_value - budget.cost > eps => best.clone(),
                _ => {
                    trace!(consumer = %consumer.name, "no profitable option left");
                    outcomes.push(ConsumerOutcome::idle(balance));
                    continue;
                }
            };
            options.claim_best()?;

            trace!(
                consumer = %consumer.name,
                resource = claim.resource,
                quantity = claim.quantity,
                "assigned"
            );
            outcomes.push(ConsumerOutcome {
                purchased: true,
                balance: balance - budget.cost + claim.yield_value,
                assignment: Some(Assignment {
                    resource: claim.resource,
                    quantity: claim.quantity,
                }),
            });
        }

        let proposal = RoundProposal {
            budget: budget.clone(),
            outcomes,
        };
        debug!(
            consumers = proposal.outcomes.len(),
            assigned = proposal.assigned_count(),
            "round assigned"
        );
        Ok(proposal)
    }

    /// Re-checks `proposal` against the current state of `economy`
    /// without trusting anything the assignment step computed.
    pub fn validate(&self, economy: &Economy, proposal: &RoundProposal) -> Result<()> {
        let eps = self.config.epsilon;
        let budget = &proposal.budget;

        if proposal.outcomes.len() != economy.consumers.len() {
            return Err(ValidationError::LengthMismatch {
                expected: economy.consumers.len(),
                actual: proposal.outcomes.len(),
            }
            .into());
        }

        for (consumer, outcome) in proposal.outcomes.iter().enumerate() {
            if outcome.balance < -eps {
                return Err(ValidationError::NegativeBalance {
                    consumer,
                    balance: outcome.balance,
                }
                .into());
            }
            if !outcome.purchased && outcome.assignment.is_some() {
                return Err(ValidationError::ExtractionWithoutPurchase { consumer }.into());
            }
            let current = economy.consumers[consumer].balance;
            if outcome.purchased && budget.cost - eps > current {
                return Err(ValidationError::Unaffordable {
                    consumer,
                    cost: budget.cost,
                    balance: current,
                }
                .into());
            }
        }

        let rates = self.best_rates(&economy.offers)?;
        // indexed like the resources; names need not be unique
        let mut remaining: Vec<f64> = economy.resources.iter().map(|r| r.stock).collect();

        for (consumer, outcome) in proposal.outcomes.iter().enumerate() {
            let current = economy.consumers[consumer].balance;
            let mut expected = current;
            if outcome.purchased {
                expected -= budget.cost;
            }

            if let Some(assignment) = &outcome.assignment {
                let resource = economy.resources.get(assignment.resource).ok_or(
                    ValidationError::UnknownResource {
                        index: assignment.resource,
                    },
                )?;
                let price = *rates.lookup_named(&resource.commodity).ok_or_else(|| {
                    ValidationError::NoExchangeOffer {
                        commodity: resource.commodity.name.clone(),
                    }
                })?;
                let required = resource.commodity.cost_rate * assignment.quantity;
                if budget.capacity < required - eps {
                    return Err(ValidationError::InsufficientCapacity {
                        consumer,
                        required,
                        available: budget.capacity,
                    }
                    .into());
                }
                remaining[assignment.resource] -= assignment.quantity;
                expected += price * assignment.quantity;
            }

            if (expected - outcome.balance).abs() > eps {
                return Err(ValidationError::BalanceMismatch {
                    consumer,
                    proposed: outcome.balance,
                    expected,
                }
                .into());
            }
        }

        for (resource, &stock) in economy.resources.iter().zip(&remaining) {
            if stock < -eps {
                return Err(ValidationError::InsufficientStock {
                    resource: resource.name.clone(),
                    remaining: stock,
                }
                .into());
            }
        }

        Ok(())
    }

    /// Validates `proposal` and, only if every check passes, applies the new
    /// balances and removes the extracted stock.
    ///
    /// On error `economy` is left untouched.
    pub fn validate_and_commit(&self, economy: &mut Economy, proposal: &RoundProposal) -> Result<()> {
        if let Err(err) = self.validate(economy, proposal) {
            warn!(%err, "round rejected");
            return Err(err);
        }

        for (consumer, outcome) in economy.consumers.iter_mut().zip(&proposal.outcomes) {
            consumer.balance = outcome.balance;
            if let Some(assignment) = &outcome.assignment {
                if let Some(resource) = economy.resources.get_mut(assignment.resource) {
                    resource.remove_stock(assignment.quantity);
                }
            }
        }

        debug!(assigned = proposal.assigned_count(), "round committed");
        Ok(())
    }

    /// [`assign_round`](Self::assign_round) followed by
    /// [`validate_and_commit`](Self::validate_and_commit).
    pub fn run_round(
        &self,
        economy: &mut Economy,
        budget: &ConsumptionBudget,
    ) -> Result<RoundProposal> {
        let proposal = self.assign_round(economy, budget)?;
        self.validate_and_commit(economy, &proposal)?;
        Ok(proposal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::types::{Commodity, Consumer, Resource};
    use proptest::prelude::*;

    fn netherite() -> Commodity {
        Commodity::new("Netherite Ingot", 20.95)
    }

    fn gold() -> Commodity {
        Commodity::new("Gold Nugget", 27.24)
    }

    fn prismarine() -> Commodity {
        Commodity::new("Prismarine Crystals", 11.48)
    }

    fn fishing_rod() -> Commodity {
        Commodity::new("Fishing Rod", 26.8)
    }

    fn cooked_cod() -> ConsumptionBudget {
        ConsumptionBudget::new("Cooked Cod", 424.0, 19.0)
    }

    fn example_economy() -> Economy {
        Economy {
            resources: vec![
                Resource::new("Castle Karstaag Ruins", netherite(), 4.0),
                Resource::new("Glacial Cave", gold(), 47.0),
                Resource::new("Orotheim", prismarine(), 10.0),
            ],
            consumers: vec![Consumer::new("Johnny", 20.0), Consumer::new("Papa", 12.0)],
            offers: vec![
                ExchangeOffer {
                    commodity: netherite(),
                    price: 9.78,
                },
                ExchangeOffer {
                    commodity: gold(),
                    price: 5.40,
                },
                ExchangeOffer {
                    commodity: gold(),
                    price: 7.7,
                },
                ExchangeOffer {
                    commodity: fishing_rod(),
                    price: 7.44,
                },
            ],
        }
    }

    fn allocator() -> Allocator {
        Allocator::new(AllocatorConfig::default()).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let err = Allocator::new(AllocatorConfig::default().with_epsilon(-1.0)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_best_rates_keeps_max() {
        let economy = example_economy();
        let rates = allocator().best_rates(&economy.offers).unwrap();
        assert_eq!(rates.len(), 3);
        assert_eq!(rates.lookup("Gold Nugget"), Some(&7.7));
        assert_eq!(rates.lookup("Netherite Ingot"), Some(&9.78));
        assert_eq!(rates.lookup("Prismarine Crystals"), None);
    }

    #[test]
    fn test_build_options_example() {
        let economy = example_economy();
        let options = allocator()
            .build_options(&economy, &cooked_cod())
            .unwrap();
        assert_eq!(options.len(), 2);

        let small = options.get(0).unwrap();
        assert_eq!(small.resource, 0);
        assert!((small.quantity - 4.0).abs() < 1e-10);
        assert!((small.yield_value - 39.12).abs() < 1e-10);
        assert_eq!(small.multiplicity, 1);

        let q = 424.0 / 27.24;
        let big = options.best().unwrap();
        assert_eq!(big.resource, 1);
        assert!((big.quantity - q).abs() < 1e-10);
        assert!((big.yield_value - 7.7 * q).abs() < 1e-10);
        assert_eq!(big.multiplicity, 3);
    }

    #[test]
    fn test_build_options_adds_remainder() {
        let economy = Economy {
            resources: vec![Resource::new("Glacial Cave", gold(), 20.0)],
            consumers: vec![Consumer::new("Johnny", 50.0), Consumer::new("Papa", 50.0)],
            offers: vec![ExchangeOffer {
                commodity: gold(),
                price: 7.7,
            }],
        };
        let options = allocator()
            .build_options(&economy, &cooked_cod())
            .unwrap();
        let q = 424.0 / 27.24;
        assert_eq!(options.len(), 2);
        assert!((options.best().unwrap().quantity - q).abs() < 1e-10);
        assert_eq!(options.best().unwrap().multiplicity, 1);
        assert!((options.get(0).unwrap().quantity - (20.0 - q)).abs() < 1e-10);
    }

    #[test]
    fn test_build_options_exact_fit_has_no_remainder() {
        let rock = Commodity::new("Cobblestone", 1.0);
        let economy = Economy {
            resources: vec![Resource::new("Quarry", rock.clone(), 20.0)],
            consumers: vec![
                Consumer::new("a", 50.0),
                Consumer::new("b", 50.0),
                Consumer::new("c", 50.0),
            ],
            offers: vec![ExchangeOffer {
                commodity: rock,
                price: 2.0,
            }],
        };
        let budget = ConsumptionBudget::new("Bread", 10.0, 1.0);
        let options = allocator().build_options(&economy, &budget).unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options.best().unwrap().multiplicity, 2);
    }

    #[test]
    fn test_assign_round_example() {
        let economy = example_economy();
        let proposal = allocator()
            .assign_round(&economy, &cooked_cod())
            .unwrap();
        let q = 424.0 / 27.24;

        assert_eq!(proposal.outcomes.len(), 2);
        let johnny = &proposal.outcomes[0];
        assert!(johnny.purchased);
        assert!((johnny.balance - (20.0 - 19.0 + 7.7 * q)).abs() < 1e-10);
        assert!((johnny.balance - 120.85).abs() < 0.01);
        let assignment = johnny.assignment.as_ref().unwrap();
        assert_eq!(assignment.resource, 1);
        assert!((assignment.quantity - 15.57).abs() < 0.01);

        // 12 does not cover the 19 budget
        assert_eq!(proposal.outcomes[1], ConsumerOutcome::idle(12.0));
    }

    #[test]
    fn test_assign_round_does_not_mutate() {
        let economy = example_economy();
        let before = economy.clone();
        allocator().assign_round(&economy, &cooked_cod()).unwrap();
        assert_eq!(economy.consumers, before.consumers);
        assert_eq!(economy.resources, before.resources);
    }

    #[test]
    fn test_exact_balance_cannot_afford() {
        let mut economy = example_economy();
        economy.consumers = vec![Consumer::new("Johnny", 19.0)];
        let proposal = allocator()
            .assign_round(&economy, &cooked_cod())
            .unwrap();
        assert_eq!(proposal.outcomes[0], ConsumerOutcome::idle(19.0));
    }

    #[test]
    fn test_unprofitable_option_skipped() {
        let mut economy = example_economy();
        economy.consumers = vec![Consumer::new("Johnny", 500.0)];
        let budget = ConsumptionBudget::new("Golden Carrot", 424.0, 400.0);
        let proposal = allocator().assign_round(&economy, &budget).unwrap();
        assert_eq!(proposal.outcomes[0], ConsumerOutcome::idle(500.0));
    }

    #[test]
    fn test_multiplicity_shared_across_consumers() {
        let mut economy = example_economy();
        economy.consumers = (0..5)
            .map(|i| Consumer::new(format!("p{i}"), 100.0))
            .collect();
        let proposal = allocator()
            .assign_round(&economy, &cooked_cod())
            .unwrap();
        let resources: Vec<Option<usize>> = proposal
            .outcomes
            .iter()
            .map(|o| o.assignment.as_ref().map(|a| a.resource))
            .collect();
        // three full gold slots, then the netherite cave, then nothing
        assert_eq!(resources, vec![Some(1), Some(1), Some(1), Some(0), None]);
    }

    #[test]
    fn test_commit_example() {
        let mut economy = example_economy();
        let alloc = allocator();
        let proposal = alloc.run_round(&mut economy, &cooked_cod()).unwrap();
        let q = 424.0 / 27.24;

        assert_eq!(proposal.assigned_count(), 1);
        assert!((economy.consumers[0].balance - (1.0 + 7.7 * q)).abs() < 1e-10);
        assert!((economy.consumers[1].balance - 12.0).abs() < 1e-12);
        assert!((economy.resources[1].stock - (47.0 - q)).abs() < 1e-10);
        assert!((economy.resources[0].stock - 4.0).abs() < 1e-12);

        // the same gold cave now has room for two full budgets
        let options = alloc.build_options(&economy, &cooked_cod()).unwrap();
        let gold_option = options.iter().find(|o| o.resource == 1).unwrap();
        assert_eq!(gold_option.multiplicity, 2);
    }

    #[test]
    fn test_reject_leaves_state_untouched() {
        let mut economy = example_economy();
        let alloc = allocator();
        let mut proposal = alloc.assign_round(&economy, &cooked_cod()).unwrap();
        proposal.outcomes[0].balance += 1.0;

        let before = economy.clone();
        let err = alloc
            .validate_and_commit(&mut economy, &proposal)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::BalanceMismatch { consumer: 0, .. })
        ));
        assert_eq!(economy.consumers, before.consumers);
        assert_eq!(economy.resources, before.resources);
    }

    #[test]
    fn test_validate_length_mismatch() {
        let economy = example_economy();
        let proposal = RoundProposal {
            budget: cooked_cod(),
            outcomes: vec![ConsumerOutcome::idle(20.0)],
        };
        assert_eq!(
            allocator().validate(&economy, &proposal),
            Err(Error::Validation(ValidationError::LengthMismatch {
                expected: 2,
                actual: 1
            }))
        );
    }

    #[test]
    fn test_validate_negative_balance() {
        let economy = example_economy();
        let proposal = RoundProposal {
            budget: cooked_cod(),
            outcomes: vec![ConsumerOutcome::idle(-1.0), ConsumerOutcome::idle(12.0)],
        };
        assert!(matches!(
            allocator().validate(&economy, &proposal),
            Err(Error::Validation(ValidationError::NegativeBalance { consumer: 0, .. }))
        ));
    }

    #[test]
    fn test_validate_extraction_without_purchase() {
        let economy = example_economy();
        let mut proposal = allocator()
            .assign_round(&economy, &cooked_cod())
            .unwrap();
        proposal.outcomes[0].purchased = false;
        assert_eq!(
            allocator().validate(&economy, &proposal),
            Err(Error::Validation(
                ValidationError::ExtractionWithoutPurchase { consumer: 0 }
            ))
        );
    }

    #[test]
    fn test_validate_unaffordable() {
        let economy = example_economy();
        let proposal = RoundProposal {
            budget: cooked_cod(),
            outcomes: vec![
                ConsumerOutcome::idle(20.0),
                ConsumerOutcome {
                    purchased: true,
                    balance: 0.0,
                    assignment: None,
                },
            ],
        };
        assert!(matches!(
            allocator().validate(&economy, &proposal),
            Err(Error::Validation(ValidationError::Unaffordable { consumer: 1, .. }))
        ));
    }

    #[test]
    fn test_validate_over_extraction() {
        let mut economy = example_economy();
        economy.consumers = vec![Consumer::new("a", 100.0), Consumer::new("b", 100.0)];
        let alloc = allocator();
        let budget = ConsumptionBudget::new("Cooked Cod", 424.0, 19.0);
        // both take the whole netherite stock
        let outcome = ConsumerOutcome {
            purchased: true,
            balance: 100.0 - 19.0 + 9.78 * 4.0,
            assignment: Some(Assignment {
                resource: 0,
                quantity: 4.0,
            }),
        };
        let proposal = RoundProposal {
            budget,
            outcomes: vec![outcome.clone(), outcome],
        };
        assert!(matches!(
            alloc.validate(&economy, &proposal),
            Err(Error::Validation(ValidationError::InsufficientStock { ref resource, .. }))
                if resource == "Castle Karstaag Ruins"
        ));
    }

    #[test]
    fn test_validate_no_offer() {
        let economy = example_economy();
        let proposal = RoundProposal {
            budget: cooked_cod(),
            outcomes: vec![
                ConsumerOutcome {
                    purchased: true,
                    balance: 1.0,
                    assignment: Some(Assignment {
                        resource: 2,
                        quantity: 1.0,
                    }),
                },
                ConsumerOutcome::idle(12.0),
            ],
        };
        assert_eq!(
            allocator().validate(&economy, &proposal),
            Err(Error::Validation(ValidationError::NoExchangeOffer {
                commodity: "Prismarine Crystals".to_string()
            }))
        );
    }

    #[test]
    fn test_validate_capacity_exceeded() {
        let economy = example_economy();
        let quantity = 20.0;
        let proposal = RoundProposal {
            budget: cooked_cod(),
            outcomes: vec![
                ConsumerOutcome {
                    purchased: true,
                    balance: 20.0 - 19.0 + 7.7 * quantity,
                    assignment: Some(Assignment {
                        resource: 1,
                        quantity,
                    }),
                },
                ConsumerOutcome::idle(12.0),
            ],
        };
        assert!(matches!(
            allocator().validate(&economy, &proposal),
            Err(Error::Validation(ValidationError::InsufficientCapacity { consumer: 0, .. }))
        ));
    }

    #[test]
    fn test_validate_unknown_resource() {
        let economy = example_economy();
        let proposal = RoundProposal {
            budget: cooked_cod(),
            outcomes: vec![
                ConsumerOutcome {
                    purchased: true,
                    balance: 1.0,
                    assignment: Some(Assignment {
                        resource: 9,
                        quantity: 1.0,
                    }),
                },
                ConsumerOutcome::idle(12.0),
            ],
        };
        assert_eq!(
            allocator().validate(&economy, &proposal),
            Err(Error::Validation(ValidationError::UnknownResource { index: 9 }))
        );
    }

    #[test]
    fn test_validate_purchase_without_extraction() {
        let economy = example_economy();
        let proposal = RoundProposal {
            budget: cooked_cod(),
            outcomes: vec![
                ConsumerOutcome {
                    purchased: true,
                    balance: 20.0 - 19.0,
                    assignment: None,
                },
                ConsumerOutcome::idle(12.0),
            ],
        };
        assert_eq!(allocator().validate(&economy, &proposal), Ok(()));
    }

    /// Two resources sharing a name, told apart only by index.
    fn twin_caves(stocks: [f64; 2]) -> Economy {
        let iron = Commodity::new("Iron Ore", 1.0);
        Economy {
            resources: stocks
                .iter()
                .map(|&stock| Resource::new("Cave", iron.clone(), stock))
                .collect(),
            consumers: vec![Consumer::new("Alex", 50.0)],
            offers: vec![ExchangeOffer {
                commodity: iron,
                price: 2.0,
            }],
        }
    }

    fn bread() -> ConsumptionBudget {
        ConsumptionBudget::new("Bread", 10.0, 1.0)
    }

    #[test]
    fn test_duplicate_names_commit_per_index() {
        let mut economy = twin_caves([100.0, 1.0]);
        let proposal = allocator().run_round(&mut economy, &bread()).unwrap();

        let assignment = proposal.outcomes[0].assignment.as_ref().unwrap();
        assert_eq!(assignment.resource, 0);
        assert!((assignment.quantity - 10.0).abs() < 1e-12);
        assert!((economy.resources[0].stock - 90.0).abs() < 1e-12);
        assert!((economy.resources[1].stock - 1.0).abs() < 1e-12);
        assert!((economy.consumers[0].balance - 69.0).abs() < 1e-12);
    }

    #[test]
    fn test_duplicate_names_reject_over_extraction() {
        let mut economy = twin_caves([1.0, 100.0]);
        let proposal = RoundProposal {
            budget: bread(),
            outcomes: vec![ConsumerOutcome {
                purchased: true,
                balance: 50.0 - 1.0 + 2.0 * 10.0,
                assignment: Some(Assignment {
                    resource: 0,
                    quantity: 10.0,
                }),
            }],
        };

        let before = economy.clone();
        let err = allocator()
            .validate_and_commit(&mut economy, &proposal)
            .unwrap_err();
        match err {
            Error::Validation(ValidationError::InsufficientStock {
                resource,
                remaining,
            }) => {
                assert_eq!(resource, "Cave");
                assert!((remaining + 9.0).abs() < 1e-12);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(economy.resources, before.resources);
        assert_eq!(economy.consumers, before.consumers);
    }

    #[test]
    fn test_stock_is_tracked_per_index() {
        let mut economy = twin_caves([4.0, 4.0]);
        economy.consumers.push(Consumer::new("Sam", 50.0));
        let grab = |resource| ConsumerOutcome {
            purchased: true,
            balance: 50.0 - 1.0 + 2.0 * 4.0,
            assignment: Some(Assignment {
                resource,
                quantity: 4.0,
            }),
        };

        // each twin fully drained once
        let split = RoundProposal {
            budget: bread(),
            outcomes: vec![grab(0), grab(1)],
        };
        assert_eq!(allocator().validate(&economy, &split), Ok(()));

        // the same twin drained twice
        let doubled = RoundProposal {
            budget: bread(),
            outcomes: vec![grab(1), grab(1)],
        };
        assert!(matches!(
            allocator().validate(&economy, &doubled),
            Err(Error::Validation(ValidationError::InsufficientStock { .. }))
        ));
    }

    fn arb_economy() -> impl Strategy<Value = (Economy, ConsumptionBudget)> {
        (
            proptest::collection::vec((0.5f64..30.0, 0.0f64..60.0, 1.0f64..10.0), 1..6),
            proptest::collection::vec(0.0f64..200.0, 1..6),
            (10.0f64..500.0, 1.0f64..50.0),
        )
            .prop_map(|(sites, balances, (capacity, cost))| {
                let mut economy = Economy::default();
                for (i, (rate, stock, price)) in sites.into_iter().enumerate() {
                    let commodity = Commodity::new(format!("m{i}"), rate);
                    economy.resources.push(Resource::new(
                        format!("r{i}"),
                        commodity.clone(),
                        stock,
                    ));
                    economy.offers.push(ExchangeOffer { commodity, price });
                }
                economy.consumers = balances
                    .into_iter()
                    .enumerate()
                    .map(|(i, b)| Consumer::new(format!("c{i}"), b))
                    .collect();
                (economy, ConsumptionBudget::new("Bread", capacity, cost))
            })
    }

    proptest! {
        #[test]
        fn prop_assigned_rounds_always_commit((economy, budget) in arb_economy()) {
            let alloc = allocator();
            let mut economy = economy;
            let before = economy.clone();
            let proposal = alloc.run_round(&mut economy, &budget).unwrap();

            for (i, outcome) in proposal.outcomes.iter().enumerate() {
                // nobody loses money
                prop_assert!(outcome.balance + 1e-9 >= before.consumers[i].balance);
            }
            for resource in &economy.resources {
                prop_assert!(resource.stock >= -1e-6);
            }
        }
    }
}
