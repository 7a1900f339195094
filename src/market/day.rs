//! Multi-consumer day cycle.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::config::MarketConfig;
use super::generate::{
    random_budget, random_budgets, random_commodities, random_consumers, random_resources,
    random_traders,
};
use super::trader::{round_cents, Trader};
use crate::alloc::{
    Allocator, AllocatorConfig, Commodity, Consumer, ConsumptionBudget, Economy, Resource,
    RoundProposal, SoloProposal,
};
use crate::error::{Error, Result};

/// A running market: the shared [`Economy`], the traders that post its
/// offers, and the RNG that drives deals, budgets and stock drift.
///
/// One day is [`simulate_day`](Self::simulate_day) followed by
/// [`finish_day`](Self::finish_day). A solo day swaps in
/// [`simulate_solo_day`](Self::simulate_solo_day), where a single consumer
/// picks among several budgets.
///
/// # Examples
///
/// ```
/// use u_allocore::alloc::AllocatorConfig;
/// use u_allocore::market::{MarketConfig, MarketDay};
///
/// let config = MarketConfig::default().with_seed(2024);
/// let mut market = MarketDay::generate(config, AllocatorConfig::default()).unwrap();
///
/// for _ in 0..3 {
///     let proposal = market.simulate_day().unwrap();
///     assert_eq!(proposal.outcomes.len(), market.economy().consumers.len());
///     market.finish_day();
/// }
/// assert_eq!(market.day(), 3);
/// ```
#[derive(Debug)]
pub struct MarketDay {
    economy: Economy,
    commodities: Vec<Commodity>,
    traders: Vec<Trader>,
    allocator: Allocator,
    config: MarketConfig,
    rng: StdRng,
    day: usize,
}

impl MarketDay {
    /// Builds a random market as described by `config`.
    pub fn generate(config: MarketConfig, allocator_config: AllocatorConfig) -> Result<Self> {
        config.validate().map_err(Error::InvalidConfig)?;
        let mut rng = seeded_rng(config.seed);

        let n_commodities = rng.random_range(config.commodities.clone());
        let commodities = random_commodities(&mut rng, n_commodities, &config)?;
        let n_resources = rng.random_range(config.resources.clone());
        let resources = random_resources(&mut rng, n_resources, &commodities, &config)?;
        let n_traders = rng.random_range(config.traders.clone());
        let traders = random_traders(&mut rng, n_traders, &commodities)?;
        let n_consumers = rng.random_range(config.consumers.clone());
        let consumers = random_consumers(&mut rng, n_consumers, &config)?;

        debug!(
            commodities = commodities.len(),
            resources = resources.len(),
            traders = traders.len(),
            consumers = consumers.len(),
            "market generated"
        );

        Self::assemble(
            commodities,
            resources,
            traders,
            consumers,
            config,
            allocator_config,
            rng,
        )
    }

    /// Builds a market from explicit entities.
    pub fn with_data(
        commodities: Vec<Commodity>,
        resources: Vec<Resource>,
        traders: Vec<Trader>,
        consumers: Vec<Consumer>,
        config: MarketConfig,
        allocator_config: AllocatorConfig,
    ) -> Result<Self> {
        config.validate().map_err(Error::InvalidConfig)?;
        let rng = seeded_rng(config.seed);
        Self::assemble(
            commodities,
            resources,
            traders,
            consumers,
            config,
            allocator_config,
            rng,
        )
    }

    fn assemble(
        commodities: Vec<Commodity>,
        resources: Vec<Resource>,
        traders: Vec<Trader>,
        consumers: Vec<Consumer>,
        config: MarketConfig,
        allocator_config: AllocatorConfig,
        rng: StdRng,
    ) -> Result<Self> {
        Ok(Self {
            economy: Economy {
                resources,
                consumers,
                offers: Vec::new(),
            },
            commodities,
            traders,
            allocator: Allocator::new(allocator_config)?,
            config,
            rng,
            day: 0,
        })
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn commodities(&self) -> &[Commodity] {
        &self.commodities
    }

    pub fn traders(&self) -> &[Trader] {
        &self.traders
    }

    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }

    /// Days completed so far.
    pub fn day(&self) -> usize {
        self.day
    }

    /// Every trader posts a fresh deal; the economy's offers are replaced
    /// by the new set.
    pub fn refresh_offers(&mut self) -> Result<()> {
        let rng = &mut self.rng;
        let mut offers = Vec::with_capacity(self.traders.len());
        for trader in &mut self.traders {
            if let Some(offer) = trader.generate_deal(rng)? {
                offers.push(offer.clone());
            }
        }
        self.economy.offers = offers;
        Ok(())
    }

    /// Runs one round: fresh deals, one random budget offered to every
    /// consumer, greedy assignment, then validation and commit.
    pub fn simulate_day(&mut self) -> Result<RoundProposal> {
        self.refresh_offers()?;
        let budget = random_budget(&mut self.rng, &self.config);
        self.run_round(&budget)
    }

    /// Like [`simulate_day`](Self::simulate_day) with a caller-chosen budget.
    pub fn simulate_day_with(&mut self, budget: &ConsumptionBudget) -> Result<RoundProposal> {
        self.refresh_offers()?;
        self.run_round(budget)
    }

    /// Assigns and commits a round against the current offers.
    pub fn run_round(&mut self, budget: &ConsumptionBudget) -> Result<RoundProposal> {
        let proposal = self.allocator.run_round(&mut self.economy, budget)?;
        debug!(
            day = self.day,
            budget = %budget.name,
            assigned = proposal.assigned_count(),
            "day simulated"
        );
        Ok(proposal)
    }

    /// Runs a solo day for `consumer`: fresh deals, a random set of budgets,
    /// then the consumer's plan is validated and committed.
    pub fn simulate_solo_day(&mut self, consumer: usize) -> Result<SoloProposal> {
        self.refresh_offers()?;
        let budgets = random_budgets(&mut self.rng, &self.config);
        self.run_solo(consumer, &budgets)
    }

    /// Like [`simulate_solo_day`](Self::simulate_solo_day) with
    /// caller-chosen budgets.
    pub fn simulate_solo_day_with(
        &mut self,
        consumer: usize,
        budgets: &[ConsumptionBudget],
    ) -> Result<SoloProposal> {
        self.refresh_offers()?;
        self.run_solo(consumer, budgets)
    }

    /// Plans and commits a solo day against the current offers.
    pub fn run_solo(
        &mut self,
        consumer: usize,
        budgets: &[ConsumptionBudget],
    ) -> Result<SoloProposal> {
        let proposal = self.allocator.run_solo(&mut self.economy, consumer, budgets)?;
        debug!(
            day = self.day,
            consumer,
            offered = budgets.len(),
            extractions = proposal.extractions.len(),
            "solo day simulated"
        );
        Ok(proposal)
    }

    /// End-of-day stock drift.
    ///
    /// Each non-empty resource loses a random share of its stock with the
    /// configured depletion chance; otherwise it is restocked by up to
    /// `max_restock`. Stocks are then rounded to two decimals.
    pub fn finish_day(&mut self) {
        let rng = &mut self.rng;
        for resource in &mut self.economy.resources {
            if resource.stock > 0.0 && rng.random_bool(self.config.depletion_chance) {
                let loss = rng.random_range(0.0..1.0) * resource.stock;
                resource.remove_stock(loss);
            } else {
                resource.add_stock(round_cents(
                    rng.random_range(0.0..1.0) * self.config.max_restock,
                ));
            }
            resource.stock = round_cents(resource.stock);
        }
        self.day += 1;
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::ExchangeOffer;
    use crate::market::DealStrategy;

    fn example_market() -> MarketDay {
        let netherite = Commodity::new("Netherite Ingot", 20.95);
        let gold = Commodity::new("Gold Nugget", 27.24);
        let prismarine = Commodity::new("Prismarine Crystals", 11.48);

        let mut hard = Trader::new("Waldo Morgan", DealStrategy::Hardest);
        hard.set_commodities(vec![gold.clone(), netherite.clone()]);
        let mut only_netherite = Trader::new("Orson Hoover", DealStrategy::Random);
        only_netherite.set_commodities(vec![netherite.clone()]);

        MarketDay::with_data(
            vec![netherite.clone(), gold.clone(), prismarine.clone()],
            vec![
                Resource::new("Castle Karstaag Ruins", netherite, 4.0),
                Resource::new("Glacial Cave", gold, 47.0),
                Resource::new("Orotheim", prismarine, 10.0),
            ],
            vec![hard, only_netherite],
            vec![Consumer::new("Johnny", 20.0), Consumer::new("Papa", 12.0)],
            MarketConfig::default().with_seed(5),
            AllocatorConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_refresh_offers_follows_traders() {
        let mut market = example_market();
        market.refresh_offers().unwrap();
        let offers: Vec<&str> = market
            .economy()
            .offers
            .iter()
            .map(|o| o.commodity.name.as_str())
            .collect();
        assert_eq!(offers, vec!["Gold Nugget", "Netherite Ingot"]);
        assert!(market.traders().iter().all(Trader::is_selling));
    }

    #[test]
    fn test_round_commits_to_economy() {
        let mut market = example_market();
        market.refresh_offers().unwrap();
        market.economy.offers = vec![
            ExchangeOffer {
                commodity: Commodity::new("Netherite Ingot", 20.95),
                price: 9.78,
            },
            ExchangeOffer {
                commodity: Commodity::new("Gold Nugget", 27.24),
                price: 7.7,
            },
        ];
        let budget = ConsumptionBudget::new("Cooked Cod", 424.0, 19.0);
        let proposal = market.run_round(&budget).unwrap();
        let q = 424.0 / 27.24;

        assert_eq!(proposal.assigned_count(), 1);
        let economy = market.economy();
        assert!((economy.consumers[0].balance - (1.0 + 7.7 * q)).abs() < 1e-10);
        assert!((economy.consumers[1].balance - 12.0).abs() < 1e-12);
        assert!((economy.resources[1].stock - (47.0 - q)).abs() < 1e-10);
    }

    #[test]
    fn test_finish_day_rounds_and_counts() {
        let mut market = example_market();
        for _ in 0..5 {
            market.finish_day();
            for r in &market.economy().resources {
                assert!(r.stock >= 0.0);
                assert!((r.stock * 100.0 - (r.stock * 100.0).round()).abs() < 1e-6);
            }
        }
        assert_eq!(market.day(), 5);
    }

    #[test]
    fn test_finish_day_restock_only() {
        let mut market = MarketDay::with_data(
            vec![Commodity::new("Coal", 4.5)],
            vec![Resource::new("Quarry", Commodity::new("Coal", 4.5), 3.0)],
            Vec::new(),
            Vec::new(),
            MarketConfig::default()
                .with_depletion_chance(0.0)
                .with_seed(1),
            AllocatorConfig::default(),
        )
        .unwrap();
        let mut last = 3.0;
        for _ in 0..10 {
            market.finish_day();
            let stock = market.economy().resources[0].stock;
            assert!(stock >= last - 1e-9);
            assert!(stock <= last + 10.0 + 1e-9);
            last = stock;
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let config = MarketConfig::default().with_seed(77);
        let mut a = MarketDay::generate(config.clone(), AllocatorConfig::default()).unwrap();
        let mut b = MarketDay::generate(config, AllocatorConfig::default()).unwrap();
        for _ in 0..4 {
            let pa = a.simulate_day().unwrap();
            let pb = b.simulate_day().unwrap();
            assert_eq!(pa, pb);
            a.finish_day();
            b.finish_day();
        }
        assert_eq!(a.economy().resources, b.economy().resources);
    }

    #[test]
    fn test_generated_market_respects_counts() {
        let config = MarketConfig::default()
            .with_commodities(3..=3)
            .with_resources(4..=4)
            .with_traders(2..=2)
            .with_consumers(5..=5)
            .with_seed(8);
        let market = MarketDay::generate(config, AllocatorConfig::default()).unwrap();
        assert_eq!(market.commodities().len(), 3);
        assert_eq!(market.economy().resources.len(), 4);
        assert_eq!(market.traders().len(), 2);
        assert_eq!(market.economy().consumers.len(), 5);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = MarketDay::generate(
            MarketConfig::default().with_depletion_chance(2.0),
            AllocatorConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_solo_day_commits_plan() {
        let mut market = example_market();
        market.refresh_offers().unwrap();
        let budgets = [
            ConsumptionBudget::new("Cabbage Seeds", 106.0, 30.0),
            ConsumptionBudget::new("Bread", 60.0, 1.0),
        ];
        let proposal = market.run_solo(0, &budgets).unwrap();

        assert_eq!(proposal.consumer, 0);
        assert!(proposal.budget.is_some());
        assert!(!proposal.extractions.is_empty());
        let economy = market.economy();
        assert!((economy.consumers[0].balance - proposal.balance).abs() < 1e-12);
        assert!((economy.consumers[1].balance - 12.0).abs() < 1e-12);
        assert!(economy.resources.iter().all(|r| r.stock >= -1e-6));
    }

    #[test]
    fn test_solo_day_unknown_consumer() {
        let mut market = example_market();
        let before = market.economy().consumers.clone();
        assert!(matches!(
            market.simulate_solo_day(7),
            Err(Error::OutOfBounds { index: 7, len: 2 })
        ));
        assert_eq!(market.economy().consumers, before);
    }

    #[test]
    fn test_many_solo_days_never_reject() {
        let config = MarketConfig::default().with_seed(4242);
        let mut market = MarketDay::generate(config, AllocatorConfig::default()).unwrap();
        for day in 0..30 {
            let consumer = day % market.economy().consumers.len();
            let before = market.economy().consumers[consumer].balance;
            let proposal = market.simulate_solo_day(consumer).unwrap();
            assert!(proposal.balance + 1e-9 >= before);
            market.finish_day();
        }
        assert_eq!(market.day(), 30);
    }

    #[test]
    fn test_many_days_never_reject() {
        let config = MarketConfig::default().with_seed(31337);
        let mut market = MarketDay::generate(config, AllocatorConfig::default()).unwrap();
        for _ in 0..30 {
            market.simulate_day().unwrap();
            market.finish_day();
            for consumer in &market.economy().consumers {
                assert!(consumer.balance >= 0.0);
            }
        }
    }
}
