//! Error types shared by the indexing structures and the allocator.

use thiserror::Error;

/// Errors raised by the structural ADTs and the round allocator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A tree insertion used a key that is already present.
    #[error("duplicate key")]
    DuplicateKey,

    /// A tree or table lookup missed.
    #[error("key not found: {key}")]
    KeyNotFound {
        /// Rendered form of the missing key.
        key: String,
    },

    /// The probe table has no free slot left, even after growing.
    #[error("probe table full at capacity {capacity}")]
    TableFull {
        /// Capacity at the time of failure.
        capacity: usize,
    },

    /// An array index was outside the logical length.
    #[error("index {index} out of bounds for length {len}")]
    OutOfBounds {
        /// Offending index.
        index: usize,
        /// Logical length of the array.
        len: usize,
    },

    /// The prime sequence was asked for a prime below a bound that has none.
    #[error("no prime exists below {bound}")]
    NoPrimeBelow {
        /// The exhausted bound.
        bound: usize,
    },

    /// A configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A proposed allocation round broke a business rule.
    #[error("round rejected: {0}")]
    Validation(#[from] ValidationError),
}

/// Round-level business-rule violations detected by the allocator's
/// validation pass.
///
/// Any of these aborts the entire round; nothing is committed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The per-consumer result does not line up with the consumer list.
    #[error("expected {expected} consumer results, got {actual}")]
    LengthMismatch {
        /// Number of consumers in the round.
        expected: usize,
        /// Number of results in the proposal.
        actual: usize,
    },

    /// A proposed final balance is below zero.
    #[error("consumer {consumer} would end with negative balance {balance}")]
    NegativeBalance {
        /// Consumer position in the round.
        consumer: usize,
        /// Offending balance.
        balance: f64,
    },

    /// A consumer was granted extraction without buying the budget.
    #[error("consumer {consumer} extracts without purchasing a budget")]
    ExtractionWithoutPurchase {
        /// Consumer position in the round.
        consumer: usize,
    },

    /// A consumer cannot pay for the consumption budget.
    #[error("consumer {consumer} cannot afford budget cost {cost} with balance {balance}")]
    Unaffordable {
        /// Consumer position in the round.
        consumer: usize,
        /// Budget cost.
        cost: f64,
        /// Balance before the round.
        balance: f64,
    },

    /// A resource would be driven below zero stock.
    #[error("resource {resource} would fall to stock {remaining}")]
    InsufficientStock {
        /// Resource name.
        resource: String,
        /// Stock remaining after all extractions.
        remaining: f64,
    },

    /// An assigned resource's commodity has no active exchange offer.
    #[error("no exchange offer for commodity {commodity}")]
    NoExchangeOffer {
        /// Commodity name.
        commodity: String,
    },

    /// The extraction needs more capacity than the budget grants.
    #[error("consumer {consumer} needs {required} capacity, budget grants {available}")]
    InsufficientCapacity {
        /// Consumer position in the round.
        consumer: usize,
        /// Capacity consumed by the extraction.
        required: f64,
        /// Capacity granted by the budget.
        available: f64,
    },

    /// The proposed balance disagrees with the recomputed one.
    #[error("consumer {consumer} balance {proposed} differs from expected {expected}")]
    BalanceMismatch {
        /// Consumer position in the round.
        consumer: usize,
        /// Balance carried in the proposal.
        proposed: f64,
        /// Balance recomputed by validation.
        expected: f64,
    },

    /// The proposal buys a budget that was not on offer.
    #[error("budget {name} was not offered")]
    UnknownBudget {
        /// Budget name.
        name: String,
    },

    /// An assignment refers to a resource outside the round.
    #[error("assignment refers to unknown resource index {index}")]
    UnknownResource {
        /// Offending resource index.
        index: usize,
    },
}

/// Result type for crate operations.
pub type Result<T> = std::result::Result<T, Error>;
