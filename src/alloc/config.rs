//! Allocator configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::table::TableConfig;

/// Tolerance used for every floating-point comparison in a round.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Configuration for the greedy [`Allocator`](super::Allocator).
///
/// # Examples
///
/// ```
/// use u_allocore::alloc::AllocatorConfig;
///
/// let config = AllocatorConfig::default().with_epsilon(1e-9);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AllocatorConfig {
    /// Floating-point tolerance for ordering, affordability, profit and
    /// balance checks.
    pub epsilon: f64,

    /// Sizing of the per-round lookup tables (best rates, remaining stock).
    pub table: TableConfig,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            table: TableConfig::default(),
        }
    }
}

impl AllocatorConfig {
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_table(mut self, table: TableConfig) -> Self {
        self.table = table;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(format!("epsilon must be positive, got {}", self.epsilon));
        }
        self.table.validate()
    }
}
