//! Probe table sizing configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sizing policy for a [`ProbeTable`](super::ProbeTable).
///
/// # Examples
///
/// ```
/// use u_allocore::table::TableConfig;
///
/// let config = TableConfig::default()
///     .with_size_multiplier(3.0)
///     .with_growth_factor(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TableConfig {
    /// Highest `count / capacity` ratio allowed right after an insertion.
    pub load_factor: f64,

    /// Initial capacity target is `round(size_multiplier * expected)`,
    /// lowered to the nearest prime.
    pub size_multiplier: f64,

    /// Each rehash targets the largest prime below
    /// `growth_factor * previous_prime`.
    pub growth_factor: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            load_factor: 0.5,
            size_multiplier: 2.5,
            growth_factor: 2,
        }
    }
}

impl TableConfig {
    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    pub fn with_size_multiplier(mut self, multiplier: f64) -> Self {
        self.size_multiplier = multiplier;
        self
    }

    pub fn with_growth_factor(mut self, factor: usize) -> Self {
        self.growth_factor = factor;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.load_factor > 0.0 && self.load_factor <= 1.0) {
            return Err(format!(
                "load_factor must be in (0, 1], got {}",
                self.load_factor
            ));
        }
        if self.size_multiplier <= 0.0 {
            return Err("size_multiplier must be positive".into());
        }
        if self.growth_factor < 2 {
            return Err(format!(
                "growth_factor must be at least 2, got {}",
                self.growth_factor
            ));
        }
        Ok(())
    }
}
