//! Allocation engine configuration.

use crate::cp::SolverConfig;

/// Configuration for [`AllocationEngine`](super::AllocationEngine).
///
/// # Examples
///
/// ```
/// use pc_assembler::engine::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_min_spend_ratio(0.85)
///     .with_time_limit_ms(5_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Fraction of the budget the first solve phase must spend.
    pub min_spend_ratio: f64,

    /// Budget at or above which the minimum-spend phase runs.
    pub min_spend_budget: f64,

    /// Settings handed to the solver backend on every phase.
    pub solver: SolverConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_spend_ratio: 0.8,
            min_spend_budget: 1500.0,
            solver: SolverConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Sets the fraction of the budget the first phase must spend.
    pub fn with_min_spend_ratio(mut self, ratio: f64) -> Self {
        self.min_spend_ratio = ratio;
        self
    }

    /// Sets the budget at which the minimum-spend phase starts.
    pub fn with_min_spend_budget(mut self, budget: f64) -> Self {
        self.min_spend_budget = budget;
        self
    }

    /// Sets the solver time limit for each phase.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.solver.time_limit_ms = ms;
        self
    }

    /// Granularity of the price axis in currency units.
    pub fn with_price_resolution(mut self, resolution: f64) -> Self {
        self.solver.resolution = resolution;
        self
    }

    /// Spending floor for a budget, if the minimum-spend phase applies.
    pub fn min_spend(&self, budget: f64) -> Option<f64> {
        (budget >= self.min_spend_budget).then(|| budget * self.min_spend_ratio)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.min_spend_ratio > 0.0 && self.min_spend_ratio <= 1.0) {
            return Err(format!(
                "min_spend_ratio must be in (0, 1], got {}",
                self.min_spend_ratio
            ));
        }
        if !self.min_spend_budget.is_finite() {
            return Err("min_spend_budget must be finite".into());
        }
        self.solver.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.min_spend_ratio, 0.8);
        assert_eq!(config.min_spend_budget, 1500.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_min_spend_threshold() {
        let config = EngineConfig::default();
        assert_eq!(config.min_spend(1499.99), None);
        assert_eq!(config.min_spend(1500.0), Some(1200.0));
        assert_eq!(config.min_spend(3000.0), Some(2400.0));
    }

    #[test]
    fn test_validate_rejects_bad_ratio() {
        assert!(EngineConfig::default().with_min_spend_ratio(0.0).validate().is_err());
        assert!(EngineConfig::default().with_min_spend_ratio(1.2).validate().is_err());
        assert!(EngineConfig::default()
            .with_price_resolution(-1.0)
            .validate()
            .is_err());
    }
}
