//! Price-fit heuristic configuration.

/// Budget at or above which the high tier applies.
pub const HIGH_BUDGET: f64 = 2000.0;
/// Budget at or above which the medium tier applies.
pub const MEDIUM_BUDGET: f64 = 1000.0;
/// Budget at or above which the raw price bonus is added.
pub const PRICE_BONUS_MIN_BUDGET: f64 = 1500.0;

/// A price breakpoint relative to the category's target price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceBound {
    /// `price > target * ratio`
    Above(f64),
    /// `price >= target * ratio`
    AtLeast(f64),
}

impl PriceBound {
    fn matches(self, price: f64, target: f64) -> bool {
        match self {
            PriceBound::Above(ratio) => price > target * ratio,
            PriceBound::AtLeast(ratio) => price >= target * ratio,
        }
    }
}

/// Step function mapping `price / target` to a multiplier, for one
/// budget tier.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTier {
    /// Smallest total budget this tier applies to.
    pub min_budget: f64,
    /// Breakpoints checked in order; the first match wins.
    pub bands: Vec<(PriceBound, f64)>,
    /// Factor when no breakpoint matches (far below target).
    pub fallback: f64,
}

impl PriceTier {
    pub fn factor(&self, price: f64, target: f64) -> f64 {
        self.bands
            .iter()
            .find(|(bound, _)| bound.matches(price, target))
            .map(|&(_, factor)| factor)
            .unwrap_or(self.fallback)
    }
}

/// Configuration for [`UtilityScorer`](super::UtilityScorer).
///
/// # Examples
///
/// ```
/// use pc_assembler::scoring::ScoringConfig;
///
/// let config = ScoringConfig::default().with_parallel(true);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.tier_for(2500.0).min_budget, 2000.0);
/// ```
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Budget tiers, highest `min_budget` first. The last tier must
    /// accept every budget.
    pub tiers: Vec<PriceTier>,

    /// Budget at or above which `min(price / price_divisor,
    /// target / target_divisor)` is added to the utility.
    pub price_bonus_min_budget: f64,
    pub bonus_price_divisor: f64,
    pub bonus_target_divisor: f64,

    /// Whether to score large candidate sets in parallel using rayon.
    pub parallel: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        use PriceBound::{Above, AtLeast};

        Self {
            tiers: vec![
                PriceTier {
                    min_budget: HIGH_BUDGET,
                    bands: vec![
                        (Above(2.0), 0.6),
                        (Above(1.5), 0.8),
                        (Above(1.0), 0.9),
                        (AtLeast(0.7), 1.2),
                        (AtLeast(0.4), 1.0),
                    ],
                    fallback: 0.7,
                },
                PriceTier {
                    min_budget: MEDIUM_BUDGET,
                    bands: vec![
                        (Above(1.5), 0.6),
                        (Above(1.2), 0.8),
                        (Above(1.0), 0.9),
                        (AtLeast(0.6), 1.1),
                        (AtLeast(0.3), 1.0),
                    ],
                    fallback: 0.8,
                },
                PriceTier {
                    min_budget: 0.0,
                    bands: vec![
                        (Above(1.2), 0.5),
                        (Above(1.0), 0.7),
                        (AtLeast(0.8), 1.0),
                        (AtLeast(0.5), 0.9),
                    ],
                    fallback: 0.8,
                },
            ],
            price_bonus_min_budget: PRICE_BONUS_MIN_BUDGET,
            bonus_price_divisor: 100.0,
            bonus_target_divisor: 50.0,
            parallel: false,
        }
    }
}

impl ScoringConfig {
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_tiers(mut self, tiers: Vec<PriceTier>) -> Self {
        self.tiers = tiers;
        self
    }

    pub fn with_price_bonus_min_budget(mut self, budget: f64) -> Self {
        self.price_bonus_min_budget = budget;
        self
    }

    /// The tier governing a given total budget.
    ///
    /// Falls back to the last tier, which [`validate`](Self::validate)
    /// requires to cover every budget.
    pub fn tier_for(&self, budget: f64) -> &PriceTier {
        self.tiers
            .iter()
            .find(|tier| budget >= tier.min_budget)
            .or_else(|| self.tiers.last())
            .unwrap_or(&FALLBACK_TIER)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.tiers.is_empty() {
            return Err("at least one price tier is required".into());
        }
        for pair in self.tiers.windows(2) {
            if pair[0].min_budget <= pair[1].min_budget {
                return Err("price tiers must be ordered by descending min_budget".into());
            }
        }
        if let Some(last) = self.tiers.last() {
            if last.min_budget > 0.0 {
                return Err(format!(
                    "last price tier must cover every budget, starts at {}",
                    last.min_budget
                ));
            }
        }
        for tier in &self.tiers {
            let factors = tier.bands.iter().map(|&(_, f)| f).chain([tier.fallback]);
            for factor in factors {
                if !(factor.is_finite() && factor > 0.0) {
                    return Err(format!("price factor must be positive, got {factor}"));
                }
            }
        }
        if self.bonus_price_divisor <= 0.0 || self.bonus_target_divisor <= 0.0 {
            return Err("price bonus divisors must be positive".into());
        }
        Ok(())
    }
}

static FALLBACK_TIER: PriceTier = PriceTier {
    min_budget: 0.0,
    bands: Vec::new(),
    fallback: 1.0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ScoringConfig::default().validate().is_ok());
    }

    #[test]
    fn test_tier_selection() {
        let config = ScoringConfig::default();
        assert_eq!(config.tier_for(5000.0).min_budget, HIGH_BUDGET);
        assert_eq!(config.tier_for(2000.0).min_budget, HIGH_BUDGET);
        assert_eq!(config.tier_for(1999.0).min_budget, MEDIUM_BUDGET);
        assert_eq!(config.tier_for(1000.0).min_budget, MEDIUM_BUDGET);
        assert_eq!(config.tier_for(999.0).min_budget, 0.0);
    }

    #[test]
    fn test_high_tier_breakpoints() {
        let config = ScoringConfig::default();
        let tier = config.tier_for(3000.0);
        let target = 100.0;
        assert_eq!(tier.factor(201.0, target), 0.6);
        assert_eq!(tier.factor(200.0, target), 0.8);
        assert_eq!(tier.factor(151.0, target), 0.8);
        assert_eq!(tier.factor(150.0, target), 0.9);
        assert_eq!(tier.factor(100.0, target), 1.2);
        assert_eq!(tier.factor(70.0, target), 1.2);
        assert_eq!(tier.factor(69.0, target), 1.0);
        assert_eq!(tier.factor(40.0, target), 1.0);
        assert_eq!(tier.factor(39.0, target), 0.7);
    }

    #[test]
    fn test_medium_tier_breakpoints() {
        let config = ScoringConfig::default();
        let tier = config.tier_for(1200.0);
        let target = 100.0;
        assert_eq!(tier.factor(151.0, target), 0.6);
        assert_eq!(tier.factor(121.0, target), 0.8);
        assert_eq!(tier.factor(101.0, target), 0.9);
        assert_eq!(tier.factor(60.0, target), 1.1);
        assert_eq!(tier.factor(30.0, target), 1.0);
        assert_eq!(tier.factor(29.0, target), 0.8);
    }

    #[test]
    fn test_low_tier_breakpoints() {
        let config = ScoringConfig::default();
        let tier = config.tier_for(500.0);
        let target = 100.0;
        assert_eq!(tier.factor(121.0, target), 0.5);
        assert_eq!(tier.factor(120.0, target), 0.7);
        assert_eq!(tier.factor(80.0, target), 1.0);
        assert_eq!(tier.factor(50.0, target), 0.9);
        assert_eq!(tier.factor(49.0, target), 0.8);
    }

    #[test]
    fn test_validate_rejects_unordered_tiers() {
        let mut config = ScoringConfig::default();
        config.tiers.reverse();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_uncovered_budgets() {
        let mut config = ScoringConfig::default();
        config.tiers.pop();
        assert!(config.validate().is_err());
    }
}
