//! Goal- and budget-adjusted utility.

use super::base::base_utility;
use super::config::ScoringConfig;
use crate::catalog::{Category, Part};
use crate::profile::GoalProfile;
use rayon::prelude::*;
use serde::Serialize;

/// Candidate sets at least this large are scored on the rayon pool when
/// [`ScoringConfig::parallel`] is set.
const PARALLEL_MIN_PARTS: usize = 256;

/// A catalog part with its utility for one request.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub part: &'a Part,
    pub utility: f64,
}

impl Candidate<'_> {
    /// Detaches the candidate from the catalog borrow.
    pub fn to_scored(&self) -> ScoredPart {
        ScoredPart {
            part: self.part.clone(),
            utility: self.utility,
        }
    }
}

/// An owned part with its utility, as selected into a bundle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPart {
    pub part: Part,
    pub utility: f64,
}

/// Scores parts for one `(goal, budget)` request.
///
/// Utility = `base * w^2 * price_factor + price_bonus`, where `w` is the
/// goal's importance weight for the part's category, `price_factor`
/// comes from the budget tier's step function over `price / target`,
/// and `price_bonus = min(price / 100, target / 50)` for large budgets.
pub struct UtilityScorer<'c> {
    config: &'c ScoringConfig,
    profile: &'static GoalProfile,
    budget: f64,
}

impl<'c> UtilityScorer<'c> {
    pub fn new(config: &'c ScoringConfig, profile: &'static GoalProfile, budget: f64) -> Self {
        Self {
            config,
            profile,
            budget,
        }
    }

    /// Final utility, or `None` when the part has no usable price.
    pub fn score(&self, part: &Part) -> Option<f64> {
        if !part.has_valid_price() {
            return None;
        }

        let category = part.category();
        let weight = self.profile.importance.get(category);
        let target = self.profile.target_price(category, self.budget);

        let price_factor = self.config.tier_for(self.budget).factor(part.price, target);
        let price_bonus = if self.budget >= self.config.price_bonus_min_budget {
            (part.price / self.config.bonus_price_divisor)
                .min(target / self.config.bonus_target_divisor)
        } else {
            0.0
        };

        Some(base_utility(part) * weight * weight * price_factor + price_bonus)
    }

    /// Scores a category's parts, dropping those without positive utility.
    ///
    /// Output order follows input order.
    pub fn score_all<'a>(&self, category: Category, parts: &[&'a Part]) -> Vec<Candidate<'a>> {
        let score_one = |part: &&'a Part| -> Option<Candidate<'a>> {
            let utility = self.score(part)?;
            (utility.is_finite() && utility > 0.0).then_some(Candidate {
                part: *part,
                utility,
            })
        };

        let candidates: Vec<Candidate<'a>> =
            if self.config.parallel && parts.len() >= PARALLEL_MIN_PARTS {
                parts.par_iter().filter_map(score_one).collect()
            } else {
                parts.iter().filter_map(score_one).collect()
            };

        let dropped = parts.len() - candidates.len();
        if dropped > 0 {
            log::debug!("Dropped {dropped} {category} parts without positive utility");
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PartSpec;
    use crate::profile::Goal;

    fn cpu(price: f64) -> Part {
        Part::new(
            "cpu",
            price,
            PartSpec::Cpu {
                core_count: 6.0,
                boost_clock_ghz: 4.0,
            },
        )
    }

    #[test]
    fn test_low_budget_formula() {
        // games, budget 500: cpu weight 0.20, target 100.
        // base = 50 + 6*4*2 = 98; price 90 is >= 0.8 target -> factor 1.0.
        let config = ScoringConfig::default();
        let scorer = UtilityScorer::new(&config, GoalProfile::for_goal(Goal::Games), 500.0);
        let utility = scorer.score(&cpu(90.0)).unwrap();
        assert!((utility - 98.0 * 0.04 * 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_price_bonus_applies_from_1500() {
        // games, budget 1500: cpu target 300, medium tier.
        // price 250 -> ratio 0.83 -> factor 1.1; bonus min(2.5, 6.0) = 2.5.
        let config = ScoringConfig::default();
        let scorer = UtilityScorer::new(&config, GoalProfile::for_goal(Goal::Games), 1500.0);
        let utility = scorer.score(&cpu(250.0)).unwrap();
        assert!((utility - (98.0 * 0.04 * 1.1 + 2.5)).abs() < 1e-9);

        let scorer = UtilityScorer::new(&config, GoalProfile::for_goal(Goal::Games), 1499.0);
        let utility = scorer.score(&cpu(250.0)).unwrap();
        assert!((utility - 98.0 * 0.04 * 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_price_bonus_capped_by_target() {
        // games, budget 2000: case target 60, bonus cap 60/50 = 1.2.
        let config = ScoringConfig::default();
        let scorer = UtilityScorer::new(&config, GoalProfile::for_goal(Goal::Games), 2000.0);
        let case = Part::new(
            "case",
            500.0,
            PartSpec::Case {
                case_type: Some("ATX Mid Tower".into()),
            },
        );
        // 500 > 2 * 60 -> factor 0.6
        let expected = 65.0 * 0.07 * 0.07 * 0.6 + 1.2;
        assert!((scorer.score(&case).unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_price_yields_none() {
        let config = ScoringConfig::default();
        let scorer = UtilityScorer::new(&config, GoalProfile::for_goal(Goal::Office), 800.0);
        assert!(scorer.score(&cpu(0.0)).is_none());
        assert!(scorer.score(&cpu(-1.0)).is_none());
    }

    #[test]
    fn test_unknown_goal_scores_like_universal() {
        let config = ScoringConfig::default();
        let a = UtilityScorer::new(&config, GoalProfile::resolve("unknown_value"), 1200.0);
        let b = UtilityScorer::new(&config, GoalProfile::resolve("universal"), 1200.0);
        assert_eq!(a.score(&cpu(300.0)), b.score(&cpu(300.0)));
    }

    #[test]
    fn test_score_all_parallel_matches_sequential() {
        let parts: Vec<Part> = (1..=600).map(|i| cpu(i as f64)).collect();
        let refs: Vec<&Part> = parts.iter().collect();
        let profile = GoalProfile::for_goal(Goal::Video);

        let sequential = ScoringConfig::default();
        let parallel = ScoringConfig::default().with_parallel(true);

        let a = UtilityScorer::new(&sequential, profile, 2500.0).score_all(Category::Cpu, &refs);
        let b = UtilityScorer::new(&parallel, profile, 2500.0).score_all(Category::Cpu, &refs);

        assert_eq!(a.len(), 600);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert!(std::ptr::eq(x.part, y.part));
            assert_eq!(x.utility, y.utility);
        }
    }

    #[test]
    fn test_score_all_is_positive() {
        let parts = [cpu(10.0), cpu(5000.0)];
        let refs: Vec<&Part> = parts.iter().collect();
        let config = ScoringConfig::default();
        let scorer = UtilityScorer::new(&config, GoalProfile::for_goal(Goal::Games), 300.0);
        for candidate in scorer.score_all(Category::Cpu, &refs) {
            assert!(candidate.utility > 0.0);
        }
    }
}
