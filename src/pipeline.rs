//! Request pipeline: filter, score, allocate.

use crate::catalog::{Catalog, Category};
use crate::engine::{AllocationEngine, Bundle, BuildError, CandidateSet, EngineConfig};
use crate::filter::{CandidateFilter, FilterConfig};
use crate::profile::GoalProfile;
use crate::scoring::{ScoringConfig, UtilityScorer};
use log::{debug, info};

/// Synchronous, CPU-bound build for one `(budget, goal)` request.
///
/// Holds no per-request state, so one instance serves concurrent
/// requests.
#[derive(Clone)]
pub struct Pipeline {
    filter: CandidateFilter,
    scoring: ScoringConfig,
    engine: AllocationEngine,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(
            FilterConfig::default(),
            ScoringConfig::default(),
            AllocationEngine::new(EngineConfig::default()),
        )
    }
}

impl Pipeline {
    pub fn new(filter: FilterConfig, scoring: ScoringConfig, engine: AllocationEngine) -> Self {
        Self {
            filter: CandidateFilter::new(filter),
            scoring,
            engine,
        }
    }

    pub fn engine(&self) -> &AllocationEngine {
        &self.engine
    }

    /// Validates every stage's configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.filter.config().validate()?;
        self.scoring.validate()?;
        self.engine.config().validate()
    }

    /// Builds the best bundle for a budget and goal.
    ///
    /// Unknown goals are scored with the `universal` profile; the goal
    /// string is echoed unchanged in the bundle.
    pub fn run(&self, catalog: &Catalog, budget: f64, goal: &str) -> Result<Bundle, BuildError> {
        if !(budget.is_finite() && budget > 0.0) {
            return Err(BuildError::invalid_request(format!(
                "budget must be a positive amount, got {budget}"
            )));
        }

        let profile = GoalProfile::resolve(goal);
        if profile.goal.id() != goal {
            debug!("Unknown goal {goal:?}, using the {} profile", profile.goal);
        }
        let scorer = UtilityScorer::new(&self.scoring, profile, budget);

        let mut candidates = CandidateSet::new();
        for category in Category::ALL {
            let parts = catalog.parts(category);
            if parts.is_empty() {
                continue;
            }
            let kept = self.filter.filter(category, parts, profile, budget);
            candidates.insert(category, scorer.score_all(category, &kept));
        }

        info!(
            "Allocating {budget:.2} for {goal} over {} candidates",
            candidates.len()
        );
        self.engine.allocate(&candidates, budget, goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Part, PartSpec};
    use crate::engine::FailureKind;

    fn small_catalog() -> Catalog {
        Catalog::from_parts([
            Part::new(
                "Ryzen 5",
                150.0,
                PartSpec::Cpu {
                    core_count: 6.0,
                    boost_clock_ghz: 4.4,
                },
            ),
            Part::new(
                "Ryzen 9",
                400.0,
                PartSpec::Cpu {
                    core_count: 12.0,
                    boost_clock_ghz: 4.8,
                },
            ),
            Part::new(
                "16GB Kit",
                60.0,
                PartSpec::Memory {
                    total_capacity_gb: 16.0,
                    speed_mhz: 3200.0,
                },
            ),
            Part::new(
                "B550",
                100.0,
                PartSpec::Motherboard {
                    form_factor: Some("ATX".into()),
                },
            ),
            Part::new(
                "650W",
                70.0,
                PartSpec::PowerSupply {
                    wattage: 650.0,
                    efficiency: Some("gold".into()),
                },
            ),
            Part::new(
                "Mid",
                30.0,
                PartSpec::Case {
                    case_type: Some("ATX Mid Tower".into()),
                },
            ),
            Part::new(
                "RTX",
                350.0,
                PartSpec::VideoCard {
                    memory_gb: 8.0,
                    boost_clock_mhz: 1800.0,
                },
            ),
        ])
    }

    #[test]
    fn test_rejects_bad_budget() {
        let pipeline = Pipeline::default();
        let catalog = small_catalog();
        for budget in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let err = pipeline.run(&catalog, budget, "games").unwrap_err();
            assert!(matches!(err, BuildError::InvalidRequest(_)));
        }
    }

    #[test]
    fn test_builds_complete_bundle() {
        let pipeline = Pipeline::default();
        let bundle = pipeline.run(&small_catalog(), 1000.0, "games").unwrap();
        assert!(bundle.is_complete());
        assert!(bundle.total_price <= 1000.0);
        assert_eq!(bundle.goal, "games");
    }

    #[test]
    fn test_tiny_budget_is_infeasible() {
        let pipeline = Pipeline::default();
        let err = pipeline.run(&small_catalog(), 50.0, "games").unwrap_err();
        assert_eq!(err.kind(), FailureKind::Infeasible);
    }

    #[test]
    fn test_unknown_goal_matches_universal() {
        let pipeline = Pipeline::default();
        let catalog = small_catalog();
        let unknown = pipeline.run(&catalog, 1200.0, "unknown_value").unwrap();
        let universal = pipeline.run(&catalog, 1200.0, "universal").unwrap();

        assert_eq!(unknown.goal, "unknown_value");
        assert_eq!(unknown.selections, universal.selections);
        assert_eq!(unknown.total_price, universal.total_price);
    }

    #[test]
    fn test_default_pipeline_is_valid() {
        assert!(Pipeline::default().validate().is_ok());
    }
}
