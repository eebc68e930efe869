//! Two-phase multiple-choice knapsack allocation.
//!
//! [`AllocationEngine`] turns a [`CandidateSet`] into a [`CpModel`]:
//! one boolean per candidate, `ExactlyOne` per mandatory category,
//! `AtMostOne` per optional category, a price constraint bounded above by
//! the budget, and a utility-maximising objective. For large budgets the
//! first phase adds a minimum-spend floor; if that phase is infeasible the
//! model is solved once more without it.

use super::config::EngineConfig;
use super::types::{Bundle, BuildError, CandidateSet};
use crate::catalog::Category;
use crate::cp::{
    BoolVar, CpModel, CpSolution, CpSolver, DpKnapsackSolver, Objective, SolverStatus,
};
use log::{debug, error, info};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Slack for comparing summed prices against the budget.
const PRICE_EPSILON: f64 = 1e-6;

/// Selects one part per category maximising total utility within a budget.
///
/// The solving mechanism is any [`CpSolver`]; [`AllocationEngine::new`]
/// uses [`DpKnapsackSolver`].
#[derive(Clone)]
pub struct AllocationEngine {
    config: EngineConfig,
    solver: Arc<dyn CpSolver>,
}

impl AllocationEngine {
    /// Creates an engine backed by [`DpKnapsackSolver`].
    pub fn new(config: EngineConfig) -> Self {
        Self::with_solver(config, Arc::new(DpKnapsackSolver::new()))
    }

    /// Creates an engine backed by a custom solver.
    pub fn with_solver(config: EngineConfig, solver: Arc<dyn CpSolver>) -> Self {
        Self { config, solver }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Allocates the budget across the candidate set.
    ///
    /// # Errors
    ///
    /// - [`BuildError::MissingCategories`] when a mandatory category has no
    ///   candidates.
    /// - [`BuildError::Infeasible`] when no assignment fits the budget even
    ///   without the spending floor.
    /// - [`BuildError::Timeout`] / [`BuildError::Solver`] on backend faults.
    pub fn allocate(
        &self,
        candidates: &CandidateSet<'_>,
        budget: f64,
        goal: &str,
    ) -> Result<Bundle, BuildError> {
        let missing = candidates.missing_mandatory();
        if !missing.is_empty() {
            return Err(BuildError::MissingCategories(missing));
        }

        let mut min_spend = self.config.min_spend(budget);
        let mut solution = self.solve_phase(candidates, budget, min_spend)?;

        if solution.is_none() {
            if let Some(floor) = min_spend.take() {
                info!("Minimum spend of {floor:.2} is infeasible, retrying without it");
                solution = self.solve_phase(candidates, budget, None)?;
            }
        }

        let solution = solution.ok_or(BuildError::Infeasible)?;
        self.extract(candidates, &solution, budget, goal, min_spend)
    }

    /// Runs one solve. `Ok(None)` means the phase is infeasible.
    fn solve_phase(
        &self,
        candidates: &CandidateSet<'_>,
        budget: f64,
        min_spend: Option<f64>,
    ) -> Result<Option<CpSolution>, BuildError> {
        let model = build_model(candidates, budget, min_spend);
        debug!(
            "Solving {} with {}: {} variables, {} constraints",
            model.name,
            self.solver.name(),
            model.var_count(),
            model.constraint_count()
        );

        let solution = self.solver.solve(&model, &self.config.solver);
        info!(
            "Phase {} finished: {:?} in {} ms",
            if min_spend.is_some() { "min-spend" } else { "budget" },
            solution.status,
            solution.solve_time_ms
        );

        match solution.status {
            SolverStatus::Optimal | SolverStatus::Feasible => Ok(Some(solution)),
            SolverStatus::Infeasible => Ok(None),
            SolverStatus::Timeout => Err(BuildError::Timeout(Duration::from_millis(
                self.config.solver.time_limit_ms,
            ))),
            SolverStatus::ModelInvalid | SolverStatus::Unknown => {
                let message = solution
                    .message
                    .unwrap_or_else(|| format!("{:?}", solution.status));
                error!("Solver {} failed: {message}", self.solver.name());
                Err(BuildError::solver(message))
            }
        }
    }

    /// Reads the selection back and checks the bundle invariants.
    fn extract(
        &self,
        candidates: &CandidateSet<'_>,
        solution: &CpSolution,
        budget: f64,
        goal: &str,
        min_spend: Option<f64>,
    ) -> Result<Bundle, BuildError> {
        let mut selections = BTreeMap::new();

        for (category, items) in candidates.iter() {
            let mut picked = items
                .iter()
                .enumerate()
                .filter(|(i, _)| solution.value(&var_name(category, *i)))
                .map(|(_, candidate)| candidate);

            match (picked.next(), picked.next()) {
                (Some(candidate), None) => {
                    selections.insert(category, candidate.to_scored());
                }
                (None, _) if !category.is_mandatory() => {}
                (None, _) => {
                    return Err(BuildError::internal(format!(
                        "solver left mandatory category {category} unselected"
                    )))
                }
                (Some(_), Some(_)) => {
                    return Err(BuildError::internal(format!(
                        "solver selected several {category} parts"
                    )))
                }
            }
        }

        let total_price: f64 = selections.values().map(|s| s.part.price).sum();
        let total_utility: f64 = selections.values().map(|s| s.utility).sum();
        if total_price > budget + PRICE_EPSILON {
            return Err(BuildError::internal(format!(
                "selection costs {total_price:.2}, over the budget of {budget:.2}"
            )));
        }

        Ok(Bundle {
            goal: goal.to_string(),
            budget,
            selections,
            total_price,
            total_utility,
            remaining_budget: (budget - total_price).max(0.0),
            min_spend,
        })
    }
}

fn var_name(category: Category, index: usize) -> String {
    format!("{category}_{index}")
}

fn build_model(candidates: &CandidateSet<'_>, budget: f64, min_spend: Option<f64>) -> CpModel {
    let mut model = CpModel::new(format!("build_{budget:.2}"));
    let mut prices = Vec::with_capacity(candidates.len());
    let mut utilities = Vec::with_capacity(candidates.len());

    for (category, items) in candidates.iter() {
        let names: Vec<String> = (0..items.len()).map(|i| var_name(category, i)).collect();
        for (name, candidate) in names.iter().zip(items) {
            model.add_bool_var(BoolVar::new(name.clone()));
            prices.push((name.clone(), candidate.part.price));
            utilities.push((name.clone(), candidate.utility));
        }
        if category.is_mandatory() {
            model.add_exactly_one(names);
        } else {
            model.add_at_most_one(names);
        }
    }

    model.add_linear(prices, min_spend, Some(budget));
    model.set_objective(Objective::Maximize { terms: utilities });
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Part, PartSpec};
    use crate::cp::{SolverConfig, SolverStatus};
    use crate::engine::FailureKind;
    use crate::scoring::Candidate;

    fn part(category: Category, name: &str, price: f64) -> Part {
        let spec = match category {
            Category::Cpu => PartSpec::Cpu {
                core_count: 4.0,
                boost_clock_ghz: 3.0,
            },
            Category::Memory => PartSpec::Memory {
                total_capacity_gb: 8.0,
                speed_mhz: 3000.0,
            },
            Category::Motherboard => PartSpec::Motherboard { form_factor: None },
            Category::PowerSupply => PartSpec::PowerSupply {
                wattage: 500.0,
                efficiency: None,
            },
            Category::Case => PartSpec::Case { case_type: None },
            Category::VideoCard => PartSpec::VideoCard {
                memory_gb: 4.0,
                boost_clock_mhz: 1000.0,
            },
            Category::Storage => PartSpec::Storage {
                capacity_gb: 500.0,
                storage_type: None,
            },
        };
        Part::new(name, price, spec)
    }

    /// `(category, price, utility)` rows; part names are `{category}-{row}`.
    fn parts(rows: &[(Category, f64, f64)]) -> Vec<(Part, f64)> {
        rows.iter()
            .enumerate()
            .map(|(i, &(c, price, utility))| (part(c, &format!("{c}-{i}"), price), utility))
            .collect()
    }

    fn candidate_set(parts: &[(Part, f64)]) -> CandidateSet<'_> {
        let mut grouped: BTreeMap<Category, Vec<Candidate<'_>>> = BTreeMap::new();
        for (part, utility) in parts {
            grouped.entry(part.category()).or_default().push(Candidate {
                part,
                utility: *utility,
            });
        }
        let mut set = CandidateSet::new();
        for (category, candidates) in grouped {
            set.insert(category, candidates);
        }
        set
    }

    fn mandatory_rows(price: f64, utility: f64) -> Vec<(Category, f64, f64)> {
        Category::MANDATORY
            .iter()
            .map(|&c| (c, price, utility))
            .collect()
    }

    #[test]
    fn test_picks_best_utility_within_budget() {
        let mut rows = mandatory_rows(50.0, 1.0);
        rows.push((Category::Cpu, 150.0, 3.0));
        rows.push((Category::Cpu, 400.0, 5.0));
        let parts = parts(&rows);
        let engine = AllocationEngine::new(EngineConfig::default());

        // 4 * 50 + 400 = 600 fits in 1000.
        let bundle = engine.allocate(&candidate_set(&parts), 1000.0, "games").unwrap();
        assert_eq!(bundle.get(Category::Cpu).unwrap().part.price, 400.0);
        assert!(bundle.is_complete());
        assert_eq!(bundle.total_price, 600.0);
        assert_eq!(bundle.remaining_budget, 400.0);

        // 4 * 50 + 400 = 600 > 500, so the 150 cpu wins.
        let bundle = engine.allocate(&candidate_set(&parts), 500.0, "games").unwrap();
        assert_eq!(bundle.get(Category::Cpu).unwrap().part.price, 150.0);
        assert_eq!(bundle.min_spend, None);
    }

    #[test]
    fn test_missing_mandatory_category() {
        let rows: Vec<_> = mandatory_rows(50.0, 1.0)
            .into_iter()
            .filter(|r| r.0 != Category::Memory)
            .collect();
        let parts = parts(&rows);
        let engine = AllocationEngine::new(EngineConfig::default());

        let err = engine
            .allocate(&candidate_set(&parts), 1000.0, "office")
            .unwrap_err();
        assert!(matches!(err, BuildError::MissingCategories(ref c) if c == &[Category::Memory]));
        assert_eq!(err.kind(), FailureKind::Infeasible);
    }

    #[test]
    fn test_budget_too_small_is_infeasible() {
        let parts = parts(&mandatory_rows(20.0, 1.0));
        let engine = AllocationEngine::new(EngineConfig::default());
        let err = engine.allocate(&candidate_set(&parts), 50.0, "games").unwrap_err();
        assert!(matches!(err, BuildError::Infeasible));
    }

    #[test]
    fn test_optional_categories_skipped_when_unaffordable() {
        let mut rows = mandatory_rows(100.0, 1.0);
        rows.push((Category::VideoCard, 900.0, 50.0));
        rows.push((Category::Storage, 50.0, 2.0));
        let parts = parts(&rows);
        let engine = AllocationEngine::new(EngineConfig::default());

        let bundle = engine.allocate(&candidate_set(&parts), 800.0, "games").unwrap();
        assert!(bundle.get(Category::VideoCard).is_none());
        assert!(bundle.get(Category::Storage).is_some());
        assert_eq!(bundle.selections.len(), 6);
    }

    #[test]
    fn test_min_spend_phase_prefers_floor() {
        let mut rows = mandatory_rows(100.0, 10.0);
        rows.extend(mandatory_rows(350.0, 9.0));
        let parts = parts(&rows);
        let engine = AllocationEngine::new(EngineConfig::default());

        let bundle = engine.allocate(&candidate_set(&parts), 2000.0, "games").unwrap();
        assert_eq!(bundle.min_spend, Some(1600.0));
        assert_eq!(bundle.total_price, 1750.0);
        assert!(bundle.total_price >= 0.8 * 2000.0);
    }

    #[test]
    fn test_min_spend_falls_back_when_unreachable() {
        let parts = parts(&mandatory_rows(100.0, 10.0));
        let engine = AllocationEngine::new(EngineConfig::default());

        let bundle = engine.allocate(&candidate_set(&parts), 2000.0, "games").unwrap();
        assert_eq!(bundle.min_spend, None);
        assert_eq!(bundle.total_price, 500.0);
    }

    #[test]
    fn test_min_spend_floor_with_cent_prices() {
        let mut rows: Vec<_> = mandatory_rows(1.0, 1.0)
            .into_iter()
            .filter(|r| r.0 != Category::Cpu)
            .collect();
        rows.push((Category::Cpu, 1195.5, 10.0));
        rows.push((Category::Cpu, 1196.0, 1.0));
        let parts = parts(&rows);
        let engine = AllocationEngine::new(EngineConfig::default());

        // Only the 1196.00 cpu brings the bundle to the 1200 floor.
        let bundle = engine.allocate(&candidate_set(&parts), 1500.0, "games").unwrap();
        assert_eq!(bundle.min_spend, Some(1200.0));
        assert_eq!(bundle.get(Category::Cpu).unwrap().part.price, 1196.0);
        assert!((bundle.total_price - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn test_cent_prices_fill_budget() {
        let mut rows: Vec<_> = mandatory_rows(100.2, 1.0)
            .into_iter()
            .filter(|r| r.0 != Category::Case)
            .collect();
        rows.push((Category::Case, 99.1, 1.0));
        let parts = parts(&rows);
        let engine = AllocationEngine::new(EngineConfig::default());

        let bundle = engine.allocate(&candidate_set(&parts), 500.0, "office").unwrap();
        assert!(bundle.is_complete());
        assert!((bundle.total_price - 499.9).abs() < 1e-9);
    }

    #[test]
    fn test_solver_time_limit_maps_to_timeout() {
        let parts = parts(&mandatory_rows(100.0, 1.0));
        let engine = AllocationEngine::new(EngineConfig::default().with_time_limit_ms(0));
        let err = engine.allocate(&candidate_set(&parts), 1000.0, "games").unwrap_err();
        assert!(matches!(err, BuildError::Timeout(_)));
        assert_eq!(err.kind(), FailureKind::Internal);
    }

    struct FixedSolver(CpSolution);

    impl CpSolver for FixedSolver {
        fn name(&self) -> &str {
            "fixed"
        }

        fn solve(&self, _model: &CpModel, _config: &SolverConfig) -> CpSolution {
            self.0.clone()
        }
    }

    #[test]
    fn test_backend_fault_is_solver_error() {
        let parts = parts(&mandatory_rows(100.0, 1.0));
        let solver = FixedSolver(CpSolution::with_message(SolverStatus::ModelInvalid, "broken"));
        let engine = AllocationEngine::with_solver(EngineConfig::default(), Arc::new(solver));

        let err = engine.allocate(&candidate_set(&parts), 1000.0, "games").unwrap_err();
        assert!(matches!(err, BuildError::Solver(ref m) if m == "broken"));
    }

    #[test]
    fn test_rejects_double_selection() {
        let mut rows = mandatory_rows(100.0, 1.0);
        rows.push((Category::Cpu, 100.0, 1.0));
        let parts = parts(&rows);

        let mut solution = CpSolution::empty(SolverStatus::Optimal);
        for name in ["cpu_0", "cpu_1", "memory_0", "motherboard_0", "power_supply_0", "case_0"] {
            solution.bool_vars.insert(name.into(), true);
        }
        let engine =
            AllocationEngine::with_solver(EngineConfig::default(), Arc::new(FixedSolver(solution)));

        let err = engine.allocate(&candidate_set(&parts), 1000.0, "games").unwrap_err();
        assert!(matches!(err, BuildError::Internal(_)));
    }

    #[test]
    fn test_deterministic() {
        let mut rows = mandatory_rows(100.0, 5.0);
        rows.extend(mandatory_rows(100.0, 5.0));
        let parts = parts(&rows);
        let engine = AllocationEngine::new(EngineConfig::default());

        let a = engine.allocate(&candidate_set(&parts), 900.0, "video").unwrap();
        let b = engine.allocate(&candidate_set(&parts), 900.0, "video").unwrap();
        assert_eq!(a, b);
        // Equal candidates resolve to the earlier one.
        assert_eq!(a.get(Category::Cpu).unwrap().part.name, "cpu-0");
    }
}
