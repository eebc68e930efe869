//! Dynamic-programming backend for multiple-choice knapsack models.
//!
//! Accepts models of the following shape:
//!
//! - every variable belongs to at most one `ExactlyOne` / `AtMostOne`
//!   group (ungrouped variables become singleton optional groups);
//! - all `Linear` constraints share one non-negative coefficient vector
//!   (the resource), each contributing a lower and/or upper bound;
//! - the objective is any linear function of the variables.
//!
//! Coefficients are mapped to integer weights in units of
//! [`SolverConfig::resolution`]. The search is exact whenever every
//! coefficient is a multiple of the resolution (prices in cents at the
//! default `0.01`). Coefficients off the grid are rounded up, so the
//! real-valued upper bound still holds.
//!
//! Each layer keeps one state per reachable total weight. A state whose
//! every completion clears the lower bound is dropped when a cheaper such
//! state has at least its objective; states that can no longer reach the
//! lower bound or fit the upper bound are dropped outright.
//!
//! Ties are broken by higher objective, then lower total, then the
//! earlier variable, so identical models always yield identical
//! assignments.

use super::model::{Constraint, CpModel, Objective};
use super::solver::{CpSolution, CpSolver, SolverConfig, SolverStatus};
use std::collections::HashMap;
use std::time::{Duration, Instant};

const EPSILON: f64 = 1e-9;

/// Slack, in weight units, when mapping reals onto the integer axis.
const GRID_TOLERANCE: f64 = 1e-6;

/// Largest resource axis the solver will allocate.
const MAX_BUCKETS: usize = 50_000_000;

/// How often (in items) the time limit is checked inside a group.
const TIME_CHECK_INTERVAL: usize = 64;

/// Exact MCKP solver over an integer resource axis.
///
/// # Examples
///
/// ```
/// use pc_assembler::cp::{BoolVar, CpModel, CpSolver, DpKnapsackSolver, Objective, SolverConfig};
///
/// let mut model = CpModel::new("pick");
/// for name in ["a1", "a2", "b1", "b2"] {
///     model.add_bool_var(BoolVar::new(name));
/// }
/// model.add_exactly_one(vec!["a1".into(), "a2".into()]);
/// model.add_exactly_one(vec!["b1".into(), "b2".into()]);
/// model.add_linear(
///     vec![("a1".into(), 10.0), ("a2".into(), 20.0), ("b1".into(), 5.0), ("b2".into(), 15.0)],
///     None,
///     Some(30.0),
/// );
/// model.set_objective(Objective::Maximize {
///     terms: vec![("a1".into(), 5.0), ("a2".into(), 8.0), ("b1".into(), 1.0), ("b2".into(), 9.0)],
/// });
///
/// let solution = DpKnapsackSolver::new().solve(&model, &SolverConfig::default());
/// assert!(solution.value("a1") && solution.value("b2"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DpKnapsackSolver;

impl DpKnapsackSolver {
    /// Creates the solver. It holds no state between solves.
    pub fn new() -> Self {
        Self
    }
}

impl CpSolver for DpKnapsackSolver {
    fn name(&self) -> &str {
        "dp-knapsack"
    }

    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution {
        let start = Instant::now();

        let problem = match Problem::compile(model, config) {
            Ok(problem) => problem,
            Err(Rejection::Invalid(message)) => {
                return CpSolution::with_message(SolverStatus::ModelInvalid, message)
            }
            Err(Rejection::Infeasible(message)) => {
                return CpSolution::with_message(SolverStatus::Infeasible, message)
            }
        };

        let limit = Duration::from_millis(config.time_limit_ms);
        let mut solution = problem.run(start, limit);
        solution.solve_time_ms = start.elapsed().as_millis() as u64;
        solution
    }
}

enum Rejection {
    Invalid(String),
    Infeasible(String),
}

struct Group {
    items: Vec<usize>,
    required: bool,
}

#[derive(Debug, Clone, Copy)]
enum Choice {
    Skip,
    /// Position within the group's item list.
    Take(u32),
}

/// Best way found to reach one total weight.
#[derive(Debug, Clone, Copy)]
struct Entry {
    value: f64,
    cost: f64,
    /// Index of the predecessor in the previous layer.
    parent: u32,
    choice: Choice,
}

/// A reachable state after some prefix of the groups.
#[derive(Debug, Clone, Copy)]
struct Node {
    weight: usize,
    entry: Entry,
}

/// A model compiled into index form.
struct Problem {
    names: Vec<String>,
    value: Vec<f64>,
    cost: Vec<f64>,
    weight: Vec<usize>,
    groups: Vec<Group>,
    lower: Option<f64>,
    upper: Option<f64>,
    /// Lower bound on the integer axis.
    floor: usize,
    /// Upper bound on the integer axis.
    capacity: usize,
    /// -1.0 when minimising, so the DP always maximises.
    sense: f64,
}

impl Problem {
    fn compile(model: &CpModel, config: &SolverConfig) -> Result<Self, Rejection> {
        model.validate().map_err(Rejection::Invalid)?;
        config.validate().map_err(Rejection::Invalid)?;

        let names = model.var_order.clone();
        let index: HashMap<&str, usize> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();
        let n = names.len();

        let sense = match model.objective {
            Some(Objective::Minimize { .. }) => -1.0,
            _ => 1.0,
        };
        let mut value = vec![0.0; n];
        let objective_terms = model.objective.as_ref().map(Objective::terms).unwrap_or(&[]);
        for (name, coef) in objective_terms {
            value[index[name.as_str()]] += sense * coef;
        }

        let mut groups = Vec::new();
        let mut grouped = vec![false; n];
        let mut weights: Option<Vec<f64>> = None;
        let mut lower: Option<f64> = None;
        let mut upper: Option<f64> = None;

        for constraint in &model.constraints {
            match constraint {
                Constraint::ExactlyOne { vars } | Constraint::AtMostOne { vars } => {
                    let mut items = Vec::with_capacity(vars.len());
                    for name in vars {
                        let i = index[name.as_str()];
                        if grouped[i] {
                            return Err(Rejection::Invalid(format!(
                                "variable {name} appears in more than one choice group"
                            )));
                        }
                        grouped[i] = true;
                        items.push(i);
                    }
                    groups.push(Group {
                        items,
                        required: matches!(constraint, Constraint::ExactlyOne { .. }),
                    });
                }
                Constraint::Linear {
                    terms,
                    lower: lo,
                    upper: hi,
                } => {
                    let mut coefs = vec![0.0; n];
                    for (name, coef) in terms {
                        coefs[index[name.as_str()]] += coef;
                    }
                    if coefs.iter().any(|&c| c < 0.0) {
                        return Err(Rejection::Invalid(
                            "linear coefficients must be non-negative".into(),
                        ));
                    }
                    match &weights {
                        None => weights = Some(coefs),
                        Some(existing) => {
                            let same = existing
                                .iter()
                                .zip(&coefs)
                                .all(|(a, b)| (a - b).abs() <= EPSILON);
                            if !same {
                                return Err(Rejection::Invalid(
                                    "linear constraints must share one coefficient vector".into(),
                                ));
                            }
                        }
                    }
                    if let Some(lo) = lo {
                        lower = Some(lower.map_or(*lo, |l| l.max(*lo)));
                    }
                    if let Some(hi) = hi {
                        upper = Some(upper.map_or(*hi, |u| u.min(*hi)));
                    }
                }
            }
        }

        for i in (0..n).filter(|&i| !grouped[i]) {
            groups.push(Group {
                items: vec![i],
                required: false,
            });
        }

        if let Some(g) = groups.iter().position(|g| g.required && g.items.is_empty()) {
            return Err(Rejection::Infeasible(format!("choice group {g} is empty")));
        }
        if let (Some(lo), Some(hi)) = (lower, upper) {
            if lo > hi + EPSILON {
                return Err(Rejection::Infeasible(format!(
                    "lower bound {lo} exceeds upper bound {hi}"
                )));
            }
        }
        if matches!(upper, Some(hi) if hi < -EPSILON) {
            return Err(Rejection::Infeasible("upper bound is negative".into()));
        }

        let resolution = config.resolution;
        let cost = weights.unwrap_or_else(|| vec![0.0; n]);
        let weight: Vec<usize> = cost
            .iter()
            .map(|c| (c / resolution - GRID_TOLERANCE).ceil().max(0.0) as usize)
            .collect();

        let reachable: usize = groups
            .iter()
            .map(|g| g.items.iter().map(|&i| weight[i]).max().unwrap_or(0))
            .sum();
        let capacity = match upper {
            Some(hi) => ((hi / resolution + GRID_TOLERANCE).floor() as usize).min(reachable),
            None => reachable,
        };
        if capacity >= MAX_BUCKETS {
            return Err(Rejection::Invalid(format!(
                "resource axis of {capacity} buckets is too fine; increase resolution"
            )));
        }
        let floor = lower.map_or(0, |lo| {
            (lo / resolution - GRID_TOLERANCE).ceil().max(0.0) as usize
        });

        Ok(Self {
            names,
            value,
            cost,
            weight,
            groups,
            lower,
            upper,
            floor,
            capacity,
            sense,
        })
    }

    /// Minimum and maximum weight still to be added after each group.
    fn remaining(&self) -> (Vec<usize>, Vec<usize>) {
        let count = self.groups.len();
        let mut min_rest = vec![0; count + 1];
        let mut max_rest = vec![0; count + 1];
        for (g, group) in self.groups.iter().enumerate().rev() {
            let weights = group.items.iter().map(|&i| self.weight[i]);
            let min = if group.required {
                weights.clone().min().unwrap_or(0)
            } else {
                0
            };
            min_rest[g] = min_rest[g + 1] + min;
            max_rest[g] = max_rest[g + 1] + weights.max().unwrap_or(0);
        }
        (min_rest, max_rest)
    }

    /// Drops states that cannot complete or are dominated. `nodes` must be
    /// sorted by weight.
    fn prune(&self, nodes: Vec<Node>, min_rest: usize, max_rest: usize) -> Vec<Node> {
        let mut kept = Vec::with_capacity(nodes.len());
        let mut best_safe: Option<f64> = None;
        for node in nodes {
            if node.weight + min_rest > self.capacity || node.weight + max_rest < self.floor {
                continue;
            }
            if node.weight + min_rest >= self.floor {
                if matches!(best_safe, Some(best) if node.entry.value <= best + EPSILON) {
                    continue;
                }
                best_safe = Some(node.entry.value);
            }
            kept.push(node);
        }
        kept
    }

    fn run(&self, start: Instant, limit: Duration) -> CpSolution {
        let capacity = self.capacity;
        let (min_rest, max_rest) = self.remaining();

        let root = Node {
            weight: 0,
            entry: Entry {
                value: 0.0,
                cost: 0.0,
                parent: 0,
                choice: Choice::Skip,
            },
        };
        let mut layers: Vec<Vec<Node>> = Vec::with_capacity(self.groups.len() + 1);
        layers.push(vec![root]);
        let mut table: Vec<Option<Entry>> = vec![None; capacity + 1];

        for (g, group) in self.groups.iter().enumerate() {
            if start.elapsed() >= limit {
                return CpSolution::with_message(
                    SolverStatus::Timeout,
                    format!("time limit reached before group {g}"),
                );
            }
            let Some(prev) = layers.last() else {
                break;
            };
            table.iter_mut().for_each(|slot| *slot = None);

            if !group.required {
                for (p, node) in prev.iter().enumerate() {
                    table[node.weight] = Some(Entry {
                        parent: p as u32,
                        choice: Choice::Skip,
                        ..node.entry
                    });
                }
            }

            for (k, &item) in group.items.iter().enumerate() {
                if k % TIME_CHECK_INTERVAL == 0 && start.elapsed() >= limit {
                    return CpSolution::with_message(
                        SolverStatus::Timeout,
                        format!("time limit reached in group {g}"),
                    );
                }

                let w = self.weight[item];
                for (p, node) in prev.iter().enumerate() {
                    let to = node.weight + w;
                    if to > capacity {
                        continue;
                    }
                    let value = node.entry.value + self.value[item];
                    if matches!(table[to], Some(existing) if value <= existing.value + EPSILON) {
                        continue;
                    }
                    table[to] = Some(Entry {
                        value,
                        cost: node.entry.cost + self.cost[item],
                        parent: p as u32,
                        choice: Choice::Take(k as u32),
                    });
                }
            }

            let nodes: Vec<Node> = table
                .iter()
                .enumerate()
                .filter_map(|(weight, slot)| slot.map(|entry| Node { weight, entry }))
                .collect();
            let nodes = self.prune(nodes, min_rest[g + 1], max_rest[g + 1]);
            if nodes.is_empty() {
                return CpSolution::with_message(
                    SolverStatus::Infeasible,
                    format!("no assignment fits after group {g}"),
                );
            }
            layers.push(nodes);
        }

        let Some(last) = layers.last() else {
            return CpSolution::with_message(SolverStatus::Unknown, "no layers");
        };
        let mut best: Option<(usize, Entry)> = None;
        for (i, node) in last.iter().enumerate() {
            let entry = node.entry;
            if matches!(self.lower, Some(lo) if entry.cost < lo - GRID_TOLERANCE) {
                continue;
            }
            if matches!(self.upper, Some(hi) if entry.cost > hi + GRID_TOLERANCE) {
                continue;
            }
            if matches!(best, Some((_, b)) if entry.value <= b.value + EPSILON) {
                continue;
            }
            best = Some((i, entry));
        }
        let Some((mut at, state)) = best else {
            return CpSolution::with_message(
                SolverStatus::Infeasible,
                "no assignment satisfies the linear bounds",
            );
        };

        let mut selected = vec![false; self.names.len()];
        for (g, group) in self.groups.iter().enumerate().rev() {
            let entry = layers[g + 1][at].entry;
            if let Choice::Take(k) = entry.choice {
                selected[group.items[k as usize]] = true;
            }
            at = entry.parent as usize;
        }

        let mut solution = CpSolution::empty(SolverStatus::Optimal);
        solution.objective_value = Some(self.sense * state.value);
        solution.bool_vars = self
            .names
            .iter()
            .cloned()
            .zip(selected)
            .collect();
        solution
    }
}
