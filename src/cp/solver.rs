//! CP solver interface.

use super::model::CpModel;
use std::collections::HashMap;

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// Proven optimal solution found.
    Optimal,
    /// Feasible (but not necessarily optimal) solution found.
    Feasible,
    /// No feasible solution exists.
    Infeasible,
    /// Model is invalid or malformed.
    ModelInvalid,
    /// Solver exceeded time limit.
    Timeout,
    /// No solution found for unknown reasons.
    Unknown,
}

/// Solution from a CP solver.
#[derive(Debug, Clone)]
pub struct CpSolution {
    /// Solver status.
    pub status: SolverStatus,
    /// Objective function value (if any).
    pub objective_value: Option<f64>,
    /// Boolean variable assignments.
    pub bool_vars: HashMap<String, bool>,
    /// Solve time in milliseconds.
    pub solve_time_ms: u64,
    /// Diagnostic message for non-solution statuses.
    pub message: Option<String>,
}

impl CpSolution {
    /// Creates an empty solution with the given status.
    pub fn empty(status: SolverStatus) -> Self {
        Self {
            status,
            objective_value: None,
            bool_vars: HashMap::new(),
            solve_time_ms: 0,
            message: None,
        }
    }

    /// Creates an empty solution with a diagnostic message.
    pub fn with_message(status: SolverStatus, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::empty(status)
        }
    }

    /// Whether a feasible solution was found.
    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, SolverStatus::Optimal | SolverStatus::Feasible)
    }

    /// Value of a boolean variable (false if unassigned).
    pub fn value(&self, name: &str) -> bool {
        self.bool_vars.get(name).copied().unwrap_or(false)
    }
}

/// Solver configuration.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum solve time in milliseconds.
    pub time_limit_ms: u64,
    /// Granularity of the resource axis for discretising solvers, in
    /// coefficient units (one cent by default).
    pub resolution: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 60_000,
            resolution: 0.01,
        }
    }
}

impl SolverConfig {
    /// Sets the time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Sets the resource axis granularity.
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(format!("resolution must be positive, got {}", self.resolution));
        }
        Ok(())
    }
}

/// Trait for CP solver implementations.
///
/// Implementors provide the actual constraint solving logic. This can
/// wrap an external ILP backend or provide a from-scratch algorithm
/// such as [`DpKnapsackSolver`](super::DpKnapsackSolver).
pub trait CpSolver: Send + Sync {
    /// Short backend name for logging.
    fn name(&self) -> &str;

    /// Solves the model and returns a solution.
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution;
}
