//! Allocation engine: multiple-choice knapsack over scored candidates.
//!
//! Selects exactly one part per mandatory category and at most one per
//! optional category, maximising total utility subject to the budget. For
//! budgets of at least [`EngineConfig::min_spend_budget`] a first phase
//! also requires spending [`EngineConfig::min_spend_ratio`] of the budget;
//! if that phase is infeasible the engine retries once without the floor.
//!
//! # Key Types
//!
//! - [`EngineConfig`]: spending floor and solver settings
//! - [`AllocationEngine`]: model building and the two-phase solve
//! - [`CandidateSet`]: scored candidates per category (input)
//! - [`Bundle`]: the selected parts with aggregate pricing (output)
//! - [`BuildError`]: failures, collapsed by [`BuildError::kind`]
//!
//! # References
//!
//! Sinha & Zoltners (1979), "The Multiple-Choice Knapsack Problem"

mod config;
mod runner;
mod types;

pub use config::EngineConfig;
pub use runner::AllocationEngine;
pub use types::{Bundle, BuildError, CandidateSet, FailureKind};
