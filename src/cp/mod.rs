//! Constraint Programming (CP) layer for 0/1 selection problems.
//!
//! Provides a backend-agnostic model for "maximize a linear objective over
//! boolean variables subject to choice-group and linear bound constraints".
//!
//! # Key Components
//!
//! - **Variables**: [`BoolVar`]: 0/1 decision variables
//! - **Constraints**: [`Constraint`]: ExactlyOne, AtMostOne, Linear
//! - **Model**: [`CpModel`]: container for variables, constraints, objective
//! - **Solver**: [`CpSolver`] trait: interface for solver implementations
//! - **Backend**: [`DpKnapsackSolver`]: exact dynamic programming over a
//!   discretised resource axis
//!
//! # Design
//!
//! The [`CpSolver`] trait is the only seam the allocation engine depends on,
//! so an external ILP backend can replace [`DpKnapsackSolver`] without
//! touching the engine.
//!
//! # References
//!
//! Kellerer, Pferschy & Pisinger (2004), "Knapsack Problems", ch. 11

mod dp;
mod model;
mod solver;
mod variables;

pub use dp::DpKnapsackSolver;
pub use model::{Constraint, CpModel, Objective};
pub use solver::{CpSolution, CpSolver, SolverConfig, SolverStatus};
pub use variables::BoolVar;
