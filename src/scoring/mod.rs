//! Utility scoring.
//!
//! Two steps:
//!
//! 1. **Base utility** ([`base_utility`]): category-specific, computed from
//!    intrinsic attributes only.
//! 2. **Goal and price adjustment** ([`UtilityScorer`]): weights the base
//!    by the squared goal importance, applies the budget tier's price-fit
//!    factor, and adds a raw price bonus for large budgets.
//!
//! The price-fit breakpoints are a tunable heuristic and live in
//! [`ScoringConfig`].

mod base;
mod config;
mod scorer;

pub use base::{base_utility, BASE_SCORE};
pub use config::{
    PriceBound, PriceTier, ScoringConfig, HIGH_BUDGET, MEDIUM_BUDGET, PRICE_BONUS_MIN_BUDGET,
};
pub use scorer::{Candidate, ScoredPart, UtilityScorer};
