//! Engine input and output types.

use crate::catalog::{Category, CatalogError};
use crate::scoring::{Candidate, ScoredPart};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Scored candidates per category, as handed to the engine.
///
/// Iteration follows canonical category order, so model building is
/// reproducible.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet<'a> {
    groups: BTreeMap<Category, Vec<Candidate<'a>>>,
}

impl<'a> CandidateSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the candidates of a category, replacing earlier ones.
    pub fn insert(&mut self, category: Category, candidates: Vec<Candidate<'a>>) {
        self.groups.insert(category, candidates);
    }

    pub fn get(&self, category: Category) -> &[Candidate<'a>] {
        self.groups.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[Candidate<'a>])> + '_ {
        self.groups.iter().map(|(&c, v)| (c, v.as_slice()))
    }

    /// Total number of candidates across categories.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mandatory categories without a single candidate.
    pub fn missing_mandatory(&self) -> Vec<Category> {
        Category::MANDATORY
            .iter()
            .copied()
            .filter(|&c| self.get(c).is_empty())
            .collect()
    }
}

/// One selected part per category, with aggregate pricing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bundle {
    /// Goal identifier as requested (unknown goals are echoed verbatim).
    pub goal: String,
    pub budget: f64,
    pub selections: BTreeMap<Category, ScoredPart>,
    pub total_price: f64,
    pub total_utility: f64,
    /// `budget - total_price`; never negative.
    pub remaining_budget: f64,
    /// Spending floor the bundle satisfies, when the first phase succeeded.
    pub min_spend: Option<f64>,
}

impl Bundle {
    pub fn get(&self, category: Category) -> Option<&ScoredPart> {
        self.selections.get(&category)
    }

    /// Whether every mandatory category has a selection.
    pub fn is_complete(&self) -> bool {
        Category::MANDATORY
            .iter()
            .all(|c| self.selections.contains_key(c))
    }
}

/// User-visible failure shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The budget and goal admit no build.
    Infeasible,
    /// Engine or environment fault.
    Internal,
}

/// Failure to produce a bundle.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("No candidates for mandatory categories: {}", join_categories(.0))]
    MissingCategories(Vec<Category>),
    #[error("No build fits the budget")]
    Infeasible,
    #[error("Solver failure: {0}")]
    Solver(String),
    #[error("Solve did not finish within {} ms", .0.as_millis())]
    Timeout(Duration),
    #[error("Service internal error: {0}")]
    Internal(String),
}

impl BuildError {
    pub fn invalid_request(description: impl Into<String>) -> Self {
        BuildError::InvalidRequest(description.into())
    }

    pub fn solver(description: impl Into<String>) -> Self {
        BuildError::Solver(description.into())
    }

    pub fn internal(description: impl Into<String>) -> Self {
        BuildError::Internal(description.into())
    }

    /// Collapses the error into one of the two failure shapes.
    pub fn kind(&self) -> FailureKind {
        match self {
            BuildError::MissingCategories(_) | BuildError::Infeasible => FailureKind::Infeasible,
            BuildError::Catalog(_)
            | BuildError::InvalidRequest(_)
            | BuildError::Solver(_)
            | BuildError::Timeout(_)
            | BuildError::Internal(_) => FailureKind::Internal,
        }
    }
}

fn join_categories(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
