//! Candidate filtering.
//!
//! Bounds the number of parts per category handed to the allocation
//! engine while keeping both affordable and aspirational choices:
//!
//! 1. Drop parts priced above `target * multiplier` (multiplier grows
//!    with the budget tier) or without a positive price.
//! 2. For large budgets, keep the most expensive parts as a high-end set
//!    plus an evenly strided sample of the rest by ascending price.
//! 3. Cap the result, keeping the cheapest parts when over the cap.
//!
//! All sorts are stable, so the output is reproducible for identical
//! input order.

use crate::catalog::{Category, Part};
use crate::profile::GoalProfile;

/// Configuration for [`CandidateFilter`].
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// `(min_budget, multiplier)` pairs, highest `min_budget` first.
    /// A part is kept when `price <= target * multiplier`.
    pub max_price_tiers: Vec<(f64, f64)>,
    /// Budget at or above which stratified sampling applies.
    pub stratify_min_budget: f64,
    /// Size of the high-end set.
    pub high_end_count: usize,
    /// Approximate size of the strided sample over the remainder.
    pub balanced_count: usize,
    /// Hard cap on candidates per category.
    pub max_candidates: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_price_tiers: vec![(2000.0, 3.0), (1000.0, 2.5), (0.0, 2.0)],
            stratify_min_budget: 1500.0,
            high_end_count: 100,
            balanced_count: 900,
            max_candidates: 1000,
        }
    }
}

impl FilterConfig {
    pub fn with_max_candidates(mut self, n: usize) -> Self {
        self.max_candidates = n;
        self
    }

    pub fn with_stratify_min_budget(mut self, budget: f64) -> Self {
        self.stratify_min_budget = budget;
        self
    }

    /// Price multiplier over the category target for a given budget.
    pub fn max_price_multiplier(&self, budget: f64) -> f64 {
        self.max_price_tiers
            .iter()
            .find(|&&(min_budget, _)| budget >= min_budget)
            .or_else(|| self.max_price_tiers.last())
            .map(|&(_, multiplier)| multiplier)
            .unwrap_or(1.0)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_price_tiers.is_empty() {
            return Err("at least one max-price tier is required".into());
        }
        if self.max_price_tiers.iter().any(|&(_, m)| !(m > 0.0)) {
            return Err("max-price multipliers must be positive".into());
        }
        if self.max_candidates == 0 {
            return Err("max_candidates must be at least 1".into());
        }
        if self.balanced_count == 0 {
            return Err("balanced_count must be at least 1".into());
        }
        Ok(())
    }
}

/// Reduces a category's parts to a bounded, price-stratified subset.
#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    config: FilterConfig,
}

impl CandidateFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Filters one category's parts for the given goal profile and budget.
    pub fn filter<'a>(
        &self,
        category: Category,
        parts: &'a [Part],
        profile: &GoalProfile,
        budget: f64,
    ) -> Vec<&'a Part> {
        let target = profile.target_price(category, budget);
        let max_price = target * self.config.max_price_multiplier(budget);

        let mut items: Vec<&Part> = parts
            .iter()
            .filter(|p| p.has_valid_price() && p.price <= max_price)
            .collect();

        if budget >= self.config.stratify_min_budget && !items.is_empty() {
            items = self.stratify(items);
        }

        if items.len() > self.config.max_candidates {
            items.sort_by(|a, b| a.price.total_cmp(&b.price));
            items.truncate(self.config.max_candidates);
        }

        log::debug!(
            "{category}: {} of {} parts kept (max price {max_price:.2})",
            items.len(),
            parts.len()
        );
        items
    }

    /// High-end set followed by a strided sample of the remainder.
    fn stratify<'a>(&self, mut items: Vec<&'a Part>) -> Vec<&'a Part> {
        items.sort_by(|a, b| b.price.total_cmp(&a.price));

        if items.len() <= self.config.high_end_count {
            return items;
        }
        let mut rest = items.split_off(self.config.high_end_count);
        rest.sort_by(|a, b| a.price.total_cmp(&b.price));

        let step = (rest.len() / self.config.balanced_count).max(1);
        items.extend(rest.into_iter().step_by(step));
        items
    }
}
