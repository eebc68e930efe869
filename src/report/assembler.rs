//! Bundle to presentation conversion.

use super::currency::{Currency, DisplayConversion};
use super::labels::Locale;
use crate::catalog::Category;
use crate::engine::Bundle;
use crate::profile::GoalProfile;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Presentation settings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReportOptions {
    pub locale: Locale,
    /// Secondary currency shown next to USD prices.
    pub display_currency: Option<DisplayConversion>,
}

impl ReportOptions {
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_display_currency(mut self, conversion: DisplayConversion) -> Self {
        self.display_currency = Some(conversion);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        self.display_currency
            .as_ref()
            .map_or(Ok(()), DisplayConversion::validate)
    }
}

/// One selected part, labelled and priced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationItem {
    pub category: Category,
    pub category_label: String,
    pub name: String,
    pub price: f64,
    pub price_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_price_text: Option<String>,
    pub utility: f64,
    /// Share of the budget this part consumes, in percent.
    pub budget_percentage: f64,
    /// The goal's ideal share for this category, in percent.
    pub recommended_percentage: f64,
    /// Raw catalog attributes of the part.
    pub details: Map<String, Value>,
}

/// A bundle ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationBundle {
    pub goal: String,
    pub goal_label: String,
    pub budget: f64,
    pub budget_text: String,
    /// Sorted by category identifier.
    pub items: Vec<PresentationItem>,
    pub total_price: f64,
    pub total_price_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_total_text: Option<String>,
    pub total_utility: f64,
    pub remaining_budget: f64,
    pub remaining_budget_text: String,
    /// The goal's ideal share per category, in percent.
    pub budget_allocation: BTreeMap<Category, f64>,
}

/// Pure bundle formatter: same bundle and options, same output.
#[derive(Debug, Clone, Default)]
pub struct ResultAssembler {
    options: ReportOptions,
}

impl ResultAssembler {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    pub fn assemble(&self, bundle: &Bundle) -> PresentationBundle {
        let locale = self.options.locale;
        let profile = GoalProfile::resolve(&bundle.goal);
        let usd = |amount: f64| Currency::Usd.format_price(amount);
        let converted = |amount: f64| self.options.display_currency.map(|c| c.format(amount));

        let mut items: Vec<PresentationItem> = bundle
            .selections
            .iter()
            .map(|(&category, selected)| PresentationItem {
                category,
                category_label: locale.category_label(category).to_string(),
                name: selected.part.name.clone(),
                price: selected.part.price,
                price_text: usd(selected.part.price),
                converted_price_text: converted(selected.part.price),
                utility: selected.utility,
                budget_percentage: selected.part.price / bundle.budget * 100.0,
                recommended_percentage: profile.budget_share.get(category) * 100.0,
                details: selected.part.attributes.clone(),
            })
            .collect();
        items.sort_by_key(|item| item.category.as_str());

        PresentationBundle {
            goal: bundle.goal.clone(),
            goal_label: locale.goal_label(&bundle.goal),
            budget: bundle.budget,
            budget_text: usd(bundle.budget),
            items,
            total_price: bundle.total_price,
            total_price_text: usd(bundle.total_price),
            converted_total_text: converted(bundle.total_price),
            total_utility: bundle.total_utility,
            remaining_budget: bundle.remaining_budget,
            remaining_budget_text: usd(bundle.remaining_budget),
            budget_allocation: profile
                .budget_share
                .iter()
                .map(|(category, share)| (category, share * 100.0))
                .collect(),
        }
    }
}
