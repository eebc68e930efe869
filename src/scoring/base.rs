//! Goal-agnostic intrinsic quality of a part.

use crate::catalog::{Part, PartSpec};

/// Baseline every part starts from.
pub const BASE_SCORE: f64 = 50.0;

// Ordered most-specific first: "Micro ATX" must not count as full ATX.
const FORM_FACTOR_SCORES: [(&str, f64); 3] = [
    ("micro atx", 15.0),
    ("mini itx", 10.0),
    ("atx", 20.0),
];

const CASE_TYPE_SCORES: [(&str, f64); 3] = [
    ("full tower", 20.0),
    ("mid tower", 15.0),
    ("mini tower", 10.0),
];

const EFFICIENCY_SCORES: [(&str, f64); 5] = [
    ("titanium", 30.0),
    ("platinum", 25.0),
    ("gold", 20.0),
    ("silver", 15.0),
    ("bronze", 10.0),
];

const STORAGE_TYPE_SCORES: [(&str, f64); 2] = [("nvme", 30.0), ("ssd", 20.0)];

/// Intrinsic utility from category attributes alone.
///
/// Independent of price and goal. Always at least [`BASE_SCORE`] for
/// well-formed attributes.
pub fn base_utility(part: &Part) -> f64 {
    match &part.spec {
        PartSpec::Cpu {
            core_count,
            boost_clock_ghz,
        } => BASE_SCORE + core_count * boost_clock_ghz * 2.0,
        PartSpec::VideoCard {
            memory_gb,
            boost_clock_mhz,
        } => BASE_SCORE + memory_gb * 5.0 + boost_clock_mhz / 100.0,
        PartSpec::Memory {
            total_capacity_gb,
            speed_mhz,
        } => BASE_SCORE + total_capacity_gb * 2.0 + speed_mhz / 100.0,
        PartSpec::Motherboard { form_factor } => {
            BASE_SCORE + keyword_score(form_factor.as_deref(), &FORM_FACTOR_SCORES)
        }
        PartSpec::PowerSupply {
            wattage,
            efficiency,
        } => {
            BASE_SCORE + wattage / 20.0 + keyword_score(efficiency.as_deref(), &EFFICIENCY_SCORES)
        }
        PartSpec::Case { case_type } => {
            BASE_SCORE + keyword_score(case_type.as_deref(), &CASE_TYPE_SCORES)
        }
        PartSpec::Storage {
            capacity_gb,
            storage_type,
        } => {
            BASE_SCORE
                + capacity_gb / 100.0
                + keyword_score(storage_type.as_deref(), &STORAGE_TYPE_SCORES)
        }
    }
}

/// Score of the first keyword contained in `text`.
///
/// Matching is case-insensitive and treats `-` and `_` as spaces.
fn keyword_score(text: Option<&str>, table: &[(&str, f64)]) -> f64 {
    let Some(text) = text else {
        return 0.0;
    };
    let normalized = text.to_lowercase().replace(['-', '_'], " ");
    table
        .iter()
        .find(|(keyword, _)| normalized.contains(keyword))
        .map(|&(_, score)| score)
        .unwrap_or(0.0)
}
