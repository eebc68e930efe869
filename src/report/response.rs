//! Outcome envelope for the presentation layer.

use super::assembler::{PresentationBundle, ResultAssembler};
use crate::engine::{Bundle, BuildError, FailureKind};
use serde::Serialize;

/// One of the three user-visible outcomes, tagged by `status`.
///
/// ```json
/// {"status": "INFEASIBLE", "message": "No build fits the budget"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildResponse {
    Optimal(PresentationBundle),
    Infeasible { message: String },
    Error { message: String },
}

impl BuildResponse {
    pub fn from_result(result: Result<Bundle, BuildError>, assembler: &ResultAssembler) -> Self {
        match result {
            Ok(bundle) => BuildResponse::Optimal(assembler.assemble(&bundle)),
            Err(err) => {
                let message = err.to_string();
                match err.kind() {
                    FailureKind::Infeasible => BuildResponse::Infeasible { message },
                    FailureKind::Internal => BuildResponse::Error { message },
                }
            }
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            BuildResponse::Optimal(_) => "OPTIMAL",
            BuildResponse::Infeasible { .. } => "INFEASIBLE",
            BuildResponse::Error { .. } => "ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn test_infeasible_shape() {
        let response = BuildResponse::from_result(
            Err(BuildError::MissingCategories(vec![Category::Case])),
            &ResultAssembler::default(),
        );
        assert_eq!(response.status(), "INFEASIBLE");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "status": "INFEASIBLE",
                "message": "No candidates for mandatory categories: case",
            })
        );
    }

    #[test]
    fn test_error_shape() {
        let response = BuildResponse::from_result(
            Err(BuildError::solver("backend unavailable")),
            &ResultAssembler::default(),
        );
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "ERROR");
        assert_eq!(value["message"], "Solver failure: backend unavailable");
    }

    #[test]
    fn test_optimal_shape() {
        let bundle = Bundle {
            goal: "office".into(),
            budget: 500.0,
            selections: BTreeMap::new(),
            total_price: 0.0,
            total_utility: 0.0,
            remaining_budget: 500.0,
            min_spend: None,
        };
        let response = BuildResponse::from_result(Ok(bundle), &ResultAssembler::default());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "OPTIMAL");
        assert_eq!(value["goal"], "office");
        assert_eq!(value["budget_text"], "$500.00");
    }
}
