//! CP model definition.

use super::variables::BoolVar;
use std::collections::HashMap;

/// A constraint in the CP model.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Exactly one of the variables is true.
    ExactlyOne {
        /// Names of boolean variables in the group.
        vars: Vec<String>,
    },

    /// At most one of the variables is true.
    AtMostOne {
        /// Names of boolean variables in the group.
        vars: Vec<String>,
    },

    /// Linear bound: `lower <= sum(coef * var) <= upper`.
    Linear {
        /// (variable_name, coefficient) pairs.
        terms: Vec<(String, f64)>,
        /// Inclusive lower bound, if any.
        lower: Option<f64>,
        /// Inclusive upper bound, if any.
        upper: Option<f64>,
    },
}

/// Objective function for the CP model.
#[derive(Debug, Clone)]
pub enum Objective {
    /// Minimize a linear combination of boolean variables.
    Minimize {
        /// (variable_name, coefficient) pairs.
        terms: Vec<(String, f64)>,
    },

    /// Maximize a linear combination of boolean variables.
    Maximize {
        /// (variable_name, coefficient) pairs.
        terms: Vec<(String, f64)>,
    },
}

impl Objective {
    /// The (variable_name, coefficient) pairs, whatever the direction.
    pub fn terms(&self) -> &[(String, f64)] {
        match self {
            Objective::Minimize { terms } | Objective::Maximize { terms } => terms,
        }
    }
}

/// A constraint programming model over 0/1 variables.
///
/// Contains variables, constraints, and an optional objective function.
///
/// # Examples
///
/// ```
/// use pc_assembler::cp::{BoolVar, CpModel, Objective};
///
/// let mut model = CpModel::new("example");
/// model.add_bool_var(BoolVar::new("a"));
/// model.add_bool_var(BoolVar::new("b"));
/// model.add_exactly_one(vec!["a".into(), "b".into()]);
/// model.add_linear(vec![("a".into(), 30.0), ("b".into(), 50.0)], None, Some(40.0));
/// model.set_objective(Objective::Maximize {
///     terms: vec![("a".into(), 1.0), ("b".into(), 2.0)],
/// });
/// assert!(model.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct CpModel {
    /// Model name.
    pub name: String,
    /// Boolean variables.
    pub bool_vars: HashMap<String, BoolVar>,
    /// Variable names in insertion order.
    pub var_order: Vec<String>,
    /// Constraints.
    pub constraints: Vec<Constraint>,
    /// Objective function.
    pub objective: Option<Objective>,
}

impl CpModel {
    /// Creates a new empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bool_vars: HashMap::new(),
            var_order: Vec::new(),
            constraints: Vec::new(),
            objective: None,
        }
    }

    /// Adds a boolean variable. Re-adding a name keeps its original position.
    pub fn add_bool_var(&mut self, var: BoolVar) {
        if !self.bool_vars.contains_key(&var.name) {
            self.var_order.push(var.name.clone());
        }
        self.bool_vars.insert(var.name.clone(), var);
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Convenience: add an exactly-one constraint.
    pub fn add_exactly_one(&mut self, vars: Vec<String>) {
        self.constraints.push(Constraint::ExactlyOne { vars });
    }

    /// Convenience: add an at-most-one constraint.
    pub fn add_at_most_one(&mut self, vars: Vec<String>) {
        self.constraints.push(Constraint::AtMostOne { vars });
    }

    /// Convenience: add a linear constraint.
    pub fn add_linear(&mut self, terms: Vec<(String, f64)>, lower: Option<f64>, upper: Option<f64>) {
        self.constraints.push(Constraint::Linear {
            terms,
            lower,
            upper,
        });
    }

    /// Sets the objective function.
    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    /// Validates the model for consistency.
    ///
    /// Checks that all referenced variable names exist and that all
    /// numbers are finite and bounds are ordered.
    pub fn validate(&self) -> Result<(), String> {
        for constraint in &self.constraints {
            match constraint {
                Constraint::ExactlyOne { vars } | Constraint::AtMostOne { vars } => {
                    for name in vars {
                        self.check_var(name)?;
                    }
                }
                Constraint::Linear {
                    terms,
                    lower,
                    upper,
                } => {
                    self.check_terms(terms)?;
                    for bound in [lower, upper].into_iter().flatten() {
                        if !bound.is_finite() {
                            return Err(format!("non-finite bound: {bound}"));
                        }
                    }
                    if let (Some(lo), Some(hi)) = (lower, upper) {
                        if lo > hi {
                            return Err(format!("linear bounds out of order: {lo} > {hi}"));
                        }
                    }
                }
            }
        }
        if let Some(objective) = &self.objective {
            self.check_terms(objective.terms())?;
        }
        Ok(())
    }

    fn check_var(&self, name: &str) -> Result<(), String> {
        if self.bool_vars.contains_key(name) {
            Ok(())
        } else {
            Err(format!("undefined variable: {name}"))
        }
    }

    fn check_terms(&self, terms: &[(String, f64)]) -> Result<(), String> {
        for (name, coef) in terms {
            self.check_var(name)?;
            if !coef.is_finite() {
                return Err(format!("non-finite coefficient for {name}: {coef}"));
            }
        }
        Ok(())
    }

    /// Returns the number of boolean variables.
    pub fn var_count(&self) -> usize {
        self.bool_vars.len()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}
