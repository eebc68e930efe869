//! CP variable types.

/// A boolean variable (0/1 decision).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolVar {
    /// Variable name (unique identifier within a model).
    pub name: String,
}

impl BoolVar {
    /// Creates a new boolean variable.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
