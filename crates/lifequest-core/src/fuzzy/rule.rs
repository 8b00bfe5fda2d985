//! Fuzzy rule definition.

use serde::Serialize;

/// `variable IS set`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clause {
    pub variable: String,
    pub set: String,
}

impl Clause {
    pub fn new(variable: impl Into<String>, set: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            set: set.into(),
        }
    }
}

/// AND-joined antecedents implying one output set, with attached advice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuzzyRule {
    pub id: String,
    pub antecedents: Vec<Clause>,
    pub consequent: Clause,
    pub confidence: f64,
    pub advice: String,
}
