//! Serialized knowledge base document.
//!
//! These are the raw shapes read from TOML/JSON. They are compiled into a
//! [`KnowledgeBase`](super::KnowledgeBase) by a validation pass; nothing
//! here is used by the engines directly.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::facts::FactValue;

/// Whole knowledge base document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeBaseDef {
    /// Fact names that accumulate a list of values.
    #[serde(default)]
    pub list_facts: Vec<String>,

    #[serde(default)]
    pub rules: Vec<RuleDef>,

    #[serde(default)]
    pub fuzzy: FuzzyDef,
}

/// Symbolic rule as written in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDef {
    pub id: String,

    #[serde(default)]
    pub priority: i32,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub conditions: Vec<ConditionDef>,

    #[serde(default)]
    pub actions: Vec<ActionDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionDef {
    pub fact: String,
    /// Operator spelling, parsed into a `Comparison` at load.
    pub op: String,
    pub value: FactValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDef {
    pub fact: String,
    pub value: FactValue,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

/// Fuzzy section of the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FuzzyDef {
    #[serde(default)]
    pub variables: IndexMap<String, VariableDef>,

    #[serde(default)]
    pub output: Option<OutputDef>,

    #[serde(default)]
    pub rules: Vec<FuzzyRuleDef>,
}

/// Input variable: set name to 3 (triangle) or 4 (trapezoid) parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariableDef {
    #[serde(default)]
    pub sets: IndexMap<String, Vec<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputDef {
    pub name: String,
    #[serde(default)]
    pub sets: IndexMap<String, Vec<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzyRuleDef {
    /// Generated from the rule position when absent.
    #[serde(default)]
    pub id: Option<String>,
    pub when: Vec<ClauseDef>,
    pub then: ClauseDef,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub advice: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClauseDef {
    pub var: String,
    pub is: String,
}

fn default_confidence() -> f64 {
    1.0
}
