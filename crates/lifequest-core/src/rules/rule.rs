//! Symbolic rule definition.
//!
//! A rule is an if-this-then-that production: when every condition holds,
//! each action asserts a fact scaled by the premise confidence.

use serde::Serialize;

use super::Condition;
use crate::facts::{certainty, Fact, FactStore, FactValue};

/// Fact asserted when a rule fires.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Action {
    pub fact: String,
    pub value: FactValue,
    pub confidence: f64,
}

impl Action {
    pub fn new(fact: impl Into<String>, value: impl Into<FactValue>, confidence: f64) -> Self {
        Self {
            fact: fact.into(),
            value: value.into(),
            confidence: certainty::clip(confidence),
        }
    }

    /// Build the fact this action asserts under the given premise confidence.
    pub fn materialize(&self, premise_confidence: f64) -> Fact {
        Fact::new(
            self.fact.clone(),
            self.value.clone(),
            premise_confidence * self.confidence,
        )
    }
}

/// A prioritized production rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolicRule {
    pub id: String,
    pub priority: i32,
    pub description: String,
    pub conditions: Vec<Condition>,
    pub actions: Vec<Action>,
}

impl SymbolicRule {
    /// Minimum confidence across the conditions (fuzzy AND).
    ///
    /// A rule without conditions is unconditionally true.
    pub fn premise_confidence(&self, store: &FactStore) -> f64 {
        self.conditions
            .iter()
            .map(|c| c.confidence(store))
            .fold(1.0, f64::min)
    }

    /// Whether firing this rule would assert `fact`.
    pub fn concludes(&self, fact: &str) -> bool {
        self.actions.iter().any(|a| a.fact == fact)
    }

    /// Facts this rule asserts for a given premise confidence.
    pub fn conclusions(&self, premise_confidence: f64) -> Vec<Fact> {
        self.actions
            .iter()
            .map(|a| a.materialize(premise_confidence))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Comparison;

    fn sitting_rule() -> SymbolicRule {
        SymbolicRule {
            id: "long_sitting".to_string(),
            priority: 10,
            description: "Long sitting needs a walk".to_string(),
            conditions: vec![
                Condition::new("sitting_hours", Comparison::Greater, 6.0),
                Condition::new("physical_activity_today", Comparison::Less, 30.0),
            ],
            actions: vec![Action::new("health_tips", "Stand up and walk", 0.9)],
        }
    }

    #[test]
    fn test_premise_is_minimum_of_conditions() {
        let mut store = FactStore::new();
        store.add(Fact::new("sitting_hours", 7.0, 0.8));
        store.add(Fact::new("physical_activity_today", 10.0, 0.6));
        assert_eq!(sitting_rule().premise_confidence(&store), 0.6);
    }

    #[test]
    fn test_missing_fact_kills_premise() {
        let mut store = FactStore::new();
        store.add(Fact::new("sitting_hours", 7.0, 0.8));
        assert_eq!(sitting_rule().premise_confidence(&store), 0.0);
    }

    #[test]
    fn test_conclusions_scale_by_premise() {
        let facts = sitting_rule().conclusions(0.5);
        assert_eq!(facts.len(), 1);
        assert!((facts[0].confidence - 0.45).abs() < 1e-12);
        assert!(sitting_rule().concludes("health_tips"));
        assert!(!sitting_rule().concludes("wellness_tips"));
    }

    #[test]
    fn test_unconditional_rule_has_full_premise() {
        let rule = SymbolicRule {
            id: "always".to_string(),
            priority: 0,
            description: String::new(),
            conditions: vec![],
            actions: vec![Action::new("greeting", "hello", 1.0)],
        };
        assert_eq!(rule.premise_confidence(&FactStore::new()), 1.0);
    }
}
