//! Fact store with certainty-factor combination.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::certainty::{self, CF_EPSILON};
use super::FactValue;

/// A named value with a confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub name: String,
    pub value: FactValue,
    pub confidence: f64,
}

impl Fact {
    /// Create a fact; the confidence is clipped into `[0, 1]`.
    pub fn new(name: impl Into<String>, value: impl Into<FactValue>, confidence: f64) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            confidence: certainty::clip(confidence),
        }
    }

    /// A fact observed with full confidence.
    pub fn certain(name: impl Into<String>, value: impl Into<FactValue>) -> Self {
        Self::new(name, value, 1.0)
    }
}

/// Working memory for one inference session.
///
/// Names declared list-valued accumulate distinct values; every other name
/// holds one value at a time. Facts keep their first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct FactStore {
    facts: IndexMap<String, Fact>,
    list_facts: HashSet<String>,
}

impl FactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store where the given names accumulate lists.
    pub fn with_list_facts<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            facts: IndexMap::new(),
            list_facts: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_list_valued(&self, name: &str) -> bool {
        self.list_facts.contains(name)
    }

    /// Submit a fact. Returns `true` when the store changed.
    pub fn add(&mut self, fact: Fact) -> bool {
        let fact = Fact {
            confidence: certainty::clip(fact.confidence),
            ..fact
        };
        if self.is_list_valued(&fact.name) {
            self.add_to_list(fact)
        } else {
            self.add_scalar(fact)
        }
    }

    fn add_to_list(&mut self, fact: Fact) -> bool {
        let Fact {
            name,
            value,
            confidence,
        } = fact;
        let elements = value.into_elements();

        let Some(existing) = self.facts.get_mut(&name) else {
            let mut unique: Vec<FactValue> = Vec::with_capacity(elements.len());
            for element in elements {
                if !unique.contains(&element) {
                    unique.push(element);
                }
            }
            if unique.is_empty() {
                return false;
            }
            self.facts.insert(
                name.clone(),
                Fact {
                    name,
                    value: FactValue::List(unique),
                    confidence,
                },
            );
            return true;
        };

        // List names only ever hold lists.
        let FactValue::List(items) = &mut existing.value else {
            return false;
        };

        let mut appended = false;
        for element in elements {
            if items.contains(&element) {
                continue;
            }
            items.push(element);
            existing.confidence = certainty::running_mean(existing.confidence, items.len(), confidence);
            appended = true;
        }
        appended
    }

    fn add_scalar(&mut self, fact: Fact) -> bool {
        let Some(existing) = self.facts.get_mut(&fact.name) else {
            self.facts.insert(fact.name.clone(), fact);
            return true;
        };

        if existing.value == fact.value {
            let combined = certainty::combine(existing.confidence, fact.confidence);
            if (combined - existing.confidence).abs() > CF_EPSILON {
                existing.confidence = combined;
                return true;
            }
            return false;
        }

        // Strict: on a tie the incumbent stays.
        if fact.confidence > existing.confidence {
            *existing = fact;
            true
        } else {
            false
        }
    }

    pub fn get(&self, name: &str) -> Option<&Fact> {
        self.facts.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.facts.contains_key(name)
    }

    pub fn clear(&mut self) {
        self.facts.clear();
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fact> {
        self.facts.values()
    }

    /// Fact names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.facts.keys().cloned().collect()
    }

    /// Copy of every fact in insertion order.
    pub fn snapshot(&self) -> Vec<Fact> {
        self.facts.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_new_scalar() {
        let mut store = FactStore::new();
        assert!(store.add(Fact::new("stress_level", 8.0, 0.9)));
        assert!(store.has("stress_level"));
        assert_eq!(store.get("stress_level").unwrap().confidence, 0.9);
    }

    #[test]
    fn test_same_value_combines_confidence() {
        let mut store = FactStore::new();
        store.add(Fact::new("user_status", "Active", 0.6));
        assert!(store.add(Fact::new("user_status", "Active", 0.5)));
        let cf = store.get("user_status").unwrap().confidence;
        assert!((cf - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_saturated_confidence_reports_no_change() {
        let mut store = FactStore::new();
        store.add(Fact::certain("user_status", "Active"));
        assert!(!store.add(Fact::new("user_status", "Active", 0.7)));
        assert_eq!(store.get("user_status").unwrap().confidence, 1.0);
    }

    #[test]
    fn test_conflicting_value_higher_confidence_wins() {
        let mut store = FactStore::new();
        store.add(Fact::new("user_status", "Novice", 0.4));
        assert!(store.add(Fact::new("user_status", "Veteran", 0.7)));
        assert_eq!(
            store.get("user_status").unwrap().value,
            FactValue::Text("Veteran".into())
        );
    }

    #[test]
    fn test_conflicting_value_tie_keeps_incumbent() {
        let mut store = FactStore::new();
        store.add(Fact::new("user_status", "Novice", 0.7));
        assert!(!store.add(Fact::new("user_status", "Veteran", 0.7)));
        assert_eq!(
            store.get("user_status").unwrap().value,
            FactValue::Text("Novice".into())
        );
    }

    #[test]
    fn test_confidence_is_clipped() {
        let mut store = FactStore::new();
        store.add(Fact::new("x", 1.0, 1.4));
        assert_eq!(store.get("x").unwrap().confidence, 1.0);
        store.add(Fact::new("y", 1.0, -0.5));
        assert_eq!(store.get("y").unwrap().confidence, 0.0);
    }

    #[test]
    fn test_list_fact_creates_singleton() {
        let mut store = FactStore::with_list_facts(["health_tips"]);
        assert!(store.add(Fact::new("health_tips", "Stand up", 0.8)));
        let fact = store.get("health_tips").unwrap();
        assert_eq!(fact.value, FactValue::List(vec!["Stand up".into()]));
        assert_eq!(fact.confidence, 0.8);
    }

    #[test]
    fn test_list_fact_appends_and_averages() {
        let mut store = FactStore::with_list_facts(["health_tips"]);
        store.add(Fact::new("health_tips", "Stand up", 0.8));
        assert!(store.add(Fact::new("health_tips", "Drink water", 0.4)));
        let fact = store.get("health_tips").unwrap();
        assert_eq!(fact.value.as_list().unwrap().len(), 2);
        assert!((fact.confidence - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_list_fact_dedups() {
        let mut store = FactStore::with_list_facts(["health_tips"]);
        store.add(Fact::new("health_tips", "Stand up", 0.8));
        assert!(!store.add(Fact::new("health_tips", "Stand up", 0.2)));
        let fact = store.get("health_tips").unwrap();
        assert_eq!(fact.value.as_list().unwrap().len(), 1);
        assert_eq!(fact.confidence, 0.8);
    }

    #[test]
    fn test_list_literal_contributes_each_element() {
        let mut store = FactStore::with_list_facts(["available_quests"]);
        store.add(Fact::new(
            "available_quests",
            vec![FactValue::from("First steps"), FactValue::from("Daily walk")],
            1.0,
        ));
        assert!(store.add(Fact::new(
            "available_quests",
            vec![FactValue::from("Daily walk"), FactValue::from("Marathon week")],
            0.4,
        )));
        let fact = store.get("available_quests").unwrap();
        assert_eq!(fact.value.as_list().unwrap().len(), 3);
        assert!((fact.confidence - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut store = FactStore::new();
        store.add(Fact::certain("a", 1.0));
        store.add(Fact::certain("b", 2.0));
        store.clear();
        assert!(store.is_empty());
        assert!(!store.has("a"));
    }

    #[test]
    fn test_snapshot_keeps_insertion_order() {
        let mut store = FactStore::new();
        store.add(Fact::certain("zeta", 1.0));
        store.add(Fact::certain("alpha", 2.0));
        assert_eq!(store.names(), vec!["zeta".to_string(), "alpha".to_string()]);
    }
}
