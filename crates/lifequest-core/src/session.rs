//! Per-request inference state.
//!
//! A session owns the fact store and the record of which rules already
//! fired. It is created for one analysis and dropped afterwards; nothing is
//! shared between sessions unless the caller shares the session itself.

use std::collections::HashSet;

use crate::facts::{Fact, FactStore};
use crate::kb::KnowledgeBase;

#[derive(Debug, Clone, Default)]
pub struct InferenceSession {
    facts: FactStore,
    fired: HashSet<String>,
    history: Vec<String>,
}

impl InferenceSession {
    /// Fresh session using the knowledge base's list-valued fact names.
    pub fn new(kb: &KnowledgeBase) -> Self {
        Self::with_store(FactStore::with_list_facts(kb.list_facts().iter().cloned()))
    }

    pub fn with_store(facts: FactStore) -> Self {
        Self {
            facts,
            fired: HashSet::new(),
            history: Vec::new(),
        }
    }

    /// Drop all facts and firing history.
    pub fn reset(&mut self) {
        self.facts.clear();
        self.fired.clear();
        self.history.clear();
    }

    /// Seed one observation. Returns whether the store changed.
    pub fn observe(&mut self, fact: Fact) -> bool {
        self.facts.add(fact)
    }

    pub fn observe_all(&mut self, facts: impl IntoIterator<Item = Fact>) {
        for fact in facts {
            self.facts.add(fact);
        }
    }

    pub fn facts(&self) -> &FactStore {
        &self.facts
    }

    pub fn facts_mut(&mut self) -> &mut FactStore {
        &mut self.facts
    }

    pub fn has_fired(&self, rule_id: &str) -> bool {
        self.fired.contains(rule_id)
    }

    /// Record a firing. Returns `false` if the rule had already fired.
    pub fn mark_fired(&mut self, rule_id: &str) -> bool {
        if !self.fired.insert(rule_id.to_string()) {
            return false;
        }
        self.history.push(rule_id.to_string());
        true
    }

    /// Rule ids in the order they fired.
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_fires_once() {
        let mut session = InferenceSession::default();
        assert!(session.mark_fired("r1"));
        assert!(!session.mark_fired("r1"));
        assert_eq!(session.history(), &["r1".to_string()]);
    }

    #[test]
    fn test_reset_clears_facts_and_history() {
        let mut session = InferenceSession::default();
        session.observe(Fact::certain("x", 1.0));
        session.mark_fired("r1");
        session.reset();
        assert!(session.facts().is_empty());
        assert!(!session.has_fired("r1"));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_new_session_uses_list_facts() {
        let kb = KnowledgeBase::from_toml_str(r#"list_facts = ["health_tips"]"#).unwrap();
        let session = InferenceSession::new(&kb);
        assert!(session.facts().is_list_valued("health_tips"));
        assert!(!session.facts().is_list_valued("user_status"));
    }
}
