//! Goal-driven backward chaining.
//!
//! Facts derived while searching are committed to the session store as soon
//! as their rule fires, even when an enclosing goal later fails.

use serde::Serialize;
use std::collections::HashSet;

use crate::kb::KnowledgeBase;
use crate::rules::SymbolicRule;
use crate::session::InferenceSession;

pub const DEFAULT_MAX_DEPTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackwardResult {
    pub goal: String,
    pub proved: bool,
    /// Human-readable reasoning steps, indented by depth.
    pub trail: Vec<String>,
    /// Rule ids fired during the search, in order.
    pub rules_fired: Vec<String>,
    /// Names of all facts known after the search.
    pub known_facts: Vec<String>,
}

pub struct BackwardChainer<'kb> {
    rules: &'kb [SymbolicRule],
    max_depth: usize,
}

/// Mutable state threaded through the recursion.
struct Search<'s> {
    session: &'s mut InferenceSession,
    trail: Vec<String>,
    rules_fired: Vec<String>,
}

impl<'kb> BackwardChainer<'kb> {
    pub fn new(kb: &'kb KnowledgeBase) -> Self {
        Self::from_rules(kb.rules())
    }

    /// Rules must already be in firing order.
    pub fn from_rules(rules: &'kb [SymbolicRule]) -> Self {
        Self {
            rules,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn prove(&self, session: &mut InferenceSession, goal: &str) -> BackwardResult {
        let mut search = Search {
            session,
            trail: Vec::new(),
            rules_fired: Vec::new(),
        };
        let proved = self.prove_goal(&mut search, goal, 0, &HashSet::new());
        tracing::debug!(goal, proved, steps = search.trail.len(), "backward chaining finished");

        BackwardResult {
            goal: goal.to_string(),
            proved,
            trail: search.trail,
            rules_fired: search.rules_fired,
            known_facts: search.session.facts().names(),
        }
    }

    /// `visited` holds the goals on the current branch only; each recursive
    /// call gets its own copy so sibling subgoals never see each other.
    fn prove_goal(&self, search: &mut Search<'_>, goal: &str, depth: usize, visited: &HashSet<String>) -> bool {
        let indent = "  ".repeat(depth);

        if let Some(fact) = search.session.facts().get(goal) {
            search.trail.push(format!(
                "{indent}'{goal}' is known: {} (CF {:.2})",
                fact.value, fact.confidence
            ));
            return true;
        }
        if depth >= self.max_depth {
            search.trail.push(format!(
                "{indent}depth limit {} reached while proving '{goal}'",
                self.max_depth
            ));
            return false;
        }
        if visited.contains(goal) {
            search.trail.push(format!("{indent}cycle detected on '{goal}'"));
            return false;
        }

        let mut branch = visited.clone();
        branch.insert(goal.to_string());

        let candidates: Vec<&SymbolicRule> = self.rules.iter().filter(|r| r.concludes(goal)).collect();
        if candidates.is_empty() {
            search.trail.push(format!("{indent}no rule concludes '{goal}'"));
            return false;
        }

        for rule in candidates {
            if search.session.has_fired(&rule.id) {
                continue;
            }
            search.trail.push(format!("{indent}trying rule '{}' for '{goal}'", rule.id));

            if !self.establish_conditions(search, rule, depth, &branch) {
                continue;
            }

            let premise = rule.premise_confidence(search.session.facts());
            search.session.mark_fired(&rule.id);
            for fact in rule.conclusions(premise) {
                search.session.facts_mut().add(fact);
            }
            search.rules_fired.push(rule.id.clone());
            search.trail.push(format!(
                "{indent}fired '{}' (CF {premise:.2}): {}",
                rule.id, rule.description
            ));

            if search.session.facts().has(goal) {
                return true;
            }
        }

        search.trail.push(format!("{indent}could not prove '{goal}'"));
        false
    }

    /// Every condition must hold now, or its fact must be provable and then hold.
    fn establish_conditions(
        &self,
        search: &mut Search<'_>,
        rule: &SymbolicRule,
        depth: usize,
        branch: &HashSet<String>,
    ) -> bool {
        let indent = "  ".repeat(depth + 1);
        for condition in &rule.conditions {
            if condition.is_satisfied(search.session.facts()) {
                continue;
            }
            let provable = !search.session.facts().has(&condition.fact)
                && self.prove_goal(search, &condition.fact, depth + 1, branch);
            if provable && condition.is_satisfied(search.session.facts()) {
                continue;
            }
            search.trail.push(format!("{indent}condition '{condition}' not satisfied"));
            return false;
        }
        true
    }
}
