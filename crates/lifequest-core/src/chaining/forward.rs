//! Data-driven forward chaining.
//!
//! Rounds repeat over the rule list until one round changes nothing or the
//! round cap is hit. A rule fires at most once per session, even if its
//! conditions keep holding.

use serde::Serialize;

use crate::facts::Fact;
use crate::kb::KnowledgeBase;
use crate::rules::SymbolicRule;
use crate::session::InferenceSession;

pub const DEFAULT_MAX_ROUNDS: usize = 50;

/// One accepted change to the fact store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiringLogEntry {
    pub round: usize,
    pub rule_id: String,
    pub description: String,
    /// The fact as stored after the change.
    pub fact: Fact,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForwardResult {
    /// Rounds executed, including the final unproductive one.
    pub rounds: usize,
    pub log: Vec<FiringLogEntry>,
    /// Number of accepted changes.
    pub new_facts: usize,
    /// Rule ids in firing order.
    pub rules_fired: Vec<String>,
    pub final_facts: Vec<Fact>,
}

pub struct ForwardChainer<'kb> {
    rules: &'kb [SymbolicRule],
    max_rounds: usize,
}

impl<'kb> ForwardChainer<'kb> {
    pub fn new(kb: &'kb KnowledgeBase) -> Self {
        Self::from_rules(kb.rules())
    }

    /// Rules must already be in firing order.
    pub fn from_rules(rules: &'kb [SymbolicRule]) -> Self {
        Self {
            rules,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn run(&self, session: &mut InferenceSession) -> ForwardResult {
        let mut rounds = 0;
        let mut log = Vec::new();
        let mut rules_fired = Vec::new();

        while rounds < self.max_rounds {
            rounds += 1;
            let mut productive = false;

            for rule in self.rules {
                if session.has_fired(&rule.id) {
                    continue;
                }
                let premise = rule.premise_confidence(session.facts());
                if premise <= 0.0 {
                    continue;
                }

                session.mark_fired(&rule.id);
                rules_fired.push(rule.id.clone());

                for fact in rule.conclusions(premise) {
                    let name = fact.name.clone();
                    if !session.facts_mut().add(fact) {
                        continue;
                    }
                    productive = true;
                    if let Some(stored) = session.facts().get(&name) {
                        log.push(FiringLogEntry {
                            round: rounds,
                            rule_id: rule.id.clone(),
                            description: rule.description.clone(),
                            fact: stored.clone(),
                        });
                    }
                }
            }

            tracing::debug!(round = rounds, productive, "forward chaining round");
            if !productive {
                break;
            }
        }

        let new_facts = log.len();
        tracing::debug!(rounds, new_facts, fired = rules_fired.len(), "forward chaining finished");
        ForwardResult {
            rounds,
            log,
            new_facts,
            rules_fired,
            final_facts: session.facts().snapshot(),
        }
    }
}
