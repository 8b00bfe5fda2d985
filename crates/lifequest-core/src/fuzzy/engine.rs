//! Fuzzy inference engine.
//!
//! Pipeline: fuzzify crisp inputs, activate rules (min over antecedents,
//! scaled by rule confidence), aggregate per output set (max), then
//! defuzzify with the centroid of the output set centers.

use indexmap::IndexMap;
use serde::Serialize;

use super::{Clause, FuzzyRule, FuzzyVariable};
use crate::error::KnowledgeBaseError;
use crate::facts::certainty;

/// Memberships per input variable, then per set.
pub type Fuzzified = IndexMap<String, IndexMap<String, f64>>;

/// Advice text carried by a triggered rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advice {
    pub rule_id: String,
    pub text: String,
    pub confidence: f64,
    pub target_set: String,
}

/// Result of one fuzzy evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuzzyOutcome {
    /// Centroid of the aggregated output.
    pub crisp_score: f64,
    /// Output set with the highest aggregate activation.
    pub strongest_set: String,
    /// Aggregate activation per output set, in the order sets first fired.
    pub aggregated: IndexMap<String, f64>,
    pub fuzzified: Fuzzified,
    /// Every triggered rule's advice, strongest first.
    pub advice: Vec<Advice>,
    pub top_advice: Option<Advice>,
}

/// Immutable fuzzy rule base plus the evaluation pipeline.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FuzzyEngine {
    variables: IndexMap<String, FuzzyVariable>,
    output: Option<FuzzyVariable>,
    rules: Vec<FuzzyRule>,
}

impl FuzzyEngine {
    /// Build an engine, rejecting rules that reference anything undefined.
    pub fn new(
        variables: IndexMap<String, FuzzyVariable>,
        output: Option<FuzzyVariable>,
        rules: Vec<FuzzyRule>,
    ) -> Result<Self, KnowledgeBaseError> {
        if !rules.is_empty() && output.is_none() {
            return Err(KnowledgeBaseError::MissingOutput);
        }

        for rule in &rules {
            if rule.antecedents.is_empty() {
                return Err(KnowledgeBaseError::EmptyAntecedent(rule.id.clone()));
            }
            for clause in &rule.antecedents {
                let variable = variables.get(&clause.variable).ok_or_else(|| {
                    KnowledgeBaseError::UnknownVariable {
                        rule: rule.id.clone(),
                        variable: clause.variable.clone(),
                    }
                })?;
                check_set(rule, variable, clause)?;
            }
            if let Some(output) = &output {
                if rule.consequent.variable != output.name {
                    return Err(KnowledgeBaseError::UnknownOutputVariable {
                        rule: rule.id.clone(),
                        variable: rule.consequent.variable.clone(),
                        expected: output.name.clone(),
                    });
                }
                check_set(rule, output, &rule.consequent)?;
            }
        }

        let rules = rules
            .into_iter()
            .map(|rule| FuzzyRule {
                confidence: certainty::clip(rule.confidence),
                ..rule
            })
            .collect();

        Ok(Self {
            variables,
            output,
            rules,
        })
    }

    pub fn variables(&self) -> &IndexMap<String, FuzzyVariable> {
        &self.variables
    }

    pub fn output(&self) -> Option<&FuzzyVariable> {
        self.output.as_ref()
    }

    pub fn rules(&self) -> &[FuzzyRule] {
        &self.rules
    }

    /// Fuzzify crisp inputs. Names with no declared variable are ignored.
    pub fn fuzzify<I, K>(&self, inputs: I) -> Fuzzified
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        inputs
            .into_iter()
            .filter(|(_, value)| value.is_finite())
            .filter_map(|(name, value)| {
                let variable = self.variables.get(name.as_ref())?;
                Some((variable.name.clone(), variable.fuzzify(value)))
            })
            .collect()
    }

    /// Run the whole pipeline. `None` when no rule triggers.
    pub fn evaluate<I, K>(&self, inputs: I) -> Option<FuzzyOutcome>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let output = self.output.as_ref()?;
        let fuzzified = self.fuzzify(inputs);
        tracing::debug!(?fuzzified, "fuzzified inputs");

        let mut aggregated: IndexMap<String, f64> = IndexMap::new();
        let mut advice = Vec::new();

        for rule in &self.rules {
            let Some(strength) = activation(rule, &fuzzified) else {
                continue;
            };
            let cf = strength * rule.confidence;

            let target = &rule.consequent.set;
            match aggregated.get_mut(target) {
                Some(current) if cf > *current => *current = cf,
                Some(_) => {}
                None => {
                    aggregated.insert(target.clone(), cf);
                }
            }

            advice.push(Advice {
                rule_id: rule.id.clone(),
                text: rule.advice.clone(),
                confidence: cf,
                target_set: target.clone(),
            });
        }

        tracing::debug!(triggered = advice.len(), ?aggregated, "fuzzy rules activated");
        if aggregated.is_empty() {
            return None;
        }

        let crisp_score = centroid(&aggregated, output);
        let strongest_set = strongest(&aggregated);

        // stable: equal confidences keep rule order
        advice.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        let top_advice = advice.first().cloned();

        tracing::debug!(crisp_score, %strongest_set, "defuzzified");
        Some(FuzzyOutcome {
            crisp_score,
            strongest_set,
            aggregated,
            fuzzified,
            advice,
            top_advice,
        })
    }
}

fn check_set(rule: &FuzzyRule, variable: &FuzzyVariable, clause: &Clause) -> Result<(), KnowledgeBaseError> {
    if variable.set(&clause.set).is_none() {
        return Err(KnowledgeBaseError::UnknownFuzzySet {
            rule: rule.id.clone(),
            variable: clause.variable.clone(),
            set: clause.set.clone(),
        });
    }
    Ok(())
}

/// Min membership across antecedents; `None` if any clause is unmatched.
fn activation(rule: &FuzzyRule, fuzzified: &Fuzzified) -> Option<f64> {
    let mut strength = 1.0_f64;
    for clause in &rule.antecedents {
        let degree = fuzzified.get(&clause.variable)?.get(&clause.set)?;
        strength = strength.min(*degree);
    }
    (strength > 0.0).then_some(strength)
}

/// Activation-weighted mean of set centers; 0 when nothing is active.
pub fn centroid(aggregated: &IndexMap<String, f64>, output: &FuzzyVariable) -> f64 {
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (set_name, activation) in aggregated {
        let Some(set) = output.set(set_name) else {
            continue;
        };
        numerator += activation * set.center();
        denominator += activation;
    }
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Set with the highest activation; the earliest wins a tie.
fn strongest(aggregated: &IndexMap<String, f64>) -> String {
    let mut best: Option<(&String, f64)> = None;
    for (name, activation) in aggregated {
        match best {
            Some((_, current)) if *activation <= current => {}
            _ => best = Some((name, *activation)),
        }
    }
    best.map(|(name, _)| name.clone()).unwrap_or_default()
}
