//! Rule repository.
//!
//! A knowledge base is loaded once, validated as a whole, and is read-only
//! afterwards. Symbolic rules are kept sorted by priority (highest first,
//! declaration order on ties).

mod definition;

pub use definition::{
    ActionDef, ClauseDef, ConditionDef, FuzzyDef, FuzzyRuleDef, KnowledgeBaseDef, OutputDef,
    RuleDef, VariableDef,
};

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

use crate::error::KnowledgeBaseError;
use crate::fuzzy::{Clause, FuzzyEngine, FuzzyRule, FuzzyVariable};
use crate::rules::{Action, Comparison, Condition, SymbolicRule};

/// Rules shipped with the crate.
const BUILTIN_TOML: &str = include_str!("../../data/lifequest_rules.toml");

/// Validated, immutable rule repository.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    rules: Vec<SymbolicRule>,
    list_facts: Vec<String>,
    fuzzy: FuzzyEngine,
}

/// Counts reported by `kb info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnowledgeBaseSummary {
    pub rules: usize,
    pub fuzzy_rules: usize,
    pub fuzzy_variables: usize,
    pub output_variable: Option<String>,
    pub list_facts: usize,
}

impl KnowledgeBase {
    /// The default LifeQuest rules.
    pub fn builtin() -> Result<Self, KnowledgeBaseError> {
        Self::from_toml_str(BUILTIN_TOML)
    }

    /// Source text of the default rules.
    pub fn builtin_source() -> &'static str {
        BUILTIN_TOML
    }

    pub fn from_toml_str(source: &str) -> Result<Self, KnowledgeBaseError> {
        let def: KnowledgeBaseDef =
            toml::from_str(source).map_err(|e| KnowledgeBaseError::ParseFailed(e.to_string()))?;
        Self::from_definition(def)
    }

    pub fn from_json_str(source: &str) -> Result<Self, KnowledgeBaseError> {
        let def: KnowledgeBaseDef = serde_json::from_str(source)
            .map_err(|e| KnowledgeBaseError::ParseFailed(e.to_string()))?;
        Self::from_definition(def)
    }

    /// Load a `.toml` or `.json` document from disk.
    pub fn load(path: &Path) -> Result<Self, KnowledgeBaseError> {
        let source = std::fs::read_to_string(path).map_err(|e| KnowledgeBaseError::ReadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let result = match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&source),
            Some("json") => Self::from_json_str(&source),
            _ => Err(KnowledgeBaseError::UnsupportedFormat(path.to_path_buf())),
        };
        if let Err(e) = &result {
            tracing::warn!(path = %path.display(), error = %e, "rejected knowledge base");
        }
        result
    }

    /// Validate a parsed document.
    pub fn from_definition(def: KnowledgeBaseDef) -> Result<Self, KnowledgeBaseError> {
        let rules = compile_rules(def.rules)?;
        let fuzzy = compile_fuzzy(def.fuzzy)?;

        let kb = Self {
            rules,
            list_facts: def.list_facts,
            fuzzy,
        };
        tracing::info!(
            rules = kb.rules.len(),
            fuzzy_rules = kb.fuzzy.rules().len(),
            "knowledge base loaded"
        );
        Ok(kb)
    }

    /// Symbolic rules in firing order.
    pub fn rules(&self) -> &[SymbolicRule] {
        &self.rules
    }

    pub fn rule(&self, id: &str) -> Option<&SymbolicRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn list_facts(&self) -> &[String] {
        &self.list_facts
    }

    pub fn fuzzy(&self) -> &FuzzyEngine {
        &self.fuzzy
    }

    pub fn summary(&self) -> KnowledgeBaseSummary {
        KnowledgeBaseSummary {
            rules: self.rules.len(),
            fuzzy_rules: self.fuzzy.rules().len(),
            fuzzy_variables: self.fuzzy.variables().len(),
            output_variable: self.fuzzy.output().map(|o| o.name.clone()),
            list_facts: self.list_facts.len(),
        }
    }
}

fn compile_rules(defs: Vec<RuleDef>) -> Result<Vec<SymbolicRule>, KnowledgeBaseError> {
    let mut seen = HashSet::new();
    let mut rules = Vec::with_capacity(defs.len());

    for def in defs {
        if !seen.insert(def.id.clone()) {
            return Err(KnowledgeBaseError::DuplicateRule(def.id));
        }

        let mut conditions = Vec::with_capacity(def.conditions.len());
        for cond in def.conditions {
            let comparison: Comparison =
                cond.op
                    .parse()
                    .map_err(|op| KnowledgeBaseError::UnknownComparison {
                        rule: def.id.clone(),
                        fact: cond.fact.clone(),
                        op,
                    })?;
            comparison.check_literal(&cond.value).map_err(|message| {
                KnowledgeBaseError::IncompatibleComparison {
                    rule: def.id.clone(),
                    fact: cond.fact.clone(),
                    op: cond.op.clone(),
                    message,
                }
            })?;
            conditions.push(Condition::new(cond.fact, comparison, cond.value));
        }

        let actions = def
            .actions
            .into_iter()
            .map(|a| Action::new(a.fact, a.value, a.confidence))
            .collect();

        rules.push(SymbolicRule {
            id: def.id,
            priority: def.priority,
            description: def.description,
            conditions,
            actions,
        });
    }

    // stable, so equal priorities keep declaration order
    rules.sort_by(|a, b| b.priority.cmp(&a.priority));
    Ok(rules)
}

fn compile_fuzzy(def: FuzzyDef) -> Result<FuzzyEngine, KnowledgeBaseError> {
    let mut variables = IndexMap::with_capacity(def.variables.len());
    for (name, var) in &def.variables {
        variables.insert(name.clone(), FuzzyVariable::from_params(name, &var.sets)?);
    }

    let output = def
        .output
        .as_ref()
        .map(|o| FuzzyVariable::from_params(&o.name, &o.sets))
        .transpose()?;

    let rules = def
        .rules
        .into_iter()
        .enumerate()
        .map(|(i, r)| FuzzyRule {
            id: r.id.unwrap_or_else(|| format!("fuzzy_rule_{}", i + 1)),
            antecedents: r.when.into_iter().map(|c| Clause::new(c.var, c.is)).collect(),
            consequent: Clause::new(r.then.var, r.then.is),
            confidence: r.confidence,
            advice: r.advice,
        })
        .collect();

    FuzzyEngine::new(variables, output, rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_knowledge_base_is_valid() {
        let kb = KnowledgeBase::builtin().unwrap();
        let summary = kb.summary();
        assert!(summary.rules > 0);
        assert!(summary.fuzzy_rules > 0);
        assert_eq!(summary.output_variable.as_deref(), Some("advice_priority"));
    }

    #[test]
    fn test_rules_sorted_by_priority_then_declaration() {
        let kb = KnowledgeBase::from_toml_str(
            r#"
            [[rules]]
            id = "low"
            priority = 1

            [[rules]]
            id = "high_a"
            priority = 10

            [[rules]]
            id = "high_b"
            priority = 10
            "#,
        )
        .unwrap();
        let ids: Vec<_> = kb.rules().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["high_a", "high_b", "low"]);
    }

    #[test]
    fn test_unknown_comparison_names_rule() {
        let err = KnowledgeBase::from_toml_str(
            r#"
            [[rules]]
            id = "fuzzy_match"
            conditions = [{ fact = "stress_level", op = "roughly", value = 5 }]
            "#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            KnowledgeBaseError::UnknownComparison {
                rule: "fuzzy_match".into(),
                fact: "stress_level".into(),
                op: "roughly".into(),
            }
        );
    }

    #[test]
    fn test_incompatible_literal_rejected() {
        let err = KnowledgeBase::from_toml_str(
            r#"
            [[rules]]
            id = "bad_order"
            conditions = [{ fact = "user_status", op = ">", value = "Novice" }]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::IncompatibleComparison { ref rule, .. } if rule == "bad_order"));
    }

    #[test]
    fn test_duplicate_rule_rejected() {
        let err = KnowledgeBase::from_toml_str(
            r#"
            [[rules]]
            id = "same"
            [[rules]]
            id = "same"
            "#,
        )
        .unwrap_err();
        assert_eq!(err, KnowledgeBaseError::DuplicateRule("same".into()));
    }

    #[test]
    fn test_fuzzy_rule_with_undefined_set_rejected() {
        let err = KnowledgeBase::from_toml_str(
            r#"
            [fuzzy.variables.stress.sets]
            high = [6, 10, 10]

            [fuzzy.output]
            name = "advice_priority"
            sets = { critical = [80, 90, 100] }

            [[fuzzy.rules]]
            id = "panic"
            when = [{ var = "stress", is = "extreme" }]
            then = { var = "advice_priority", is = "critical" }
            advice = "Breathe"
            "#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            KnowledgeBaseError::UnknownFuzzySet {
                rule: "panic".into(),
                variable: "stress".into(),
                set: "extreme".into(),
            }
        );
    }

    #[test]
    fn test_fuzzy_rules_without_output_rejected() {
        let err = KnowledgeBase::from_toml_str(
            r#"
            [fuzzy.variables.stress.sets]
            high = [6, 10, 10]

            [[fuzzy.rules]]
            when = [{ var = "stress", is = "high" }]
            then = { var = "advice_priority", is = "critical" }
            "#,
        )
        .unwrap_err();
        assert_eq!(err, KnowledgeBaseError::MissingOutput);
    }

    #[test]
    fn test_json_document_loads() {
        let kb = KnowledgeBase::from_json_str(
            r#"{
                "list_facts": ["health_tips"],
                "rules": [{
                    "id": "sit",
                    "priority": 5,
                    "conditions": [{"fact": "sitting_hours", "op": ">", "value": 6}],
                    "actions": [{"fact": "health_tips", "value": "Stand up", "confidence": 0.9}]
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(kb.rules().len(), 1);
        assert_eq!(kb.list_facts(), &["health_tips".to_string()]);
        assert_eq!(kb.rule("sit").unwrap().conditions[0].comparison, Comparison::Greater);
    }

    #[test]
    fn test_parse_error_reported() {
        let err = KnowledgeBase::from_toml_str("[[rules]]\npriority = 3").unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::ParseFailed(_)));
    }
}
