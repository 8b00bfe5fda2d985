//! Rule conditions and the closed set of comparison kinds.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::facts::{FactStore, FactValue};

/// Supported comparison kinds.
///
/// Operator strings are parsed once when a knowledge base is loaded;
/// anything not listed here is rejected at that point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Equal,
    NotEqual,
    Greater,
    Less,
    GreaterOrEqual,
    LessOrEqual,
    MemberOf,
    NotMemberOf,
    Contains,
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Equal => "equal",
            Comparison::NotEqual => "not_equal",
            Comparison::Greater => "greater",
            Comparison::Less => "less",
            Comparison::GreaterOrEqual => "greater_or_equal",
            Comparison::LessOrEqual => "less_or_equal",
            Comparison::MemberOf => "member_of",
            Comparison::NotMemberOf => "not_member_of",
            Comparison::Contains => "contains",
        }
    }

    /// Check that a literal has a type this comparison can use.
    ///
    /// Returns a human-readable reason when it cannot.
    pub fn check_literal(&self, literal: &FactValue) -> Result<(), String> {
        match self {
            Comparison::Equal | Comparison::NotEqual => Ok(()),
            Comparison::Greater
            | Comparison::Less
            | Comparison::GreaterOrEqual
            | Comparison::LessOrEqual => match literal {
                FactValue::Number(n) if n.is_finite() => Ok(()),
                other => Err(format!("needs a finite number literal, got {}", other.kind())),
            },
            Comparison::MemberOf | Comparison::NotMemberOf => match literal {
                FactValue::List(_) => Ok(()),
                other => Err(format!("needs a list literal, got {}", other.kind())),
            },
            Comparison::Contains => match literal {
                FactValue::List(_) => Err("needs a scalar literal, got list".to_string()),
                _ => Ok(()),
            },
        }
    }

    /// Evaluate `value <op> literal`.
    ///
    /// Total over every value/literal pair: a type mismatch is simply `false`.
    pub fn holds(&self, value: &FactValue, literal: &FactValue) -> bool {
        match self {
            Comparison::Equal => value == literal,
            Comparison::NotEqual => value != literal,
            Comparison::Greater => numeric(value, literal, |a, b| a > b),
            Comparison::Less => numeric(value, literal, |a, b| a < b),
            Comparison::GreaterOrEqual => numeric(value, literal, |a, b| a >= b),
            Comparison::LessOrEqual => numeric(value, literal, |a, b| a <= b),
            Comparison::MemberOf => is_member(value, literal),
            Comparison::NotMemberOf => literal.is_list() && !is_member(value, literal),
            Comparison::Contains => match (value, literal) {
                (FactValue::List(items), _) => items.contains(literal),
                (FactValue::Text(haystack), FactValue::Text(needle)) => haystack.contains(needle.as_str()),
                _ => false,
            },
        }
    }
}

fn numeric(value: &FactValue, literal: &FactValue, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (value.as_number(), literal.as_number()) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

/// A list-valued fact is a member when any of its elements is.
fn is_member(value: &FactValue, literal: &FactValue) -> bool {
    let Some(allowed) = literal.as_list() else {
        return false;
    };
    match value {
        FactValue::List(items) => items.iter().any(|item| allowed.contains(item)),
        scalar => allowed.contains(scalar),
    }
}

impl FromStr for Comparison {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "equal" | "equals" | "eq" | "==" => Ok(Comparison::Equal),
            "not_equal" | "ne" | "!=" => Ok(Comparison::NotEqual),
            "greater" | "gt" | ">" => Ok(Comparison::Greater),
            "less" | "lt" | "<" => Ok(Comparison::Less),
            "greater_or_equal" | "ge" | ">=" => Ok(Comparison::GreaterOrEqual),
            "less_or_equal" | "le" | "<=" => Ok(Comparison::LessOrEqual),
            "member_of" | "in" => Ok(Comparison::MemberOf),
            "not_member_of" | "not_in" => Ok(Comparison::NotMemberOf),
            "contains" => Ok(Comparison::Contains),
            _ => Err(s.to_string()),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One premise of a symbolic rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub fact: String,
    pub comparison: Comparison,
    pub value: FactValue,
}

impl Condition {
    pub fn new(fact: impl Into<String>, comparison: Comparison, value: impl Into<FactValue>) -> Self {
        Self {
            fact: fact.into(),
            comparison,
            value: value.into(),
        }
    }

    /// Confidence this condition contributes: the fact's CF when the
    /// comparison holds, 0 when it fails or the fact is unknown.
    pub fn confidence(&self, store: &FactStore) -> f64 {
        match store.get(&self.fact) {
            Some(fact) if self.comparison.holds(&fact.value, &self.value) => fact.confidence,
            _ => 0.0,
        }
    }

    pub fn is_satisfied(&self, store: &FactStore) -> bool {
        self.confidence(store) > 0.0
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.fact, self.comparison, self.value)
    }
}
