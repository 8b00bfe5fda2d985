//! Typed fact values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value carried by a fact or used as a rule literal.
///
/// Deserializes untagged, so `9`, `"Novice"`, `true` and `["a", "b"]` in a
/// knowledge base or snapshot map directly onto the matching variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<FactValue>),
}

impl FactValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FactValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FactValue]> {
        match self {
            FactValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, FactValue::List(_))
    }

    /// Short type name used in validation messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FactValue::Bool(_) => "bool",
            FactValue::Number(_) => "number",
            FactValue::Text(_) => "text",
            FactValue::List(_) => "list",
        }
    }

    /// Flatten into the elements a list-valued fact should receive.
    pub fn into_elements(self) -> Vec<FactValue> {
        match self {
            FactValue::List(items) => items,
            other => vec![other],
        }
    }

    /// Parse a command-line style literal: numbers, `true`/`false`,
    /// comma-separated lists in brackets, anything else is text.
    pub fn parse_literal(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Some(inner) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            let items = inner
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(FactValue::parse_literal)
                .collect();
            return FactValue::List(items);
        }
        match trimmed {
            "true" => FactValue::Bool(true),
            "false" => FactValue::Bool(false),
            _ => trimmed
                .parse::<f64>()
                .map(FactValue::Number)
                .unwrap_or_else(|_| FactValue::Text(trimmed.to_string())),
        }
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::Bool(b) => write!(f, "{b}"),
            FactValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{n:.0}"),
            FactValue::Number(n) => write!(f, "{n}"),
            FactValue::Text(s) => write!(f, "{s}"),
            FactValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<f64> for FactValue {
    fn from(n: f64) -> Self {
        FactValue::Number(n)
    }
}

impl From<i64> for FactValue {
    fn from(n: i64) -> Self {
        FactValue::Number(n as f64)
    }
}

impl From<i32> for FactValue {
    fn from(n: i32) -> Self {
        FactValue::Number(f64::from(n))
    }
}

impl From<u32> for FactValue {
    fn from(n: u32) -> Self {
        FactValue::Number(f64::from(n))
    }
}

impl From<bool> for FactValue {
    fn from(b: bool) -> Self {
        FactValue::Bool(b)
    }
}

impl From<&str> for FactValue {
    fn from(s: &str) -> Self {
        FactValue::Text(s.to_string())
    }
}

impl From<String> for FactValue {
    fn from(s: String) -> Self {
        FactValue::Text(s)
    }
}

impl From<Vec<FactValue>> for FactValue {
    fn from(items: Vec<FactValue>) -> Self {
        FactValue::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_deserialize_from_json() {
        let values: Vec<FactValue> = serde_json::from_str(r#"[9, "Novice", true, ["a", 2]]"#).unwrap();
        assert_eq!(values[0], FactValue::Number(9.0));
        assert_eq!(values[1], FactValue::Text("Novice".into()));
        assert_eq!(values[2], FactValue::Bool(true));
        assert_eq!(
            values[3],
            FactValue::List(vec![FactValue::Text("a".into()), FactValue::Number(2.0)])
        );
    }

    #[test]
    fn test_integer_toml_literal_becomes_number() {
        #[derive(Deserialize)]
        struct Wrapper {
            value: FactValue,
        }
        let parsed: Wrapper = toml::from_str("value = 7").unwrap();
        assert_eq!(parsed.value, FactValue::Number(7.0));
    }

    #[test]
    fn test_parse_literal() {
        assert_eq!(FactValue::parse_literal("9"), FactValue::Number(9.0));
        assert_eq!(FactValue::parse_literal("2.5"), FactValue::Number(2.5));
        assert_eq!(FactValue::parse_literal("true"), FactValue::Bool(true));
        assert_eq!(FactValue::parse_literal("Novice"), FactValue::Text("Novice".into()));
        assert_eq!(
            FactValue::parse_literal("[1, two]"),
            FactValue::List(vec![FactValue::Number(1.0), FactValue::Text("two".into())])
        );
    }

    #[test]
    fn test_display_drops_trailing_zero_for_whole_numbers() {
        assert_eq!(FactValue::Number(9.0).to_string(), "9");
        assert_eq!(FactValue::Number(2.5).to_string(), "2.5");
        assert_eq!(
            FactValue::List(vec!["a".into(), "b".into()]).to_string(),
            "[a, b]"
        );
    }
}
