//! Core error types for lifequest-core.
//!
//! Structural problems in a knowledge base are reported through
//! [`KnowledgeBaseError`] at load time, before any session runs. Session
//! input never produces an error: unknown names simply do not match.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for lifequest-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Knowledge base definition errors
    #[error("Knowledge base error: {0}")]
    KnowledgeBase(#[from] KnowledgeBaseError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Application configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Could not resolve or create the data directory
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

/// Structural errors in a knowledge base document.
///
/// Every variant names the rule or variable at fault.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KnowledgeBaseError {
    /// Document could not be read
    #[error("Failed to read knowledge base {path}: {message}")]
    ReadFailed { path: PathBuf, message: String },

    /// Document is not valid TOML/JSON or does not match the schema
    #[error("Failed to parse knowledge base: {0}")]
    ParseFailed(String),

    /// File extension is neither `.toml` nor `.json`
    #[error("Unsupported knowledge base format for {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    /// Two symbolic rules share an id
    #[error("Duplicate rule id '{0}'")]
    DuplicateRule(String),

    /// Comparison operator is not one of the supported kinds
    #[error("Rule '{rule}': unknown comparison '{op}' on fact '{fact}'")]
    UnknownComparison {
        rule: String,
        fact: String,
        op: String,
    },

    /// Literal type cannot be compared with the given operator
    #[error("Rule '{rule}': comparison '{op}' on fact '{fact}' {message}")]
    IncompatibleComparison {
        rule: String,
        fact: String,
        op: String,
        message: String,
    },

    /// Fuzzy rule references an input variable that is not defined
    #[error("Fuzzy rule '{rule}': undefined variable '{variable}'")]
    UnknownVariable { rule: String, variable: String },

    /// Fuzzy rule references a set the variable does not define
    #[error("Fuzzy rule '{rule}': variable '{variable}' has no set '{set}'")]
    UnknownFuzzySet {
        rule: String,
        variable: String,
        set: String,
    },

    /// Fuzzy rule concludes something other than the output variable
    #[error("Fuzzy rule '{rule}': consequent targets '{variable}', expected output variable '{expected}'")]
    UnknownOutputVariable {
        rule: String,
        variable: String,
        expected: String,
    },

    /// Fuzzy rule has no antecedent clauses
    #[error("Fuzzy rule '{0}' has no antecedents")]
    EmptyAntecedent(String),

    /// Fuzzy rules are present but no output variable is declared
    #[error("Fuzzy rules are defined but no output variable is declared")]
    MissingOutput,

    /// Set parameters are not 3 or 4 ordered, finite numbers
    #[error("Variable '{variable}': set '{set}' is malformed: {message}")]
    InvalidSetShape {
        variable: String,
        set: String,
        message: String,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
