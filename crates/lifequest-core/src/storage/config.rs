//! TOML-based application configuration.
//!
//! Stores tuning for the reasoning pipeline:
//! - Chaining bounds (forward rounds, backward depth)
//! - Ranker cut-off and priority thresholds
//! - Confidence assigned to self-reported observations
//! - An optional custom knowledge base path
//!
//! Configuration is stored at `~/.config/lifequest/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::chaining::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_ROUNDS};
use crate::error::ConfigError;

/// Chaining bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

/// Recommendation ranker settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankerConfig {
    /// Recommendations kept per category.
    #[serde(default = "default_per_category")]
    pub per_category: usize,
    /// Crisp score at or above which advice is labelled high priority.
    #[serde(default = "default_high_threshold")]
    pub high_threshold: f64,
    /// Crisp score at or above which advice is labelled medium priority.
    #[serde(default = "default_medium_threshold")]
    pub medium_threshold: f64,
}

/// Confidence given to self-reported readings. Objective counters are
/// always certain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationConfig {
    #[serde(default = "default_stress_confidence")]
    pub stress: f64,
    #[serde(default = "default_sitting_confidence")]
    pub sitting: f64,
    #[serde(default = "default_activity_confidence")]
    pub activity: f64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/lifequest/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Knowledge base to use instead of the built-in rules.
    #[serde(default)]
    pub knowledge_base: Option<PathBuf>,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub ranker: RankerConfig,
    #[serde(default)]
    pub observations: ObservationConfig,
}

fn default_max_rounds() -> usize {
    DEFAULT_MAX_ROUNDS
}
fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}
fn default_per_category() -> usize {
    1
}
fn default_high_threshold() -> f64 {
    70.0
}
fn default_medium_threshold() -> f64 {
    40.0
}
fn default_stress_confidence() -> f64 {
    0.9
}
fn default_sitting_confidence() -> f64 {
    0.8
}
fn default_activity_confidence() -> f64 {
    0.8
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
            max_depth: default_max_depth(),
        }
    }
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            per_category: default_per_category(),
            high_threshold: default_high_threshold(),
            medium_threshold: default_medium_threshold(),
        }
    }
}

impl Default for ObservationConfig {
    fn default() -> Self {
        Self {
            stress: default_stress_confidence(),
            sitting: default_sitting_confidence(),
            activity: default_activity_confidence(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            knowledge_base: None,
            engine: EngineConfig::default(),
            ranker: RankerConfig::default(),
            observations: ObservationConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                // unset optional paths land here too
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Path of the config file inside the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults if no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Same as [`Config::load`] against an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// into the field's type or range.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Reject values the engines cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| {
            Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: message.to_string(),
            })
        };

        if self.engine.max_rounds == 0 {
            return invalid("engine.max_rounds", "must be at least 1");
        }
        if self.engine.max_depth == 0 {
            return invalid("engine.max_depth", "must be at least 1");
        }
        if self.ranker.per_category == 0 {
            return invalid("ranker.per_category", "must be at least 1");
        }
        if self.ranker.medium_threshold > self.ranker.high_threshold {
            return invalid("ranker.medium_threshold", "must not exceed ranker.high_threshold");
        }
        for (key, cf) in [
            ("observations.stress", self.observations.stress),
            ("observations.sitting", self.observations.sitting),
            ("observations.activity", self.observations.activity),
        ] {
            if !(0.0..=1.0).contains(&cf) {
                return invalid(key, "confidence must be between 0 and 1");
            }
        }
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
