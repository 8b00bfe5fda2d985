pub mod analyze;
pub mod config;
pub mod fuzzy;
pub mod kb;
pub mod prove;

use lifequest_core::{Config, KnowledgeBase};
use std::path::Path;

/// Knowledge base from `--kb`, else the configured path, else the built-in rules.
pub fn load_knowledge_base(
    explicit: Option<&Path>,
    config: &Config,
) -> Result<KnowledgeBase, Box<dyn std::error::Error>> {
    let kb = match explicit.or(config.knowledge_base.as_deref()) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading knowledge base");
            KnowledgeBase::load(path)?
        }
        None => KnowledgeBase::builtin()?,
    };
    Ok(kb)
}

/// Split `name=value`.
pub fn split_assignment(raw: &str) -> Result<(&str, &str), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value.trim())),
        _ => Err(format!("expected name=value, got '{raw}'")),
    }
}
