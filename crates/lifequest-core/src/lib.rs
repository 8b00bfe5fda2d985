//! # LifeQuest Core Library
//!
//! This library provides the reasoning core behind LifeQuest recommendations.
//! It turns noisy, confidence-weighted observations about a user into ranked,
//! explainable advice. The `lifequest-cli` binary is a thin layer over the
//! same library.
//!
//! ## Architecture
//!
//! - **Facts**: named values with certainty factors, combined with the
//!   MYCIN union rule; list-valued facts accumulate distinct elements
//! - **Knowledge base**: priority-ordered symbolic rules plus fuzzy sets and
//!   fuzzy rules, loaded from TOML/JSON and validated once
//! - **Chaining**: forward (fixpoint) and backward (goal-driven) inference
//!   over a per-request [`InferenceSession`]
//! - **Fuzzy**: fuzzification, min/max activation and aggregation, centroid
//!   defuzzification
//! - **Ranker**: winner-take-all selection per recommendation category
//!
//! ## Key Components
//!
//! - [`KnowledgeBase`]: Validated, immutable rule repository
//! - [`ForwardChainer`] / [`BackwardChainer`]: Symbolic inference
//! - [`FuzzyEngine`]: Fuzzy advice priority
//! - [`AnalysisService`]: Snapshot-to-report pipeline
//! - [`Config`]: Application configuration management

pub mod analysis;
pub mod chaining;
pub mod error;
pub mod facts;
pub mod fuzzy;
pub mod kb;
pub mod ranker;
pub mod rules;
pub mod session;
pub mod storage;

pub use analysis::{AnalysisReport, AnalysisService, SharedAnalyzer, UserSnapshot};
pub use chaining::{BackwardChainer, BackwardResult, ForwardChainer, ForwardResult};
pub use error::{ConfigError, CoreError, KnowledgeBaseError};
pub use facts::{Fact, FactStore, FactValue};
pub use fuzzy::{FuzzyEngine, FuzzyOutcome};
pub use kb::{KnowledgeBase, KnowledgeBaseSummary};
pub use ranker::{Candidate, Category, PriorityLabel, RankedRecommendations, Ranker};
pub use rules::{Action, Comparison, Condition, SymbolicRule};
pub use session::InferenceSession;
pub use storage::Config;
