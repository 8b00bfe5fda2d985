//! Symbolic inference over a session's fact store.

pub mod backward;
pub mod forward;

pub use backward::{BackwardChainer, BackwardResult, DEFAULT_MAX_DEPTH};
pub use forward::{FiringLogEntry, ForwardChainer, ForwardResult, DEFAULT_MAX_ROUNDS};
