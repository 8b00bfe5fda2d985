//! Symbolic production rules.

mod condition;
mod rule;

pub use condition::{Comparison, Condition};
pub use rule::{Action, SymbolicRule};
