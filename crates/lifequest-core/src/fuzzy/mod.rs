//! Fuzzy-logic inference: membership functions, rule activation,
//! max aggregation and centroid defuzzification.

mod engine;
mod rule;
mod set;

pub use engine::{centroid, Advice, Fuzzified, FuzzyEngine, FuzzyOutcome};
pub use rule::{Clause, FuzzyRule};
pub use set::{FuzzySet, FuzzyShape, FuzzyVariable};
