//! Facts and the working-memory store the engines reason over.

pub mod certainty;
mod store;
mod value;

pub use store::{Fact, FactStore};
pub use value::FactValue;
