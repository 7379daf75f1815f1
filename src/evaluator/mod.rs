//! Evaluation of validated programs.
//!
//! [`value`] holds the runtime value model, [`operations`] the operator
//! and date attribute rules, and [`evaluator`] the tree walker itself.

pub mod evaluator;
pub mod operations;
pub mod value;

pub use evaluator::{run, run_with};

#[cfg(test)]
mod tests;
