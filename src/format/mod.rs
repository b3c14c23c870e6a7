//! Formatting helpers for rendering expressions and solver output.

pub mod expr;
pub mod solve;

pub use expr::{display, to_string, Display};
pub use solve::{inconsistent_summary, solution_summary, system_summary};
