//! Equation solving: closed-form univariate roots up to degree two and exact linear systems.

mod linear;
mod univariate;

pub use linear::{solve_system, LinearDiagnostics, LinearFamily, LinearResult, LinearSolution};
pub use univariate::{solve, solve_linear, solve_quadratic, Root, SolutionSet};
