//! Symbolic computation kernel: exact rational arithmetic, hash-consed expressions,
//! canonicalization, differentiation and closed-form equation solving.

pub mod calculus;
pub mod config;
pub mod error;
pub mod eval;
pub mod expr;
pub mod format;
pub mod ordering;
pub mod parser;
pub mod polynomial;
pub mod prelude;
pub mod rational;
pub mod session;
pub mod simplify;
pub mod solver;
pub mod ui;
pub mod visit;

pub use calculus::{differentiate, differentiate_n, limit, maclaurin, taylor};
pub use config::Config;
pub use error::{CasError, Result};
pub use eval::evaluate;
pub use expr::{ExprId, Func, Node, Pool};
pub use format::{display, inconsistent_summary, solution_summary, system_summary, to_string};
pub use parser::{parse_equation, parse_expr};
pub use polynomial::{coefficients, Polynomial};
pub use rational::Rational;
pub use session::Session;
pub use simplify::{canonicalize, canonicalize_with_limit, expand, substitute, substitute_all};
pub use solver::{
    solve, solve_linear, solve_quadratic, solve_system, LinearDiagnostics, LinearFamily,
    LinearResult, LinearSolution, Root, SolutionSet,
};
