//! Request-scoped facade bundling a [`Pool`] with the engine's operations.
//!
//! A session owns its pool outright; dropping the session discards every node created
//! while serving the request. Two sessions never share state.

use std::collections::HashMap;

use crate::calculus;
use crate::config::Config;
use crate::error::Result;
use crate::eval;
use crate::expr::{ExprId, Pool};
use crate::format;
use crate::parser;
use crate::simplify;
use crate::solver::{self, LinearResult, SolutionSet};

#[derive(Debug, Default)]
pub struct Session {
    pool: Pool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Session {
            pool: Pool::with_config(config),
        }
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut Pool {
        &mut self.pool
    }

    /// Parses `text` into a raw expression; see [`Session::canonicalize`].
    pub fn parse(&mut self, text: &str) -> Result<ExprId> {
        parser::parse_expr(&mut self.pool, text)
    }

    /// Parses and canonicalizes in one step.
    pub fn parse_canonical(&mut self, text: &str) -> Result<ExprId> {
        let raw = self.parse(text)?;
        self.canonicalize(raw)
    }

    /// Parses `lhs = rhs` (or a bare expression) into canonical `lhs - rhs`.
    pub fn parse_equation(&mut self, text: &str) -> Result<ExprId> {
        let raw = parser::parse_equation(&mut self.pool, text)?;
        self.canonicalize(raw)
    }

    pub fn canonicalize(&mut self, expr: ExprId) -> Result<ExprId> {
        simplify::canonicalize(&mut self.pool, expr)
    }

    pub fn expand(&mut self, expr: ExprId) -> Result<ExprId> {
        simplify::expand(&mut self.pool, expr)
    }

    pub fn substitute(&mut self, expr: ExprId, var: &str, replacement: ExprId) -> Result<ExprId> {
        simplify::substitute(&mut self.pool, expr, var, replacement)
    }

    pub fn differentiate(&mut self, expr: ExprId, var: &str) -> Result<ExprId> {
        calculus::differentiate(&mut self.pool, expr, var)
    }

    pub fn differentiate_n(&mut self, expr: ExprId, var: &str, n: u32) -> Result<ExprId> {
        calculus::differentiate_n(&mut self.pool, expr, var, n)
    }

    pub fn limit(&mut self, expr: ExprId, var: &str, point: ExprId) -> Result<ExprId> {
        calculus::limit(&mut self.pool, expr, var, point)
    }

    pub fn taylor(&mut self, expr: ExprId, var: &str, point: ExprId, order: u32) -> Result<ExprId> {
        calculus::taylor(&mut self.pool, expr, var, point, order)
    }

    pub fn maclaurin(&mut self, expr: ExprId, var: &str, order: u32) -> Result<ExprId> {
        calculus::maclaurin(&mut self.pool, expr, var, order)
    }

    pub fn evaluate(&mut self, expr: ExprId, bindings: &HashMap<String, f64>) -> Result<f64> {
        eval::evaluate(&mut self.pool, expr, bindings)
    }

    pub fn solve(&mut self, expr: ExprId, var: &str) -> Result<SolutionSet> {
        solver::solve(&mut self.pool, expr, var)
    }

    pub fn solve_linear(&mut self, expr: ExprId, var: &str) -> Result<SolutionSet> {
        solver::solve_linear(&mut self.pool, expr, var)
    }

    pub fn solve_quadratic(&mut self, expr: ExprId, var: &str) -> Result<SolutionSet> {
        solver::solve_quadratic(&mut self.pool, expr, var)
    }

    pub fn solve_system(&mut self, equations: &[ExprId], variables: &[&str]) -> Result<LinearResult> {
        solver::solve_system(&mut self.pool, equations, variables)
    }

    pub fn to_string(&self, expr: ExprId) -> String {
        format::to_string(&self.pool, expr)
    }
}
