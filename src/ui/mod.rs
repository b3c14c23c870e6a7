//! String-based helpers for quick usage and rendering.
//!
//! Every call runs in a fresh [`Session`], so nothing is shared between calls.

use std::collections::HashMap;

use crate::error::{CasError, Result};
use crate::expr::ExprId;
use crate::format::{inconsistent_summary, solution_summary, system_summary};
use crate::session::Session;
use crate::solver::LinearResult;

/// Parses `input` into a raw expression owned by a new session.
pub fn parse(input: &str) -> Result<(Session, ExprId)> {
    let mut session = Session::new();
    let expr = session.parse(input)?;
    Ok((session, expr))
}

pub fn simplify(input: &str) -> Result<(Session, ExprId)> {
    let mut session = Session::new();
    let expr = session.parse_canonical(input)?;
    Ok((session, expr))
}

pub fn simp(input: &str) -> Result<String> {
    let (session, expr) = simplify(input)?;
    Ok(session.to_string(expr))
}

pub fn differentiate(input: &str, var: &str) -> Result<(Session, ExprId)> {
    let mut session = Session::new();
    let expr = session.parse(input)?;
    let derivative = session.differentiate(expr, var)?;
    Ok((session, derivative))
}

pub fn diff(input: &str, var: &str) -> Result<String> {
    let (session, derivative) = differentiate(input, var)?;
    Ok(session.to_string(derivative))
}

pub fn expand(input: &str) -> Result<String> {
    let mut session = Session::new();
    let expr = session.parse(input)?;
    let expanded = session.expand(expr)?;
    Ok(session.to_string(expanded))
}

/// Limit of `input` as `var` approaches `point`.
pub fn limit(input: &str, var: &str, point: &str) -> Result<String> {
    let mut session = Session::new();
    let expr = session.parse(input)?;
    let point = session.parse_canonical(point)?;
    let value = session.limit(expr, var, point)?;
    Ok(session.to_string(value))
}

/// Taylor polynomial of `input` about `point`, keeping powers below `order`.
pub fn taylor(input: &str, var: &str, point: &str, order: u32) -> Result<String> {
    let mut session = Session::new();
    let expr = session.parse(input)?;
    let point = session.parse_canonical(point)?;
    let series = session.taylor(expr, var, point, order)?;
    Ok(session.to_string(series))
}

pub fn evaluate(input: &str, bindings: &[(&str, f64)]) -> Result<f64> {
    let mut session = Session::new();
    let expr = session.parse(input)?;
    let bindings: HashMap<String, f64> = bindings
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect();
    session.evaluate(expr, &bindings)
}

/// Solves one equation (`lhs = rhs`, or an expression equal to zero) for `var`.
pub fn solve(equation: &str, var: &str) -> Result<Vec<String>> {
    let mut session = Session::new();
    let expr = session.parse_equation(equation)?;
    let solutions = session.solve(expr, var)?;
    Ok(solution_summary(session.pool(), var, &solutions))
}

/// Solves a linear system given as equation texts.
pub fn solve_system(vars: &[&str], equations: &[&str]) -> Result<(Session, LinearResult)> {
    let mut session = Session::new();
    let parsed = equations
        .iter()
        .map(|eq| session.parse_equation(eq))
        .collect::<Result<Vec<_>>>()?;
    let result = session.solve_system(&parsed, vars)?;
    Ok((session, result))
}

/// Like [`solve_system`], rendered as summary lines; an inconsistent system is reported
/// in the lines rather than as an error.
pub fn solve_eqs(vars: &[&str], equations: &[&str]) -> Result<Vec<String>> {
    match solve_system(vars, equations) {
        Ok((session, result)) => Ok(system_summary(session.pool(), &result)),
        Err(CasError::SingularSystem { row }) => Ok(inconsistent_summary(row)),
        Err(err) => Err(err),
    }
}
