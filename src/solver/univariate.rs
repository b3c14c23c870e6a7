use num_traits::{Signed, Zero};
use smallvec::smallvec;
use tracing::debug;

use crate::error::{CasError, Result};
use crate::expr::{ExprId, Pool};
use crate::polynomial::Polynomial;
use crate::rational::{self, Rational};
use crate::simplify::canonicalize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    pub value: ExprId,
    pub multiplicity: u32,
}

/// Solutions of `expr == 0` for one unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolutionSet {
    /// The equation reduces to a nonzero constant.
    NoSolution,
    /// The equation reduces to `0 == 0`.
    AllValues,
    Roots(Vec<Root>),
}

impl SolutionSet {
    /// Distinct root values; empty for `NoSolution` and `AllValues`.
    pub fn values(&self) -> Vec<ExprId> {
        match self {
            SolutionSet::Roots(roots) => roots.iter().map(|r| r.value).collect(),
            _ => Vec::new(),
        }
    }
}

/// Solves `expr == 0` for `var`, dispatching on the polynomial degree.
pub fn solve(pool: &mut Pool, expr: ExprId, var: &str) -> Result<SolutionSet> {
    solve_up_to(pool, expr, var, 2)
}

/// Like [`solve`], but rejects equations of degree above one.
pub fn solve_linear(pool: &mut Pool, expr: ExprId, var: &str) -> Result<SolutionSet> {
    solve_up_to(pool, expr, var, 1)
}

/// Like [`solve`]; quadratics and anything simpler.
pub fn solve_quadratic(pool: &mut Pool, expr: ExprId, var: &str) -> Result<SolutionSet> {
    solve_up_to(pool, expr, var, 2)
}

fn solve_up_to(pool: &mut Pool, expr: ExprId, var: &str, max_degree: u32) -> Result<SolutionSet> {
    let poly = Polynomial::from_expr(pool, expr, var)?;
    let degree = poly.degree().unwrap_or(0);
    debug!(var, degree, "classified equation");
    if degree > max_degree {
        return Err(CasError::unsupported(format!(
            "degree {degree} equation in `{var}` has no closed-form solver here"
        )));
    }

    match degree {
        0 if poly.is_zero() => Ok(SolutionSet::AllValues),
        0 => Ok(SolutionSet::NoSolution),
        1 => {
            let a = poly.coeff(pool, 1);
            let b = poly.coeff(pool, 0);
            let minus_b = pool.neg(b);
            let root = quotient(pool, minus_b, a)?;
            Ok(SolutionSet::Roots(vec![Root {
                value: root,
                multiplicity: 1,
            }]))
        }
        _ => solve_quadratic_poly(pool, &poly),
    }
}

fn solve_quadratic_poly(pool: &mut Pool, poly: &Polynomial) -> Result<SolutionSet> {
    let a = poly.coeff(pool, 2);
    let b = poly.coeff(pool, 1);
    let c = poly.coeff(pool, 0);

    if let Some(coeffs) = poly.rational_coeffs(pool) {
        let zero = Rational::zero();
        let ra = coeffs.get(&2).unwrap_or(&zero);
        let rb = coeffs.get(&1).unwrap_or(&zero);
        let rc = coeffs.get(&0).unwrap_or(&zero);
        let discriminant = rb * rb - Rational::from_integer(4.into()) * ra * rc;
        if let Some(root) = rational::sqrt_exact(&discriminant) {
            debug!(%discriminant, "exact rational roots");
            let two_a = ra * Rational::from_integer(2.into());
            let low = rational::div(&(-rb - &root), &two_a)?;
            let high = rational::div(&(-rb + &root), &two_a)?;
            let (low, high) = if low <= high { (low, high) } else { (high, low) };
            if discriminant.is_zero() {
                return Ok(SolutionSet::Roots(vec![Root {
                    value: pool.constant(low),
                    multiplicity: 2,
                }]));
            }
            return Ok(SolutionSet::Roots(vec![
                Root {
                    value: pool.constant(low),
                    multiplicity: 1,
                },
                Root {
                    value: pool.constant(high),
                    multiplicity: 1,
                },
            ]));
        }
    }

    // (-b ± sqrt(b^2 - 4ac)) / (2a), kept symbolic.
    let discriminant = {
        let two = pool.integer(2);
        let b_squared = pool.pow(b, two);
        let minus_four = pool.integer(-4);
        let four_ac = pool.mul(smallvec![minus_four, a, c]);
        let raw = pool.add(smallvec![b_squared, four_ac]);
        canonicalize(pool, raw)?
    };
    let two = pool.integer(2);
    let two_a = pool.mul(smallvec![two, a]);
    let minus_b = pool.neg(b);

    if pool.is_zero(discriminant) {
        debug!("double symbolic root");
        let root = quotient(pool, minus_b, two_a)?;
        return Ok(SolutionSet::Roots(vec![Root {
            value: root,
            multiplicity: 2,
        }]));
    }

    let radical = square_root(pool, discriminant)?;
    let minus_radical = pool.neg(radical);
    let mut roots = Vec::with_capacity(2);
    for offset in [minus_radical, radical] {
        let numerator = pool.add(smallvec![minus_b, offset]);
        roots.push(Root {
            value: quotient(pool, numerator, two_a)?,
            multiplicity: 1,
        });
    }
    debug!("symbolic radical roots");
    Ok(SolutionSet::Roots(roots))
}

/// `sqrt(d)`, written as `sqrt(-d) * i` when `d` is a negative number.
fn square_root(pool: &mut Pool, d: ExprId) -> Result<ExprId> {
    let half = pool.constant(rational::ratio(1, 2));
    let negative = pool.as_constant(d).is_some_and(|v| v.is_negative());
    let raw = if negative {
        let flipped = pool.neg(d);
        let root = pool.pow(flipped, half);
        let i = pool.imaginary_unit();
        pool.mul(smallvec![root, i])
    } else {
        pool.pow(d, half)
    };
    canonicalize(pool, raw)
}

fn quotient(pool: &mut Pool, numerator: ExprId, denominator: ExprId) -> Result<ExprId> {
    let raw = pool.div(numerator, denominator);
    canonicalize(pool, raw)
}
