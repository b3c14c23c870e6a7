use num_bigint::BigInt;
use smallvec::smallvec;
use tracing::debug;

use crate::calculus::differentiate;
use crate::error::Result;
use crate::expr::{ExprId, Pool, Terms};
use crate::rational::{self, Rational};
use crate::simplify::{canonicalize, substitute};

/// Taylor polynomial of `expr` in `var` about `point` with the powers `0..order`; the
/// `order`-th term is the first one left out, so `order == 0` gives `0`.
///
/// The coefficients are exact: each derivative is evaluated symbolically at `point`.
pub fn taylor(pool: &mut Pool, expr: ExprId, var: &str, point: ExprId, order: u32) -> Result<ExprId> {
    debug!(var, order, "building taylor polynomial");
    let x = pool.symbol(var);
    let shift = pool.sub(x, point);

    let mut derivative = canonicalize(pool, expr)?;
    let mut terms = Terms::new();
    for k in 0..order {
        let value = substitute(pool, derivative, var, point)?;
        if !pool.is_zero(value) {
            let scale = pool.constant(Rational::new(BigInt::from(1), rational::factorial(k)));
            let exponent = pool.integer(i64::from(k));
            let power = pool.pow(shift, exponent);
            terms.push(pool.mul(smallvec![scale, value, power]));
        }
        if k + 1 < order {
            derivative = differentiate(pool, derivative, var)?;
        }
    }

    let sum = pool.add(terms);
    canonicalize(pool, sum)
}

/// [`taylor`] about zero.
pub fn maclaurin(pool: &mut Pool, expr: ExprId, var: &str, order: u32) -> Result<ExprId> {
    let zero = pool.zero();
    taylor(pool, expr, var, zero, order)
}
