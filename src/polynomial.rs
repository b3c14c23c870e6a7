//! Univariate polynomial view of an expression.
//!
//! Coefficients are pooled expressions free of the variable, so `a*x^2 + b` is a degree-two
//! polynomial in `x` with coefficients `a` and `b`.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use num_traits::{Signed, ToPrimitive};
use smallvec::smallvec;

use crate::error::{CasError, Result};
use crate::expr::{ExprId, Node, Pool, Terms};
use crate::rational::Rational;
use crate::simplify::{canonicalize, simplify_add, simplify_mul};
use crate::visit;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Polynomial {
    coeffs: BTreeMap<u32, ExprId>,
}

impl Polynomial {
    pub fn zero() -> Self {
        Polynomial::default()
    }

    pub fn from_constant(pool: &Pool, c: ExprId) -> Self {
        let mut poly = Polynomial::zero();
        if !pool.is_zero(c) {
            poly.coeffs.insert(0, c);
        }
        poly
    }

    /// `x^power` with unit coefficient.
    pub fn monomial(pool: &Pool, power: u32) -> Self {
        let mut coeffs = BTreeMap::new();
        coeffs.insert(power, pool.one());
        Polynomial { coeffs }
    }

    /// Highest power with a nonzero coefficient; `None` for the zero polynomial.
    pub fn degree(&self) -> Option<u32> {
        self.coeffs.keys().next_back().copied()
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn coeff(&self, pool: &Pool, power: u32) -> ExprId {
        self.coeffs.get(&power).copied().unwrap_or_else(|| pool.zero())
    }

    pub fn leading_coeff(&self, pool: &Pool) -> ExprId {
        self.degree()
            .map_or_else(|| pool.zero(), |d| self.coeff(pool, d))
    }

    pub fn coeff_entries(&self) -> impl Iterator<Item = (u32, ExprId)> + '_ {
        self.coeffs.iter().map(|(e, c)| (*e, *c))
    }

    /// Coefficients as rationals, if every one of them is a number.
    pub fn rational_coeffs(&self, pool: &Pool) -> Option<BTreeMap<u32, Rational>> {
        self.coeffs
            .iter()
            .map(|(e, c)| pool.as_constant(*c).map(|r| (*e, r.clone())))
            .collect()
    }

    pub fn add(&self, pool: &mut Pool, other: &Self) -> Result<Self> {
        let mut coeffs = self.coeffs.clone();
        for (&exp, &coeff) in &other.coeffs {
            insert_sum(pool, &mut coeffs, exp, coeff)?;
        }
        Ok(Polynomial { coeffs })
    }

    pub fn mul(&self, pool: &mut Pool, other: &Self) -> Result<Self> {
        let mut coeffs = BTreeMap::new();
        for (&e1, &c1) in &self.coeffs {
            for (&e2, &c2) in &other.coeffs {
                let product = simplify_mul(pool, &[c1, c2])?;
                insert_sum(pool, &mut coeffs, e1 + e2, product)?;
            }
        }
        Ok(Polynomial { coeffs })
    }

    /// Binary exponentiation.
    pub fn pow(&self, pool: &mut Pool, exp: u32) -> Result<Self> {
        let mut result = Polynomial::from_constant(pool, pool.one());
        let mut base = self.clone();
        let mut n = exp;
        while n > 0 {
            if n % 2 == 1 {
                result = result.mul(pool, &base)?;
            }
            n /= 2;
            if n > 0 {
                base = base.mul(pool, &base)?;
            }
        }
        Ok(result)
    }

    /// Extracts the coefficients of `expr` as a polynomial in `var`.
    ///
    /// Fails with [`CasError::NonPolynomialDegree`] when `var` appears under a function, in
    /// an exponent, or raised to anything but a non-negative integer.
    pub fn from_expr(pool: &mut Pool, expr: ExprId, var: &str) -> Result<Self> {
        let canonical = canonicalize(pool, expr)?;
        let limit = pool.config().max_expand_exponent;
        let raw = visit::fold(pool, canonical, |pool, id, node, parts: &[Polynomial]| {
            match node {
                Node::Symbol(name) if name == var => Ok(Polynomial::monomial(pool, 1)),
                Node::Constant(_) | Node::Symbol(_) => Ok(Polynomial::from_constant(pool, id)),
                _ if !pool.contains_symbol(id, var) => Ok(Polynomial::from_constant(pool, id)),
                Node::Add(_) => parts
                    .iter()
                    .try_fold(Polynomial::zero(), |acc, p| acc.add(pool, p)),
                Node::Mul(_) => parts
                    .iter()
                    .try_fold(Polynomial::from_constant(pool, pool.one()), |acc, p| {
                        acc.mul(pool, p)
                    }),
                Node::Pow(base, exp) => {
                    let n = integer_exponent(pool, *exp, var)?;
                    if pool.as_symbol(*base) == Some(var) {
                        return Ok(Polynomial::monomial(pool, n));
                    }
                    if n > limit {
                        return Err(CasError::non_polynomial(
                            var,
                            format!("exponent {n} exceeds the expansion limit {limit}"),
                        ));
                    }
                    parts[0].pow(pool, n)
                }
                Node::Function(func, _) => Err(CasError::non_polynomial(
                    var,
                    format!("`{var}` appears inside {}", func.name()),
                )),
            }
        })?;

        let mut coeffs = BTreeMap::new();
        for (exp, coeff) in raw.coeffs {
            let coeff = canonicalize(pool, coeff)?;
            if !pool.is_zero(coeff) {
                coeffs.insert(exp, coeff);
            }
        }
        Ok(Polynomial { coeffs })
    }

    /// Rebuilds `sum c_k * var^k` as a canonical expression.
    pub fn to_expr(&self, pool: &mut Pool, var: &str) -> Result<ExprId> {
        let x = pool.symbol(var);
        let mut terms = Terms::new();
        for (&exp, &coeff) in &self.coeffs {
            let power = pool.integer(i64::from(exp));
            let monomial = pool.pow(x, power);
            terms.push(pool.mul(smallvec![coeff, monomial]));
        }
        let sum = pool.add(terms);
        canonicalize(pool, sum)
    }
}

fn insert_sum(pool: &mut Pool, coeffs: &mut BTreeMap<u32, ExprId>, exp: u32, coeff: ExprId) -> Result<()> {
    match coeffs.entry(exp) {
        Entry::Vacant(entry) => {
            if !pool.is_zero(coeff) {
                entry.insert(coeff);
            }
        }
        Entry::Occupied(mut entry) => {
            let sum = simplify_add(pool, &[*entry.get(), coeff])?;
            if pool.is_zero(sum) {
                entry.remove();
            } else {
                *entry.get_mut() = sum;
            }
        }
    }
    Ok(())
}

fn integer_exponent(pool: &Pool, exp: ExprId, var: &str) -> Result<u32> {
    if pool.contains_symbol(exp, var) {
        return Err(CasError::non_polynomial(
            var,
            format!("exponent depends on `{var}`"),
        ));
    }
    let Some(value) = pool.as_constant(exp) else {
        return Err(CasError::non_polynomial(var, "symbolic exponent"));
    };
    if !value.is_integer() {
        return Err(CasError::non_polynomial(
            var,
            format!("non-integer exponent {value}"),
        ));
    }
    if value.is_negative() {
        return Err(CasError::non_polynomial(
            var,
            format!("negative exponent {value}"),
        ));
    }
    value
        .to_integer()
        .to_u32()
        .ok_or_else(|| CasError::non_polynomial(var, format!("exponent {value} is too large")))
}

/// Shorthand for [`Polynomial::from_expr`].
pub fn coefficients(pool: &mut Pool, expr: ExprId, var: &str) -> Result<Polynomial> {
    Polynomial::from_expr(pool, expr, var)
}
