//! Node-level rewrite rules.
//!
//! Each rule assumes its children are already canonical and returns the rewritten node.
//! A rule may occasionally hand back a node that still needs another pass (for example a
//! power that folds into a product inside a product); the fixpoint driver in
//! `canonical.rs` takes care of that.

use hashbrown::HashMap;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use smallvec::smallvec;

use crate::error::{CasError, Result};
use crate::expr::{Args, ExprId, Func, Node, Pool, Terms};
use crate::ordering::sort_children;
use crate::rational::{self, Rational};

pub fn simplify_node(pool: &mut Pool, id: ExprId, node: &Node, children: &[ExprId]) -> Result<ExprId> {
    match node {
        Node::Constant(_) | Node::Symbol(_) => Ok(id),
        Node::Add(_) => simplify_add(pool, children),
        Node::Mul(_) => simplify_mul(pool, children),
        Node::Pow(_, _) => simplify_pow(pool, children[0], children[1]),
        Node::Function(func, _) => simplify_function(pool, *func, children),
    }
}

/// Like terms keyed by their non-constant part, in first-seen order.
#[derive(Default)]
struct SumAccumulator {
    constant: Rational,
    order: Vec<ExprId>,
    coeffs: HashMap<ExprId, Rational>,
}

impl SumAccumulator {
    fn accumulate(&mut self, pool: &mut Pool, scale: &Rational, term: ExprId) {
        match pool.get(term) {
            Node::Constant(c) => self.constant += scale * c,
            Node::Add(inner) => {
                for t in inner.clone() {
                    self.accumulate(pool, scale, t);
                }
            }
            _ => {
                let (coeff, rest) = split_coefficient(pool, term);
                let scaled = scale * coeff;
                if matches!(pool.get(rest), Node::Add(_)) {
                    self.accumulate(pool, &scaled, rest);
                    return;
                }
                match self.coeffs.get_mut(&rest) {
                    Some(existing) => *existing += scaled,
                    None => {
                        self.order.push(rest);
                        self.coeffs.insert(rest, scaled);
                    }
                }
            }
        }
    }

    fn finish(self, pool: &mut Pool) -> ExprId {
        let mut terms = Terms::new();
        if !self.constant.is_zero() {
            terms.push(pool.constant(self.constant));
        }
        for rest in self.order {
            let coeff = &self.coeffs[&rest];
            if coeff.is_zero() {
                continue;
            }
            terms.push(scale_term(pool, coeff, rest));
        }
        sort_children(pool, &mut terms);
        pool.add(terms)
    }
}

/// Splits `c * rest` into its numeric coefficient and the remaining factors.
pub fn split_coefficient(pool: &mut Pool, term: ExprId) -> (Rational, ExprId) {
    match pool.get(term) {
        Node::Constant(c) => (c.clone(), pool.one()),
        Node::Mul(factors) => match pool.get(factors[0]) {
            Node::Constant(c) => {
                let coeff = c.clone();
                let rest: Terms = factors[1..].iter().copied().collect();
                (coeff, pool.mul(rest))
            }
            _ => (Rational::one(), term),
        },
        _ => (Rational::one(), term),
    }
}

fn scale_term(pool: &mut Pool, coeff: &Rational, rest: ExprId) -> ExprId {
    if coeff.is_one() {
        return rest;
    }
    let c = pool.constant(coeff.clone());
    let mut factors: Terms = smallvec![c];
    match pool.get(rest) {
        Node::Mul(inner) => factors.extend(inner.iter().copied()),
        _ => factors.push(rest),
    }
    pool.mul(factors)
}

pub fn simplify_add(pool: &mut Pool, terms: &[ExprId]) -> Result<ExprId> {
    let mut acc = SumAccumulator::default();
    let one = Rational::one();
    for &term in terms {
        acc.accumulate(pool, &one, term);
    }
    Ok(acc.finish(pool))
}

pub fn simplify_mul(pool: &mut Pool, factors: &[ExprId]) -> Result<ExprId> {
    let mut coeff = Rational::one();
    let mut bases: Vec<ExprId> = Vec::new();
    let mut exponents: HashMap<ExprId, Terms> = HashMap::new();

    let mut pending: Vec<ExprId> = factors.iter().rev().copied().collect();
    while let Some(factor) = pending.pop() {
        let (base, exp) = match pool.get(factor) {
            Node::Constant(c) => {
                coeff *= c;
                continue;
            }
            Node::Mul(inner) => {
                pending.extend(inner.iter().rev().copied());
                continue;
            }
            Node::Pow(base, exp) => (*base, *exp),
            _ => (factor, pool.one()),
        };
        exponents
            .entry(base)
            .or_insert_with(|| {
                bases.push(base);
                Terms::new()
            })
            .push(exp);
    }

    if coeff.is_zero() {
        return Ok(pool.zero());
    }

    let mut out = Terms::new();
    for base in bases {
        let exps = &exponents[&base];
        let exp = if exps.len() == 1 {
            exps[0]
        } else {
            let exps = exps.clone();
            simplify_add(pool, &exps)?
        };
        let power = simplify_pow(pool, base, exp)?;
        match pool.get(power) {
            Node::Constant(c) => coeff *= c,
            _ => out.push(power),
        }
    }

    if coeff.is_zero() {
        return Ok(pool.zero());
    }
    if out.is_empty() {
        return Ok(pool.constant(coeff));
    }
    if !coeff.is_one() && out.len() == 1 && matches!(pool.get(out[0]), Node::Add(_)) {
        let mut acc = SumAccumulator::default();
        acc.accumulate(pool, &coeff, out[0]);
        return Ok(acc.finish(pool));
    }
    if !coeff.is_one() {
        out.push(pool.constant(coeff));
    }
    sort_children(pool, &mut out);
    Ok(pool.mul(out))
}

pub fn simplify_pow(pool: &mut Pool, base: ExprId, exp: ExprId) -> Result<ExprId> {
    if pool.is_zero(exp) || pool.is_one(base) {
        return Ok(pool.one());
    }
    if pool.is_one(exp) {
        return Ok(base);
    }

    let int_exp = pool
        .as_constant(exp)
        .filter(|e| e.is_integer())
        .cloned();

    match (pool.get(base).clone(), pool.get(exp).clone()) {
        (Node::Constant(b), Node::Constant(e)) => fold_constant_power(pool, base, exp, &b, &e),
        (Node::Pow(inner_base, inner_exp), _) if int_exp.is_some() => {
            // (b^e)^n = b^(e*n) only for integer n.
            let combined = simplify_mul(pool, &[inner_exp, exp])?;
            simplify_pow(pool, inner_base, combined)
        }
        (Node::Mul(factors), _) if int_exp.is_some() => {
            let mut powered = Terms::new();
            for f in factors {
                powered.push(simplify_pow(pool, f, exp)?);
            }
            simplify_mul(pool, &powered)
        }
        (Node::Function(Func::ImaginaryUnit, _), _) => match int_exp {
            Some(n) => Ok(imaginary_power(pool, &n)),
            None => Ok(pool.pow(base, exp)),
        },
        _ => Ok(pool.pow(base, exp)),
    }
}

fn imaginary_power(pool: &mut Pool, n: &Rational) -> ExprId {
    let residue = n.to_integer().mod_floor(&4.into());
    let i = pool.imaginary_unit();
    match residue.to_u8().unwrap_or(0) {
        0 => pool.one(),
        1 => i,
        2 => pool.integer(-1),
        _ => {
            let minus_one = pool.integer(-1);
            pool.mul(smallvec![minus_one, i])
        }
    }
}

fn fold_constant_power(
    pool: &mut Pool,
    base_id: ExprId,
    exp_id: ExprId,
    base: &Rational,
    exp: &Rational,
) -> Result<ExprId> {
    let limit = i64::from(pool.config().max_exact_exponent);

    if exp.is_integer() {
        return match exp.to_integer().to_i64() {
            Some(n) if n.abs() <= limit => Ok(pool.constant(rational::pow(base, n)?)),
            _ if base.is_zero() && exp.is_negative() => Err(CasError::DivisionByZero),
            _ => Ok(pool.pow(base_id, exp_id)),
        };
    }

    if base.is_zero() {
        return if exp.is_positive() {
            Ok(pool.zero())
        } else {
            Err(CasError::DivisionByZero)
        };
    }

    let (Some(p), Some(q)) = (exp.numer().to_i64(), exp.denom().to_u32()) else {
        return Ok(pool.pow(base_id, exp_id));
    };
    if p.abs() > limit {
        return Ok(pool.pow(base_id, exp_id));
    }

    if let Some(root) = rational::nth_root_exact(base, q) {
        return Ok(pool.constant(rational::pow(&root, p)?));
    }
    if base.is_negative() {
        return Ok(pool.pow(base_id, exp_id));
    }

    // b^(k + f) = b^k * b^f with 0 < f < 1.
    let whole = exp.floor();
    if !whole.is_zero() {
        let k = whole.to_integer().to_i64().unwrap_or(0);
        let integral = pool.constant(rational::pow(base, k)?);
        let frac = pool.constant(exp - &whole);
        let radical = pool.pow(base_id, frac);
        return simplify_mul(pool, &[integral, radical]);
    }

    if q == 2 {
        // sqrt(n/d) = sqrt(n*d)/d, then pull square factors out of n*d.
        let radicand = base.numer() * base.denom();
        let (outside, inside) = rational::square_factor(&radicand);
        let coeff = Rational::new(outside, base.denom().clone());
        if !coeff.is_one() {
            let c = pool.constant(coeff);
            let inside = pool.constant(Rational::from_integer(inside));
            let radical = pool.pow(inside, exp_id);
            return Ok(pool.mul(smallvec![c, radical]));
        }
    }

    Ok(pool.pow(base_id, exp_id))
}

pub fn simplify_function(pool: &mut Pool, func: Func, args: &[ExprId]) -> Result<ExprId> {
    if func == Func::ImaginaryUnit {
        return pool.function(func, Args::new());
    }
    let [arg] = args else {
        return pool.function(func, args.iter().copied().collect());
    };
    let arg = *arg;

    match func {
        Func::Sin | Func::Tan if pool.is_zero(arg) => return Ok(pool.zero()),
        Func::Cos | Func::Exp if pool.is_zero(arg) => return Ok(pool.one()),
        Func::Ln if pool.is_one(arg) => return Ok(pool.zero()),
        _ => {}
    }

    if let Node::Function(inner, inner_args) = pool.get(arg) {
        match (func, *inner) {
            (Func::Exp, Func::Ln) | (Func::Ln, Func::Exp) => return Ok(inner_args[0]),
            _ => {}
        }
    }

    // Odd functions pull a leading minus sign out, even ones drop it.
    if matches!(func, Func::Sin | Func::Tan | Func::Cos) {
        if let Some(positive) = negated_argument(pool, arg)? {
            let inner = pool.call(func, positive)?;
            return if func == Func::Cos {
                Ok(inner)
            } else {
                let minus_one = pool.integer(-1);
                simplify_mul(pool, &[minus_one, inner])
            };
        }
    }

    pool.call(func, arg)
}

/// For `-c * rest` (c > 0) returns `c * rest`.
fn negated_argument(pool: &mut Pool, arg: ExprId) -> Result<Option<ExprId>> {
    let (coeff, _) = split_coefficient(pool, arg);
    if !coeff.is_negative() {
        return Ok(None);
    }
    let minus_one = pool.integer(-1);
    simplify_mul(pool, &[minus_one, arg]).map(Some)
}
