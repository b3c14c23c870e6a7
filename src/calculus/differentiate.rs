use smallvec::smallvec;

use crate::error::{CasError, Result};
use crate::expr::{ExprId, Func, Node, Pool, Terms};
use crate::simplify::canonicalize;
use crate::visit;

/// Derivative of `expr` with respect to the symbol `var`, in canonical form.
pub fn differentiate(pool: &mut Pool, expr: ExprId, var: &str) -> Result<ExprId> {
    let canonical = canonicalize(pool, expr)?;
    let differentiator = Differentiator { var };
    let raw = visit::fold(pool, canonical, |pool, id, node, derivatives: &[ExprId]| {
        differentiator.derive(pool, id, node, derivatives)
    })?;
    canonicalize(pool, raw)
}

/// Applies [`differentiate`] `n` times; `n == 0` returns the canonical input.
pub fn differentiate_n(pool: &mut Pool, expr: ExprId, var: &str, n: u32) -> Result<ExprId> {
    let mut current = canonicalize(pool, expr)?;
    for _ in 0..n {
        if pool.is_zero(current) {
            break;
        }
        current = differentiate(pool, current, var)?;
    }
    Ok(current)
}

struct Differentiator<'a> {
    var: &'a str,
}

impl<'a> Differentiator<'a> {
    /// Builds the (raw) derivative of `id` from the derivatives of its children.
    fn derive(&self, pool: &mut Pool, id: ExprId, node: &Node, derivatives: &[ExprId]) -> Result<ExprId> {
        match node {
            Node::Constant(_) => Ok(pool.zero()),
            Node::Symbol(name) if name == self.var => Ok(pool.one()),
            Node::Symbol(_) => Ok(pool.zero()),
            Node::Add(_) => Ok(pool.add(derivatives.iter().copied().collect())),
            Node::Mul(factors) => Ok(self.product_rule(pool, factors, derivatives)),
            Node::Pow(base, exp) => Ok(self.power_rule(pool, id, *base, *exp, derivatives)),
            Node::Function(func, args) => match args.as_slice() {
                [] => Ok(pool.zero()),
                [arg] => self.chain_rule(pool, *func, *arg, derivatives[0]),
                _ => Err(CasError::unsupported(format!(
                    "cannot differentiate {} with {} arguments",
                    func.name(),
                    args.len()
                ))),
            },
        }
    }

    /// d(f1*f2*...*fn) = sum over i of df_i times the other factors.
    fn product_rule(&self, pool: &mut Pool, factors: &[ExprId], derivatives: &[ExprId]) -> ExprId {
        let mut terms = Terms::new();
        for (i, &derivative) in derivatives.iter().enumerate() {
            if pool.is_zero(derivative) {
                continue;
            }
            let mut product: Terms = smallvec![derivative];
            product.extend(
                factors
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, f)| *f),
            );
            terms.push(pool.mul(product));
        }
        pool.add(terms)
    }

    fn power_rule(
        &self,
        pool: &mut Pool,
        power: ExprId,
        base: ExprId,
        exp: ExprId,
        derivatives: &[ExprId],
    ) -> ExprId {
        let (d_base, d_exp) = (derivatives[0], derivatives[1]);
        if !pool.contains_symbol(exp, self.var) {
            // n * b^(n-1) * db
            if pool.is_zero(d_base) {
                return pool.zero();
            }
            let minus_one = pool.integer(-1);
            let lowered = pool.add(smallvec![exp, minus_one]);
            let reduced = pool.pow(base, lowered);
            return pool.mul(smallvec![exp, reduced, d_base]);
        }

        // b^e * (de * ln(b) + e * db / b)
        let ln_base = pool.intern(Node::Function(Func::Ln, smallvec![base]));
        let from_exp = pool.mul(smallvec![d_exp, ln_base]);
        let minus_one = pool.integer(-1);
        let inverse = pool.pow(base, minus_one);
        let from_base = pool.mul(smallvec![exp, d_base, inverse]);
        let inner = pool.add(smallvec![from_exp, from_base]);
        pool.mul(smallvec![power, inner])
    }

    fn chain_rule(&self, pool: &mut Pool, func: Func, arg: ExprId, d_arg: ExprId) -> Result<ExprId> {
        if pool.is_zero(d_arg) {
            return Ok(pool.zero());
        }
        let outer = match func {
            Func::Sin => pool.call(Func::Cos, arg)?,
            Func::Cos => {
                let sin = pool.call(Func::Sin, arg)?;
                pool.neg(sin)
            }
            Func::Tan => {
                let cos = pool.call(Func::Cos, arg)?;
                let minus_two = pool.integer(-2);
                pool.pow(cos, minus_two)
            }
            Func::Exp => pool.call(Func::Exp, arg)?,
            Func::Ln => {
                let minus_one = pool.integer(-1);
                pool.pow(arg, minus_one)
            }
            Func::ImaginaryUnit => return Ok(pool.zero()),
        };
        Ok(pool.mul(smallvec![outer, d_arg]))
    }
}
