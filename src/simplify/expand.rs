use num_traits::ToPrimitive;
use smallvec::smallvec;

use crate::error::Result;
use crate::expr::{ExprId, Node, Pool, Terms};
use crate::simplify::canonicalize;
use crate::simplify::rules::{simplify_add, simplify_mul, simplify_pow};
use crate::visit;

/// Multiplies out products of sums and integer powers of sums.
///
/// Powers above the pool's `max_expand_exponent` are left as they are. Negative integer
/// powers of a sum expand the denominator only.
pub fn expand(pool: &mut Pool, expr: ExprId) -> Result<ExprId> {
    let canonical = canonicalize(pool, expr)?;
    let limit = pool.config().max_expand_exponent;
    let expanded = visit::rewrite(pool, canonical, |pool, id, node, children| match node {
        Node::Constant(_) | Node::Symbol(_) => Ok(id),
        Node::Add(_) => simplify_add(pool, children),
        Node::Mul(_) => distribute(pool, children),
        Node::Pow(_, _) => expand_power(pool, children[0], children[1], limit),
        Node::Function(_, _) => Ok(pool.intern(node.with_children(children))),
    })?;
    canonicalize(pool, expanded)
}

fn terms_of(pool: &Pool, id: ExprId) -> Terms {
    match pool.get(id) {
        Node::Add(terms) => terms.clone(),
        _ => smallvec![id],
    }
}

fn distribute(pool: &mut Pool, factors: &[ExprId]) -> Result<ExprId> {
    let mut products: Terms = smallvec![pool.one()];
    for &factor in factors {
        let terms = terms_of(pool, factor);
        let mut next = Vec::with_capacity(products.len() * terms.len());
        for &p in &products {
            for &t in &terms {
                next.push(simplify_mul(pool, &[p, t])?);
            }
        }
        // Collect like terms as we go so the product list stays small.
        let partial = simplify_add(pool, &next)?;
        products = terms_of(pool, partial);
    }
    simplify_add(pool, &products)
}

fn expand_power(pool: &mut Pool, base: ExprId, exp: ExprId, limit: u32) -> Result<ExprId> {
    let n = match pool.as_constant(exp) {
        Some(e) if e.is_integer() => e.to_integer().to_i64(),
        _ => None,
    };
    let Some(n) = n else {
        return simplify_pow(pool, base, exp);
    };
    if !matches!(pool.get(base), Node::Add(_)) || n.unsigned_abs() > u64::from(limit) || n == 0 {
        return simplify_pow(pool, base, exp);
    }

    let mut acc = base;
    for _ in 1..n.unsigned_abs() {
        acc = distribute(pool, &[acc, base])?;
    }
    if n.is_negative() {
        let minus_one = pool.integer(-1);
        return simplify_pow(pool, acc, minus_one);
    }
    Ok(acc)
}
