use crate::error::Result;
use crate::expr::{ExprId, Node, Pool};
use crate::simplify::canonicalize;
use crate::visit;

/// Replaces every occurrence of the symbol `var` in `expr` with `replacement`, then
/// canonicalizes the result.
pub fn substitute(pool: &mut Pool, expr: ExprId, var: &str, replacement: ExprId) -> Result<ExprId> {
    substitute_all(pool, expr, &[(var, replacement)])
}

/// Simultaneous substitution: replacements are not themselves rewritten.
pub fn substitute_all(pool: &mut Pool, expr: ExprId, bindings: &[(&str, ExprId)]) -> Result<ExprId> {
    let replaced = visit::rewrite(pool, expr, |pool, id, node, children| match node {
        Node::Symbol(name) => Ok(bindings
            .iter()
            .find(|(var, _)| *var == name.as_str())
            .map_or(id, |(_, value)| *value)),
        Node::Constant(_) => Ok(id),
        _ => Ok(pool.intern(node.with_children(children))),
    })?;
    canonicalize(pool, replaced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    fn canonical(pool: &mut Pool, text: &str) -> ExprId {
        let raw = parse_expr(pool, text).unwrap();
        canonicalize(pool, raw).unwrap()
    }

    #[test]
    fn replaces_symbol_and_simplifies() {
        let mut pool = Pool::new();
        let expr = canonical(&mut pool, "x^2 + 2*x + 1");
        let three = pool.integer(3);
        let value = substitute(&mut pool, expr, "x", three).unwrap();
        assert_eq!(value, pool.integer(16));
    }

    #[test]
    fn substitution_is_simultaneous() {
        let mut pool = Pool::new();
        let expr = canonical(&mut pool, "x - y");
        let x = pool.symbol("x");
        let y = pool.symbol("y");
        let swapped = substitute_all(&mut pool, expr, &[("x", y), ("y", x)]).unwrap();
        assert_eq!(swapped, canonical(&mut pool, "y - x"));
    }

    #[test]
    fn untouched_symbols_survive() {
        let mut pool = Pool::new();
        let expr = canonical(&mut pool, "a*x + b");
        let zero = pool.zero();
        let constant = substitute(&mut pool, expr, "x", zero).unwrap();
        assert_eq!(constant, pool.symbol("b"));
    }
}
