use num_traits::Signed;
use tracing::debug;

use crate::error::{CasError, Result};
use crate::expr::{ExprId, Func, Node, Pool};
use crate::format::to_string;
use crate::simplify::{canonicalize, substitute};

/// Limit of `expr` as `var` approaches `point`, for expressions defined at `point`.
///
/// The value is found by direct substitution, so both one-sided limits agree with it.
/// Forms that are undefined at `point` (a zero denominator, a logarithm of a non-positive
/// number) are reported as [`CasError::Unsupported`].
pub fn limit(pool: &mut Pool, expr: ExprId, var: &str, point: ExprId) -> Result<ExprId> {
    let expr = canonicalize(pool, expr)?;
    let value = match substitute(pool, expr, var, point) {
        Ok(value) => value,
        Err(CasError::DivisionByZero) => return Err(undefined(pool, expr, var, point)),
        Err(err) => return Err(err),
    };
    if has_undefined_part(pool, value) {
        return Err(undefined(pool, expr, var, point));
    }
    debug!(var, "limit by substitution");
    Ok(value)
}

fn undefined(pool: &Pool, expr: ExprId, var: &str, point: ExprId) -> CasError {
    CasError::unsupported(format!(
        "limit of {} as {var} -> {} is not defined by substitution",
        to_string(pool, expr),
        to_string(pool, point)
    ))
}

fn has_undefined_part(pool: &Pool, id: ExprId) -> bool {
    let mut stack = vec![id];
    while let Some(current) = stack.pop() {
        match pool.get(current) {
            Node::Function(Func::Ln, args) => {
                if pool.as_constant(args[0]).is_some_and(|c| !c.is_positive()) {
                    return true;
                }
                stack.push(args[0]);
            }
            node => stack.extend(node.children()),
        }
    }
    false
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
    fn continuous_expressions_substitute() {
        let mut pool = Pool::new();
        let expr = canonical(&mut pool, "x^2");
        let three = pool.integer(3);
        assert_eq!(limit(&mut pool, expr, "x", three).unwrap(), pool.integer(9));

        let expr = canonical(&mut pool, "sin(x) + exp(x)");
        let zero = pool.zero();
        assert_eq!(limit(&mut pool, expr, "x", zero).unwrap(), pool.one());
    }

    #[test]
    fn poles_are_unsupported() {
        let mut pool = Pool::new();
        let expr = canonical(&mut pool, "1/(x - 2)");
        let two = pool.integer(2);
        assert!(matches!(
            limit(&mut pool, expr, "x", two),
            Err(CasError::Unsupported(_))
        ));

        let expr = canonical(&mut pool, "ln(x)");
        let zero = pool.zero();
        assert!(matches!(
            limit(&mut pool, expr, "x", zero),
            Err(CasError::Unsupported(_))
        ));
    }
}
