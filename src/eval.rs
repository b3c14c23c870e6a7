//! Floating-point evaluation of expressions under symbol bindings.

use std::collections::HashMap;

use num_integer::Integer;

use crate::error::{CasError, Result};
use crate::expr::{ExprId, Func, Node, Pool};
use crate::rational;
use crate::simplify::canonicalize;
use crate::visit;

/// Canonicalizes `expr`, then evaluates it numerically with symbols looked up in `bindings`.
///
/// Real-valued only: logarithms of non-positive numbers, even roots of negative numbers and
/// the imaginary unit are reported as [`CasError::Unsupported`].
pub fn evaluate(pool: &mut Pool, expr: ExprId, bindings: &HashMap<String, f64>) -> Result<f64> {
    let canonical = canonicalize(pool, expr)?;
    let value = visit::fold(pool, canonical, |pool, _, node, values: &[f64]| match node {
        Node::Constant(c) => Ok(rational::to_f64(c)),
        Node::Symbol(name) => bindings
            .get(name)
            .copied()
            .ok_or_else(|| CasError::UnboundSymbol {
                symbol: name.clone(),
            }),
        Node::Add(_) => Ok(values.iter().sum()),
        Node::Mul(_) => Ok(values.iter().product()),
        Node::Pow(_, exp) => power(pool, *exp, values[0], values[1]),
        Node::Function(func, _) => apply(*func, values),
    })?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(CasError::unsupported("result is not a finite number"))
    }
}

fn power(pool: &Pool, exp_id: ExprId, base: f64, exp: f64) -> Result<f64> {
    if base == 0.0 && exp < 0.0 {
        return Err(CasError::DivisionByZero);
    }
    if base >= 0.0 || exp.fract() == 0.0 {
        return Ok(base.powf(exp));
    }
    // Odd roots of negative numbers stay real.
    match pool.as_constant(exp_id) {
        Some(q) if q.denom().is_odd() => {
            let magnitude = base.abs().powf(exp);
            Ok(if q.numer().is_odd() { -magnitude } else { magnitude })
        }
        _ => Err(CasError::unsupported(format!(
            "{base}^{exp} is not a real number"
        ))),
    }
}

fn apply(func: Func, values: &[f64]) -> Result<f64> {
    let arg = match (func, values) {
        (Func::ImaginaryUnit, _) => {
            return Err(CasError::unsupported("the imaginary unit has no real value"))
        }
        (_, [arg]) => *arg,
        _ => {
            return Err(CasError::Arity {
                function: func.name(),
                expected: func.arity(),
                found: values.len(),
            })
        }
    };
    match func {
        Func::Sin => Ok(arg.sin()),
        Func::Cos => Ok(arg.cos()),
        Func::Tan => Ok(arg.tan()),
        Func::Exp => Ok(arg.exp()),
        Func::Ln if arg > 0.0 => Ok(arg.ln()),
        Func::Ln => Err(CasError::unsupported(format!("ln({arg}) is not a real number"))),
        Func::ImaginaryUnit => Err(CasError::unsupported("the imaginary unit has no real value")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    fn eval(text: &str, bindings: &[(&str, f64)]) -> Result<f64> {
        let mut pool = Pool::new();
        let expr = parse_expr(&mut pool, text).unwrap();
        let bindings = bindings
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect();
        evaluate(&mut pool, expr, &bindings)
    }

    #[test]
    fn evaluates_with_bindings() {
        let value = eval("x^2 + 2*x*y", &[("x", 3.0), ("y", 0.5)]).unwrap();
        assert!((value - 12.0).abs() < 1e-12);
    }

    #[test]
    fn unbound_symbols_are_reported() {
        assert_eq!(
            eval("x + y", &[("x", 1.0)]),
            Err(CasError::UnboundSymbol {
                symbol: "y".to_string()
            })
        );
    }

    #[test]
    fn domain_errors_are_values() {
        assert_eq!(eval("1/x", &[("x", 0.0)]), Err(CasError::DivisionByZero));
        assert!(matches!(eval("ln(x)", &[("x", -1.0)]), Err(CasError::Unsupported(_))));
        assert!(matches!(eval("sqrt(x)", &[("x", -4.0)]), Err(CasError::Unsupported(_))));
        assert!(matches!(eval("i", &[]), Err(CasError::Unsupported(_))));
    }

    #[test]
    fn odd_roots_of_negatives_are_real() {
        let value = eval("x^(1/3)", &[("x", -8.0)]).unwrap();
        assert!((value + 2.0).abs() < 1e-12);
    }
}
