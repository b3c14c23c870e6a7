use std::fmt;

use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use crate::expr::{ExprId, Func, Node, Pool};
use crate::rational::Rational;

// Binding strength, loosest first. A subexpression is bracketed when its own level is
// below the level its position demands.
const SUM: u8 = 1;
const PRODUCT: u8 = 2;
const NEG: u8 = 3;
const POWER: u8 = 4;
const ATOM: u8 = 5;

/// Infix rendering with minimal parentheses; `parse` reads it back to the same canonical form.
pub fn to_string(pool: &Pool, id: ExprId) -> String {
    render(pool, id).0
}

/// Adapter implementing [`fmt::Display`] for a pooled expression.
pub struct Display<'a> {
    pool: &'a Pool,
    id: ExprId,
}

pub fn display(pool: &Pool, id: ExprId) -> Display<'_> {
    Display { pool, id }
}

impl fmt::Display for Display<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_string(self.pool, self.id))
    }
}

fn bracket(ctx: u8, (body, prec): (String, u8)) -> String {
    if prec < ctx {
        format!("({body})")
    } else {
        body
    }
}

/// Rendered text and its binding level.
fn render(pool: &Pool, id: ExprId) -> (String, u8) {
    match pool.get(id) {
        Node::Constant(r) => (show_rational(r), rational_level(r)),
        Node::Symbol(name) => (name.clone(), ATOM),
        Node::Add(terms) => (render_sum(pool, terms), SUM),
        Node::Mul(_) => render_product(pool, id),
        Node::Pow(_, exp) if pool.as_constant(*exp).is_some_and(|e| e.is_negative()) => {
            render_product(pool, id)
        }
        Node::Pow(base, exp) => render_power(pool, *base, *exp),
        Node::Function(Func::ImaginaryUnit, _) => ("i".to_string(), ATOM),
        Node::Function(func, args) => {
            let args: Vec<String> = args.iter().map(|a| render(pool, *a).0).collect();
            (format!("{}({})", func.name(), args.join(", ")), ATOM)
        }
    }
}

fn rational_level(r: &Rational) -> u8 {
    if r.is_negative() {
        NEG
    } else if r.is_integer() {
        ATOM
    } else {
        PRODUCT
    }
}

fn render_sum(pool: &Pool, terms: &[ExprId]) -> String {
    let mut ordered: Vec<ExprId> = terms.to_vec();
    // Highest degree first, constants last; ties keep canonical order.
    ordered.sort_by(|a, b| display_degree(pool, *b).cmp(&display_degree(pool, *a)));

    let mut out = String::new();
    for (i, &term) in ordered.iter().enumerate() {
        let (coeff, factors) = split_sign(pool, term);
        if coeff.is_negative() {
            let positive = render_scaled(pool, &-coeff, &factors);
            if i == 0 {
                out.push_str(&negated(positive));
            } else {
                out.push_str(" - ");
                out.push_str(&bracket(PRODUCT, positive));
            }
        } else {
            if i > 0 {
                out.push_str(" + ");
            }
            out.push_str(&bracket(SUM + 1, render(pool, term)));
        }
    }
    out
}

/// Numeric coefficient and remaining factors of a term.
fn split_sign(pool: &Pool, id: ExprId) -> (Rational, Vec<ExprId>) {
    match pool.get(id) {
        Node::Constant(c) => (c.clone(), Vec::new()),
        Node::Mul(factors) => match pool.as_constant(factors[0]) {
            Some(c) => (c.clone(), factors[1..].to_vec()),
            None => (Rational::one(), factors.to_vec()),
        },
        _ => (Rational::one(), vec![id]),
    }
}

/// `coeff * factors` with a non-negative coefficient.
fn render_scaled(pool: &Pool, coeff: &Rational, factors: &[ExprId]) -> (String, u8) {
    if factors.is_empty() {
        return (show_rational(coeff), rational_level(coeff));
    }
    product_text(pool, coeff, factors)
}

fn render_product(pool: &Pool, id: ExprId) -> (String, u8) {
    let (coeff, factors) = split_sign(pool, id);
    if coeff.is_negative() {
        let positive = render_scaled(pool, &-coeff, &factors);
        return (negated(positive), PRODUCT);
    }
    render_scaled(pool, &coeff, &factors)
}

/// Prefixes a minus sign. Unary minus binds tighter than `*`, so a body that opens with a
/// bracketed sum is wrapped whole: `-((x + 1)*y)` rather than `-(x + 1)*y`.
fn negated(positive: (String, u8)) -> String {
    let is_product = positive.1 == PRODUCT;
    let body = bracket(PRODUCT, positive);
    if is_product && body.starts_with('(') {
        format!("-({body})")
    } else {
        format!("-{body}")
    }
}

/// Lays a product out as `numerator/denominator`, moving negative powers below the line.
fn product_text(pool: &Pool, coeff: &Rational, factors: &[ExprId]) -> (String, u8) {
    let mut numerator = Vec::new();
    let mut denominator = Vec::new();
    // `1/(2*(x + 1))` would read back as `1/(2*x + 2)`, so a fractional coefficient stays
    // whole when a bare sum sits below the line.
    if !coeff.denom().is_one() && factors.iter().any(|&f| is_reciprocal_sum(pool, f)) {
        numerator.push(format!("({})", show_rational(coeff)));
    } else {
        if !coeff.numer().is_one() {
            numerator.push(coeff.numer().to_string());
        }
        if !coeff.denom().is_one() {
            denominator.push(coeff.denom().to_string());
        }
    }

    for &factor in factors {
        match pool.get(factor) {
            Node::Pow(base, exp) => match pool.as_constant(*exp) {
                Some(e) if e.is_negative() => {
                    denominator.push(power_text(pool, *base, &-e));
                }
                _ => numerator.push(bracket(PRODUCT + 1, render(pool, factor))),
            },
            _ => numerator.push(bracket(PRODUCT + 1, render(pool, factor))),
        }
    }

    let top = if numerator.is_empty() {
        "1".to_string()
    } else {
        numerator.join("*")
    };
    match denominator.len() {
        0 if numerator.len() == 1 && factors.len() == 1 && coeff.is_one() => {
            render(pool, factors[0])
        }
        0 => (top, PRODUCT),
        1 => (format!("{top}/{}", denominator[0]), PRODUCT),
        _ => (format!("{top}/({})", denominator.join("*")), PRODUCT),
    }
}

fn is_reciprocal_sum(pool: &Pool, id: ExprId) -> bool {
    match pool.get(id) {
        Node::Pow(base, exp) => {
            matches!(pool.get(*base), Node::Add(_))
                && pool.as_constant(*exp).is_some_and(|e| *e == -Rational::one())
        }
        _ => false,
    }
}

/// `base^exp` for a positive rational exponent, bracketed for use as a divisor.
fn power_text(pool: &Pool, base: ExprId, exp: &Rational) -> String {
    if exp.is_one() {
        return bracket(POWER, render(pool, base));
    }
    if *exp == half() {
        return format!("sqrt({})", render(pool, base).0);
    }
    format!(
        "{}^{}",
        bracket(ATOM, render(pool, base)),
        bracket(POWER, (show_rational(exp), rational_level(exp)))
    )
}

fn render_power(pool: &Pool, base: ExprId, exp: ExprId) -> (String, u8) {
    if pool.as_constant(exp).is_some_and(|e| *e == half()) {
        return (format!("sqrt({})", render(pool, base).0), ATOM);
    }
    let text = format!(
        "{}^{}",
        bracket(ATOM, render(pool, base)),
        bracket(POWER, render(pool, exp))
    );
    (text, POWER)
}

fn half() -> Rational {
    Rational::new(1.into(), 2.into())
}

/// Total degree used only to order the terms of a sum for display.
fn display_degree(pool: &Pool, id: ExprId) -> Rational {
    match pool.get(id) {
        Node::Constant(_) => Rational::zero(),
        Node::Symbol(_) | Node::Function(_, _) => Rational::one(),
        Node::Pow(base, exp) => match pool.as_constant(*exp) {
            Some(e) => display_degree(pool, *base) * e,
            None => Rational::one(),
        },
        Node::Mul(factors) => factors.iter().map(|f| display_degree(pool, *f)).sum(),
        Node::Add(terms) => terms
            .iter()
            .map(|t| display_degree(pool, *t))
            .max()
            .unwrap_or_else(Rational::zero),
    }
}

pub(crate) fn show_rational(r: &BigRational) -> String {
    if r.is_integer() {
        r.numer().to_string()
    } else {
        format!("{}/{}", r.numer(), r.denom())
    }
}
