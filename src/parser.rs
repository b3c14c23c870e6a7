//! Infix parser producing raw (non-canonical) pooled expressions.
//!
//! Precedence from tightest to loosest: `^` (right associative), unary `-`, `*` and `/`
//! (left associative, with implicit multiplication between adjacent operands such as
//! `2x`, `x y` or `3(x+1)`), then `+` and `-`. Source text is first parsed into a small
//! owned syntax tree and then lowered into the pool, so parse failures never leave
//! partial nodes behind.

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{alpha1, alphanumeric1, char, digit0, digit1, multispace0, one_of, satisfy};
use nom::combinator::{cut, map, map_opt, opt, peek, recognize};
use nom::error::{context, VerboseError, VerboseErrorKind};
use nom::multi::{many0, separated_list0};
use nom::sequence::{delimited, pair, preceded, terminated};
use nom::IResult;

use crate::error::{CasError, Result};
use crate::expr::{Args, ExprId, Func, Pool, Terms};
use crate::rational::{self, Rational};

type PResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

/// Name of the square-root sugar; lowered to `Pow(arg, 1/2)`.
const SQRT: &str = "sqrt";
/// Bare identifier that denotes the imaginary unit.
const IMAGINARY_UNIT: &str = "i";

#[derive(Clone, Debug, PartialEq)]
enum Ast {
    Number(Rational),
    Ident(String),
    Neg(Box<Ast>),
    /// Flat chain of terms, each tagged `+` or `-`.
    Sum(Vec<(char, Ast)>),
    /// Flat chain of factors, each tagged `*` or `/`.
    Product(Vec<(char, Ast)>),
    Power(Box<Ast>, Box<Ast>),
    Call {
        name: String,
        args: Vec<Ast>,
        /// Bytes of input left when the function name started.
        remaining: usize,
    },
}

pub fn parse_expr(pool: &mut Pool, input: &str) -> Result<ExprId> {
    let ast = match ws(parse_sum)(input) {
        Ok(("", ast)) => ast,
        Ok((rest, _)) => {
            return Err(CasError::parse(
                input.len() - rest.len(),
                "expected operator or end of input",
            ))
        }
        Err(e) => return Err(to_cas_error(input, e)),
    };
    lower(pool, &ast, input.len())
}

/// Parses `lhs = rhs` into the raw expression `lhs - rhs`; text without `=` is read as
/// `expr = 0`.
pub fn parse_equation(pool: &mut Pool, input: &str) -> Result<ExprId> {
    let Some((lhs, rhs)) = input.split_once('=') else {
        return parse_expr(pool, input);
    };
    let rhs_start = lhs.len() + 1;
    if rhs.contains('=') {
        let offset = rhs_start + rhs.find('=').unwrap_or(0);
        return Err(CasError::parse(offset, "expected at most one '='"));
    }
    let left = parse_expr(pool, lhs)?;
    let right = parse_expr(pool, rhs).map_err(|err| match err {
        CasError::Parse { offset, message } => CasError::parse(rhs_start + offset, message),
        other => other,
    })?;
    Ok(pool.sub(left, right))
}

pub fn is_function_name(name: &str) -> bool {
    name == SQRT || Func::lookup(name).is_some()
}

fn parse_sum(input: &str) -> PResult<'_, Ast> {
    let (rest, first) = parse_product(input)?;
    let (rest, tail) = many0(pair(
        ws(one_of("+-")),
        cut(context("expected operand", parse_product)),
    ))(rest)?;
    Ok((rest, chain(Ast::Sum, '+', first, tail)))
}

fn parse_product(input: &str) -> PResult<'_, Ast> {
    let (rest, first) = parse_unary(input)?;
    let (rest, tail) = many0(alt((
        pair(
            ws(one_of("*/")),
            cut(context("expected operand", parse_unary)),
        ),
        map(parse_implicit_factor, |rhs| ('*', rhs)),
    )))(rest)?;
    Ok((rest, chain(Ast::Product, '*', first, tail)))
}

/// Collects an operator chain into one flat node; a lone operand is returned unchanged.
fn chain(build: fn(Vec<(char, Ast)>) -> Ast, op: char, first: Ast, tail: Vec<(char, Ast)>) -> Ast {
    if tail.is_empty() {
        return first;
    }
    let mut items = Vec::with_capacity(tail.len() + 1);
    items.push((op, first));
    items.extend(tail);
    build(items)
}

/// An operand juxtaposed to the previous one, e.g. the `x` in `2x`.
fn parse_implicit_factor(input: &str) -> PResult<'_, Ast> {
    preceded(
        peek(ws(satisfy(|c| c.is_alphabetic() || c == '_' || c == '('))),
        parse_power,
    )(input)
}

fn parse_unary(input: &str) -> PResult<'_, Ast> {
    alt((
        map(
            preceded(ws(char('-')), cut(context("expected operand", parse_unary))),
            |inner| Ast::Neg(Box::new(inner)),
        ),
        preceded(ws(char('+')), cut(context("expected operand", parse_unary))),
        parse_power,
    ))(input)
}

fn parse_power(input: &str) -> PResult<'_, Ast> {
    let (rest, base) = parse_atom(input)?;
    let (rest, exp) = opt(preceded(
        ws(char('^')),
        cut(context("expected exponent", parse_unary)),
    ))(rest)?;
    Ok(match exp {
        Some(exp) => (rest, Ast::Power(Box::new(base), Box::new(exp))),
        None => (rest, base),
    })
}

fn parse_atom(input: &str) -> PResult<'_, Ast> {
    context(
        "expected number, identifier or '('",
        ws(alt((parse_number, parse_call_or_ident, parse_parens))),
    )(input)
}

fn parse_parens(input: &str) -> PResult<'_, Ast> {
    preceded(
        char('('),
        cut(terminated(
            ws(parse_sum),
            context("expected ')'", ws(char(')'))),
        )),
    )(input)
}

fn parse_number(input: &str) -> PResult<'_, Ast> {
    map_opt(
        recognize(alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        ))),
        |text: &str| rational::parse_decimal(text).map(Ast::Number),
    )(input)
}

fn parse_identifier(input: &str) -> PResult<'_, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn parse_call_or_ident(input: &str) -> PResult<'_, Ast> {
    let remaining = input.len();
    let (rest, name) = parse_identifier(input)?;
    if !is_function_name(name) {
        return Ok((rest, Ast::Ident(name.to_string())));
    }
    let (rest, args) = preceded(
        cut(context("expected '(' after function name", ws(char('(')))),
        cut(terminated(
            separated_list0(ws(char(',')), parse_sum),
            context("expected ')'", ws(char(')'))),
        )),
    )(rest)?;
    Ok((
        rest,
        Ast::Call {
            name: name.to_string(),
            args,
            remaining,
        },
    ))
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> PResult<'a, O>
where
    F: FnMut(&'a str) -> PResult<'a, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn to_cas_error(source: &str, err: nom::Err<VerboseError<&str>>) -> CasError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let offset = e
                .errors
                .first()
                .map(|(rest, _)| source.len() - rest.len())
                .unwrap_or(0);
            let message = e
                .errors
                .iter()
                .find_map(|(_, kind)| match kind {
                    VerboseErrorKind::Context(ctx) => Some((*ctx).to_string()),
                    _ => None,
                })
                .or_else(|| {
                    e.errors.iter().find_map(|(_, kind)| match kind {
                        VerboseErrorKind::Char(c) => Some(format!("expected '{c}'")),
                        _ => None,
                    })
                })
                .unwrap_or_else(|| "unexpected input".to_string());
            CasError::parse(offset, message)
        }
        nom::Err::Incomplete(_) => CasError::parse(source.len(), "unexpected end of input"),
    }
}

fn lower(pool: &mut Pool, ast: &Ast, source_len: usize) -> Result<ExprId> {
    match ast {
        Ast::Number(value) => Ok(pool.constant(value.clone())),
        Ast::Ident(name) if name == IMAGINARY_UNIT => Ok(pool.imaginary_unit()),
        Ast::Ident(name) => Ok(pool.symbol(name)),
        Ast::Neg(inner) => match inner.as_ref() {
            Ast::Number(value) => Ok(pool.constant(-value.clone())),
            other => {
                let inner = lower(pool, other, source_len)?;
                Ok(pool.neg(inner))
            }
        },
        Ast::Sum(items) => {
            let mut terms = Terms::with_capacity(items.len());
            for (op, item) in items {
                let term = lower(pool, item, source_len)?;
                terms.push(if *op == '-' { pool.neg(term) } else { term });
            }
            Ok(pool.add(terms))
        }
        Ast::Product(items) => {
            let mut factors = Terms::with_capacity(items.len());
            for (op, item) in items {
                let factor = lower(pool, item, source_len)?;
                factors.push(if *op == '/' {
                    let minus_one = pool.integer(-1);
                    pool.pow(factor, minus_one)
                } else {
                    factor
                });
            }
            Ok(pool.mul(factors))
        }
        Ast::Power(base, exp) => {
            let base = lower(pool, base, source_len)?;
            let exp = lower(pool, exp, source_len)?;
            Ok(pool.pow(base, exp))
        }
        Ast::Call {
            name,
            args,
            remaining,
        } => {
            let offset = source_len - remaining;
            let lowered = args
                .iter()
                .map(|arg| lower(pool, arg, source_len))
                .collect::<Result<Args>>()?;
            if name == SQRT {
                if lowered.len() != 1 {
                    return Err(CasError::parse(
                        offset,
                        format!("sqrt expects 1 argument(s), found {}", lowered.len()),
                    ));
                }
                let half = pool.constant(rational::ratio(1, 2));
                return Ok(pool.pow(lowered[0], half));
            }
            let func = Func::lookup(name)
                .ok_or_else(|| CasError::parse(offset, format!("unknown function `{name}`")))?;
            pool.function(func, lowered).map_err(|err| match err {
                CasError::Arity {
                    function,
                    expected,
                    found,
                } => CasError::parse(
                    offset,
                    format!("{function} expects {expected} argument(s), found {found}"),
                ),
                other => other,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Node;

    fn parse(pool: &mut Pool, input: &str) -> ExprId {
        parse_expr(pool, input).unwrap_or_else(|e| panic!("parse {input}: {e}"))
    }

    #[test]
    fn implicit_multiplication_matches_explicit() {
        let mut pool = Pool::new();
        assert_eq!(parse(&mut pool, "2x"), parse(&mut pool, "2*x"));
        assert_eq!(parse(&mut pool, "x y"), parse(&mut pool, "x*y"));
        assert_eq!(parse(&mut pool, "3(x+1)"), parse(&mut pool, "3*(x+1)"));
        assert_eq!(parse(&mut pool, "2 sin(x)"), parse(&mut pool, "2*sin(x)"));
    }

    #[test]
    fn power_binds_tighter_than_negation() {
        let mut pool = Pool::new();
        let parsed = parse(&mut pool, "-x^2");
        let x = pool.symbol("x");
        let two = pool.integer(2);
        let sq = pool.pow(x, two);
        assert_eq!(parsed, pool.neg(sq));
    }

    #[test]
    fn power_is_right_associative() {
        let mut pool = Pool::new();
        let parsed = parse(&mut pool, "x^y^z");
        let x = pool.symbol("x");
        let y = pool.symbol("y");
        let z = pool.symbol("z");
        let yz = pool.pow(y, z);
        assert_eq!(parsed, pool.pow(x, yz));
    }

    #[test]
    fn decimals_are_exact() {
        let mut pool = Pool::new();
        let parsed = parse(&mut pool, "0.125");
        assert_eq!(pool.get(parsed), &Node::Constant(rational::ratio(1, 8)));
    }

    #[test]
    fn sqrt_and_imaginary_unit() {
        let mut pool = Pool::new();
        let parsed = parse(&mut pool, "sqrt(x)");
        let x = pool.symbol("x");
        let half = pool.constant(rational::ratio(1, 2));
        assert_eq!(parsed, pool.pow(x, half));
        let i = parse(&mut pool, "i");
        assert_eq!(pool.get(i), &Node::Function(Func::ImaginaryUnit, Args::new()));
    }

    #[test]
    fn errors_carry_offsets() {
        let mut pool = Pool::new();
        match parse_expr(&mut pool, "2 + ") {
            Err(CasError::Parse { offset, message }) => {
                assert_eq!(offset, 4);
                assert!(message.contains("expected"), "{message}");
            }
            other => panic!("unexpected {other:?}"),
        }
        match parse_expr(&mut pool, "(x + 1") {
            Err(CasError::Parse { offset, message }) => {
                assert_eq!(offset, 6);
                assert_eq!(message, "expected ')'");
            }
            other => panic!("unexpected {other:?}"),
        }
        match parse_expr(&mut pool, "x )") {
            Err(CasError::Parse { offset, .. }) => assert_eq!(offset, 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn function_arity_is_a_parse_error() {
        let mut pool = Pool::new();
        match parse_expr(&mut pool, "1 + sin(x, y)") {
            Err(CasError::Parse { offset, message }) => {
                assert_eq!(offset, 4);
                assert_eq!(message, "sin expects 1 argument(s), found 2");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn function_names_require_arguments() {
        let mut pool = Pool::new();
        assert!(matches!(
            parse_expr(&mut pool, "cos + 1"),
            Err(CasError::Parse { offset: 4, .. })
        ));
    }

    #[test]
    fn equations_move_everything_left() {
        let mut pool = Pool::new();
        let eq = parse_equation(&mut pool, "x^2 = 5x - 6").unwrap();
        let lhs = parse(&mut pool, "x^2");
        let rhs = parse(&mut pool, "5x - 6");
        assert_eq!(eq, pool.sub(lhs, rhs));
        match parse_equation(&mut pool, "x = 2 +") {
            Err(CasError::Parse { offset, .. }) => assert_eq!(offset, 7),
            other => panic!("unexpected {other:?}"),
        }
        assert!(parse_equation(&mut pool, "x = y = z").is_err());
    }
}
