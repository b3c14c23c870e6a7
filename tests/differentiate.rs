use std::collections::HashMap;

use anvaya::{canonicalize, differentiate, differentiate_n, evaluate, parse_expr, to_string, Pool};

fn assert_diff_eq(var: &str, input: &str, expected: &str) {
    let mut pool = Pool::new();
    let expr = parse_expr(&mut pool, input).expect("parse input");
    let got = differentiate(&mut pool, expr, var).expect("differentiate input");
    let expected_raw = parse_expr(&mut pool, expected).expect("parse expected");
    let expected_expr = canonicalize(&mut pool, expected_raw).expect("canonicalize expected");
    assert_eq!(
        got,
        expected_expr,
        "d/d{var} {input}: got {}",
        to_string(&pool, got)
    );
}

#[test]
fn basic_vars_and_constants() {
    assert_diff_eq("x", "x", "1");
    assert_diff_eq("x", "y", "0");
    assert_diff_eq("x", "5", "0");
    assert_diff_eq("x", "sqrt(2)", "0");
}

#[test]
fn polynomials_and_products() {
    assert_diff_eq("x", "x^3", "3*x^2");
    assert_diff_eq("x", "x*y", "y");
    assert_diff_eq("x", "2*x^2+3*x", "4*x+3");
    assert_diff_eq("y", "x^2*y^3", "3*x^2*y^2");
}

#[test]
fn trig_and_exponentials() {
    assert_diff_eq("x", "sin(x)", "cos(x)");
    assert_diff_eq("x", "cos(x)", "-sin(x)");
    assert_diff_eq("x", "tan(x)", "1/cos(x)^2");
    assert_diff_eq("x", "exp(x^2)", "2*x*exp(x^2)");
    assert_diff_eq("x", "sin(x^2)", "2*x*cos(x^2)");
}

#[test]
fn general_power_rule() {
    assert_diff_eq("x", "x^x", "x^x*(log(x)+1)");
    assert_diff_eq("x", "log(x)", "1/x");
    assert_diff_eq("x", "sqrt(x)", "1/(2*sqrt(x))");
    assert_diff_eq("x", "2^x", "2^x*ln(2)");
}

#[test]
fn repeated_differentiation() {
    let mut pool = Pool::new();
    let expr = parse_expr(&mut pool, "sin(x)").expect("parse input");
    let fourth = differentiate_n(&mut pool, expr, "x", 4).expect("differentiate");
    let expected = canonicalize(&mut pool, expr).expect("canonicalize");
    assert_eq!(fourth, expected);

    let cubic = parse_expr(&mut pool, "x^3 + x").expect("parse input");
    let zero = differentiate_n(&mut pool, cubic, "x", 4).expect("differentiate");
    assert_eq!(zero, pool.zero());
}

#[test]
fn derivative_evaluates_numerically() {
    let mut pool = Pool::new();
    let expr = parse_expr(&mut pool, "(x + 3)^2").expect("parse input");
    let derivative = differentiate(&mut pool, expr, "x").expect("differentiate");
    let bindings = HashMap::from([("x".to_string(), 0.0)]);
    let value = evaluate(&mut pool, derivative, &bindings).expect("evaluate");
    assert!((value - 6.0).abs() < 1e-12);
}
