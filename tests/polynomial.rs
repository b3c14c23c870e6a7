use anvaya::{canonicalize, coefficients, parse_expr, CasError, ExprId, Polynomial, Pool};

fn poly(pool: &mut Pool, input: &str) -> Polynomial {
    let expr = parse_expr(pool, input).expect("parse polynomial");
    coefficients(pool, expr, "x").expect("build polynomial")
}

fn canonical(pool: &mut Pool, input: &str) -> ExprId {
    let expr = parse_expr(pool, input).expect("parse input");
    canonicalize(pool, expr).expect("canonicalize input")
}

#[test]
fn symbolic_coefficients() {
    let mut pool = Pool::new();
    let p = poly(&mut pool, "a*x^2 + b*x + a");
    assert_eq!(p.degree(), Some(2));
    assert_eq!(p.coeff(&pool, 2), pool.symbol("a"));
    assert_eq!(p.coeff(&pool, 1), pool.symbol("b"));
    assert_eq!(p.coeff(&pool, 0), pool.symbol("a"));
    assert!(p.rational_coeffs(&pool).is_none());
}

#[test]
fn powers_of_sums_are_multiplied_out() {
    let mut pool = Pool::new();
    let p = poly(&mut pool, "(x + a)^2");
    assert_eq!(p.coeff(&pool, 2), pool.one());
    assert_eq!(p.coeff(&pool, 1), canonical(&mut pool, "2*a"));
    assert_eq!(p.coeff(&pool, 0), canonical(&mut pool, "a^2"));
}

#[test]
fn polynomial_arithmetic_round_trips() {
    let mut pool = Pool::new();
    let p = poly(&mut pool, "x + 1");
    let cube = p.pow(&mut pool, 3).expect("cube");
    let expr = cube.to_expr(&mut pool, "x").expect("to expression");
    assert_eq!(expr, canonical(&mut pool, "x^3 + 3*x^2 + 3*x + 1"));

    let q = poly(&mut pool, "x - 1");
    let product = p.mul(&mut pool, &q).expect("product");
    assert_eq!(product, poly(&mut pool, "x^2 - 1"));
    let sum = p.add(&mut pool, &q).expect("sum");
    assert_eq!(sum, poly(&mut pool, "2*x"));
}

#[test]
fn zero_polynomial_has_no_degree() {
    let mut pool = Pool::new();
    let p = poly(&mut pool, "x - x");
    assert!(p.is_zero());
    assert_eq!(p.degree(), None);
}

#[test]
fn non_polynomial_inputs_are_rejected() {
    for input in ["sin(x) + 1", "x^y", "1/x", "x^(1/2)", "2^x"] {
        let mut pool = Pool::new();
        let expr = parse_expr(&mut pool, input).expect("parse input");
        assert!(
            matches!(
                coefficients(&mut pool, expr, "x"),
                Err(CasError::NonPolynomialDegree { .. })
            ),
            "{input} should not be a polynomial in x"
        );
    }
}
