use anvaya::{canonicalize, maclaurin, parse_expr, taylor, ExprId, Pool};

fn canonical(pool: &mut Pool, input: &str) -> ExprId {
    let expr = parse_expr(pool, input).expect("parse input");
    canonicalize(pool, expr).expect("canonicalize input")
}

#[test]
fn maclaurin_of_exp() {
    let mut pool = Pool::new();
    let expr = parse_expr(&mut pool, "exp(x)").expect("parse input");
    let series = maclaurin(&mut pool, expr, "x", 4).expect("series");
    assert_eq!(series, canonical(&mut pool, "1 + x + x^2/2 + x^3/6"));
}

#[test]
fn maclaurin_of_cos_skips_odd_terms() {
    let mut pool = Pool::new();
    let expr = parse_expr(&mut pool, "cos(x)").expect("parse input");
    let series = maclaurin(&mut pool, expr, "x", 5).expect("series");
    assert_eq!(series, canonical(&mut pool, "1 - x^2/2 + x^4/24"));
}

#[test]
fn taylor_of_log_about_one() {
    let mut pool = Pool::new();
    let expr = parse_expr(&mut pool, "ln(x)").expect("parse input");
    let one = pool.one();
    let series = taylor(&mut pool, expr, "x", one, 3).expect("series");
    assert_eq!(series, canonical(&mut pool, "(x - 1) - (x - 1)^2/2"));
}

#[test]
fn polynomials_reproduce_themselves() {
    let mut pool = Pool::new();
    let expr = parse_expr(&mut pool, "x^2 + 3*x + 1").expect("parse input");
    let series = maclaurin(&mut pool, expr, "x", 5).expect("series");
    assert_eq!(series, canonical(&mut pool, "x^2 + 3*x + 1"));
}

#[test]
fn order_counts_the_terms_kept() {
    let mut pool = Pool::new();
    let expr = parse_expr(&mut pool, "exp(x)").expect("parse input");
    let one_term = maclaurin(&mut pool, expr, "x", 1).expect("series");
    assert_eq!(one_term, pool.one());
    let two_terms = maclaurin(&mut pool, expr, "x", 2).expect("series");
    assert_eq!(two_terms, canonical(&mut pool, "1 + x"));
}
