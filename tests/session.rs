use std::collections::HashMap;

use anvaya::prelude::limit;
use anvaya::{CasError, Config, Session};

#[test]
fn substitution_then_evaluation() {
    let mut session = Session::new();
    let expr = session.parse("x^2 + y").expect("parse");
    let replacement = session.parse("t + 1").expect("parse");
    let substituted = session.substitute(expr, "x", replacement).expect("substitute");
    assert_eq!(session.to_string(substituted), "(t + 1)^2 + y");

    let bindings = HashMap::from([("t".to_string(), 2.0), ("y".to_string(), 0.5)]);
    let value = session.evaluate(substituted, &bindings).expect("evaluate");
    assert!((value - 9.5).abs() < 1e-12);
}

#[test]
fn unbound_symbols_are_reported() {
    let mut session = Session::new();
    let expr = session.parse("x + z").expect("parse");
    let bindings = HashMap::from([("x".to_string(), 1.0)]);
    assert_eq!(
        session.evaluate(expr, &bindings),
        Err(CasError::UnboundSymbol {
            symbol: "z".to_string()
        })
    );
}

#[test]
fn pass_limit_comes_from_config() {
    let mut session = Session::with_config(Config::default().with_max_passes(1));
    assert_eq!(
        session.parse_canonical("x + x"),
        Err(CasError::SimplificationDivergence { passes: 1 })
    );
}

#[test]
fn expansion_limit_comes_from_config() {
    let mut session = Session::with_config(Config::default().with_max_expand_exponent(2));
    let square = session.parse("(x + 1)^2").expect("parse");
    let expanded = session.expand(square).expect("expand");
    assert_eq!(session.to_string(expanded), "x^2 + 2*x + 1");

    let cube = session.parse("(x + 1)^3").expect("parse");
    let kept = session.expand(cube).expect("expand");
    assert_eq!(session.to_string(kept), "(x + 1)^3");
}

#[test]
fn parse_errors_carry_offsets() {
    let mut session = Session::new();
    assert!(matches!(
        session.parse("2 * (x + 1"),
        Err(CasError::Parse { .. })
    ));
    assert!(matches!(
        session.parse_equation("x = 1 = 2"),
        Err(CasError::Parse { offset: 6, .. })
    ));
}

#[test]
fn limits_by_substitution() {
    assert_eq!(limit("x^2", "x", "3").expect("limit"), "9");
    assert_eq!(limit("(x^2 + 1)/(x + 1)", "x", "1/2").expect("limit"), "5/6");
    assert!(matches!(
        limit("1/(x - 3)", "x", "3"),
        Err(CasError::Unsupported(_))
    ));

    let mut session = Session::new();
    let expr = session.parse("ln(x) + x").expect("parse");
    let zero = session.parse("0").expect("parse");
    assert!(matches!(
        session.limit(expr, "x", zero),
        Err(CasError::Unsupported(_))
    ));
}
