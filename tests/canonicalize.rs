use anvaya::{canonicalize, parse_expr, to_string, CasError, ExprId, Pool};

fn canonical(pool: &mut Pool, input: &str) -> ExprId {
    let expr = parse_expr(pool, input).expect("parse input");
    canonicalize(pool, expr).expect("canonicalize input")
}

fn expect_canonical(input: &str, expected: &str) {
    let mut pool = Pool::new();
    let actual = canonical(&mut pool, input);
    let expected_expr = canonical(&mut pool, expected);
    assert_eq!(
        actual,
        expected_expr,
        "canonicalization mismatch for {input}: got {}, expected {}",
        to_string(&pool, actual),
        to_string(&pool, expected_expr)
    );
}

#[test]
fn canonicalization_trivial_cases() {
    let cases = vec![
        ("2*x*3", "6*x"),
        ("x*1", "x"),
        ("x/2", "1/2*x"),
        ("2*(x/3)", "2/3*x"),
        ("1 + 2*x", "2*x + 1"),
        ("2*x + 3 + x", "3*x + 3"),
        ("x + 2 + 3*x", "4*x + 2"),
        ("x + 0", "x"),
        ("0*x + 5", "5"),
        ("x - x", "0"),
        ("x*x", "x^2"),
        ("x*x^2", "x^3"),
        ("x^2*x^3", "x^5"),
        ("x^1", "x"),
        ("x^0", "1"),
        ("(x^2)^3", "x^6"),
        ("(2*x)^2", "4*x^2"),
        ("2*(x + 1)", "2*x + 2"),
        ("(x + 1)*(x + 1)", "(x + 1)^2"),
        ("-2*x", "-2*x"),
    ];

    for (input, expected) in cases {
        expect_canonical(input, expected);
    }
}

#[test]
fn canonicalization_functions() {
    let cases = vec![
        ("sin(1 + 2*x)", "sin(2*x + 1)"),
        ("exp(1 + x)", "exp(x + 1)"),
        ("sin(0)", "0"),
        ("tan(0)", "0"),
        ("cos(0)", "1"),
        ("exp(0)", "1"),
        ("ln(1)", "0"),
        ("exp(ln(x))", "x"),
        ("log(exp(x))", "x"),
        ("sin(-x)", "-sin(x)"),
        ("tan(-3*x)", "-tan(3*x)"),
        ("cos(-2*x)", "cos(2*x)"),
    ];

    for (input, expected) in cases {
        expect_canonical(input, expected);
    }
}

#[test]
fn canonicalization_exact_constants() {
    let cases = vec![
        ("1/3 + 1/6", "1/2"),
        ("0.25*4", "1"),
        ("4^(1/2)", "2"),
        ("8^(2/3)", "4"),
        ("sqrt(8)", "2*sqrt(2)"),
        ("sqrt(1/2)", "1/2*sqrt(2)"),
        ("i*i", "-1"),
        ("i^3", "-i"),
        ("i^4", "1"),
    ];

    for (input, expected) in cases {
        expect_canonical(input, expected);
    }
}

#[test]
fn structurally_equal_inputs_share_an_id() {
    let mut pool = Pool::new();
    let a = canonical(&mut pool, "x*y + 3");
    let b = canonical(&mut pool, "3 + y*x");
    assert_eq!(a, b);
    assert!(pool.structural_eq(a, b));
}

#[test]
fn division_by_zero_is_reported() {
    let mut pool = Pool::new();
    let expr = parse_expr(&mut pool, "x/0").expect("parse input");
    assert_eq!(canonicalize(&mut pool, expr), Err(CasError::DivisionByZero));
}

#[test]
fn rendering_reads_back_to_the_same_form() {
    let inputs = [
        "-(x + 1)*(y + 1)",
        "x^2 - 5*x + 6",
        "y/(2*x^2)",
        "sin(x)^2 - 2*x*(y + 1)",
        "(1/2)*(x + 1)^-1",
        "ln((1/2 / (cos(1) + 7)) + 11)",
        "-3*y/(2*(x + 1))",
    ];
    for input in inputs {
        let mut pool = Pool::new();
        let first = canonical(&mut pool, input);
        let text = to_string(&pool, first);
        let second = canonical(&mut pool, &text);
        assert_eq!(first, second, "{input} rendered as {text}");
    }
}

#[test]
fn long_flat_sums_and_products() {
    let mut pool = Pool::new();
    let sum = vec!["x"; 20_000].join(" + ");
    let sum = canonical(&mut pool, &sum);
    assert_eq!(sum, canonical(&mut pool, "20000*x"));

    let product = vec!["y"; 20_000].join("*");
    let product = canonical(&mut pool, &product);
    assert_eq!(product, canonical(&mut pool, "y^20000"));

    let alternating = (0..10_000)
        .map(|i| if i % 2 == 0 { "+ x" } else { "- x" })
        .collect::<Vec<_>>()
        .join(" ");
    assert_eq!(canonical(&mut pool, &alternating), pool.zero());
}
