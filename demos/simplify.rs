use anvaya::prelude::{diff, expand, simp, taylor};

fn main() {
    let simplify_expr = "2*x*3 + x/2 - sqrt(8)";
    match simp(simplify_expr) {
        Ok(result) => println!("simplify {simplify_expr} => {result}"),
        Err(err) => eprintln!("error for {simplify_expr}: {err}"),
    }

    let expand_expr = "x*(x+1) - x*x + (a + b)^3";
    match expand(expand_expr) {
        Ok(result) => println!("expand {expand_expr} => {result}"),
        Err(err) => eprintln!("error for {expand_expr}: {err}"),
    }

    let diff_expr = "x^x + sin(x)*exp(2x)";
    match diff(diff_expr, "x") {
        Ok(result) => println!("d/dx {diff_expr} => {result}"),
        Err(err) => eprintln!("error for {diff_expr}: {err}"),
    }

    match taylor("cos(x)", "x", "0", 6) {
        Ok(result) => println!("taylor cos(x) about 0 => {result}"),
        Err(err) => eprintln!("error for taylor: {err}"),
    }
}
