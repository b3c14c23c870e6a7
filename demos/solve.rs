use anvaya::prelude::{solve, solve_eqs};

fn main() {
    let vars = ["x", "y", "z"];
    let equations = ["2*x + 3*y + 8*z = 7", "x - 4*y + 6*z = 1", "3*x-y-z=8"];

    match solve_eqs(&vars, &equations) {
        Ok(lines) => println!("{}", lines.join("\n")),
        Err(err) => eprintln!("error: {err}"),
    }

    for equation in ["x^2 - 5x + 6 = 0", "x^2 + 2x + 5 = 0", "2x^2 = 3"] {
        match solve(equation, "x") {
            Ok(lines) => println!("{equation}:\n  {}", lines.join("\n  ")),
            Err(err) => eprintln!("error for {equation}: {err}"),
        }
    }
}
