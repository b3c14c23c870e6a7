use crate::expr::{ExprId, Pool};
use crate::solver::{LinearDiagnostics, LinearResult, SolutionSet};

use super::to_string;

/// Render a univariate solution set as human-readable lines.
pub fn solution_summary(pool: &Pool, var: &str, solutions: &SolutionSet) -> Vec<String> {
    match solutions {
        SolutionSet::NoSolution => vec!["No solution.".to_string()],
        SolutionSet::AllValues => vec![format!("Every value of {var} is a solution.")],
        SolutionSet::Roots(roots) => roots
            .iter()
            .map(|root| {
                let value = to_string(pool, root.value);
                if root.multiplicity > 1 {
                    format!("{var} = {value} (multiplicity {})", root.multiplicity)
                } else {
                    format!("{var} = {value}")
                }
            })
            .collect(),
    }
}

/// Render a linear system result into lines for CLI/demos.
pub fn system_summary(pool: &Pool, result: &LinearResult) -> Vec<String> {
    match result {
        LinearResult::Unique(sol) => {
            let mut lines = vec!["Unique solution:".to_string()];
            for (var, value) in sol.variables.iter().zip(&sol.values) {
                lines.push(format!("{var} = {}", to_string(pool, *value)));
            }
            push_diag(&mut lines, &sol.diagnostics);
            lines
        }
        LinearResult::Infinite(family) => {
            let mut lines = vec![format!(
                "Infinite solutions (params: {}):",
                family.params.join(", ")
            )];
            for (i, var) in family.variables.iter().enumerate() {
                let mut parts = Vec::new();
                if !pool.is_zero(family.particular[i]) {
                    parts.push(to_string(pool, family.particular[i]));
                }
                for (param, direction) in family.params.iter().zip(&family.basis) {
                    let coeff = direction[i];
                    if !pool.is_zero(coeff) {
                        parts.push(scaled_param(pool, coeff, param));
                    }
                }
                if parts.is_empty() {
                    parts.push("0".to_string());
                }
                lines.push(format!("{var} = {}", parts.join(" + ")));
            }
            push_diag(&mut lines, &family.diagnostics);
            lines
        }
    }
}

/// Lines reported when elimination finds `0 = c` with `c != 0`.
pub fn inconsistent_summary(row: usize) -> Vec<String> {
    vec![
        "No solution (inconsistent system).".to_string(),
        format!("Inconsistent reduced row index: {row}"),
    ]
}

fn scaled_param(pool: &Pool, coeff: ExprId, param: &str) -> String {
    if pool.is_one(coeff) {
        return param.to_string();
    }
    let text = to_string(pool, coeff);
    if pool.as_constant(coeff).is_some_and(|c| c.is_integer()) && !text.starts_with('-') {
        format!("{text}*{param}")
    } else {
        format!("({text})*{param}")
    }
}

fn push_diag(lines: &mut Vec<String>, diag: &LinearDiagnostics) {
    lines.push(format!("Rank: {}", diag.rank));
    if let Some(det) = &diag.determinant {
        lines.push(format!("Determinant: {det}"));
    }
    if !diag.pivot_columns.is_empty() {
        lines.push(format!("Pivot columns: {:?}", diag.pivot_columns));
    }
    if !diag.free_columns.is_empty() {
        lines.push(format!("Free columns: {:?}", diag.free_columns));
    }
}
