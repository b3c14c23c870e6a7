use num_traits::{One, Signed, Zero};
use smallvec::smallvec;
use tracing::debug;

use crate::error::{CasError, Result};
use crate::expr::{ExprId, Pool, Terms};
use crate::polynomial::Polynomial;
use crate::rational::Rational;
use crate::simplify::{canonicalize, substitute_all};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinearResult {
    Unique(LinearSolution),
    Infinite(LinearFamily),
}

impl LinearResult {
    pub fn diagnostics(&self) -> &LinearDiagnostics {
        match self {
            LinearResult::Unique(solution) => &solution.diagnostics,
            LinearResult::Infinite(family) => &family.diagnostics,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearSolution {
    pub variables: Vec<String>,
    pub values: Vec<ExprId>,
    pub diagnostics: LinearDiagnostics,
}

impl LinearSolution {
    pub fn value_of(&self, var: &str) -> Option<ExprId> {
        self.variables
            .iter()
            .position(|v| v == var)
            .map(|i| self.values[i])
    }
}

/// Solutions `particular + t1*basis[0] + t2*basis[1] + ...` of a rank-deficient system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearFamily {
    pub variables: Vec<String>,
    pub particular: Vec<ExprId>,
    pub params: Vec<String>,
    pub basis: Vec<Vec<ExprId>>,
    pub diagnostics: LinearDiagnostics,
}

impl LinearFamily {
    /// Each variable as an expression in the parameters `t1, t2, ...`.
    pub fn general_solution(&self, pool: &mut Pool) -> Result<Vec<ExprId>> {
        let mut out = Vec::with_capacity(self.variables.len());
        for (i, &base) in self.particular.iter().enumerate() {
            let mut terms: Terms = smallvec![base];
            for (param, direction) in self.params.iter().zip(&self.basis) {
                let t = pool.symbol(param);
                terms.push(pool.mul(smallvec![direction[i], t]));
            }
            let sum = pool.add(terms);
            out.push(canonicalize(pool, sum)?);
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinearDiagnostics {
    pub rank: usize,
    pub pivot_rows: Vec<usize>,
    pub pivot_columns: Vec<usize>,
    pub free_columns: Vec<usize>,
    /// Only for square systems.
    pub determinant: Option<Rational>,
    pub normalized_equations: Vec<ExprId>,
}

struct LinearRow {
    coeffs: Vec<Rational>,
    constant: Rational,
}

/// Solves `equations[k] == 0` for `variables` by exact Gauss–Jordan elimination.
///
/// Fails with [`CasError::SingularSystem`] when the system is inconsistent. Every equation
/// must be linear in the unknowns with numeric coefficients.
pub fn solve_system(pool: &mut Pool, equations: &[ExprId], variables: &[&str]) -> Result<LinearResult> {
    let n_vars = variables.len();
    let mut normalized_equations = Vec::with_capacity(equations.len());
    let mut rows = Vec::with_capacity(equations.len());
    for (idx, &equation) in equations.iter().enumerate() {
        let normalized = canonicalize(pool, equation)?;
        rows.push(decompose_linear(pool, normalized, variables, idx)?);
        normalized_equations.push(normalized);
    }

    let mut matrix = build_augmented(&rows, n_vars);
    let mut diagnostics = LinearDiagnostics {
        determinant: (matrix.rows == n_vars).then(Rational::one),
        normalized_equations,
        ..LinearDiagnostics::default()
    };

    let inconsistent_row = rref(&mut matrix, n_vars, &mut diagnostics);
    diagnostics.free_columns = free_columns(n_vars, &diagnostics.pivot_columns);
    debug!(
        rank = diagnostics.rank,
        pivots = ?diagnostics.pivot_columns,
        free = ?diagnostics.free_columns,
        "gauss-jordan elimination finished"
    );

    if let Some(row) = inconsistent_row {
        return Err(CasError::SingularSystem { row });
    }

    let variables: Vec<String> = variables.iter().map(|v| v.to_string()).collect();
    let mut particular = vec![pool.zero(); n_vars];
    for (&row, &col) in diagnostics.pivot_rows.iter().zip(&diagnostics.pivot_columns) {
        particular[col] = pool.constant(matrix.get(row, n_vars).clone());
    }

    if diagnostics.rank == n_vars {
        return Ok(LinearResult::Unique(LinearSolution {
            variables,
            values: particular,
            diagnostics,
        }));
    }

    let params = parameter_names(&variables, diagnostics.free_columns.len());

    let mut basis = Vec::with_capacity(diagnostics.free_columns.len());
    for &free_col in &diagnostics.free_columns {
        let mut direction = vec![pool.zero(); n_vars];
        direction[free_col] = pool.one();
        for (&row, &pivot_col) in diagnostics.pivot_rows.iter().zip(&diagnostics.pivot_columns) {
            let coeff = matrix.get(row, free_col);
            if !coeff.is_zero() {
                direction[pivot_col] = pool.constant(-coeff);
            }
        }
        basis.push(direction);
    }

    Ok(LinearResult::Infinite(LinearFamily {
        variables,
        particular,
        params,
        basis,
        diagnostics,
    }))
}

/// `t1, t2, ...`, skipping any name already used by an unknown.
fn parameter_names(variables: &[String], count: usize) -> Vec<String> {
    (1..)
        .map(|i| format!("t{i}"))
        .filter(|name| !variables.contains(name))
        .take(count)
        .collect()
}

fn decompose_linear(pool: &mut Pool, equation: ExprId, variables: &[&str], idx: usize) -> Result<LinearRow> {
    let mut coeffs = Vec::with_capacity(variables.len());
    for &var in variables {
        let poly = Polynomial::from_expr(pool, equation, var)?;
        if poly.degree().is_some_and(|d| d > 1) {
            return Err(CasError::non_polynomial(
                var,
                format!("equation {} is not linear", idx + 1),
            ));
        }
        let coeff = poly.coeff(pool, 1);
        if variables.iter().any(|other| pool.contains_symbol(coeff, other)) {
            return Err(CasError::non_polynomial(
                var,
                format!("equation {} multiplies unknowns together", idx + 1),
            ));
        }
        let Some(value) = pool.as_constant(coeff) else {
            return Err(CasError::unsupported(format!(
                "coefficient of `{var}` in equation {} is not a number",
                idx + 1
            )));
        };
        coeffs.push(value.clone());
    }

    let zero = pool.zero();
    let bindings: Vec<(&str, ExprId)> = variables.iter().map(|v| (*v, zero)).collect();
    let constant_term = substitute_all(pool, equation, &bindings)?;
    let Some(constant) = pool.as_constant(constant_term).cloned() else {
        return Err(CasError::unsupported(format!(
            "constant term of equation {} is not a number",
            idx + 1
        )));
    };
    Ok(LinearRow { coeffs, constant })
}

fn build_augmented(rows: &[LinearRow], n_vars: usize) -> Matrix {
    let cols = n_vars + 1;
    let mut data = Vec::with_capacity(rows.len() * cols);
    for row in rows {
        data.extend(row.coeffs.iter().take(n_vars).cloned());
        data.push(-row.constant.clone());
    }
    Matrix {
        rows: rows.len(),
        cols,
        data,
    }
}

/// Reduces `matrix` in place; returns the first inconsistent row, if any.
fn rref(matrix: &mut Matrix, n_vars: usize, diag: &mut LinearDiagnostics) -> Option<usize> {
    let rows = matrix.rows;
    let cols = matrix.cols;
    let mut row = 0;
    for col in 0..n_vars {
        if row >= rows {
            break;
        }

        // Largest magnitude pivot.
        let mut pivot_row = None;
        let mut pivot_abs = Rational::zero();
        for r in row..rows {
            let value = matrix.get(r, col).abs();
            if !value.is_zero() && value > pivot_abs {
                pivot_abs = value;
                pivot_row = Some(r);
            }
        }
        let Some(pivot_idx) = pivot_row else {
            continue;
        };

        if pivot_idx != row {
            matrix.swap_rows(row, pivot_idx);
            if let Some(det) = diag.determinant.as_mut() {
                *det = -det.clone();
            }
        }

        let pivot_value = matrix.get(row, col).clone();
        if let Some(det) = diag.determinant.as_mut() {
            *det *= &pivot_value;
        }
        for c in col..cols {
            *matrix.get_mut(row, c) /= &pivot_value;
        }

        let pivot: Vec<Rational> = matrix.row(row).to_vec();
        for r in (0..rows).filter(|&r| r != row) {
            let factor = matrix.get(r, col).clone();
            if factor.is_zero() {
                continue;
            }
            for c in col..cols {
                *matrix.get_mut(r, c) -= &factor * &pivot[c];
            }
        }

        diag.pivot_rows.push(row);
        diag.pivot_columns.push(col);
        row += 1;
    }

    diag.rank = diag.pivot_columns.len();
    if diag.rank < n_vars {
        if let Some(det) = diag.determinant.as_mut() {
            *det = Rational::zero();
        }
    }

    (row..rows).find(|&r| {
        let cells = matrix.row(r);
        cells[..n_vars].iter().all(Zero::is_zero) && !cells[n_vars].is_zero()
    })
}

fn free_columns(n_vars: usize, pivots: &[usize]) -> Vec<usize> {
    (0..n_vars).filter(|col| !pivots.contains(col)).collect()
}

struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Rational>,
}

impl Matrix {
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    fn get(&self, row: usize, col: usize) -> &Rational {
        &self.data[self.idx(row, col)]
    }

    fn get_mut(&mut self, row: usize, col: usize) -> &mut Rational {
        let idx = self.idx(row, col);
        &mut self.data[idx]
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        for offset in 0..self.cols {
            self.data.swap(a * self.cols + offset, b * self.cols + offset);
        }
    }

    fn row(&self, row: usize) -> &[Rational] {
        let start = self.idx(row, 0);
        &self.data[start..start + self.cols]
    }
}
