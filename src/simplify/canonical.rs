use tracing::{debug, warn};

use crate::error::{CasError, Result};
use crate::expr::{ExprId, Pool};
use crate::simplify::rules::simplify_node;
use crate::visit;

/// Rewrites `expr` into its canonical form, using the pool's configured pass limit.
pub fn canonicalize(pool: &mut Pool, expr: ExprId) -> Result<ExprId> {
    let max_passes = pool.config().max_passes;
    canonicalize_with_limit(pool, expr, max_passes)
}

/// Runs bottom-up rewrite passes until one leaves the expression unchanged.
///
/// Fails with [`CasError::SimplificationDivergence`] when `max_passes` passes all changed
/// the expression.
pub fn canonicalize_with_limit(pool: &mut Pool, expr: ExprId, max_passes: usize) -> Result<ExprId> {
    if let Some(done) = pool.canonical_of(expr) {
        return Ok(done);
    }

    let mut seen = vec![expr];
    let mut current = expr;
    for pass in 1..=max_passes {
        let next = rewrite_pass(pool, current)?;
        let settled = if next == current {
            Some(next)
        } else {
            pool.canonical_of(next)
        };
        if let Some(canonical) = settled {
            debug!(passes = pass, nodes = pool.len(), "canonical form reached");
            for raw in seen {
                pool.record_canonical(raw, canonical);
            }
            return Ok(canonical);
        }
        seen.push(next);
        current = next;
    }

    warn!(max_passes, "canonicalization did not reach a fixpoint");
    Err(CasError::SimplificationDivergence { passes: max_passes })
}

fn rewrite_pass(pool: &mut Pool, root: ExprId) -> Result<ExprId> {
    visit::rewrite(pool, root, |pool, id, node, children| {
        if let Some(done) = pool.canonical_of(id) {
            return Ok(done);
        }
        simplify_node(pool, id, node, children)
    })
}
