//! Stack-safe post-order traversal over pooled expressions.
//!
//! Canonicalization, differentiation, substitution and expansion all fold a tree
//! bottom-up. Doing that with an explicit stack keeps deeply nested input (long chains
//! of `((((x+1)+1)+1)...)`) from exhausting the call stack, and the memo table means a
//! subtree shared by several parents is visited once.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::error::{CasError, Result};
use crate::expr::{ExprId, Node, Pool};

enum Frame {
    Enter(ExprId),
    Exit(ExprId),
}

/// Folds the tree under `root` from the leaves up.
///
/// `f` receives the node being finished together with the already-folded values of its
/// children, in child order.
pub fn fold<T, F>(pool: &mut Pool, root: ExprId, mut f: F) -> Result<T>
where
    T: Clone,
    F: FnMut(&mut Pool, ExprId, &Node, &[T]) -> Result<T>,
{
    let mut memo: HashMap<ExprId, T> = HashMap::new();
    let mut stack = vec![Frame::Enter(root)];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(id) => {
                if memo.contains_key(&id) {
                    continue;
                }
                stack.push(Frame::Exit(id));
                for child in pool.get(id).children().iter().rev() {
                    if !memo.contains_key(child) {
                        stack.push(Frame::Enter(*child));
                    }
                }
            }
            Frame::Exit(id) => {
                if memo.contains_key(&id) {
                    continue;
                }
                let node = pool.get(id).clone();
                let folded: SmallVec<[T; 4]> = node
                    .children()
                    .iter()
                    .map(|child| memo[child].clone())
                    .collect();
                let value = f(pool, id, &node, &folded)?;
                memo.insert(id, value);
            }
        }
    }

    memo.remove(&root)
        .ok_or_else(|| CasError::unsupported("traversal finished without visiting the root"))
}

/// Rebuilds the tree under `root`, replacing each node by `f(node, rewritten children)`.
pub fn rewrite<F>(pool: &mut Pool, root: ExprId, f: F) -> Result<ExprId>
where
    F: FnMut(&mut Pool, ExprId, &Node, &[ExprId]) -> Result<ExprId>,
{
    fold(pool, root, f)
}
