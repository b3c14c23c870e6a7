//! Total order over pooled expressions used to sort the children of sums and products.

use std::cmp::Ordering;

use crate::expr::{ExprId, Node, Pool};

/// Orders by node kind first, then by payload, then child by child.
pub fn compare_expr(pool: &Pool, a: ExprId, b: ExprId) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let node_a = pool.get(a);
    let node_b = pool.get(b);
    let rank_a = rank(node_a);
    let rank_b = rank(node_b);
    if rank_a != rank_b {
        return rank_a.cmp(&rank_b);
    }

    match (node_a, node_b) {
        (Node::Constant(x), Node::Constant(y)) => x.cmp(y),
        (Node::Symbol(x), Node::Symbol(y)) => x.cmp(y),
        (Node::Function(f, xs), Node::Function(g, ys)) => {
            f.cmp(g).then_with(|| compare_seq(pool, xs, ys))
        }
        (Node::Pow(b1, e1), Node::Pow(b2, e2)) => {
            compare_expr(pool, *b1, *b2).then_with(|| compare_expr(pool, *e1, *e2))
        }
        (Node::Mul(xs), Node::Mul(ys)) | (Node::Add(xs), Node::Add(ys)) => {
            compare_seq(pool, xs, ys)
        }
        _ => Ordering::Equal,
    }
}

fn compare_seq(pool: &Pool, xs: &[ExprId], ys: &[ExprId]) -> Ordering {
    for (x, y) in xs.iter().zip(ys) {
        match compare_expr(pool, *x, *y) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    xs.len().cmp(&ys.len())
}

fn rank(node: &Node) -> u8 {
    match node {
        Node::Constant(_) => 0,
        Node::Symbol(_) => 1,
        Node::Function(_, _) => 2,
        Node::Pow(_, _) => 3,
        Node::Mul(_) => 4,
        Node::Add(_) => 5,
    }
}

pub fn sort_children(pool: &Pool, children: &mut [ExprId]) {
    children.sort_by(|a, b| compare_expr(pool, *a, *b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn constants_sort_before_symbols_before_composites() {
        let mut pool = Pool::new();
        let x = pool.symbol("x");
        let two = pool.integer(2);
        let sq = pool.pow(x, two);
        let mut items = vec![sq, x, two];
        sort_children(&pool, &mut items);
        assert_eq!(items, vec![two, x, sq]);
    }

    #[test]
    fn symbols_sort_by_name() {
        let mut pool = Pool::new();
        let b = pool.symbol("b");
        let a = pool.symbol("a");
        assert_eq!(compare_expr(&pool, a, b), Ordering::Less);
        assert_eq!(compare_expr(&pool, b, a), Ordering::Greater);
    }

    #[test]
    fn composites_compare_children_in_order() {
        let mut pool = Pool::new();
        let x = pool.symbol("x");
        let y = pool.symbol("y");
        let one = pool.one();
        let xa = pool.add(smallvec![one, x]);
        let ya = pool.add(smallvec![one, y]);
        assert_eq!(compare_expr(&pool, xa, ya), Ordering::Less);
        let short = pool.mul(smallvec![x, y]);
        let z = pool.symbol("z");
        let long = pool.mul(smallvec![x, y, z]);
        assert_eq!(compare_expr(&pool, short, long), Ordering::Less);
    }
}
