//! Expression nodes and the hash-consing pool that owns them.
//!
//! Every node lives in a [`Pool`]; the rest of the engine passes around [`ExprId`]
//! handles. Interning a node that is structurally equal to one already pooled returns
//! the existing handle, so after canonicalization two expressions are equal exactly when
//! their handles are equal. Children are stored as handles, which makes the hash of a
//! node a function of its discriminant, payload and child handles only: hashing never
//! walks below the immediate children.

use std::fmt;

use hashbrown::HashMap;
use num_traits::{One, Zero};
use smallvec::{smallvec, SmallVec};

use crate::config::Config;
use crate::error::{CasError, Result};
use crate::rational::{self, Rational};

pub type Terms = SmallVec<[ExprId; 4]>;
pub type Args = SmallVec<[ExprId; 2]>;

/// A handle to a node in a [`Pool`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u32);

impl ExprId {
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({})", self.0)
    }
}

/// Functions known to the parser, differentiator and evaluator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Exp,
    Ln,
    /// The imaginary unit, written `i`.
    ImaginaryUnit,
}

impl Func {
    pub fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Exp => "exp",
            Func::Ln => "ln",
            Func::ImaginaryUnit => "i",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Func::ImaginaryUnit => 0,
            _ => 1,
        }
    }

    /// Looks up a callable function by the name used in source text.
    pub fn lookup(name: &str) -> Option<Func> {
        match name {
            "sin" => Some(Func::Sin),
            "cos" => Some(Func::Cos),
            "tan" => Some(Func::Tan),
            "exp" => Some(Func::Exp),
            "ln" | "log" => Some(Func::Ln),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Node {
    Constant(Rational),
    Symbol(String),
    Add(Terms),
    Mul(Terms),
    Pow(ExprId, ExprId),
    Function(Func, Args),
}

impl Node {
    pub fn children(&self) -> Terms {
        match self {
            Node::Constant(_) | Node::Symbol(_) => Terms::new(),
            Node::Add(terms) | Node::Mul(terms) => terms.clone(),
            Node::Pow(base, exp) => smallvec![*base, *exp],
            Node::Function(_, args) => args.iter().copied().collect(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Constant(_) | Node::Symbol(_))
    }

    pub fn as_constant(&self) -> Option<&Rational> {
        match self {
            Node::Constant(c) => Some(c),
            _ => None,
        }
    }

    /// Rebuilds this node shape around new children (same arity as `children()`).
    pub fn with_children(&self, children: &[ExprId]) -> Node {
        match self {
            Node::Constant(_) | Node::Symbol(_) => self.clone(),
            Node::Add(_) => Node::Add(children.iter().copied().collect()),
            Node::Mul(_) => Node::Mul(children.iter().copied().collect()),
            Node::Pow(_, _) => Node::Pow(children[0], children[1]),
            Node::Function(func, _) => Node::Function(*func, children.iter().copied().collect()),
        }
    }
}

/// Append-only store of interned expression nodes, scoped to one session.
#[derive(Debug)]
pub struct Pool {
    nodes: Vec<Node>,
    index: HashMap<Node, ExprId>,
    canonical: HashMap<ExprId, ExprId>,
    config: Config,
    zero: ExprId,
    one: ExprId,
}

impl Default for Pool {
    fn default() -> Self {
        Pool::with_config(Config::default())
    }
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        let mut pool = Pool {
            nodes: Vec::new(),
            index: HashMap::new(),
            canonical: HashMap::new(),
            config,
            zero: ExprId(0),
            one: ExprId(0),
        };
        pool.zero = pool.intern(Node::Constant(Rational::zero()));
        pool.one = pool.intern(Node::Constant(Rational::one()));
        pool
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the handle of an equal pooled node, inserting `node` if there is none.
    ///
    /// # Panics
    ///
    /// Panics once the pool holds `u32::MAX + 1` distinct nodes.
    pub fn intern(&mut self, node: Node) -> ExprId {
        if let Some(&id) = self.index.get(&node) {
            return id;
        }
        let id = next_handle(self.nodes.len());
        self.nodes.push(node.clone());
        self.index.insert(node, id);
        id
    }

    pub fn get(&self, id: ExprId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Handle equality; meaningful as mathematical equality for canonical handles.
    pub fn structural_eq(&self, a: ExprId, b: ExprId) -> bool {
        a == b
    }

    pub(crate) fn canonical_of(&self, id: ExprId) -> Option<ExprId> {
        self.canonical.get(&id).copied()
    }

    pub(crate) fn record_canonical(&mut self, raw: ExprId, canonical: ExprId) {
        self.canonical.insert(raw, canonical);
        self.canonical.insert(canonical, canonical);
    }

    pub fn zero(&self) -> ExprId {
        self.zero
    }

    pub fn one(&self) -> ExprId {
        self.one
    }

    pub fn constant(&mut self, value: Rational) -> ExprId {
        self.intern(Node::Constant(value))
    }

    pub fn integer(&mut self, value: i64) -> ExprId {
        self.constant(rational::integer(value))
    }

    pub fn symbol(&mut self, name: &str) -> ExprId {
        self.intern(Node::Symbol(name.to_string()))
    }

    /// Raw sum; a single term is returned as-is and an empty sum is `0`.
    pub fn add(&mut self, terms: Terms) -> ExprId {
        match terms.len() {
            0 => self.zero,
            1 => terms[0],
            _ => self.intern(Node::Add(terms)),
        }
    }

    /// Raw product; a single factor is returned as-is and an empty product is `1`.
    pub fn mul(&mut self, factors: Terms) -> ExprId {
        match factors.len() {
            0 => self.one,
            1 => factors[0],
            _ => self.intern(Node::Mul(factors)),
        }
    }

    pub fn pow(&mut self, base: ExprId, exp: ExprId) -> ExprId {
        self.intern(Node::Pow(base, exp))
    }

    pub fn neg(&mut self, expr: ExprId) -> ExprId {
        let minus_one = self.integer(-1);
        self.mul(smallvec![minus_one, expr])
    }

    pub fn sub(&mut self, a: ExprId, b: ExprId) -> ExprId {
        let negated = self.neg(b);
        self.add(smallvec![a, negated])
    }

    /// `a * b^-1`; quotients have no node of their own.
    pub fn div(&mut self, a: ExprId, b: ExprId) -> ExprId {
        let minus_one = self.integer(-1);
        let inverse = self.pow(b, minus_one);
        self.mul(smallvec![a, inverse])
    }

    pub fn function(&mut self, func: Func, args: Args) -> Result<ExprId> {
        if args.len() != func.arity() {
            return Err(CasError::Arity {
                function: func.name(),
                expected: func.arity(),
                found: args.len(),
            });
        }
        Ok(self.intern(Node::Function(func, args)))
    }

    pub fn call(&mut self, func: Func, arg: ExprId) -> Result<ExprId> {
        self.function(func, smallvec![arg])
    }

    pub fn imaginary_unit(&mut self) -> ExprId {
        self.intern(Node::Function(Func::ImaginaryUnit, Args::new()))
    }

    pub fn as_constant(&self, id: ExprId) -> Option<&Rational> {
        self.get(id).as_constant()
    }

    pub fn is_zero(&self, id: ExprId) -> bool {
        self.as_constant(id).is_some_and(|c| c.is_zero())
    }

    pub fn is_one(&self, id: ExprId) -> bool {
        self.as_constant(id).is_some_and(|c| c.is_one())
    }

    pub fn as_symbol(&self, id: ExprId) -> Option<&str> {
        match self.get(id) {
            Node::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// True when `symbol` occurs anywhere below `id`.
    pub fn contains_symbol(&self, id: ExprId, symbol: &str) -> bool {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            match self.get(current) {
                Node::Symbol(name) if name == symbol => return true,
                node => stack.extend(node.children()),
            }
        }
        false
    }

    /// Distinct symbol names below `id`, sorted.
    pub fn free_symbols(&self, id: ExprId) -> Vec<String> {
        let mut names = std::collections::BTreeSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            match self.get(current) {
                Node::Symbol(name) => {
                    names.insert(name.clone());
                }
                node => stack.extend(node.children()),
            }
        }
        names.into_iter().collect()
    }

    /// Number of nodes in the tree rooted at `id`, counting shared subtrees once per use.
    pub fn tree_size(&self, id: ExprId) -> usize {
        let mut count = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            count += 1;
            stack.extend(self.get(current).children());
        }
        count
    }
}

/// Handle for the node stored at `index`. Reusing a handle would alias two distinct nodes,
/// so running out of handles is fatal, like a `Vec` capacity overflow.
fn next_handle(index: usize) -> ExprId {
    match u32::try_from(index) {
        Ok(raw) => ExprId(raw),
        Err(_) => panic!("expression pool exhausted: {index} nodes do not fit in a u32 handle"),
    }
}
