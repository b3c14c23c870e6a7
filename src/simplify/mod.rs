//! Canonicalization, expansion and substitution over pooled expressions.

mod canonical;
mod expand;
mod rules;
mod substitute;

pub use canonical::{canonicalize, canonicalize_with_limit};
pub use expand::expand;
pub use rules::{simplify_add, simplify_mul, simplify_pow, split_coefficient};
pub use substitute::{substitute, substitute_all};
