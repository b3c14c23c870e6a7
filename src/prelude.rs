//! String-based convenience API for quick experimentation.

pub use crate::ui::{
    diff, differentiate, evaluate, expand, limit, parse, simp, simplify, solve, solve_eqs,
    solve_system, taylor,
};
