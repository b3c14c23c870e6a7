//! Calculus routines (differentiation, limits and Taylor polynomials).

pub mod differentiate;
pub mod limit;
pub mod series;

pub use differentiate::{differentiate, differentiate_n};
pub use limit::limit;
pub use series::{maclaurin, taylor};
