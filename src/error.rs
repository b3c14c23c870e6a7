use thiserror::Error;

pub type Result<T> = std::result::Result<T, CasError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CasError {
    #[error("parse error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("unbound symbol `{symbol}`")]
    UnboundSymbol { symbol: String },
    #[error("not a polynomial in `{symbol}`: {reason}")]
    NonPolynomialDegree { symbol: String, reason: String },
    #[error("inconsistent linear system (reduced row {row})")]
    SingularSystem { row: usize },
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    #[error("simplification did not converge after {passes} passes")]
    SimplificationDivergence { passes: usize },
    #[error("{function} expects {expected} argument(s), found {found}")]
    Arity {
        function: &'static str,
        expected: usize,
        found: usize,
    },
}

impl CasError {
    pub(crate) fn parse(offset: usize, message: impl Into<String>) -> Self {
        CasError::Parse {
            offset,
            message: message.into(),
        }
    }

    pub(crate) fn unsupported(reason: impl Into<String>) -> Self {
        CasError::Unsupported(reason.into())
    }

    pub(crate) fn non_polynomial(symbol: &str, reason: impl Into<String>) -> Self {
        CasError::NonPolynomialDegree {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }
}
