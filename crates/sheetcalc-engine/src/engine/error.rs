//! Error types for formula evaluation.

use thiserror::Error;

use super::cell_ref::CellRef;

/// Failures raised while resolving a formula.
///
/// These never escape [`FormulaEngine::evaluate`](super::FormulaEngine::evaluate);
/// they are converted to an [`ErrorTag`](super::ErrorTag) result there.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("invalid cell reference: {0}")]
    InvalidReference(String),

    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("circular reference at {0}")]
    CircularReference(CellRef),

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("malformed expression: {0}")]
    MalformedExpression(String),

    #[error("{function} expects {expected} argument(s), got {got}")]
    ArgumentCount {
        function: &'static str,
        expected: &'static str,
        got: usize,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("range {range} spans {cells} cells (limit {limit})")]
    RangeTooLarge {
        range: String,
        cells: usize,
        limit: usize,
    },

    #[error("evaluation nested deeper than {0} levels")]
    DepthExceeded(usize),
}
