//! Evaluation results.

use serde::Serialize;
use std::fmt;

use super::error::EvalError;

/// Display tag for a failed evaluation. Hosts show these as-is and never
/// read them back as data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ErrorTag {
    /// `#CIRCULAR!`
    Circular,
    /// `#ERROR: <detail>`
    Eval(String),
}

impl fmt::Display for ErrorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorTag::Circular => f.write_str("#CIRCULAR!"),
            ErrorTag::Eval(detail) => write!(f, "#ERROR: {}", detail),
        }
    }
}

impl From<EvalError> for ErrorTag {
    fn from(err: EvalError) -> Self {
        match err {
            EvalError::CircularReference(_) => ErrorTag::Circular,
            other => ErrorTag::Eval(other.to_string()),
        }
    }
}

/// The value a formula or cell resolves to.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Value {
    Number(f64),
    Text(String),
    Bool(bool),
    /// Row-major cell values from a range reference.
    Array(Vec<Value>),
    Error(ErrorTag),
}

impl Value {
    /// Numeric view: numbers, and text that parses fully as a float.
    /// Booleans, arrays and errors are not numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Truthiness used by `IF`, `AND`, `OR` and `NOT`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::Text(s) => ["TRUE", "1", "YES"].iter().any(|t| s.eq_ignore_ascii_case(t)),
            Value::Array(_) | Value::Error(_) => false,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Push this value onto `out`, expanding arrays (recursively) into their items.
    pub fn flatten_into(self, out: &mut Vec<Value>) {
        match self {
            Value::Array(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
            scalar => out.push(scalar),
        }
    }
}

impl From<EvalError> for Value {
    fn from(err: EvalError) -> Self {
        Value::Error(err.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}
