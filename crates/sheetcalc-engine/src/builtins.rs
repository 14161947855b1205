//! Built-in spreadsheet functions and their metadata.
//!
//! Conventions:
//! - Spreadsheet-facing names are ALL CAPS and matched case-sensitively.
//! - Every function receives already-evaluated arguments; range arguments
//!   arrive as [`Value::Array`] and variadic functions flatten them.
//! - If you add a function, add its entry to `BUILTINS`.

use crate::engine::{EvalError, Value};

type BuiltinFn = fn(Vec<Value>) -> Result<Value, EvalError>;

pub struct Builtin {
    pub name: &'static str,
    pub description: &'static str,
    eval: BuiltinFn,
}

impl Builtin {
    pub fn call(&self, args: Vec<Value>) -> Result<Value, EvalError> {
        (self.eval)(args)
    }
}

pub const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "SUM",
        description: "Sum of the arguments; non-numeric items count as 0",
        eval: sum,
    },
    Builtin {
        name: "AVG",
        description: "Average of the numeric arguments",
        eval: average,
    },
    Builtin {
        name: "AVERAGE",
        description: "Average of the numeric arguments",
        eval: average,
    },
    Builtin {
        name: "COUNT",
        description: "Count of the numeric arguments",
        eval: count,
    },
    Builtin {
        name: "MAX",
        description: "Largest numeric argument",
        eval: max,
    },
    Builtin {
        name: "MIN",
        description: "Smallest numeric argument",
        eval: min,
    },
    Builtin {
        name: "IF",
        description: "IF(condition, then[, else]) picks a branch by truthiness; a missing else gives FALSE",
        eval: if_,
    },
    Builtin {
        name: "AND",
        description: "TRUE when every argument is truthy",
        eval: and,
    },
    Builtin {
        name: "OR",
        description: "TRUE when any argument is truthy",
        eval: or,
    },
    Builtin {
        name: "NOT",
        description: "Negated truthiness of a single argument",
        eval: not,
    },
];

/// Find a built-in by its exact (uppercase) name.
pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name == name)
}

/// Names of all built-ins, in table order.
pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|b| b.name)
}

fn flatten(args: Vec<Value>) -> Vec<Value> {
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        arg.flatten_into(&mut out);
    }
    out
}

fn numbers(args: Vec<Value>) -> Vec<f64> {
    flatten(args).iter().filter_map(Value::as_number).collect()
}

fn sum(args: Vec<Value>) -> Result<Value, EvalError> {
    Ok(Value::Number(
        flatten(args)
            .iter()
            .map(|v| v.as_number().unwrap_or(0.0))
            .sum(),
    ))
}

fn average(args: Vec<Value>) -> Result<Value, EvalError> {
    let nums = numbers(args);
    if nums.is_empty() {
        return Err(EvalError::DivisionByZero);
    }
    Ok(Value::Number(nums.iter().sum::<f64>() / nums.len() as f64))
}

fn count(args: Vec<Value>) -> Result<Value, EvalError> {
    Ok(Value::Number(numbers(args).len() as f64))
}

fn max(args: Vec<Value>) -> Result<Value, EvalError> {
    let nums = numbers(args);
    Ok(Value::Number(nums.into_iter().reduce(f64::max).unwrap_or(0.0)))
}

fn min(args: Vec<Value>) -> Result<Value, EvalError> {
    let nums = numbers(args);
    Ok(Value::Number(nums.into_iter().reduce(f64::min).unwrap_or(0.0)))
}

fn if_(args: Vec<Value>) -> Result<Value, EvalError> {
    let got = args.len();
    let mut args = args.into_iter();
    match (args.next(), args.next(), args.next(), args.next()) {
        (Some(cond), Some(then), otherwise, None) => Ok(if cond.is_truthy() {
            then
        } else {
            otherwise.unwrap_or(Value::Bool(false))
        }),
        _ => Err(EvalError::ArgumentCount {
            function: "IF",
            expected: "2 or 3",
            got,
        }),
    }
}

fn and(args: Vec<Value>) -> Result<Value, EvalError> {
    Ok(Value::Bool(flatten(args).iter().all(Value::is_truthy)))
}

fn or(args: Vec<Value>) -> Result<Value, EvalError> {
    Ok(Value::Bool(flatten(args).iter().any(Value::is_truthy)))
}

fn not(args: Vec<Value>) -> Result<Value, EvalError> {
    match <[Value; 1]>::try_from(args) {
        Ok([arg]) => Ok(Value::Bool(!arg.is_truthy())),
        Err(args) => Err(EvalError::ArgumentCount {
            function: "NOT",
            expected: "1",
            got: args.len(),
        }),
    }
}
