//! sheetcalc_engine - Spreadsheet formula engine.
//!
//! Resolves `=`-prefixed formula text over an in-memory [`engine::Grid`],
//! following spreadsheet semantics for A1 references, ranges and a fixed
//! function library.

pub mod builtins;
pub mod engine;

pub use engine::{
    CellContent, CellRange, CellRef, EngineConfig, ErrorTag, EvalError, FormulaEngine, Grid,
    Value, format_address, format_value, parse_address, parse_range,
};
