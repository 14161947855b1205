//! Spreadsheet engine API.
//!
//! This module provides the formula engine for the spreadsheet:
//!
//! - [`CellContent`], [`Grid`] - Raw cell contents and their rectangular store
//! - [`CellRef`], [`CellRange`] - Cell reference parsing (A1 notation ↔ row/col indices)
//! - [`FormulaEngine`] - Lazy, on-demand formula resolution with a cycle guard
//! - [`Value`], [`ErrorTag`] - Typed evaluation results
//! - [`format_value`] - Format values for display

mod args;
mod cell;
mod cell_ref;
mod config;
mod cycle;
mod error;
mod eval;
mod expr;
mod format;
mod value;

pub use cell::{CellContent, Grid};
pub use cell_ref::{
    CellRange, CellRef, column_letters, column_number, format_address, parse_address,
    parse_range,
};
pub use config::EngineConfig;
pub use error::EvalError;
pub use eval::FormulaEngine;
pub use format::{format_number, format_value};
pub use value::{ErrorTag, Value};
