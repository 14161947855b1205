//! sheetcalc-core - UI-agnostic sheet model and engine configuration.

pub mod config;
pub mod document;
pub mod error;

pub use config::{load_config, load_config_file, parse_config, user_config_path};
pub use document::{MAX_COLS, MAX_ROWS, Sheet};
pub use error::{Result, SheetError};

pub use sheetcalc_engine::{CellContent, CellRef, EngineConfig, Value};
