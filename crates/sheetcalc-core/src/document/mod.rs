//! Sheet document state and logic (UI-agnostic).

mod eval;
mod ops;
mod state;

pub use state::{MAX_COLS, MAX_ROWS, Sheet};
