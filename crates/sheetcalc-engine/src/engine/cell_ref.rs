//! Cell reference parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style cell references
//! (e.g., "A1", "B2", "AA100") and zero-indexed row/column coordinates, plus
//! `START:END` range parsing.
//!
//! Column letters use spreadsheet numbering: 'A'..'Z' are the digits 1..26 and
//! there is no zero digit, so "Z" is 26 and "AA" is 27.
//!
//! # Examples
//!
//! ```
//! use sheetcalc_engine::{CellRef, format_address, parse_address};
//!
//! let cell = parse_address("B3").unwrap();
//! assert_eq!(cell, CellRef::new(2, 1));
//! assert_eq!(format_address(2, 1), "B3");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::EvalError;

/// A reference to a cell by row and column indices (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> CellRef {
        CellRef { row, col }
    }
}

impl std::str::FromStr for CellRef {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_address(s)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.col), self.row + 1)
    }
}

/// Parse a cell address in A1 notation (case-insensitive) into a 0-based [`CellRef`].
///
/// The text must be one or more ASCII letters followed by one or more digits,
/// with nothing else around them. Row `0` and columns that overflow `usize`
/// are rejected.
pub fn parse_address(text: &str) -> Result<CellRef, EvalError> {
    let invalid = || EvalError::InvalidReference(text.to_string());

    let split = text
        .find(|c: char| !c.is_ascii_alphabetic())
        .ok_or_else(invalid)?;
    let (letters, digits) = text.split_at(split);
    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let col = column_number(letters)
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(invalid)?;
    let row = digits
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(invalid)?;

    Ok(CellRef::new(row, col))
}

/// Format 0-based coordinates as an A1 address (`(0, 0)` -> "A1").
pub fn format_address(row: usize, col: usize) -> String {
    CellRef::new(row, col).to_string()
}

/// Parse a range like "A1:B5" into its literal start and end cells.
///
/// Start and end are kept in the order written; no normalization is done.
pub fn parse_range(text: &str) -> Result<CellRange, EvalError> {
    let invalid = || EvalError::InvalidRange(text.to_string());

    let (start, end) = text.split_once(':').ok_or_else(invalid)?;
    let start = parse_address(start.trim()).map_err(|_| invalid())?;
    let end = parse_address(end.trim()).map_err(|_| invalid())?;
    Ok(CellRange { start, end })
}

/// Convert column letters to a 1-based column number ("A" -> 1, "AA" -> 27).
/// Returns None for empty input, non-letters, or overflow.
pub fn column_number(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut acc = 0usize;
    for c in letters.bytes() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() - b'A') as usize + 1;
        acc = acc.checked_mul(26)?.checked_add(digit)?;
    }
    Some(acc)
}

/// Convert a 0-based column index to letters (0 -> A, 25 -> Z, 26 -> AA).
pub fn column_letters(col: usize) -> String {
    let mut result = String::new();
    let mut n = col as u128 + 1;
    while n > 0 {
        n -= 1;
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    result
}

/// A rectangular span of cells as written, `start:end`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellRange {
    pub start: CellRef,
    pub end: CellRef,
}

impl CellRange {
    pub fn new(start: CellRef, end: CellRef) -> CellRange {
        CellRange { start, end }
    }

    /// Cells in row-major order, walking literally from start to end.
    ///
    /// A range written end-first ("B5:A1") walks nothing along any axis where
    /// the start is past the end.
    pub fn cells(&self) -> impl Iterator<Item = CellRef> + use<> {
        let (start, end) = (self.start, self.end);
        (start.row..=end.row)
            .flat_map(move |row| (start.col..=end.col).map(move |col| CellRef::new(row, col)))
    }

    /// Number of cells [`CellRange::cells`] yields, saturating on overflow.
    pub fn len(&self) -> usize {
        let rows = (self.end.row + 1).saturating_sub(self.start.row);
        let cols = (self.end.col + 1).saturating_sub(self.start.col);
        rows.saturating_mul(cols)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}
