//! Cell data structures for the spreadsheet grid.
//!
//! - [`CellContent`] - The raw content of a cell (empty, number, boolean, or text)
//! - [`Grid`] - Rectangular, row-major storage for cell contents
//!
//! A formula is not a separate kind of content: it is text that starts with `=`.

use serde::{Deserialize, Serialize};

use super::cell_ref::CellRef;

/// The raw content stored in a cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellContent {
    #[default]
    Empty,
    Number(f64),
    Bool(bool),
    Text(String),
}

impl CellContent {
    /// Classify user input the way a cell editor does.
    /// - Empty string or whitespace -> Empty
    /// - Starts with '=' -> Text, kept verbatim as a formula
    /// - Valid number -> Number
    /// - Otherwise -> Text
    pub fn from_input(input: &str) -> CellContent {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return CellContent::Empty;
        }
        if trimmed.starts_with('=') {
            return CellContent::Text(trimmed.to_string());
        }
        if let Ok(n) = trimmed.parse::<f64>() {
            return CellContent::Number(n);
        }
        CellContent::Text(trimmed.to_string())
    }

    /// The formula text including its leading `=`, if this cell holds one.
    pub fn formula(&self) -> Option<&str> {
        match self {
            CellContent::Text(s) if s.starts_with('=') => Some(s),
            _ => None,
        }
    }

}

impl From<f64> for CellContent {
    fn from(n: f64) -> Self {
        CellContent::Number(n)
    }
}

impl From<i32> for CellContent {
    fn from(n: i32) -> Self {
        CellContent::Number(f64::from(n))
    }
}

impl From<bool> for CellContent {
    fn from(b: bool) -> Self {
        CellContent::Bool(b)
    }
}

impl From<&str> for CellContent {
    fn from(s: &str) -> Self {
        CellContent::Text(s.to_string())
    }
}

impl From<String> for CellContent {
    fn from(s: String) -> Self {
        CellContent::Text(s)
    }
}

impl<T: Into<CellContent>> From<Option<T>> for CellContent {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellContent::Empty, Into::into)
    }
}

/// Row-major cell storage, indexed `[row][col]`. Rows may be ragged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<CellContent>>,
}

impl Grid {
    pub fn new() -> Grid {
        Grid::default()
    }

    pub fn from_rows<R, C>(rows: R) -> Grid
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<CellContent>,
    {
        Grid {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// The content at `cell`, or None when it lies outside the grid.
    pub fn get(&self, cell: &CellRef) -> Option<&CellContent> {
        self.rows.get(cell.row)?.get(cell.col)
    }

    /// Store `content` at `cell`, growing the grid with empty cells as needed.
    pub fn set(&mut self, cell: &CellRef, content: CellContent) {
        if self.rows.len() <= cell.row {
            self.rows.resize_with(cell.row + 1, Vec::new);
        }
        let row = &mut self.rows[cell.row];
        if row.len() <= cell.col {
            row.resize_with(cell.col + 1, CellContent::default);
        }
        row[cell.col] = content;
    }

    pub fn rows(&self) -> &[Vec<CellContent>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn col_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_input_classification() {
        assert_eq!(CellContent::from_input("   "), CellContent::Empty);
        assert_eq!(CellContent::from_input(" 42 "), CellContent::Number(42.0));
        assert_eq!(
            CellContent::from_input("=A1+B1"),
            CellContent::Text("=A1+B1".to_string())
        );
        assert_eq!(
            CellContent::from_input("hello"),
            CellContent::Text("hello".to_string())
        );
    }

    #[test]
    fn test_formula_detection() {
        assert_eq!(CellContent::from("=SUM(A1:A3)").formula(), Some("=SUM(A1:A3)"));
        assert_eq!(CellContent::from("SUM(A1:A3)").formula(), None);
        assert_eq!(CellContent::from(3.0).formula(), None);
    }

    #[test]
    fn test_get_out_of_bounds_is_none() {
        let grid = Grid::from_rows(vec![vec![1.0, 2.0], vec![3.0]]);
        assert_eq!(grid.get(&CellRef::new(0, 1)), Some(&CellContent::Number(2.0)));
        assert_eq!(grid.get(&CellRef::new(1, 1)), None);
        assert_eq!(grid.get(&CellRef::new(7, 0)), None);
        assert_eq!(grid.col_count(), 2);
    }

    #[test]
    fn test_set_grows_ragged_rows() {
        let mut grid = Grid::new();
        grid.set(&CellRef::new(2, 1), CellContent::from("x"));
        assert_eq!(grid.row_count(), 3);
        assert!(grid.rows()[0].is_empty());
        assert_eq!(grid.rows()[2], vec![CellContent::Empty, CellContent::from("x")]);
    }
}
