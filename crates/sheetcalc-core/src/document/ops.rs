use super::Sheet;
use super::state::{MAX_COLS, MAX_ROWS};
use crate::error::{Result, SheetError};
use sheetcalc_engine::{CellContent, CellRef, parse_address};
use tracing::debug;

impl Sheet {
    /// Store `content` at `cell`, growing the grid as needed.
    ///
    /// Cells beyond [`MAX_ROWS`] x [`MAX_COLS`] are refused.
    pub fn set_cell(&mut self, cell: &CellRef, content: CellContent) -> Result<()> {
        if cell.row >= MAX_ROWS || cell.col >= MAX_COLS {
            return Err(SheetError::InvalidAddress(cell.to_string()));
        }
        debug!(cell = %cell, content = ?content, "set cell");
        self.engine.grid_mut().set(cell, content);
        self.modified = true;
        Ok(())
    }

    /// Set a cell from edit-box text such as `"42"`, `"=SUM(A1:A3)"` or `"hello"`.
    pub fn set_input(&mut self, address: &str, input: &str) -> Result<()> {
        let cell = parse_address(address)
            .map_err(|_| SheetError::InvalidAddress(address.to_string()))?;
        self.set_cell(&cell, CellContent::from_input(input))
    }

    /// Empty a cell. Cells outside the grid are left alone.
    pub fn clear_cell(&mut self, cell: &CellRef) {
        if self.grid().get(cell).is_some() {
            self.engine.grid_mut().set(cell, CellContent::Empty);
            self.modified = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_input_classifies_text() {
        let mut sheet = Sheet::new();
        sheet.set_input("A1", " 42 ").unwrap();
        sheet.set_input("B1", "=A1*2").unwrap();
        sheet.set_input("C1", "hello").unwrap();
        sheet.set_input("D1", "   ").unwrap();

        assert_eq!(
            sheet.grid().rows().to_vec(),
            vec![vec![
                CellContent::Number(42.0),
                CellContent::Text("=A1*2".to_string()),
                CellContent::Text("hello".to_string()),
                CellContent::Empty,
            ]]
        );
        assert!(sheet.is_modified());
    }

    #[test]
    fn test_set_input_rejects_bad_address() {
        let mut sheet = Sheet::new();
        let err = sheet.set_input("1A", "5").unwrap_err();
        assert!(matches!(err, SheetError::InvalidAddress(ref a) if a == "1A"));
        assert!(sheet.set_input("A0", "5").is_err());
        assert!(!sheet.is_modified());
    }

    #[test]
    fn test_set_cell_refuses_cells_past_the_sheet_extent() {
        let mut sheet = Sheet::new();
        let err = sheet.set_input("A18446744073709551615", "1").unwrap_err();
        assert!(matches!(err, SheetError::InvalidAddress(ref a) if a == "A18446744073709551615"));
        assert!(sheet.set_input("XFE1", "1").is_err());
        assert!(sheet.set_cell(&CellRef::new(MAX_ROWS, 0), CellContent::from(1)).is_err());
        assert!(!sheet.is_modified());
        assert_eq!(sheet.grid().row_count(), 0);

        sheet.set_input("XFD1", "1").unwrap();
        assert_eq!(sheet.grid().col_count(), MAX_COLS);
    }

    #[test]
    fn test_set_cell_grows_ragged_rows() {
        let mut sheet = Sheet::from_rows(vec![vec![1, 2]]);
        sheet.set_cell(&CellRef::new(2, 0), CellContent::from(7)).unwrap();

        let rows = sheet.grid().rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].len(), 2);
        assert!(rows[1].is_empty());
        assert_eq!(rows[2], vec![CellContent::Number(7.0)]);
    }

    #[test]
    fn test_clear_cell() {
        let mut sheet = Sheet::from_rows(vec![vec![1, 2]]);
        sheet.clear_cell(&CellRef::new(5, 5));
        assert!(!sheet.is_modified());

        sheet.clear_cell(&CellRef::new(0, 1));
        assert_eq!(sheet.grid().get(&CellRef::new(0, 1)), Some(&CellContent::Empty));
        assert!(sheet.is_modified());
    }
}
