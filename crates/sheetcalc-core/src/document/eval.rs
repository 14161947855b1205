use super::Sheet;
use sheetcalc_engine::{CellContent, CellRef, Value, format_value};

impl Sheet {
    /// Resolve one cell to its value.
    pub fn value(&self, cell: &CellRef) -> Value {
        self.engine.cell_value(cell)
    }

    /// The display string for one cell. Empty and missing cells show nothing.
    pub fn display(&self, cell: &CellRef) -> String {
        match self.grid().get(cell) {
            None | Some(CellContent::Empty) => String::new(),
            Some(_) => format_value(&self.value(cell)),
        }
    }

    /// Render every cell, padding ragged rows out to the widest one.
    pub fn display_grid(&self) -> Vec<Vec<String>> {
        let cols = self.grid().col_count();
        (0..self.grid().row_count())
            .map(|row| {
                (0..cols)
                    .map(|col| self.display(&CellRef::new(row, col)))
                    .collect()
            })
            .collect()
    }

    /// Evaluate an ad-hoc formula against the sheet.
    pub fn evaluate(&self, formula: &str) -> Value {
        self.engine.evaluate(formula, None)
    }
}
