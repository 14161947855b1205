use sheetcalc_engine::{CellContent, EngineConfig, FormulaEngine, Grid};

/// Largest sheet extent accepted by edits (A1 to XFD1048576).
pub const MAX_ROWS: usize = 1_048_576;
pub const MAX_COLS: usize = 16_384;

/// A grid of raw cell contents plus the engine that evaluates it.
pub struct Sheet {
    pub(crate) engine: FormulaEngine,
    /// Whether any cell has been written since construction
    pub(crate) modified: bool,
}

impl Sheet {
    /// Create an empty sheet with the default engine settings.
    pub fn new() -> Self {
        Self::with_config(Vec::<Vec<CellContent>>::new(), EngineConfig::default())
    }

    /// Create a sheet from row-major contents; rows may differ in length.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<CellContent>,
    {
        Self::with_config(rows, EngineConfig::default())
    }

    pub fn with_config<R, C>(rows: R, config: EngineConfig) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<CellContent>,
    {
        Sheet {
            engine: FormulaEngine::with_config(Grid::from_rows(rows), config),
            modified: false,
        }
    }

    pub fn engine(&self) -> &FormulaEngine {
        &self.engine
    }

    pub fn grid(&self) -> &Grid {
        self.engine.grid()
    }

    pub fn config(&self) -> &EngineConfig {
        self.engine.config()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}
