use serde::{Deserialize, Serialize};

/// Tunables for a [`FormulaEngine`](super::FormulaEngine).
///
/// The defaults give the plain lazy evaluator: no value cache and no limits
/// beyond the cycle guard.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Reuse formula-cell results within one top-level evaluation.
    pub memoize_cells: bool,
    /// Reject ranges that would expand to more cells than this.
    pub max_range_cells: Option<usize>,
    /// Reject evaluations nested deeper than this.
    pub max_depth: Option<usize>,
}
