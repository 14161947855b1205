//! Circular reference detection for formula cells.
//!
//! Evaluation is lazy, so cycles are caught while they happen rather than
//! ahead of time: every formula cell being resolved is recorded as in flight,
//! and reaching a cell that is already in flight means the chain of
//! references has looped back on itself (e.g., A1 → B1 → C1 → A1).
//!
//! The in-flight mark is held by an [`InFlight`] token and removed when the
//! token drops, so every exit path of an evaluation clears it.

use std::cell::RefCell;
use std::collections::HashSet;

use super::CellRef;

/// The set of cells currently being evaluated.
#[derive(Debug, Default)]
pub(crate) struct CycleGuard {
    in_flight: RefCell<HashSet<CellRef>>,
}

impl CycleGuard {
    /// Mark `cell` as in flight.
    /// Returns None if it already is, which means a cycle was reached.
    pub(crate) fn enter(&self, cell: CellRef) -> Option<InFlight<'_>> {
        if !self.in_flight.borrow_mut().insert(cell) {
            return None;
        }
        Some(InFlight { guard: self, cell })
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, cell: &CellRef) -> bool {
        self.in_flight.borrow().contains(cell)
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.in_flight.borrow().is_empty()
    }
}

/// Holds a cell's in-flight mark; dropping it clears the mark.
#[derive(Debug)]
pub(crate) struct InFlight<'a> {
    guard: &'a CycleGuard,
    cell: CellRef,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.guard.in_flight.borrow_mut().remove(&self.cell);
    }
}
