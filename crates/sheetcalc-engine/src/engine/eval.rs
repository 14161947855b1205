//! Formula evaluation.
//!
//! A formula body is tried against these shapes, first match wins:
//!
//! 1. `NAME(args)` - a built-in call; each argument is evaluated on its own,
//!    except `"..."` literals which are taken as text.
//! 2. `A1` - a single cell reference.
//! 3. `A1:B5` - a range, giving the row-major list of cell values.
//! 4. Anything else - cell references are replaced by their numeric values
//!    and the text is evaluated as arithmetic/comparison. Text that does not
//!    evaluate is returned unchanged as a string.
//!
//! Referenced formula cells are resolved on demand through the same path, so
//! evaluation recurses depth-first through the grid.

use regex::Regex;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::builtins;

use super::args::{closes_at_end, split_args, string_literal};
use super::cell::{CellContent, Grid};
use super::cell_ref::{CellRef, parse_address, parse_range};
use super::config::EngineConfig;
use super::cycle::CycleGuard;
use super::error::EvalError;
use super::expr;
use super::value::Value;

/// Matchers owned by one engine instance.
struct Patterns {
    call: Regex,
    address: Regex,
    range: Regex,
    reference: Regex,
}

impl Patterns {
    fn new() -> Self {
        Patterns {
            call: Regex::new(r"(?s)^([A-Z]+)\((.*)\)$").expect("call regex must compile"),
            address: Regex::new(r"^[A-Za-z]+[0-9]+$").expect("address regex must compile"),
            range: Regex::new(r"^[A-Za-z]+[0-9]+:[A-Za-z]+[0-9]+$")
                .expect("range regex must compile"),
            reference: Regex::new(r"\b[A-Za-z]+[0-9]+\b")
                .expect("reference regex must compile"),
        }
    }
}

/// Evaluates formulas over a [`Grid`].
///
/// The engine keeps per-evaluation bookkeeping (the cycle guard and the
/// optional value cache) behind `RefCell`s, so it is `Send` but not `Sync`:
/// one evaluation runs at a time per instance. Separate instances share
/// nothing and may run on separate threads.
///
/// Recursion follows reference chains on the call stack. Cycles are cut by
/// the guard, but a long enough acyclic chain can still exhaust the stack
/// unless [`EngineConfig::max_depth`] is set.
pub struct FormulaEngine {
    grid: Grid,
    config: EngineConfig,
    patterns: Patterns,
    guard: CycleGuard,
    memo: RefCell<HashMap<CellRef, Value>>,
    depth: Cell<usize>,
    /// Number of reads cut short by the cycle guard or the depth limit.
    /// A value computed while this moved depends on where it was reached
    /// from, so it is not memoized.
    cut_short: Cell<usize>,
}

impl FormulaEngine {
    pub fn new(grid: Grid) -> Self {
        Self::with_config(grid, EngineConfig::default())
    }

    pub fn with_config(grid: Grid, config: EngineConfig) -> Self {
        FormulaEngine {
            grid,
            config,
            patterns: Patterns::new(),
            guard: CycleGuard::default(),
            memo: RefCell::default(),
            depth: Cell::new(0),
            cut_short: Cell::new(0),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate `formula` (a leading `=` is optional).
    ///
    /// `origin` is the cell the formula belongs to, if any; it is tracked by
    /// the cycle guard so a formula that reaches its own cell again yields
    /// `#CIRCULAR!`. Every failure is returned as a [`Value::Error`].
    pub fn evaluate(&self, formula: &str, origin: Option<&CellRef>) -> Value {
        let body = formula.strip_prefix('=').unwrap_or(formula);
        let frame = Frame::enter(self);
        trace!(
            formula = body,
            origin = ?origin.map(|cell| cell.to_string()),
            depth = frame.depth,
            "evaluate"
        );

        let result = self.check_depth(frame.depth).and_then(|()| match origin {
            Some(cell) => self.evaluate_at(body, *cell),
            None => self.evaluate_body(body),
        });
        result.unwrap_or_else(|err| {
            debug!(formula = body, error = %err, "evaluation failed");
            Value::from(err)
        })
    }

    /// Resolve the value of one cell.
    ///
    /// Cells outside the grid and empty cells are 0. Formula cells are
    /// evaluated; other text becomes a number when it parses as one.
    pub fn cell_value(&self, cell: &CellRef) -> Value {
        let Some(content) = self.grid.get(cell) else {
            return Value::Number(0.0);
        };
        if let Some(formula) = content.formula() {
            return self.evaluate(formula, Some(cell));
        }
        match content {
            CellContent::Empty => Value::Number(0.0),
            CellContent::Number(n) => Value::Number(*n),
            CellContent::Bool(b) => Value::Bool(*b),
            CellContent::Text(s) => s
                .trim()
                .parse()
                .map(Value::Number)
                .unwrap_or_else(|_| Value::Text(s.clone())),
        }
    }

    pub fn evaluate_cell(&self, cell: &CellRef) -> Value {
        self.cell_value(cell)
    }

    fn check_depth(&self, depth: usize) -> Result<(), EvalError> {
        match self.config.max_depth {
            Some(max) if depth > max => {
                self.cut_short.set(self.cut_short.get() + 1);
                Err(EvalError::DepthExceeded(max))
            }
            _ => Ok(()),
        }
    }

    /// Evaluate the formula of `cell` under the cycle guard.
    fn evaluate_at(&self, body: &str, cell: CellRef) -> Result<Value, EvalError> {
        if self.config.memoize_cells
            && let Some(hit) = self.memo.borrow().get(&cell)
        {
            return Ok(hit.clone());
        }

        let Some(_in_flight) = self.guard.enter(cell) else {
            debug!(cell = %cell, "circular reference");
            self.cut_short.set(self.cut_short.get() + 1);
            return Err(EvalError::CircularReference(cell));
        };
        let cut_before = self.cut_short.get();
        let value = self.evaluate_body(body)?;

        if self.config.memoize_cells
            && !value.is_error()
            && self.cut_short.get() == cut_before
        {
            self.memo.borrow_mut().insert(cell, value.clone());
        }
        Ok(value)
    }

    fn evaluate_body(&self, body: &str) -> Result<Value, EvalError> {
        let source = body.trim();

        if let Some((name, args)) = self.function_call(source) {
            return self.call_function(name, args);
        }
        if self.patterns.address.is_match(source) {
            let cell = parse_address(source)?;
            return Ok(self.cell_value(&cell));
        }
        if source.contains(':') && self.patterns.range.is_match(source) {
            return self.range_values(source);
        }
        Ok(self.arithmetic(source))
    }

    /// Split `NAME(args)` when the parenthesis after NAME is the one closing
    /// at the end of `source`.
    fn function_call<'s>(&self, source: &'s str) -> Option<(&'s str, &'s str)> {
        let caps = self.patterns.call.captures(source)?;
        let name = caps.get(1)?.as_str();
        let args = caps.get(2)?.as_str();
        closes_at_end(args).then_some((name, args))
    }

    fn call_function(&self, name: &str, args: &str) -> Result<Value, EvalError> {
        let builtin =
            builtins::lookup(name).ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;
        let args = split_args(args)
            .into_iter()
            .map(|arg| match string_literal(arg) {
                Some(text) => Value::Text(text.to_string()),
                None => self.evaluate(arg, None),
            })
            .collect();
        builtin.call(args)
    }

    fn range_values(&self, source: &str) -> Result<Value, EvalError> {
        let range = parse_range(source)?;
        if let Some(limit) = self.config.max_range_cells
            && range.len() > limit
        {
            return Err(EvalError::RangeTooLarge {
                range: range.to_string(),
                cells: range.len(),
                limit,
            });
        }
        Ok(Value::Array(
            range.cells().map(|cell| self.cell_value(&cell)).collect(),
        ))
    }

    /// Evaluate `source` as arithmetic, falling back to the text itself.
    fn arithmetic(&self, source: &str) -> Value {
        let result = self.substitute_references(source).and_then(|text| {
            if text.contains('"') {
                Ok(Value::Text(text.trim().trim_matches('"').to_string()))
            } else {
                expr::evaluate(&text)
            }
        });
        result.unwrap_or_else(|err| {
            debug!(source, error = %err, "kept as text");
            Value::Text(source.to_string())
        })
    }

    /// Replace each cell reference with the cell's numeric value, or `0`
    /// when the value is not numeric. Quoted text is not exempt.
    fn substitute_references(&self, source: &str) -> Result<String, EvalError> {
        let mut out = String::with_capacity(source.len());
        let mut last = 0;
        for m in self.patterns.reference.find_iter(source) {
            out.push_str(&source[last..m.start()]);
            match self.cell_value(&parse_address(m.as_str())?).as_number() {
                Some(n) => out.push_str(&n.to_string()),
                None => out.push('0'),
            }
            last = m.end();
        }
        out.push_str(&source[last..]);
        Ok(out)
    }
}

/// One level of `evaluate` nesting. Leaving the outermost level ends the
/// top-level evaluation and drops the value cache.
struct Frame<'a> {
    engine: &'a FormulaEngine,
    depth: usize,
}

impl<'a> Frame<'a> {
    fn enter(engine: &'a FormulaEngine) -> Self {
        let depth = engine.depth.get() + 1;
        engine.depth.set(depth);
        Frame { engine, depth }
    }
}

impl Drop for Frame<'_> {
    fn drop(&mut self) {
        self.engine.depth.set(self.depth - 1);
        if self.depth == 1 {
            self.engine.memo.borrow_mut().clear();
            debug_assert!(self.engine.guard.is_idle());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ErrorTag;
    use pretty_assertions::assert_eq;

    fn engine(rows: Vec<Vec<CellContent>>) -> FormulaEngine {
        FormulaEngine::new(Grid::from_rows(rows))
    }

    fn at(address: &str) -> CellRef {
        parse_address(address).unwrap()
    }

    #[test]
    fn test_strips_leading_equals_once() {
        let e = engine(vec![vec![10.into()]]);
        assert_eq!(e.evaluate("=A1", None), Value::Number(10.0));
        assert_eq!(e.evaluate("A1", None), Value::Number(10.0));
        assert_eq!(e.evaluate("= 1 + 2 ", None), Value::Number(3.0));
    }

    #[test]
    fn test_cell_value_resolution() {
        let e = engine(vec![vec![
            2.5.into(),
            " 7 ".into(),
            "text".into(),
            true.into(),
            CellContent::Empty,
            "=A1*2".into(),
        ]]);
        assert_eq!(e.cell_value(&at("A1")), Value::Number(2.5));
        assert_eq!(e.cell_value(&at("B1")), Value::Number(7.0));
        assert_eq!(e.cell_value(&at("C1")), Value::from("text"));
        assert_eq!(e.cell_value(&at("D1")), Value::Bool(true));
        assert_eq!(e.cell_value(&at("E1")), Value::Number(0.0));
        assert_eq!(e.cell_value(&at("F1")), Value::Number(5.0));
        assert_eq!(e.cell_value(&at("Z99")), Value::Number(0.0));
    }

    #[test]
    fn test_lowercase_reference_resolves() {
        let e = engine(vec![vec![4.into()]]);
        assert_eq!(e.evaluate("=a1", None), Value::Number(4.0));
    }

    #[test]
    fn test_row_zero_reference_is_an_error() {
        let e = engine(vec![]);
        let Value::Error(ErrorTag::Eval(detail)) = e.evaluate("=A0", None) else {
            panic!("expected an error");
        };
        assert!(detail.contains("A0"));
    }

    #[test]
    fn test_range_expands_row_major() {
        let e = engine(vec![vec![1.into(), 2.into()], vec![3.into(), "x".into()]]);
        assert_eq!(
            e.evaluate("=A1:B2", None),
            Value::Array(vec![
                Value::Number(1.0),
                Value::Number(2.0),
                Value::Number(3.0),
                Value::from("x"),
            ])
        );
        assert_eq!(e.evaluate("=B2:A1", None), Value::Array(vec![]));
    }

    #[test]
    fn test_call_must_close_at_end() {
        let e = engine(vec![vec![1.into()], vec![2.into()]]);
        // Not a single call; the arithmetic fallback cannot run it either.
        assert_eq!(e.evaluate("=SUM(A1)+SUM(A2)", None), Value::from("SUM(A1)+SUM(A2)"));
        assert_eq!(e.evaluate("=SUM((A1), (A2))", None), Value::Number(3.0));
    }

    #[test]
    fn test_arguments_are_evaluated_recursively() {
        let e = engine(vec![vec![3.into(), 4.into()]]);
        assert_eq!(e.evaluate("=SUM(A1*2, B1+1, MAX(1, 9))", None), Value::Number(20.0));
        assert_eq!(e.evaluate(r#"=IF(A1<B1, "x,y", "z")"#, None), Value::from("x,y"));
    }

    #[test]
    fn test_nested_error_becomes_argument_value() {
        let e = engine(vec![]);
        assert_eq!(e.evaluate("=SUM(FOO(1), 2)", None), Value::Number(2.0));
        assert_eq!(e.evaluate(r#"=IF(FOO(1), "a", "b")"#, None), Value::from("b"));
    }

    #[test]
    fn test_string_literal_fallback() {
        let e = engine(vec![vec![1.into()]]);
        assert_eq!(e.evaluate(r#"="Hello""#, None), Value::from("Hello"));
        // References are substituted before the quotes are stripped.
        assert_eq!(e.evaluate(r#"="see A1""#, None), Value::from("see 1"));
        assert_eq!(e.evaluate(r#"="Total: A1 B7""#, None), Value::from("Total: 1 0"));
    }

    #[test]
    fn test_substitution_of_non_numeric_is_zero() {
        let e = engine(vec![vec!["abc".into(), true.into(), "=FOO()".into(), "-5".into()]]);
        assert_eq!(e.evaluate("=A1+1", None), Value::Number(1.0));
        assert_eq!(e.evaluate("=B1+1", None), Value::Number(1.0));
        assert_eq!(e.evaluate("=C1+1", None), Value::Number(1.0));
        assert_eq!(e.evaluate("=D1*D1", None), Value::Number(25.0));
        assert_eq!(e.evaluate("=10-D1", None), Value::Number(15.0));
    }

    #[test]
    fn test_division_by_zero_keeps_text() {
        let e = engine(vec![vec![0.into()]]);
        assert_eq!(e.evaluate("=1/A1", None), Value::from("1/A1"));
    }

    #[test]
    fn test_guard_is_released_after_each_evaluation() {
        let e = engine(vec![vec!["=FOO(B1)".into(), 1.into()]]);
        let a1 = at("A1");
        for _ in 0..3 {
            assert!(e.cell_value(&a1).is_error());
            assert!(e.guard.is_idle());
            assert_eq!(e.depth.get(), 0);
        }
    }

    #[test]
    fn test_memo_is_scoped_to_one_top_level_call() {
        let mut e = FormulaEngine::with_config(
            Grid::from_rows(vec![vec![CellContent::from(1), "=A1*10".into()]]),
            EngineConfig {
                memoize_cells: true,
                ..EngineConfig::default()
            },
        );
        assert_eq!(e.evaluate("=B1+B1", None), Value::Number(20.0));
        assert!(e.memo.borrow().is_empty());

        e.grid_mut().set(&at("A1"), 2.into());
        assert_eq!(e.evaluate("=SUM(B1, B1)", None), Value::Number(40.0));
    }

    #[test]
    fn test_memo_does_not_change_results_around_cycles() {
        let rows = vec![
            vec![CellContent::from("=B1+1"), "=A1+1".into(), "=C1*2".into()],
            vec!["=SUM(A1:C1)".into(), "=A1+B1".into(), 3.into()],
        ];
        let plain = FormulaEngine::new(Grid::from_rows(rows.clone()));
        let memo = FormulaEngine::with_config(
            Grid::from_rows(rows),
            EngineConfig {
                memoize_cells: true,
                ..EngineConfig::default()
            },
        );
        for formula in ["=A1+B1", "=B1+A1", "=SUM(A1:C2)", "=A2+B2", "=C1+C2"] {
            assert_eq!(memo.evaluate(formula, None), plain.evaluate(formula, None), "{formula}");
        }
        assert_eq!(memo.evaluate("=A1+B1", None), Value::Number(4.0));
        assert!(memo.memo.borrow().is_empty());
    }

    #[test]
    fn test_memo_still_caches_acyclic_cells() {
        let e = FormulaEngine::with_config(
            Grid::from_rows(vec![vec![CellContent::from(2), "=A1*3".into(), "=B1+B1".into()]]),
            EngineConfig {
                memoize_cells: true,
                ..EngineConfig::default()
            },
        );
        let _frame = Frame::enter(&e);
        assert_eq!(e.cell_value(&at("C1")), Value::Number(12.0));
        assert_eq!(e.memo.borrow().get(&at("B1")), Some(&Value::Number(6.0)));
        assert_eq!(e.memo.borrow().get(&at("C1")), Some(&Value::Number(12.0)));
    }

    #[test]
    fn test_range_limit() {
        let e = FormulaEngine::with_config(
            Grid::new(),
            EngineConfig {
                max_range_cells: Some(10),
                ..EngineConfig::default()
            },
        );
        assert_eq!(e.evaluate("=SUM(A1:A10)", None), Value::Number(0.0));
        assert_eq!(
            e.evaluate("=A1:B6", None),
            Value::Error(ErrorTag::Eval(
                "range A1:B6 spans 12 cells (limit 10)".to_string()
            ))
        );
    }

    #[test]
    fn test_depth_limit() {
        let rows: Vec<Vec<CellContent>> = (0..50)
            .map(|i| vec![CellContent::from(format!("=A{}+1", i + 2))])
            .collect();
        let limited = FormulaEngine::with_config(
            Grid::from_rows(rows.clone()),
            EngineConfig {
                max_depth: Some(8),
                ..EngineConfig::default()
            },
        );
        // A1 = A2+1 = ... ; the deepest reachable cell degrades to 0.
        assert_eq!(limited.cell_value(&at("A1")), Value::Number(8.0));
        assert!(limited.guard.is_idle());

        let unlimited = FormulaEngine::new(Grid::from_rows(rows));
        assert_eq!(unlimited.cell_value(&at("A1")), Value::Number(50.0));
    }
}
