//! Spreadsheet-style storage abstraction.
//!
//! A workbook is a set of named worksheets, each a grid of string cells with
//! an explicit row/column capacity. Rows and columns are 1-based, like the
//! A1 notation users see in a spreadsheet.

pub mod memory;

pub use memory::MemoryWorkbook;

use crate::errors::AppResult;

/// One full-row replacement starting at column A.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowUpdate {
    pub row: usize,
    pub values: Vec<String>,
}

impl RowUpdate {
    pub fn new(row: usize, values: Vec<String>) -> Self {
        Self { row, values }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub rows: usize,
    pub cols: usize,
}

/// Storage client consumed by the engine.
///
/// `batch_write` and `append_rows` are all-or-nothing: either every row of
/// the call lands or none does.
pub trait SheetStore {
    /// Every row from row 1 up to the last non-empty row, padded to the
    /// width of the widest non-empty row.
    fn read_all_rows(&self, sheet: &str) -> AppResult<Vec<Vec<String>>>;

    /// Rewrite whole rows in place. Fails with `OutOfGrid` if any target
    /// cell lies outside the current capacity.
    fn batch_write(&mut self, sheet: &str, updates: &[RowUpdate]) -> AppResult<()>;

    /// Append rows after the last non-empty row, growing the grid as needed.
    fn append_rows(&mut self, sheet: &str, rows: &[Vec<String>]) -> AppResult<()>;

    fn dimensions(&self, sheet: &str) -> AppResult<GridSize>;

    /// Set the grid capacity. Cells outside the new bounds are dropped.
    fn resize(&mut self, sheet: &str, rows: usize, cols: usize) -> AppResult<()>;

    /// Erase every value, keeping the capacity.
    fn clear_worksheet(&mut self, sheet: &str) -> AppResult<()>;

    fn create_worksheet(&mut self, title: &str, rows: usize, cols: usize) -> AppResult<()>;

    fn has_worksheet(&self, title: &str) -> AppResult<bool>;

    fn worksheet_titles(&self) -> AppResult<Vec<String>>;

    /// Record an entry in the store's audit trail, if it keeps one.
    fn audit(&mut self, _operation: &str, _target: &str, _message: &str) -> AppResult<()> {
        Ok(())
    }
}

/// Pad a ragged set of rows into a rectangle, dropping trailing empty rows.
pub(crate) fn rectangular(mut rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    for row in rows.iter_mut() {
        while row.last().is_some_and(|c| c.is_empty()) {
            row.pop();
        }
    }
    while rows.last().is_some_and(|r| r.is_empty()) {
        rows.pop();
    }

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in rows.iter_mut() {
        row.resize(width, String::new());
    }
    rows
}
