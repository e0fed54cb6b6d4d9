use super::{GridSize, RowUpdate, SheetStore, rectangular};
use crate::errors::{AppError, AppResult};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
struct MemorySheet {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<String>>,
}

impl MemorySheet {
    fn set(&mut self, row: usize, col: usize, value: &str) {
        if self.cells.len() < row {
            self.cells.resize(row, Vec::new());
        }
        let line = &mut self.cells[row - 1];
        if line.len() < col {
            line.resize(col, String::new());
        }
        line[col - 1] = value.to_string();
    }

    fn last_used_row(&self) -> usize {
        self.cells
            .iter()
            .rposition(|r| r.iter().any(|c| !c.is_empty()))
            .map(|i| i + 1)
            .unwrap_or(0)
    }
}

/// In-process workbook. Useful for tests and for embedding the engine
/// without a database file.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: BTreeMap<String, MemorySheet>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a worksheet from literal rows; capacity matches the data.
    pub fn with_sheet(mut self, title: &str, rows: &[&[&str]]) -> Self {
        let cols = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut sheet = MemorySheet {
            rows: rows.len().max(1),
            cols: cols.max(1),
            cells: Vec::new(),
        };
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                sheet.set(r + 1, c + 1, value);
            }
        }
        self.sheets.insert(title.to_string(), sheet);
        self
    }

    fn sheet(&self, title: &str) -> AppResult<&MemorySheet> {
        self.sheets
            .get(title)
            .ok_or_else(|| AppError::WorksheetNotFound(title.to_string()))
    }

    fn sheet_mut(&mut self, title: &str) -> AppResult<&mut MemorySheet> {
        self.sheets
            .get_mut(title)
            .ok_or_else(|| AppError::WorksheetNotFound(title.to_string()))
    }
}

impl SheetStore for MemoryWorkbook {
    fn read_all_rows(&self, sheet: &str) -> AppResult<Vec<Vec<String>>> {
        Ok(rectangular(self.sheet(sheet)?.cells.clone()))
    }

    fn batch_write(&mut self, sheet: &str, updates: &[RowUpdate]) -> AppResult<()> {
        let ws = self.sheet_mut(sheet)?;

        for u in updates {
            if u.row == 0 || u.row > ws.rows || u.values.len() > ws.cols {
                return Err(AppError::OutOfGrid {
                    sheet: sheet.to_string(),
                    row: u.row,
                    col: u.values.len(),
                });
            }
        }

        for u in updates {
            for (c, value) in u.values.iter().enumerate() {
                ws.set(u.row, c + 1, value);
            }
        }
        Ok(())
    }

    fn append_rows(&mut self, sheet: &str, rows: &[Vec<String>]) -> AppResult<()> {
        let ws = self.sheet_mut(sheet)?;
        let mut next = ws.last_used_row() + 1;

        for row in rows {
            for (c, value) in row.iter().enumerate() {
                ws.set(next, c + 1, value);
            }
            ws.rows = ws.rows.max(next);
            ws.cols = ws.cols.max(row.len());
            next += 1;
        }
        Ok(())
    }

    fn dimensions(&self, sheet: &str) -> AppResult<GridSize> {
        let ws = self.sheet(sheet)?;
        Ok(GridSize {
            rows: ws.rows,
            cols: ws.cols,
        })
    }

    fn resize(&mut self, sheet: &str, rows: usize, cols: usize) -> AppResult<()> {
        let ws = self.sheet_mut(sheet)?;
        ws.rows = rows;
        ws.cols = cols;
        ws.cells.truncate(rows);
        for line in ws.cells.iter_mut() {
            line.truncate(cols);
        }
        Ok(())
    }

    fn clear_worksheet(&mut self, sheet: &str) -> AppResult<()> {
        self.sheet_mut(sheet)?.cells.clear();
        Ok(())
    }

    fn create_worksheet(&mut self, title: &str, rows: usize, cols: usize) -> AppResult<()> {
        if self.sheets.contains_key(title) {
            return Err(AppError::WorksheetExists(title.to_string()));
        }
        self.sheets.insert(
            title.to_string(),
            MemorySheet {
                rows,
                cols,
                cells: Vec::new(),
            },
        );
        Ok(())
    }

    fn has_worksheet(&self, title: &str) -> AppResult<bool> {
        Ok(self.sheets.contains_key(title))
    }

    fn worksheet_titles(&self) -> AppResult<Vec<String>> {
        Ok(self.sheets.keys().cloned().collect())
    }
}
