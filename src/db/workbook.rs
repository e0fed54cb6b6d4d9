//! Workbook persisted in SQLite: one row per non-empty cell.

use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::sheets::{GridSize, RowUpdate, SheetStore, rectangular};
use rusqlite::{Connection, OptionalExtension, Transaction, params};

pub struct SqliteWorkbook {
    pool: DbPool,
}

struct SheetMeta {
    id: i64,
    rows: usize,
    cols: usize,
}

impl SqliteWorkbook {
    /// Open (or create) the workbook file and bring its schema up to date.
    pub fn open(path: &str) -> AppResult<Self> {
        let pool = DbPool::new(path)?;
        init_db(&pool.conn)?;
        Ok(Self { pool })
    }

    pub fn open_in_memory() -> AppResult<Self> {
        let pool = DbPool::in_memory()?;
        init_db(&pool.conn)?;
        Ok(Self { pool })
    }

    pub fn conn(&self) -> &Connection {
        &self.pool.conn
    }

    fn meta(conn: &Connection, title: &str) -> AppResult<SheetMeta> {
        conn.query_row(
            "SELECT id, row_count, col_count FROM worksheets WHERE title = ?1",
            [title],
            |row| {
                Ok(SheetMeta {
                    id: row.get(0)?,
                    rows: row.get::<_, i64>(1)? as usize,
                    cols: row.get::<_, i64>(2)? as usize,
                })
            },
        )
        .optional()?
        .ok_or_else(|| AppError::WorksheetNotFound(title.to_string()))
    }

    fn last_used_row(conn: &Connection, sheet_id: i64) -> AppResult<usize> {
        let last: Option<i64> = conn.query_row(
            "SELECT MAX(row_idx) FROM cells WHERE sheet_id = ?1",
            [sheet_id],
            |row| row.get(0),
        )?;
        Ok(last.unwrap_or(0) as usize)
    }

    fn write_row(tx: &Transaction<'_>, sheet_id: i64, row: usize, values: &[String]) -> AppResult<()> {
        for (c, value) in values.iter().enumerate() {
            let col = (c + 1) as i64;
            if value.is_empty() {
                tx.execute(
                    "DELETE FROM cells WHERE sheet_id = ?1 AND row_idx = ?2 AND col_idx = ?3",
                    params![sheet_id, row as i64, col],
                )?;
            } else {
                tx.execute(
                    "INSERT INTO cells (sheet_id, row_idx, col_idx, value)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(sheet_id, row_idx, col_idx) DO UPDATE SET value = excluded.value",
                    params![sheet_id, row as i64, col, value],
                )?;
            }
        }
        Ok(())
    }
}

impl SheetStore for SqliteWorkbook {
    fn read_all_rows(&self, sheet: &str) -> AppResult<Vec<Vec<String>>> {
        let meta = Self::meta(&self.pool.conn, sheet)?;

        let mut stmt = self.pool.conn.prepare_cached(
            "SELECT row_idx, col_idx, value FROM cells
             WHERE sheet_id = ?1
             ORDER BY row_idx ASC, col_idx ASC",
        )?;

        let cells = stmt.query_map([meta.id], |row| {
            Ok((
                row.get::<_, i64>(0)? as usize,
                row.get::<_, i64>(1)? as usize,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut rows: Vec<Vec<String>> = Vec::new();
        for cell in cells {
            let (r, c, value) = cell?;
            if rows.len() < r {
                rows.resize(r, Vec::new());
            }
            let line = &mut rows[r - 1];
            if line.len() < c {
                line.resize(c, String::new());
            }
            line[c - 1] = value;
        }

        Ok(rectangular(rows))
    }

    fn batch_write(&mut self, sheet: &str, updates: &[RowUpdate]) -> AppResult<()> {
        let meta = Self::meta(&self.pool.conn, sheet)?;

        for u in updates {
            if u.row == 0 || u.row > meta.rows || u.values.len() > meta.cols {
                return Err(AppError::OutOfGrid {
                    sheet: sheet.to_string(),
                    row: u.row,
                    col: u.values.len(),
                });
            }
        }

        let tx = self.pool.conn.transaction()?;
        for u in updates {
            Self::write_row(&tx, meta.id, u.row, &u.values)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn append_rows(&mut self, sheet: &str, rows: &[Vec<String>]) -> AppResult<()> {
        let meta = Self::meta(&self.pool.conn, sheet)?;
        let start = Self::last_used_row(&self.pool.conn, meta.id)? + 1;

        let tx = self.pool.conn.transaction()?;
        for (i, row) in rows.iter().enumerate() {
            Self::write_row(&tx, meta.id, start + i, row)?;
        }

        let needed_rows = (start + rows.len()).saturating_sub(1).max(meta.rows);
        let needed_cols = rows.iter().map(Vec::len).max().unwrap_or(0).max(meta.cols);
        tx.execute(
            "UPDATE worksheets SET row_count = ?1, col_count = ?2 WHERE id = ?3",
            params![needed_rows as i64, needed_cols as i64, meta.id],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn dimensions(&self, sheet: &str) -> AppResult<GridSize> {
        let meta = Self::meta(&self.pool.conn, sheet)?;
        Ok(GridSize {
            rows: meta.rows,
            cols: meta.cols,
        })
    }

    fn resize(&mut self, sheet: &str, rows: usize, cols: usize) -> AppResult<()> {
        let meta = Self::meta(&self.pool.conn, sheet)?;

        let tx = self.pool.conn.transaction()?;
        tx.execute(
            "UPDATE worksheets SET row_count = ?1, col_count = ?2 WHERE id = ?3",
            params![rows as i64, cols as i64, meta.id],
        )?;
        tx.execute(
            "DELETE FROM cells WHERE sheet_id = ?1 AND (row_idx > ?2 OR col_idx > ?3)",
            params![meta.id, rows as i64, cols as i64],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn clear_worksheet(&mut self, sheet: &str) -> AppResult<()> {
        let meta = Self::meta(&self.pool.conn, sheet)?;
        self.pool
            .conn
            .execute("DELETE FROM cells WHERE sheet_id = ?1", [meta.id])?;
        Ok(())
    }

    fn create_worksheet(&mut self, title: &str, rows: usize, cols: usize) -> AppResult<()> {
        if self.has_worksheet(title)? {
            return Err(AppError::WorksheetExists(title.to_string()));
        }
        self.pool.conn.execute(
            "INSERT INTO worksheets (title, row_count, col_count) VALUES (?1, ?2, ?3)",
            params![title, rows as i64, cols as i64],
        )?;
        Ok(())
    }

    fn has_worksheet(&self, title: &str) -> AppResult<bool> {
        let found: Option<i64> = self
            .pool
            .conn
            .query_row(
                "SELECT id FROM worksheets WHERE title = ?1",
                [title],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn worksheet_titles(&self) -> AppResult<Vec<String>> {
        let mut stmt = self
            .pool
            .conn
            .prepare_cached("SELECT title FROM worksheets ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn audit(&mut self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        ttlog(&self.pool.conn, operation, target, message)
    }
}
