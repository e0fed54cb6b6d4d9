#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use squadlog::errors::AppResult;
use squadlog::sheets::{GridSize, MemoryWorkbook, RowUpdate, SheetStore};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn sq() -> Command {
    cargo_bin_cmd!("squadlog")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_squadlog.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize the workbook and add a three-player roster
pub fn init_db_with_roster(db_path: &str) {
    sq().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    for (name, code) in [("Ana", "1"), ("Bea", "1"), ("Carla", "2")] {
        sq().args(["--db", db_path, "--test", "roster", "--add", name, "--code", code])
            .assert()
            .success();
    }
}

pub fn d(y: i32, m: u32, day: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub const LOG_HEADER: &[&str] = &["Fecha", "Jugadora", "Asistió", "Llegó tarde", "Comentario"];

/// Workbook with an attendance sheet holding `rows` below the standard header.
pub fn attendance_book(rows: &[&[&str]]) -> MemoryWorkbook {
    let mut all: Vec<&[&str]> = vec![LOG_HEADER];
    all.extend_from_slice(rows);
    MemoryWorkbook::new().with_sheet("Asistencias", &all)
}

pub fn roster_book(book: MemoryWorkbook, names: &[&str]) -> MemoryWorkbook {
    let rows: Vec<[&str; 1]> = names.iter().map(|n| [*n]).collect();
    let mut all: Vec<&[&str]> = vec![&["Jugadora"][..]];
    all.extend(rows.iter().map(|r| &r[..]));
    book.with_sheet("Jugadoras", &all)
}

/// Store wrapper that counts writes and can be told to fail them.
pub struct FlakyStore {
    pub inner: MemoryWorkbook,
    pub fail_batch: bool,
    pub fail_reads: bool,
    pub fail_append: bool,
    pub batch_calls: usize,
    pub append_calls: usize,
}

impl FlakyStore {
    pub fn new(inner: MemoryWorkbook) -> Self {
        Self {
            inner,
            fail_batch: false,
            fail_reads: false,
            fail_append: false,
            batch_calls: 0,
            append_calls: 0,
        }
    }
}

fn io_failure() -> squadlog::errors::AppError {
    std::io::Error::other("connection reset").into()
}

impl SheetStore for FlakyStore {
    fn read_all_rows(&self, sheet: &str) -> AppResult<Vec<Vec<String>>> {
        if self.fail_reads {
            return Err(io_failure());
        }
        self.inner.read_all_rows(sheet)
    }

    fn batch_write(&mut self, sheet: &str, updates: &[RowUpdate]) -> AppResult<()> {
        self.batch_calls += 1;
        if self.fail_batch {
            return Err(io_failure());
        }
        self.inner.batch_write(sheet, updates)
    }

    fn append_rows(&mut self, sheet: &str, rows: &[Vec<String>]) -> AppResult<()> {
        self.append_calls += 1;
        if self.fail_append {
            return Err(io_failure());
        }
        self.inner.append_rows(sheet, rows)
    }

    fn dimensions(&self, sheet: &str) -> AppResult<GridSize> {
        self.inner.dimensions(sheet)
    }

    fn resize(&mut self, sheet: &str, rows: usize, cols: usize) -> AppResult<()> {
        self.inner.resize(sheet, rows, cols)
    }

    fn clear_worksheet(&mut self, sheet: &str) -> AppResult<()> {
        self.inner.clear_worksheet(sheet)
    }

    fn create_worksheet(&mut self, title: &str, rows: usize, cols: usize) -> AppResult<()> {
        self.inner.create_worksheet(title, rows, cols)
    }

    fn has_worksheet(&self, title: &str) -> AppResult<bool> {
        self.inner.has_worksheet(title)
    }

    fn worksheet_titles(&self) -> AppResult<Vec<String>> {
        self.inner.worksheet_titles()
    }
}
