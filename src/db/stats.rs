use crate::db::workbook::SqliteWorkbook;
use crate::errors::AppResult;
use crate::sheets::SheetStore;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use std::fs;

pub fn print_db_info(book: &SqliteWorkbook, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) WORKSHEETS
    //
    let titles = book.worksheet_titles()?;
    println!("{}• Worksheets:{} {}{}{}", CYAN, RESET, GREEN, titles.len(), RESET);

    for title in &titles {
        let size = book.dimensions(title)?;
        let used = book.read_all_rows(title)?.len();
        println!(
            "    {:<14} {} rows used {}(grid {}x{}){}",
            title, used, GREY, size.rows, size.cols, RESET
        );
    }

    //
    // 3) AUDIT LOG
    //
    let entries: i64 = book
        .conn()
        .query_row("SELECT COUNT(*) FROM log", [], |row| row.get(0))?;
    println!("{}• Log entries:{} {}", CYAN, RESET, entries);

    println!();
    Ok(())
}
