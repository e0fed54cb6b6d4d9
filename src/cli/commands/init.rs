use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::roster::ROSTER_HEADERS;
use crate::db::SqliteWorkbook;
use crate::db::log::ttlog;
use crate::errors::AppResult;
use crate::models::record::LOG_HEADERS;
use crate::sheets::{RowUpdate, SheetStore};
use crate::ui::messages::{info, success, warning};

/// Create `title` with `headers` in row 1 unless it already exists.
fn ensure_sheet(book: &mut SqliteWorkbook, title: &str, headers: &[&str]) -> AppResult<bool> {
    if book.has_worksheet(title)? {
        return Ok(false);
    }
    book.create_worksheet(title, 1, headers.len())?;
    book.batch_write(
        title,
        &[RowUpdate::new(1, headers.iter().map(|h| h.to_string()).collect())],
    )?;
    Ok(true)
}

/// Handle the `init` command
///
/// This initializes:
///  - the configuration file (skipped in test mode)
///  - the SQLite workbook and its migrations
///  - the attendance and roster worksheets
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.as_deref(), cli.test)?;

    println!("⚙️  Initializing squadlog…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Workbook   : {}", &cfg.database);

    let mut book = SqliteWorkbook::open(&cfg.database)?;

    for (title, headers) in [
        (cfg.attendance_sheet.as_str(), &LOG_HEADERS[..]),
        (cfg.roster_sheet.as_str(), &ROSTER_HEADERS[..]),
    ] {
        if ensure_sheet(&mut book, title, headers)? {
            success(format!("Worksheet created: {title}"));
        } else {
            info(format!("Worksheet already present: {title}"));
        }
    }

    if let Err(e) = ttlog(
        book.conn(),
        "init",
        "Workbook initialized",
        &format!("Workbook initialized at {}", &cfg.database),
    ) {
        warning(format!("Failed to write internal log: {e}"));
    }

    println!("🎉 squadlog initialization completed!");
    Ok(())
}
