pub mod backup;
pub mod config;
pub mod db;
pub mod export;
pub mod init;
pub mod log;
pub mod pending;
pub mod roster;
pub mod submit;
pub mod summary;

use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::gate::{PasswordGate, ensure_authenticated};
use crate::core::session::{Session, SessionSettings, SummaryQuery};
use crate::db::SqliteWorkbook;
use crate::errors::AppResult;
use crate::models::player::CategoryFilter;
use crate::utils::range::parse_range;

/// Open the configured workbook behind a fresh session.
pub(crate) fn open_session(cfg: &Config) -> AppResult<Session<SqliteWorkbook>> {
    let book = SqliteWorkbook::open(&cfg.database)?;
    Ok(Session::new(book, SessionSettings::from(cfg)))
}

/// Fail with `AccessDenied` unless the supplied password opens the gate.
pub(crate) fn require_access(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let gate = PasswordGate::new(cfg.access_password.clone(), cli.password.clone());
    ensure_authenticated(&gate)
}

pub(crate) fn summary_query(category: CategoryFilter, range: Option<&str>) -> AppResult<SummaryQuery> {
    let (date_from, date_to) = match range {
        None => (None, None),
        Some(r) if r.eq_ignore_ascii_case("all") => (None, None),
        Some(r) => {
            let (from, to) = parse_range(r)?;
            (Some(from), Some(to))
        }
    };
    Ok(SummaryQuery {
        category,
        date_from,
        date_to,
    })
}
