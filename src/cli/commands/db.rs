use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::SqliteWorkbook;
use crate::db::log::ttlog;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::ui::messages::warning;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    {
        if *migrate {
            let pool = DbPool::new(&cfg.database)?;
            println!("{}▶ Running migrations…{}", CYAN, RESET);
            let applied = run_pending_migrations(&pool.conn)?;
            println!(
                "{}✔ Migration completed ({} applied).{}\n",
                GREEN, applied, RESET
            );
        }

        if *info {
            let book = SqliteWorkbook::open(&cfg.database)?;
            stats::print_db_info(&book, &cfg.database)?;
        }

        if *check {
            let pool = DbPool::new(&cfg.database)?;
            println!("{}▶ Running integrity check…{}", CYAN, RESET);

            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                println!("{}✔ Integrity check passed.{}\n", GREEN, RESET);
            } else {
                println!("{}✘ Integrity check failed:{} {}\n", RED, RESET, integrity);
            }
        }

        if *vacuum {
            let pool = DbPool::new(&cfg.database)?;
            println!("{}▶ Running VACUUM…{}", CYAN, RESET);
            pool.conn.execute_batch("VACUUM;")?;
            if let Err(e) = ttlog(&pool.conn, "vacuum", "", "Database vacuumed") {
                warning(format!("Failed to write internal log: {e}"));
            }
            println!("{}✔ Vacuum completed.{}\n", GREEN, RESET);
        }
    }

    Ok(())
}
