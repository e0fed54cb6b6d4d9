use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. Migrations record themselves in it.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20240301_0001_create_workbook",
        description: "Created worksheets and cells tables",
        sql: r#"
            CREATE TABLE IF NOT EXISTS worksheets (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                title      TEXT NOT NULL UNIQUE,
                row_count  INTEGER NOT NULL DEFAULT 1000,
                col_count  INTEGER NOT NULL DEFAULT 26,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS cells (
                sheet_id INTEGER NOT NULL REFERENCES worksheets(id) ON DELETE CASCADE,
                row_idx  INTEGER NOT NULL CHECK(row_idx > 0),
                col_idx  INTEGER NOT NULL CHECK(col_idx > 0),
                value    TEXT NOT NULL,
                PRIMARY KEY (sheet_id, row_idx, col_idx)
            );
        "#,
    },
    Migration {
        version: "20240415_0002_cells_row_index",
        description: "Added row index on cells",
        sql: r#"
            CREATE INDEX IF NOT EXISTS idx_cells_sheet_row ON cells(sheet_id, row_idx);
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Public entry point: run all pending migrations. Returns how many ran.
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }

        conn.execute_batch(m.sql)?;
        conn.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
            [m.version, m.description],
        )?;

        success(format!("Migration applied: {} → {}", m.version, m.description));
        applied += 1;
    }

    Ok(applied)
}
