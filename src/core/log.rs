use crate::db::log::{LogEntry, load_log};
use crate::errors::AppResult;
use crate::ui::messages::info;
use ansi_term::Colour;
use regex::Regex;
use rusqlite::Connection;
use std::sync::LazyLock;

const MAX_OP_WIDTH: usize = 60;

static ANSI: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok());

pub(crate) fn strip_ansi(s: &str) -> String {
    match ANSI.as_ref() {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

fn color_for_operation(op: &str) -> Colour {
    match op {
        "submit" => Colour::Green,
        "roster_add" => Colour::Cyan,
        "publish" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "backup" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        "vacuum" => Colour::Purple,
        _ => Colour::White,
    }
}

fn op_target(entry: &LogEntry) -> String {
    if entry.target.is_empty() {
        entry.operation.clone()
    } else {
        format!("{} ({})", entry.operation, entry.target)
    }
}

fn display_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%FT%T%:z").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Colour the operation word, keep the target plain, cap the visible width.
fn render_op_target(entry: &LogEntry) -> String {
    let color = color_for_operation(&entry.operation);
    let visible = op_target(entry);

    let truncated = if visible.chars().count() > MAX_OP_WIDTH {
        let mut s: String = visible.chars().take(MAX_OP_WIDTH - 3).collect();
        s.push_str("...");
        s
    } else {
        visible
    };

    match truncated.split_once(' ') {
        Some((op, rest)) => format!("{} {}", color.paint(op), rest),
        None => color.paint(truncated.as_str()).to_string(),
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(conn: &Connection) -> AppResult<()> {
        let entries = load_log(conn)?;
        if entries.is_empty() {
            info("Internal log is empty.");
            return Ok(());
        }

        let op_w = entries
            .iter()
            .map(|e| op_target(e).chars().count())
            .max()
            .unwrap_or(10)
            .min(MAX_OP_WIDTH);
        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let dates: Vec<String> = entries.iter().map(|e| display_date(&e.date)).collect();
        let date_w = dates.iter().map(String::len).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for (entry, date) in entries.iter().zip(dates) {
            let rendered = render_op_target(entry);
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&rendered).chars().count()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                entry.id,
                date,
                rendered,
                padding,
                entry.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
