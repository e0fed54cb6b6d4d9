use crate::cli::commands::{open_session, require_access};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::roster::parse_category_codes;
use crate::errors::AppResult;
use crate::models::player::RosterEntry;
use crate::ui::messages::{header, info, success, warning};
use crate::utils::table::TextTable;

fn category_label(entry: &RosterEntry) -> String {
    match (entry.category, entry.both) {
        (_, true) => "Ambas".to_string(),
        (Some(c), false) => c.label().to_string(),
        (None, false) => "-".to_string(),
    }
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Roster {
        category,
        add,
        code,
    } = &cli.command
    {
        let mut session = open_session(cfg)?;

        if let Some(name) = add {
            require_access(cli, cfg)?;
            let categories = parse_category_codes(code.as_deref().unwrap_or_default())?;
            if session.add_player(name, &categories)? {
                success(format!("Player added: {}", name.trim()));
            } else {
                warning(format!("Player already in roster: {}", name.trim()));
            }
            return Ok(());
        }

        let names = session.roster_names(*category)?;
        let entries: Vec<RosterEntry> = session
            .roster()?
            .into_iter()
            .filter(|e| names.contains(&e.name))
            .collect();

        if entries.is_empty() {
            info(format!("No players for category {}.", category.as_str()));
            return Ok(());
        }

        header(format!("Roster ({}) - {} players", category.as_str(), entries.len()));
        let rows: Vec<Vec<String>> = entries
            .iter()
            .map(|e| vec![e.name.clone(), category_label(e)])
            .collect();
        let table = TextTable::from_rows(&["Jugadora".to_string(), "Categoría".to_string()], &rows);
        print!("{}", table.render());
    }

    Ok(())
}
