use crate::cli::commands::open_session;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::previous::SchemaCheck;
use crate::errors::AppResult;
use crate::ui::messages::{header, success, warning};
use crate::utils::colors::{GREEN, RESET, YELLOW};
use crate::utils::date::parse_date_arg;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Pending { date, category } = cmd {
        let date = parse_date_arg(date)?;
        let mut session = open_session(cfg)?;
        let status = session.day_status(date, *category)?;

        if let SchemaCheck::Missing {
            missing,
            detected_headers,
        } = &status.previous.schema
        {
            warning(format!(
                "Attendance sheet is missing columns: {} (found: {})",
                missing.join(", "),
                detected_headers.join(", ")
            ));
        }

        header(format!("{} ({})", date.format("%Y-%m-%d"), category.as_str()));

        let present: Vec<&String> = status
            .roster
            .iter()
            .filter(|p| status.previous.present.contains(*p))
            .collect();

        println!("{}Present ({}):{}", GREEN, present.len(), RESET);
        for p in &present {
            println!("  ✔ {p}");
        }

        println!("{}Pending ({}):{}", YELLOW, status.pending.len(), RESET);
        for p in &status.pending {
            println!("  • {p}");
        }

        if status.pending.is_empty() {
            success("Everybody is already marked present.");
        }
    }

    Ok(())
}
