use crate::cli::commands::{open_session, require_access, summary_query};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::summary::{SummaryBundle, format_pct};
use crate::ui::messages::{header, info, success};
use crate::utils::colors::{RESET, color_for_percentage};
use crate::utils::table::TextTable;

fn print_tables(bundle: &SummaryBundle) {
    for table in bundle.tables() {
        header(&table.title);
        if table.rows.is_empty() {
            println!("  (no rows)");
            continue;
        }
        print!("{}", TextTable::from_rows(&table.headers, &table.rows).render());
    }
}

fn print_risk(bundle: &SummaryBundle) {
    let risk = &bundle.risk;
    header(format!(
        "Riesgo (< {}% sobre {} entrenamientos)",
        format_pct(risk.threshold),
        risk.trainings_in_range
    ));

    if risk.at_risk.is_empty() {
        success("No players below the threshold.");
    } else {
        for a in &risk.at_risk {
            println!(
                "  {}{:>5}%{}  {} ({}/{})",
                color_for_percentage(a.percentage, risk.threshold),
                format_pct(a.percentage),
                RESET,
                a.player,
                a.presences,
                a.trainings
            );
        }
    }

    if risk.perfect.is_empty() {
        info("No player with perfect attendance.");
    } else {
        println!(
            "  {}Asistencia perfecta:{} {}",
            color_for_percentage(100.0, risk.threshold),
            RESET,
            risk.perfect.join(", ")
        );
    }
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Summary {
        category,
        range,
        publish,
    } = &cli.command
    {
        if *publish {
            require_access(cli, cfg)?;
        }

        let query = summary_query(*category, range.as_deref())?;
        let mut session = open_session(cfg)?;

        let bundle = if *publish {
            let bundle = session.publish_summary(&query, false)?;
            success(format!("Summary published to worksheet '{}'.", cfg.summary_sheet));
            bundle
        } else {
            session.summary(&query, false)?
        };

        print_tables(&bundle);
        print_risk(&bundle);
    }

    Ok(())
}
