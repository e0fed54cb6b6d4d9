use crate::cli::commands::{open_session, require_access};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::normalize::normalize;
use crate::errors::{AppError, AppResult};
use crate::models::player::CategoryFilter;
use crate::models::record::AttendanceRecord;
use crate::ui::messages::{info, success};
use crate::utils::date::parse_date_arg;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// Attendance marks given on the command line, by player name as typed.
#[derive(Debug, Default, Clone)]
pub struct Marks {
    pub present: Vec<String>,
    pub late: Vec<String>,
    pub comments: Vec<String>,
}

/// Map a typed name to its roster spelling, ignoring case and accents.
pub fn resolve_name<'a>(name: &str, roster: &'a [String]) -> AppResult<&'a str> {
    let wanted = normalize(name);
    roster
        .iter()
        .find(|r| normalize(r) == wanted)
        .map(String::as_str)
        .ok_or_else(|| AppError::UnknownPlayer(name.trim().to_string()))
}

fn parse_comment(raw: &str) -> AppResult<(&str, &str)> {
    match raw.split_once('=') {
        Some((name, text)) if !name.trim().is_empty() => Ok((name, text)),
        _ => Err(AppError::InvalidComment(raw.to_string())),
    }
}

/// Records for every pending player plus every player named in `marks`.
///
/// Names are checked against the full roster before anything is built, so
/// one unknown name rejects the whole submission. A named player who is
/// already present and not re-marked keeps the present flag.
pub fn build_records(
    date: NaiveDate,
    roster: &[String],
    pending: &[String],
    already_present: &BTreeSet<String>,
    marks: &Marks,
) -> AppResult<Vec<AttendanceRecord>> {
    let mut present = BTreeSet::new();
    let mut late = BTreeSet::new();
    let mut comments: HashMap<&str, &str> = HashMap::new();
    let mut named: Vec<&str> = Vec::new();

    for raw in &marks.present {
        let name = resolve_name(raw, roster)?;
        present.insert(name);
        named.push(name);
    }
    for raw in &marks.late {
        let name = resolve_name(raw, roster)?;
        late.insert(name);
        named.push(name);
    }
    for raw in &marks.comments {
        let (who, text) = parse_comment(raw)?;
        let name = resolve_name(who, roster)?;
        comments.insert(name, text);
        named.push(name);
    }

    let mut order: Vec<&str> = pending.iter().map(String::as_str).collect();
    for name in named {
        if !order.contains(&name) {
            order.push(name);
        }
    }

    Ok(order
        .into_iter()
        .map(|name| {
            let is_pending = pending.iter().any(|p| p == name);
            let attended =
                present.contains(name) || (!is_pending && already_present.contains(name));
            AttendanceRecord::new(
                date,
                name,
                attended,
                late.contains(name),
                comments.get(name).copied().unwrap_or_default(),
            )
        })
        .collect())
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Submit {
        date,
        category,
        present,
        late,
        comment,
    } = &cli.command
    {
        require_access(cli, cfg)?;
        let date = parse_date_arg(date)?;

        let mut session = open_session(cfg)?;
        let full_roster = session.roster_names(CategoryFilter::Todas)?;
        let status = session.day_status(date, *category)?;

        let marks = Marks {
            present: present.clone(),
            late: late.clone(),
            comments: comment.clone(),
        };
        let records = build_records(
            date,
            &full_roster,
            &status.pending,
            &status.previous.present,
            &marks,
        )?;

        if records.is_empty() {
            info("Nothing to submit: no pending players and no names given.");
            return Ok(());
        }

        let report = session.submit(&records)?;
        success(format!(
            "Attendance saved for {}: {} updated, {} inserted.",
            date.format("%Y-%m-%d"),
            report.updated,
            report.inserted
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn pending_and_named_players_get_records() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let roster = names(&["Ana", "Bea", "Carla", "Sofía"]);
        let pending = names(&["Bea", "Carla", "Sofía"]);
        let already: BTreeSet<String> = ["Ana".to_string()].into();
        let marks = Marks {
            present: names(&["sofia", "Bea"]),
            late: names(&["Bea", "Carla"]),
            comments: names(&["Ana=lesionada"]),
        };

        let records = build_records(date, &roster, &pending, &already, &marks).unwrap();
        let by_name = |n: &str| records.iter().find(|r| r.player == n).unwrap();

        assert_eq!(records.len(), 4);
        assert!(by_name("Sofía").attended);
        assert!(by_name("Bea").attended && by_name("Bea").late);
        // late only sticks to present players
        assert!(!by_name("Carla").attended && !by_name("Carla").late);
        assert!(by_name("Ana").attended);
        assert_eq!(by_name("Ana").comment, "LESIONADA");
    }

    #[test]
    fn unknown_name_rejects_everything() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let roster = names(&["Ana"]);
        let marks = Marks {
            present: names(&["Ana", "Zoe"]),
            ..Marks::default()
        };
        let err = build_records(date, &roster, &roster, &BTreeSet::new(), &marks).unwrap_err();
        assert!(matches!(err, AppError::UnknownPlayer(name) if name == "Zoe"));
    }

    #[test]
    fn comment_needs_a_name() {
        assert!(parse_comment("=texto").is_err());
        assert_eq!(parse_comment("Ana=a=b").unwrap(), ("Ana", "a=b"));
    }
}
