use crate::core::normalize::ColumnMap;
use crate::errors::AppResult;
use crate::models::record::{COL_ATTENDED, COL_DATE, COL_PLAYER, is_yes};
use crate::sheets::SheetStore;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Header check outcome of a read path that must not fail the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SchemaCheck {
    Ok,
    Missing {
        missing: Vec<String>,
        detected_headers: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviousAttendance {
    pub date: NaiveDate,
    pub present: BTreeSet<String>,
    pub schema: SchemaCheck,
}

impl PreviousAttendance {
    pub fn is_schema_ok(&self) -> bool {
        self.schema == SchemaCheck::Ok
    }
}

/// Players already marked present on `date`.
///
/// Dates are compared as `YYYY-MM-DD` strings; when a player has several
/// rows for the date, the last one in storage order decides. Missing
/// columns yield an empty set plus a `SchemaCheck::Missing` signal.
pub fn previous_attendance<S: SheetStore + ?Sized>(
    store: &S,
    sheet: &str,
    date: NaiveDate,
) -> AppResult<PreviousAttendance> {
    let rows = store.read_all_rows(sheet)?;

    let mut out = PreviousAttendance {
        date,
        present: BTreeSet::new(),
        schema: SchemaCheck::Ok,
    };

    let Some((header, data)) = rows.split_first() else {
        return Ok(out);
    };

    let required = [COL_DATE, COL_PLAYER, COL_ATTENDED];
    let columns = match ColumnMap::resolve(header, &required) {
        Ok(c) => c,
        Err(missing) => {
            out.schema = SchemaCheck::Missing {
                missing,
                detected_headers: header.clone(),
            };
            return Ok(out);
        }
    };

    let target = date.format("%Y-%m-%d").to_string();
    let width = columns.max_index(&required);
    let mut last_seen: HashMap<&str, bool> = HashMap::new();

    for row in data {
        if row.len() <= width {
            continue;
        }
        let player = columns.get(row, COL_PLAYER);
        if player.is_empty() || columns.get(row, COL_DATE) != target {
            continue;
        }
        last_seen.insert(player, is_yes(columns.get(row, COL_ATTENDED)));
    }

    out.present = last_seen
        .into_iter()
        .filter(|(_, present)| *present)
        .map(|(player, _)| player.to_string())
        .collect();

    Ok(out)
}

/// Roster players not yet marked present, sorted.
pub fn pending_players(roster: &[String], previous: &PreviousAttendance) -> Vec<String> {
    let pending: BTreeSet<&String> = roster
        .iter()
        .filter(|name| !previous.present.contains(*name))
        .collect();
    pending.into_iter().cloned().collect()
}
