//! Monthly attendance analytics computed from the raw attendance log.
//!
//! Nothing here is persisted: every call rebuilds the whole summary from the
//! rows it is given.

use crate::core::normalize::ColumnMap;
use crate::errors::{AppError, AppResult};
use crate::models::record::{COL_ATTENDED, COL_DATE, COL_LATE, COL_PLAYER, is_yes};
use crate::models::summary::{
    MonthlyLateness, MonthlyPresence, MonthlyTrainings, PlayerAttendance, RankingEntry,
    RiskReport, SummaryBundle,
};
use crate::sheets::SheetStore;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Attendance strictly below this percentage flags a player as at risk.
pub const DEFAULT_RISK_THRESHOLD: f64 = 50.0;

const REQUIRED: [&str; 4] = [COL_DATE, COL_PLAYER, COL_ATTENDED, COL_LATE];

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SummaryFilters {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub player_subset: Option<BTreeSet<String>>,
}

impl SummaryFilters {
    fn in_range(&self, d: NaiveDate) -> bool {
        self.date_from.is_none_or(|from| d >= from) && self.date_to.is_none_or(|to| d <= to)
    }

    fn in_subset(&self, player: &str) -> bool {
        self.player_subset
            .as_ref()
            .is_none_or(|subset| subset.contains(player))
    }
}

#[derive(Debug, Clone)]
struct Entry {
    date: NaiveDate,
    player: String,
    attended: bool,
    late: bool,
}

impl Entry {
    fn month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

/// Lenient date parsing for log cells. Returns `None` for anything that is
/// not a recognizable calendar date.
pub fn parse_log_date(cell: &str) -> Option<NaiveDate> {
    let s = cell.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    None
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Percentage of `part` over `whole`, one decimal; zero when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round1(part as f64 / whole as f64 * 100.0)
}

/// Exact comparison on counts; the rounded percentage is for display only.
fn below_threshold(a: &PlayerAttendance, risk_threshold: f64) -> bool {
    (a.presences as f64) * 100.0 < risk_threshold * a.trainings as f64
}

/// Parse data rows, dropping malformed ones, and resolve duplicate
/// (date, player) pairs so that the last row in storage order wins.
fn parse_entries(columns: &ColumnMap, data: &[Vec<String>]) -> Vec<Entry> {
    let mut entries: Vec<Entry> = Vec::new();
    let mut position: HashMap<(NaiveDate, String), usize> = HashMap::new();

    for row in data {
        let Some(date) = parse_log_date(columns.get(row, COL_DATE)) else {
            continue;
        };
        let player = columns.get(row, COL_PLAYER);
        if player.is_empty() {
            continue;
        }

        let attended = is_yes(columns.get(row, COL_ATTENDED));
        let entry = Entry {
            date,
            player: player.to_string(),
            attended,
            late: attended && is_yes(columns.get(row, COL_LATE)),
        };

        match position.get(&(date, entry.player.clone())) {
            Some(&idx) => entries[idx] = entry,
            None => {
                position.insert((date, entry.player.clone()), entries.len());
                entries.push(entry);
            }
        }
    }

    entries
}

fn distinct_dates(entries: &[&Entry]) -> usize {
    entries.iter().map(|e| e.date).collect::<BTreeSet<_>>().len()
}

/// Per-player attendance over `entries`. Players from `extra` that have no
/// rows are reported at 0%.
fn attendance_by_player(entries: &[&Entry], extra: Option<&BTreeSet<String>>) -> Vec<PlayerAttendance> {
    let trainings = distinct_dates(entries);

    let mut presences: BTreeMap<String, usize> = BTreeMap::new();
    for e in entries {
        let count = presences.entry(e.player.clone()).or_insert(0);
        if e.attended {
            *count += 1;
        }
    }
    if let Some(extra) = extra {
        for p in extra {
            presences.entry(p.clone()).or_insert(0);
        }
    }

    presences
        .into_iter()
        .map(|(player, n)| PlayerAttendance {
            player,
            presences: n,
            trainings,
            percentage: percentage(n, trainings),
        })
        .collect()
}

/// Build every summary table from the raw sheet rows (header included).
///
/// Fails with `InsufficientData` when there is no data row, or when no
/// usable record survives parsing and filtering.
pub fn aggregate(
    rows: &[Vec<String>],
    filters: &SummaryFilters,
    risk_threshold: f64,
) -> AppResult<SummaryBundle> {
    if rows.len() < 2 {
        return Err(AppError::InsufficientData);
    }

    let (header, data) = (&rows[0], &rows[1..]);
    let columns = ColumnMap::resolve(header, &REQUIRED).map_err(|missing| AppError::Schema {
        sheet: "attendance log".to_string(),
        missing,
    })?;

    let entries = parse_entries(&columns, data);

    // subset first: it scopes every table, full history included
    let scoped: Vec<&Entry> = entries
        .iter()
        .filter(|e| filters.in_subset(&e.player))
        .collect();

    let in_range: Vec<&Entry> = scoped
        .iter()
        .copied()
        .filter(|e| filters.in_range(e.date))
        .collect();

    if in_range.is_empty() {
        return Err(AppError::InsufficientData);
    }

    // --- trainings per month
    let mut dates_by_month: BTreeMap<String, BTreeSet<NaiveDate>> = BTreeMap::new();
    for e in &in_range {
        dates_by_month.entry(e.month()).or_default().insert(e.date);
    }

    let trainings_per_month: Vec<MonthlyTrainings> = dates_by_month
        .iter()
        .map(|(month, dates)| MonthlyTrainings {
            month: month.clone(),
            trainings: dates.len(),
        })
        .collect();

    // --- presences and lateness per (month, player)
    let mut presences: BTreeMap<(String, String), usize> = BTreeMap::new();
    let mut lateness: BTreeMap<(String, String), usize> = BTreeMap::new();
    let mut totals: HashMap<String, usize> = HashMap::new();

    for e in in_range.iter().filter(|e| e.attended) {
        let key = (e.month(), e.player.clone());
        *presences.entry(key.clone()).or_insert(0) += 1;
        if e.late {
            *lateness.entry(key).or_insert(0) += 1;
        }
        *totals.entry(e.player.clone()).or_insert(0) += 1;
    }

    let presences_per_month = presences
        .into_iter()
        .map(|((month, player), n)| {
            let trainings = dates_by_month.get(&month).map(BTreeSet::len).unwrap_or(0);
            MonthlyPresence {
                month,
                player,
                presences: n,
                percentage: percentage(n, trainings),
            }
        })
        .collect();

    let lateness_per_month = lateness
        .into_iter()
        .map(|((month, player), late)| MonthlyLateness {
            month,
            player,
            late,
        })
        .collect();

    let mut ranking: Vec<RankingEntry> = totals
        .into_iter()
        .map(|(player, presences)| RankingEntry { player, presences })
        .collect();
    ranking.sort_by(|a, b| b.presences.cmp(&a.presences).then_with(|| a.player.cmp(&b.player)));

    // --- risk: window for "at risk", full history for "perfect"
    let attendance = attendance_by_player(&in_range, filters.player_subset.as_ref());

    let mut at_risk: Vec<PlayerAttendance> = attendance
        .iter()
        .filter(|a| below_threshold(a, risk_threshold))
        .cloned()
        .collect();
    at_risk.sort_by(|a, b| {
        a.percentage
            .total_cmp(&b.percentage)
            .then_with(|| a.player.cmp(&b.player))
    });

    let perfect = attendance_by_player(&scoped, filters.player_subset.as_ref())
        .into_iter()
        .filter(|a| a.trainings > 0 && a.presences >= a.trainings)
        .map(|a| a.player)
        .collect();

    Ok(SummaryBundle {
        trainings_per_month,
        presences_per_month,
        lateness_per_month,
        ranking,
        risk: RiskReport {
            date_from: filters.date_from,
            date_to: filters.date_to,
            threshold: risk_threshold,
            trainings_in_range: distinct_dates(&in_range),
            attendance,
            at_risk,
            perfect,
        },
    })
}

/// Read the attendance sheet and aggregate it.
pub fn summarize<S: SheetStore + ?Sized>(
    store: &S,
    sheet: &str,
    filters: &SummaryFilters,
    risk_threshold: f64,
) -> AppResult<SummaryBundle> {
    let rows = store.read_all_rows(sheet)?;
    aggregate(&rows, filters, risk_threshold).map_err(|e| match e {
        AppError::Schema { missing, .. } => AppError::Schema {
            sheet: sheet.to_string(),
            missing,
        },
        other => other,
    })
}
