//! Explicit per-session state: the store plus the short-lived caches that
//! sit in front of it.

use crate::config::Config;
use crate::core::aggregate::{DEFAULT_RISK_THRESHOLD, SummaryFilters, summarize};
use crate::core::cache::TtlCache;
use crate::core::previous::{PreviousAttendance, pending_players, previous_attendance};
use crate::core::publish::publish_summary;
use crate::core::reconcile::{UpsertReport, upsert};
use crate::core::roster::{add_player, filter_players, load_roster_with_category};
use crate::errors::AppResult;
use crate::models::player::{Category, CategoryFilter, RosterEntry};
use crate::models::record::AttendanceRecord;
use crate::models::summary::SummaryBundle;
use crate::sheets::SheetStore;
use crate::ui::messages::warning;
use chrono::NaiveDate;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetNames {
    pub attendance: String,
    pub roster: String,
    pub summary: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            attendance: "Asistencias".to_string(),
            roster: "Jugadoras".to_string(),
            summary: "Resumen".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub sheets: SheetNames,
    pub roster_cache_secs: u64,
    pub previous_cache_secs: u64,
    pub risk_threshold: f64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            sheets: SheetNames::default(),
            roster_cache_secs: 300,
            previous_cache_secs: 120,
            risk_threshold: DEFAULT_RISK_THRESHOLD,
        }
    }
}

impl From<&Config> for SessionSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            sheets: SheetNames {
                attendance: cfg.attendance_sheet.clone(),
                roster: cfg.roster_sheet.clone(),
                summary: cfg.summary_sheet.clone(),
            },
            roster_cache_secs: cfg.roster_cache_secs,
            previous_cache_secs: cfg.previous_cache_secs,
            risk_threshold: cfg.risk_threshold,
        }
    }
}

/// Scope of a summary request; a change of scope invalidates the cached
/// bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SummaryQuery {
    pub category: CategoryFilter,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Who is already in and who is still missing for a date.
#[derive(Debug, Clone)]
pub struct DayStatus {
    pub previous: PreviousAttendance,
    pub roster: Vec<String>,
    pub pending: Vec<String>,
}

pub struct Session<S: SheetStore> {
    store: S,
    settings: SessionSettings,
    roster_cache: TtlCache<(), Vec<RosterEntry>>,
    previous_cache: TtlCache<NaiveDate, PreviousAttendance>,
    summary: Option<(SummaryQuery, SummaryBundle)>,
}

impl<S: SheetStore> Session<S> {
    pub fn new(store: S, settings: SessionSettings) -> Self {
        Self {
            roster_cache: TtlCache::with_secs(settings.roster_cache_secs),
            previous_cache: TtlCache::with_secs(settings.previous_cache_secs),
            store,
            settings,
            summary: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn audit(&mut self, operation: &str, target: &str, message: &str) {
        if let Err(e) = self.store.audit(operation, target, message) {
            warning(format!("Failed to write internal log: {e}"));
        }
    }

    // ------------------------------------------------------------------
    // Roster
    // ------------------------------------------------------------------

    pub fn roster(&mut self) -> AppResult<Vec<RosterEntry>> {
        if let Some(hit) = self.roster_cache.get(&()) {
            return Ok(hit);
        }
        let entries = load_roster_with_category(&self.store, &self.settings.sheets.roster)?;
        self.roster_cache.insert((), entries.clone());
        Ok(entries)
    }

    pub fn roster_names(&mut self, filter: CategoryFilter) -> AppResult<Vec<String>> {
        Ok(filter_players(&self.roster()?, filter))
    }

    pub fn add_player(&mut self, name: &str, categories: &[Category]) -> AppResult<bool> {
        let sheet = self.settings.sheets.roster.clone();
        let added = add_player(&mut self.store, &sheet, name, categories)?;
        if added {
            self.roster_cache.clear();
            self.previous_cache.clear();
            self.audit("roster_add", name.trim(), "Player added to roster");
        }
        Ok(added)
    }

    // ------------------------------------------------------------------
    // Daily attendance
    // ------------------------------------------------------------------

    /// Present players for `date`, limited to the current roster.
    pub fn previous_attendance(&mut self, date: NaiveDate) -> AppResult<PreviousAttendance> {
        if let Some(hit) = self.previous_cache.get(&date) {
            return Ok(hit);
        }
        let mut previous =
            previous_attendance(&self.store, &self.settings.sheets.attendance, date)?;
        let roster: BTreeSet<String> = self.roster_names(CategoryFilter::Todas)?.into_iter().collect();
        previous.present.retain(|p| roster.contains(p));

        // a broken header is not worth remembering: the fix must show up at once
        if previous.is_schema_ok() {
            self.previous_cache.insert(date, previous.clone());
        }
        Ok(previous)
    }

    pub fn day_status(&mut self, date: NaiveDate, filter: CategoryFilter) -> AppResult<DayStatus> {
        let roster = self.roster_names(filter)?;
        let previous = self.previous_attendance(date)?;
        let pending = pending_players(&roster, &previous);
        Ok(DayStatus {
            previous,
            roster,
            pending,
        })
    }

    /// Upsert the records, then drop cached reads for the affected dates.
    pub fn submit(&mut self, records: &[AttendanceRecord]) -> AppResult<UpsertReport> {
        let sheet = self.settings.sheets.attendance.clone();
        let result = upsert(&mut self.store, &sheet, records);

        // the update batch may have landed even when the append failed
        let dates: BTreeSet<NaiveDate> = records.iter().map(|r| r.date).collect();
        for d in &dates {
            self.previous_cache.invalidate(d);
        }
        let report = result?;

        if report.updated + report.inserted > 0 {
            let target = dates
                .iter()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .collect::<Vec<_>>()
                .join(",");
            self.audit(
                "submit",
                &target,
                &format!("{} updated, {} inserted", report.updated, report.inserted),
            );
        }

        Ok(report)
    }

    // ------------------------------------------------------------------
    // Summary
    // ------------------------------------------------------------------

    fn filters_for(&mut self, query: &SummaryQuery) -> AppResult<SummaryFilters> {
        let player_subset = match query.category.category() {
            None => None,
            Some(_) => Some(self.roster_names(query.category)?.into_iter().collect()),
        };
        Ok(SummaryFilters {
            date_from: query.date_from,
            date_to: query.date_to,
            player_subset,
        })
    }

    /// Summary for `query`, reusing the cached bundle when the scope is
    /// unchanged and no refresh is requested. A failed computation leaves
    /// the cached bundle in place.
    pub fn summary(&mut self, query: &SummaryQuery, refresh: bool) -> AppResult<SummaryBundle> {
        if !refresh
            && let Some((cached_query, bundle)) = &self.summary
            && cached_query == query
        {
            return Ok(bundle.clone());
        }

        let filters = self.filters_for(query)?;
        let bundle = summarize(
            &self.store,
            &self.settings.sheets.attendance,
            &filters,
            self.settings.risk_threshold,
        )?;

        self.summary = Some((query.clone(), bundle.clone()));
        Ok(bundle)
    }

    pub fn cached_summary(&self) -> Option<&SummaryBundle> {
        self.summary.as_ref().map(|(_, bundle)| bundle)
    }

    pub fn clear_summary(&mut self) {
        self.summary = None;
    }

    /// Compute (or reuse) the summary and write it to the summary sheet.
    pub fn publish_summary(&mut self, query: &SummaryQuery, refresh: bool) -> AppResult<SummaryBundle> {
        let bundle = self.summary(query, refresh)?;
        let sheet = self.settings.sheets.summary.clone();
        publish_summary(&mut self.store, &sheet, &bundle)?;
        self.audit("publish", &sheet, "Summary tables published");
        Ok(bundle)
    }
}
