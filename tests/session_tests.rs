mod common;

use chrono::{Duration, Local};
use common::{FlakyStore, attendance_book, d, roster_book};
use squadlog::core::cache::TtlCache;
use squadlog::core::gate::{PasswordGate, SessionGate, ensure_authenticated};
use squadlog::core::session::{Session, SessionSettings, SummaryQuery};
use squadlog::errors::AppError;
use squadlog::models::player::{Category, CategoryFilter};
use squadlog::models::record::AttendanceRecord;
use squadlog::sheets::{MemoryWorkbook, SheetStore};

fn row(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn book() -> MemoryWorkbook {
    let log = attendance_book(&[
        &["2024-05-01", "A", "SÍ", "NO", ""],
        &["2024-05-01", "B", "NO", "NO", ""],
    ]);
    roster_book(log, &["A", "B", "C"])
}

#[test]
fn ttl_cache_expires_entries() {
    let mut cache: TtlCache<u8, &str> = TtlCache::new(Duration::seconds(120));
    let t0 = Local::now();

    cache.insert_at(1, "cached", t0);
    assert_eq!(cache.get_at(&1, t0 + Duration::seconds(119)), Some("cached"));
    assert_eq!(cache.get_at(&1, t0 + Duration::seconds(120)), None);

    cache.invalidate(&1);
    assert!(cache.is_empty());
}

#[test]
fn huge_ttl_never_overflows() {
    let mut cache: TtlCache<u8, u8> = TtlCache::with_secs(u64::MAX);
    cache.insert(1, 7);
    assert_eq!(cache.get(&1), Some(7));
}

#[test]
fn previous_attendance_is_cached_until_submit() {
    let mut session = Session::new(book(), SessionSettings::default());
    let date = d(2024, 5, 1);

    let first = session.previous_attendance(date).unwrap();
    assert_eq!(first.present.len(), 1);

    // a change made behind the session's back is not seen yet
    session
        .store_mut()
        .append_rows("Asistencias", &[row(&["2024-05-01", "B", "SÍ", "NO", ""])])
        .unwrap();
    assert_eq!(session.previous_attendance(date).unwrap().present.len(), 1);

    let report = session
        .submit(&[AttendanceRecord::new(date, "C", true, false, "")])
        .unwrap();
    assert_eq!(report.inserted, 1);

    let after = session.previous_attendance(date).unwrap();
    assert_eq!(
        after.present.into_iter().collect::<Vec<_>>(),
        vec!["A", "B", "C"]
    );
}

#[test]
fn previous_attendance_is_limited_to_roster() {
    let log = attendance_book(&[
        &["2024-05-01", "A", "SÍ", "NO", ""],
        &["2024-05-01", "Ghost", "SÍ", "NO", ""],
    ]);
    let mut session = Session::new(roster_book(log, &["A", "B"]), SessionSettings::default());

    let status = session.day_status(d(2024, 5, 1), CategoryFilter::Todas).unwrap();
    assert_eq!(status.previous.present.into_iter().collect::<Vec<_>>(), vec!["A"]);
    assert_eq!(status.pending, vec!["B"]);
}

#[test]
fn add_player_refreshes_roster() {
    let mut session = Session::new(book(), SessionSettings::default());
    assert_eq!(session.roster_names(CategoryFilter::Todas).unwrap().len(), 3);

    assert!(session.add_player("Dani", &[Category::Primera]).unwrap());
    assert_eq!(session.roster_names(CategoryFilter::Todas).unwrap().len(), 4);
}

#[test]
fn summary_is_reused_until_refresh_or_scope_change() {
    let mut session = Session::new(book(), SessionSettings::default());
    let query = SummaryQuery::default();

    let first = session.summary(&query, false).unwrap();
    assert_eq!(first.ranking.len(), 1);

    session
        .store_mut()
        .append_rows("Asistencias", &[row(&["2024-05-08", "B", "SÍ", "NO", ""])])
        .unwrap();

    assert_eq!(session.summary(&query, false).unwrap(), first);

    let refreshed = session.summary(&query, true).unwrap();
    assert_eq!(refreshed.ranking.len(), 2);

    let may_only = SummaryQuery {
        date_from: Some(d(2024, 5, 1)),
        date_to: Some(d(2024, 5, 1)),
        ..SummaryQuery::default()
    };
    let scoped = session.summary(&may_only, false).unwrap();
    assert_eq!(scoped.risk.trainings_in_range, 1);
}

#[test]
fn failed_refresh_keeps_stale_summary() {
    let mut session = Session::new(FlakyStore::new(book()), SessionSettings::default());
    let query = SummaryQuery::default();
    let good = session.summary(&query, false).unwrap();

    session.store_mut().fail_reads = true;
    let err = session.summary(&query, true).unwrap_err();
    assert!(matches!(err, AppError::Io(_)));
    assert_eq!(session.cached_summary(), Some(&good));

    session.clear_summary();
    assert!(session.cached_summary().is_none());
}

#[test]
fn publish_writes_summary_sheet() {
    let mut session = Session::new(book(), SessionSettings::default());
    session.publish_summary(&SummaryQuery::default(), false).unwrap();

    let store = session.into_store();
    let rows = store.read_all_rows("Resumen").unwrap();
    assert_eq!(rows[0][0], "Mes");
}

#[test]
fn password_gate() {
    let open = PasswordGate::new(None, None);
    assert!(open.is_authenticated());

    let locked = PasswordGate::new(Some("s3cret".into()), None);
    assert!(!locked.is_authenticated());
    assert!(matches!(ensure_authenticated(&locked), Err(AppError::AccessDenied)));

    let wrong = PasswordGate::new(Some("s3cret".into()), Some("guess".into()));
    assert!(!wrong.is_authenticated());

    let right = PasswordGate::new(Some("s3cret".into()), Some("s3cret".into()));
    assert!(ensure_authenticated(&right).is_ok());
}

#[test]
fn failed_append_still_drops_cached_day() {
    let log = attendance_book(&[&["2024-05-01", "A", "NO", "NO", ""]]);
    let store = FlakyStore::new(roster_book(log, &["A", "B"]));
    let mut session = Session::new(store, SessionSettings::default());
    let date = d(2024, 5, 1);

    assert!(session.previous_attendance(date).unwrap().present.is_empty());

    session.store_mut().fail_append = true;
    let records = [
        AttendanceRecord::new(date, "A", true, false, ""),
        AttendanceRecord::new(date, "B", true, false, ""),
    ];
    assert!(session.submit(&records).is_err());

    // A's row was rewritten by the update batch before the append failed
    let rows = session.store().inner.read_all_rows("Asistencias").unwrap();
    assert_eq!(rows[1], row(&["2024-05-01", "A", "SÍ", "NO", ""]));

    let previous = session.previous_attendance(date).unwrap();
    assert_eq!(previous.present.into_iter().collect::<Vec<_>>(), vec!["A"]);
}

#[test]
fn expired_entries_are_swept_on_insert() {
    let mut cache: TtlCache<u32, u32> = TtlCache::new(Duration::seconds(60));
    let t0 = Local::now();

    cache.insert_at(1, 10, t0);
    cache.insert_at(2, 20, t0 + Duration::seconds(30));
    assert_eq!(cache.len(), 2);

    cache.insert_at(3, 30, t0 + Duration::seconds(61));
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get_at(&1, t0 + Duration::seconds(61)), None);
    assert_eq!(cache.get_at(&2, t0 + Duration::seconds(61)), Some(20));
}
