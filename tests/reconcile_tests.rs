mod common;

use common::{FlakyStore, attendance_book, d};
use squadlog::core::reconcile::{UpsertReport, upsert};
use squadlog::errors::AppError;
use squadlog::models::record::AttendanceRecord;
use squadlog::sheets::{MemoryWorkbook, SheetStore};

fn rec(player: &str, attended: bool) -> AttendanceRecord {
    AttendanceRecord::new(d(2024, 5, 1), player, attended, false, "")
}

#[test]
fn existing_key_is_updated_new_key_is_appended() {
    let mut book = attendance_book(&[&["2024-05-01", "Ana", "NO", "NO", ""]]);

    let report = upsert(&mut book, "Asistencias", &[rec("Ana", true)]).unwrap();
    assert_eq!(report, UpsertReport { updated: 1, inserted: 0 });

    let report = upsert(&mut book, "Asistencias", &[rec("Bea", true)]).unwrap();
    assert_eq!(report, UpsertReport { updated: 0, inserted: 1 });

    let rows = book.read_all_rows("Asistencias").unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1], vec!["2024-05-01", "Ana", "SÍ", "NO", ""]);
    assert_eq!(rows[2], vec!["2024-05-01", "Bea", "SÍ", "NO", ""]);
}

#[test]
fn second_identical_submission_changes_nothing() {
    let mut book = attendance_book(&[]);
    let records = vec![rec("Ana", true), rec("Bea", false)];

    let first = upsert(&mut book, "Asistencias", &records).unwrap();
    assert_eq!(first, UpsertReport { updated: 0, inserted: 2 });
    let snapshot = book.read_all_rows("Asistencias").unwrap();

    let second = upsert(&mut book, "Asistencias", &records).unwrap();
    assert_eq!(second, UpsertReport { updated: 2, inserted: 0 });
    assert_eq!(book.read_all_rows("Asistencias").unwrap(), snapshot);
}

#[test]
fn last_submission_of_a_key_wins() {
    let mut book = attendance_book(&[]);
    let records = vec![rec("Ana", false), rec("Bea", true), rec("Ana", true)];

    let report = upsert(&mut book, "Asistencias", &records).unwrap();
    assert_eq!(report.inserted, 2);

    let rows = book.read_all_rows("Asistencias").unwrap();
    assert_eq!(rows[1][1], "Ana");
    assert_eq!(rows[1][2], "SÍ");
    assert_eq!(rows[2][1], "Bea");
}

#[test]
fn unrelated_rows_keep_their_position() {
    let mut book = attendance_book(&[
        &["2024-04-30", "Ana", "SÍ", "NO", ""],
        &["2024-05-01", "Bea", "NO", "NO", ""],
        &["2024-05-02", "Carla", "SÍ", "SÍ", "X"],
    ]);

    upsert(&mut book, "Asistencias", &[rec("Bea", true)]).unwrap();

    let rows = book.read_all_rows("Asistencias").unwrap();
    assert_eq!(rows[1][0], "2024-04-30");
    assert_eq!(rows[2], vec!["2024-05-01", "Bea", "SÍ", "NO", ""]);
    assert_eq!(rows[3], vec!["2024-05-02", "Carla", "SÍ", "SÍ", "X"]);
}

#[test]
fn only_first_duplicate_is_rewritten() {
    let mut book = attendance_book(&[
        &["2024-05-01", "Ana", "NO", "NO", ""],
        &["2024-05-01", "Ana", "NO", "NO", "DUP"],
    ]);

    let report = upsert(&mut book, "Asistencias", &[rec("Ana", true)]).unwrap();
    assert_eq!(report, UpsertReport { updated: 1, inserted: 0 });

    let rows = book.read_all_rows("Asistencias").unwrap();
    assert_eq!(rows[1][2], "SÍ");
    assert_eq!(rows[2][2], "NO");
    assert_eq!(rows[2][4], "DUP");
}

#[test]
fn columns_are_matched_by_normalized_header() {
    let mut book = MemoryWorkbook::new().with_sheet(
        "Asistencias",
        &[
            &["comentario", "JUGADORA", "fecha", "asistio", "llego tarde"],
            &["", "Ana", "2024-05-01", "NO", "NO"],
        ],
    );

    let records = [AttendanceRecord::new(d(2024, 5, 1), " Ana ", true, true, " llegó con permiso ")];
    let report = upsert(&mut book, "Asistencias", &records).unwrap();
    assert_eq!(report.updated, 1);

    let rows = book.read_all_rows("Asistencias").unwrap();
    assert_eq!(rows[1], vec!["LLEGÓ CON PERMISO", "Ana", "2024-05-01", "SÍ", "SÍ"]);
}

#[test]
fn late_is_not_stored_for_absent_players() {
    let mut book = attendance_book(&[]);
    let records = [AttendanceRecord::new(d(2024, 5, 1), "Ana", false, true, "")];
    upsert(&mut book, "Asistencias", &records).unwrap();

    let rows = book.read_all_rows("Asistencias").unwrap();
    assert_eq!(rows[1][3], "NO");
}

#[test]
fn missing_key_column_is_a_schema_error_without_writes() {
    let inner = MemoryWorkbook::new().with_sheet("Asistencias", &[&["Fecha", "Nombre"]]);
    let mut store = FlakyStore::new(inner);

    let err = upsert(&mut store, "Asistencias", &[rec("Ana", true)]).unwrap_err();
    match err {
        AppError::Schema { missing, .. } => assert_eq!(missing, vec!["Jugadora".to_string()]),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(store.batch_calls + store.append_calls, 0);
}

#[test]
fn empty_sheet_is_a_schema_error() {
    let mut book = MemoryWorkbook::new().with_sheet("Asistencias", &[]);
    let err = upsert(&mut book, "Asistencias", &[rec("Ana", true)]).unwrap_err();
    assert!(matches!(err, AppError::Schema { .. }));
}

#[test]
fn empty_submission_performs_no_writes() {
    let mut store = FlakyStore::new(attendance_book(&[]));
    let report = upsert(&mut store, "Asistencias", &[]).unwrap();
    assert_eq!(report, UpsertReport::default());
    assert_eq!(store.batch_calls + store.append_calls, 0);
}

#[test]
fn failed_update_batch_prevents_appends() {
    let mut store = FlakyStore::new(attendance_book(&[&["2024-05-01", "Ana", "NO", "NO", ""]]));
    store.fail_batch = true;

    let result = upsert(&mut store, "Asistencias", &[rec("Ana", true), rec("Bea", true)]);
    assert!(matches!(result, Err(AppError::Io(_))));
    assert_eq!(store.batch_calls, 1);
    assert_eq!(store.append_calls, 0);
    assert_eq!(store.inner.read_all_rows("Asistencias").unwrap().len(), 2);
}

#[test]
fn writes_are_batched() {
    let mut store = FlakyStore::new(attendance_book(&[
        &["2024-05-01", "Ana", "NO", "NO", ""],
        &["2024-05-01", "Bea", "NO", "NO", ""],
    ]));
    let records = vec![rec("Ana", true), rec("Bea", true), rec("Carla", true), rec("Dani", true)];

    let report = upsert(&mut store, "Asistencias", &records).unwrap();
    assert_eq!(report, UpsertReport { updated: 2, inserted: 2 });
    assert_eq!(store.batch_calls, 1);
    assert_eq!(store.append_calls, 1);
}
