mod common;

use common::{attendance_book, d};
use squadlog::core::previous::{SchemaCheck, pending_players, previous_attendance};
use squadlog::sheets::MemoryWorkbook;

#[test]
fn present_and_pending_for_a_date() {
    let book = attendance_book(&[
        &["2024-05-01", "A", "SÍ", "NO", ""],
        &["2024-05-01", "B", "NO", "NO", ""],
        &["2024-05-02", "C", "SÍ", "NO", ""],
    ]);

    let prev = previous_attendance(&book, "Asistencias", d(2024, 5, 1)).unwrap();
    assert!(prev.is_schema_ok());
    assert_eq!(prev.present.iter().collect::<Vec<_>>(), vec!["A"]);

    let roster = vec!["A".to_string(), "B".to_string(), "C".to_string()];
    assert_eq!(pending_players(&roster, &prev), vec!["B", "C"]);
}

#[test]
fn last_row_of_a_player_decides() {
    let book = attendance_book(&[
        &["2024-05-01", "A", "SÍ", "NO", ""],
        &["2024-05-01", "A", "NO", "NO", ""],
        &["2024-05-01", "B", "no", "NO", ""],
        &["2024-05-01", "B", "sí", "NO", ""],
    ]);

    let prev = previous_attendance(&book, "Asistencias", d(2024, 5, 1)).unwrap();
    assert_eq!(prev.present.iter().collect::<Vec<_>>(), vec!["B"]);
}

#[test]
fn dates_are_compared_as_iso_strings() {
    let book = attendance_book(&[&["01/05/2024", "A", "SÍ", "NO", ""]]);
    let prev = previous_attendance(&book, "Asistencias", d(2024, 5, 1)).unwrap();
    assert!(prev.present.is_empty());
}

#[test]
fn missing_columns_signal_instead_of_failing() {
    let book = MemoryWorkbook::new().with_sheet(
        "Asistencias",
        &[&["Fecha", "Nombre"], &["2024-05-01", "A"]],
    );

    let prev = previous_attendance(&book, "Asistencias", d(2024, 5, 1)).unwrap();
    assert!(prev.present.is_empty());
    match prev.schema {
        SchemaCheck::Missing {
            missing,
            detected_headers,
        } => {
            assert_eq!(missing, vec!["Jugadora".to_string(), "Asistió".to_string()]);
            assert_eq!(detected_headers, vec!["Fecha".to_string(), "Nombre".to_string()]);
        }
        SchemaCheck::Ok => panic!("expected a schema signal"),
    }
}

#[test]
fn missing_worksheet_is_still_an_error() {
    let book = MemoryWorkbook::new();
    assert!(previous_attendance(&book, "Asistencias", d(2024, 5, 1)).is_err());
}
