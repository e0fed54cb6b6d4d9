mod common;

use common::{attendance_book, d};
use squadlog::core::aggregate::{SummaryFilters, aggregate, parse_log_date, percentage, summarize};
use squadlog::errors::AppError;
use squadlog::sheets::{MemoryWorkbook, SheetStore};
use std::collections::BTreeSet;

fn rows_of(book: &MemoryWorkbook) -> Vec<Vec<String>> {
    book.read_all_rows("Asistencias").unwrap()
}

fn may_log() -> MemoryWorkbook {
    attendance_book(&[
        &["2024-05-01", "X", "SÍ", "SÍ", ""],
        &["2024-05-01", "Y", "SÍ", "NO", ""],
        &["2024-05-08", "X", "NO", "SÍ", ""],
        &["2024-05-08", "Y", "sí", "NO", ""],
        &["2024-06-05", "X", "SÍ", "NO", ""],
    ])
}

#[test]
fn header_only_log_is_insufficient() {
    let book = attendance_book(&[]);
    let err = aggregate(&rows_of(&book), &SummaryFilters::default(), 50.0).unwrap_err();
    assert!(matches!(err, AppError::InsufficientData));
    assert!(err.is_non_fatal());
}

#[test]
fn missing_required_column_is_schema_error() {
    let book = MemoryWorkbook::new().with_sheet(
        "Asistencias",
        &[&["Fecha", "Jugadora", "Asistió"], &["2024-05-01", "X", "SÍ"]],
    );
    let err = summarize(&book, "Asistencias", &SummaryFilters::default(), 50.0).unwrap_err();
    match err {
        AppError::Schema { sheet, missing } => {
            assert_eq!(sheet, "Asistencias");
            assert_eq!(missing, vec!["Llegó tarde".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn monthly_percentage_over_trainings_of_the_month() {
    let bundle = aggregate(&rows_of(&may_log()), &SummaryFilters::default(), 50.0).unwrap();

    assert_eq!(bundle.trainings_per_month.len(), 2);
    assert_eq!(bundle.trainings_per_month[0].month, "2024-05");
    assert_eq!(bundle.trainings_per_month[0].trainings, 2);
    assert_eq!(bundle.trainings_per_month[1].trainings, 1);

    let x_may = bundle
        .presences_per_month
        .iter()
        .find(|p| p.month == "2024-05" && p.player == "X")
        .unwrap();
    assert_eq!(x_may.presences, 1);
    assert_eq!(x_may.percentage, 50.0);
}

#[test]
fn lateness_only_counts_when_present() {
    let bundle = aggregate(&rows_of(&may_log()), &SummaryFilters::default(), 50.0).unwrap();
    assert_eq!(bundle.lateness_per_month.len(), 1);
    assert_eq!(bundle.lateness_per_month[0].player, "X");
    assert_eq!(bundle.lateness_per_month[0].late, 1);
}

#[test]
fn ranking_sums_to_present_records_and_breaks_ties_by_name() {
    let book = attendance_book(&[
        &["2024-05-01", "Zoe", "SÍ", "NO", ""],
        &["2024-05-01", "Ana", "SÍ", "NO", ""],
        &["2024-05-08", "Bea", "SÍ", "NO", ""],
        &["2024-05-08", "Bea", "NO", "NO", ""],
        &["2024-05-08", "Zoe", "SÍ", "NO", ""],
    ]);
    let bundle = aggregate(&rows_of(&book), &SummaryFilters::default(), 50.0).unwrap();

    let names: Vec<&str> = bundle.ranking.iter().map(|r| r.player.as_str()).collect();
    assert_eq!(names, vec!["Zoe", "Ana"]);
    let total: usize = bundle.ranking.iter().map(|r| r.presences).sum();
    assert_eq!(total, 3);
}

#[test]
fn exactly_threshold_is_not_at_risk() {
    let filters = SummaryFilters {
        date_from: Some(d(2024, 5, 1)),
        date_to: Some(d(2024, 5, 31)),
        player_subset: None,
    };
    let bundle = aggregate(&rows_of(&may_log()), &filters, 50.0).unwrap();

    assert_eq!(bundle.risk.trainings_in_range, 2);
    assert!(bundle.risk.at_risk.iter().all(|a| a.player != "X"));
    let x = bundle.risk.attendance.iter().find(|a| a.player == "X").unwrap();
    assert_eq!(x.percentage, 50.0);
}

#[test]
fn perfect_uses_full_history() {
    let filters = SummaryFilters {
        date_from: Some(d(2024, 6, 1)),
        date_to: Some(d(2024, 6, 30)),
        player_subset: None,
    };
    let bundle = aggregate(&rows_of(&may_log()), &filters, 50.0).unwrap();

    // June alone would make X perfect, but May brings X to 2 of 3
    assert!(bundle.risk.perfect.is_empty());
    assert_eq!(bundle.trainings_per_month.len(), 1);

    let all = aggregate(&rows_of(&may_log()), &SummaryFilters::default(), 50.0).unwrap();
    assert!(all.risk.perfect.is_empty());
    let y_only = SummaryFilters {
        player_subset: Some(BTreeSet::from(["Y".to_string()])),
        ..SummaryFilters::default()
    };
    let bundle = aggregate(&rows_of(&may_log()), &y_only, 50.0).unwrap();
    assert_eq!(bundle.risk.perfect, vec!["Y".to_string()]);
}

#[test]
fn subset_scopes_every_table_and_reports_absent_players() {
    let filters = SummaryFilters {
        player_subset: Some(BTreeSet::from(["X".to_string(), "Nadia".to_string()])),
        ..SummaryFilters::default()
    };
    let bundle = aggregate(&rows_of(&may_log()), &filters, 50.0).unwrap();

    assert!(bundle.presences_per_month.iter().all(|p| p.player == "X"));
    assert!(bundle.ranking.iter().all(|r| r.player == "X"));

    let nadia = bundle
        .risk
        .attendance
        .iter()
        .find(|a| a.player == "Nadia")
        .unwrap();
    assert_eq!(nadia.presences, 0);
    assert_eq!(nadia.percentage, 0.0);
    assert_eq!(bundle.risk.at_risk[0].player, "Nadia");
}

#[test]
fn empty_range_is_insufficient() {
    let filters = SummaryFilters {
        date_from: Some(d(2025, 1, 1)),
        date_to: None,
        player_subset: None,
    };
    let err = aggregate(&rows_of(&may_log()), &filters, 50.0).unwrap_err();
    assert!(matches!(err, AppError::InsufficientData));
}

#[test]
fn malformed_rows_are_dropped_and_duplicates_resolve_last_wins() {
    let book = attendance_book(&[
        &["not a date", "X", "SÍ", "NO", ""],
        &["2024-05-01", "", "SÍ", "NO", ""],
        &["01/05/2024", "X", "NO", "NO", ""],
        &["2024/05/01", "X", "SÍ", "NO", ""],
    ]);
    let bundle = aggregate(&rows_of(&book), &SummaryFilters::default(), 50.0).unwrap();

    assert_eq!(bundle.trainings_per_month[0].trainings, 1);
    assert_eq!(bundle.ranking.len(), 1);
    assert_eq!(bundle.ranking[0].presences, 1);
}

#[test]
fn lenient_date_parsing() {
    assert_eq!(parse_log_date("2024-05-01"), Some(d(2024, 5, 1)));
    assert_eq!(parse_log_date("01/05/2024"), Some(d(2024, 5, 1)));
    assert_eq!(parse_log_date("2024-05-01 18:30:00"), Some(d(2024, 5, 1)));
    assert_eq!(parse_log_date("2024-05-01T18:30:00"), Some(d(2024, 5, 1)));
    assert_eq!(parse_log_date("mayo"), None);
}

#[test]
fn percentage_rounds_to_one_decimal() {
    assert_eq!(percentage(1, 3), 33.3);
    assert_eq!(percentage(2, 3), 66.7);
    assert_eq!(percentage(3, 0), 0.0);
}

#[test]
fn flags_use_exact_counts_not_rounded_percentages() {
    let start = d(2000, 1, 1);
    let mut rows = vec![
        ["Fecha", "Jugadora", "Asistió", "Llegó tarde"]
            .map(String::from)
            .to_vec(),
    ];
    for i in 0..4000 {
        let date = (start + chrono::Duration::days(i)).format("%Y-%m-%d").to_string();
        // X misses one training, Y attends 1999 of 4000
        let x = if i == 0 { "NO" } else { "SÍ" };
        let y = if i < 1999 { "SÍ" } else { "NO" };
        rows.push(vec![date.clone(), "X".into(), x.into(), "NO".into()]);
        rows.push(vec![date, "Y".into(), y.into(), "NO".into()]);
    }

    let bundle = aggregate(&rows, &SummaryFilters::default(), 50.0).unwrap();
    let x = bundle.risk.attendance.iter().find(|a| a.player == "X").unwrap();

    // displayed value is rounded, the flags are not
    assert_eq!(x.percentage, 100.0);
    assert!(bundle.risk.perfect.is_empty());
    assert_eq!(
        bundle.risk.at_risk.iter().map(|a| a.player.as_str()).collect::<Vec<_>>(),
        vec!["Y"]
    );
}
