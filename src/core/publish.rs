use crate::errors::AppResult;
use crate::models::summary::{SummaryBundle, Table};
use crate::sheets::{RowUpdate, SheetStore};

/// Size given to a freshly created summary worksheet.
pub const SUMMARY_ROWS: usize = 200;
pub const SUMMARY_COLS: usize = 20;

/// Write `table` (header + rows) starting at `start_row`, growing the
/// worksheet first when the table does not fit. Returns the next free row,
/// leaving one blank separator row after the table.
pub fn export_table<S: SheetStore + ?Sized>(
    store: &mut S,
    sheet: &str,
    table: &Table,
    start_row: usize,
) -> AppResult<usize> {
    let mut values = Vec::with_capacity(table.rows.len() + 1);
    values.push(table.headers.clone());
    values.extend(table.rows.iter().cloned());

    let rows_needed = start_row + values.len() - 1;
    let cols_needed = table.width();

    let size = store.dimensions(sheet)?;
    if rows_needed > size.rows || cols_needed > size.cols {
        store.resize(sheet, size.rows.max(rows_needed), size.cols.max(cols_needed))?;
    }

    let updates: Vec<RowUpdate> = values
        .into_iter()
        .enumerate()
        .map(|(i, row)| RowUpdate::new(start_row + i, row))
        .collect();
    store.batch_write(sheet, &updates)?;

    Ok(start_row + table.rows.len() + 2)
}

/// Replace the summary worksheet content with the four stacked tables.
/// Returns the row after the last table.
pub fn publish_summary<S: SheetStore + ?Sized>(
    store: &mut S,
    sheet: &str,
    bundle: &SummaryBundle,
) -> AppResult<usize> {
    if store.has_worksheet(sheet)? {
        store.clear_worksheet(sheet)?;
    } else {
        store.create_worksheet(sheet, SUMMARY_ROWS, SUMMARY_COLS)?;
    }

    let mut row = 1;
    for table in bundle.tables() {
        row = export_table(store, sheet, &table, row)?;
    }
    Ok(row)
}
