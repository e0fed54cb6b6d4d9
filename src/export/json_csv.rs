use crate::errors::{AppError, AppResult};
use crate::export::notify_export_success;
use crate::models::summary::{SummaryBundle, Table};
use crate::ui::messages::info;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Pretty JSON of the whole bundle.
pub(crate) fn export_json(bundle: &SummaryBundle, path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));

    let json_data = serde_json::to_string_pretty(bundle)
        .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))?;
    fs::write(path, json_data)?;

    notify_export_success("JSON", path);
    Ok(())
}

/// Tables stacked in one file: title line, header, rows, blank line.
pub(crate) fn export_csv(tables: &[Table], path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let csv_err = |e: csv::Error| AppError::Export(format!("CSV write error: {e}"));

    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    for (i, table) in tables.iter().enumerate() {
        if i > 0 {
            wtr.flush()?;
            let mut file = wtr.get_ref();
            file.write_all(b"\n")?;
        }
        wtr.write_record([table.title.as_str()]).map_err(csv_err)?;
        wtr.write_record(&table.headers).map_err(csv_err)?;
        for row in &table.rows {
            wtr.write_record(row).map_err(csv_err)?;
        }
    }

    wtr.flush()?;

    notify_export_success("CSV", path);
    Ok(())
}
