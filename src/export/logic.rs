use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::pdf::export_pdf;
use crate::export::xlsx::export_xlsx;
use crate::models::player::CategoryFilter;
use crate::models::summary::{SummaryBundle, Table};
use crate::utils::path::expand_tilde;

/// High-level export of a computed summary.
pub struct ExportLogic;

impl ExportLogic {
    /// Write `bundle` to `file` in the requested format.
    ///
    /// - `file`: absolute path of the output file (`~/` is expanded)
    /// - `title`: heading used by the PDF report
    /// - `force`: overwrite an existing file without asking
    pub fn export(
        bundle: &SummaryBundle,
        format: ExportFormat,
        file: &str,
        title: &str,
        force: bool,
    ) -> AppResult<()> {
        let path_buf = expand_tilde(file);
        let path = path_buf.as_path();

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let tables = export_tables(bundle);

        match format {
            ExportFormat::Csv => export_csv(&tables, path),
            ExportFormat::Json => export_json(bundle, path),
            ExportFormat::Xlsx => export_xlsx(&tables, path),
            ExportFormat::Pdf => export_pdf(&tables, path, title),
        }
    }
}

/// The published tables followed by the risk table.
pub fn export_tables(bundle: &SummaryBundle) -> Vec<Table> {
    let mut tables = bundle.tables();
    tables.push(bundle.risk_table());
    tables
}

/// Report title for the selected scope.
pub fn build_title(range: Option<&str>, category: CategoryFilter) -> String {
    let base = match category.category() {
        Some(c) => format!("Asistencia {}", c.label()),
        None => "Asistencia".to_string(),
    };

    let Some(r) = range else {
        return base;
    };

    match r.split_once(':') {
        Some((from, to)) => format!("{base} {} a {}", from.trim(), to.trim()),
        None => format!("{base} {}", r.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_reflect_scope() {
        assert_eq!(build_title(None, CategoryFilter::Todas), "Asistencia");
        assert_eq!(
            build_title(Some("2024-05"), CategoryFilter::Todas),
            "Asistencia 2024-05"
        );
        assert_eq!(
            build_title(Some("2024-05:2024-06"), CategoryFilter::Primera),
            "Asistencia Primera 2024-05 a 2024-06"
        );
    }
}
