use crate::errors::{AppError, AppResult};
use crate::export::notify_export_success;
use crate::models::summary::Table;
use crate::ui::messages::info;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

const MAX_SHEET_NAME: usize = 31;

/// One worksheet per table, styled header, banded rows, auto column widths.
pub(crate) fn export_xlsx(tables: &[Table], path: &Path) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for table in tables {
        let worksheet = workbook.add_worksheet();
        let name: String = table.title.chars().take(MAX_SHEET_NAME).collect();
        worksheet.set_name(name).map_err(to_export_error)?;
        write_table(worksheet, table, &header_format)?;
    }

    workbook.save(path).map_err(to_export_error)?;

    notify_export_success("XLSX", path);
    Ok(())
}

fn write_table(worksheet: &mut Worksheet, table: &Table, header_format: &Format) -> AppResult<()> {
    for (col, header) in table.headers.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, header.as_str(), header_format)
            .map_err(to_export_error)?;
    }
    worksheet.set_freeze_panes(1, 0).map_err(to_export_error)?;

    let mut col_widths: Vec<usize> = vec![0; table.width()];
    for (c, h) in table.headers.iter().enumerate() {
        col_widths[c] = UnicodeWidthStr::width(h.as_str());
    }

    let band1 = Color::RGB(0xEAF3FB);
    let band2 = Color::RGB(0xFFFFFF);

    for (row_index, values) in table.rows.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let band = if row_index % 2 == 0 { band1 } else { band2 };

        for (col, value) in values.iter().enumerate() {
            write_cell(worksheet, row, col as u16, value, band)?;
            col_widths[col] = col_widths[col].max(UnicodeWidthStr::width(value.as_str()));
        }
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(c as u16, *w as f64 + 2.0)
            .map_err(to_export_error)?;
    }
    Ok(())
}

/// Numeric-looking cells are written as numbers, right aligned.
fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, s: &str, bg: Color) -> AppResult<()> {
    let fmt = Format::new()
        .set_background_color(bg)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    if let Ok(num) = s.parse::<f64>() {
        worksheet
            .write_with_format(row, col, num, &fmt.set_align(FormatAlign::Right))
            .map_err(to_export_error)?;
    } else {
        worksheet
            .write_with_format(row, col, s, &fmt)
            .map_err(to_export_error)?;
    }
    Ok(())
}

fn to_export_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(e.to_string())
}
