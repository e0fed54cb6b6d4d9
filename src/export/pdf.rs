use crate::errors::{AppError, AppResult};
use crate::export::notify_export_success;
use crate::models::summary::Table;
use crate::ui::messages::info;
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
use std::fs;
use std::path::Path;

/// Single-font A4 table writer. Every table starts on a fresh page and
/// spills over as many pages as its rows need.
pub struct PdfManager {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    page_refs: Vec<Ref>,
    current_content_id: Option<Ref>,

    page_w: f32,
    page_h: f32,
    margin: f32,
    row_h: f32,

    next_id: i32,
    font_id: Ref,

    font_size: f32,
    header_font_size: f32,
    title_font_size: f32,
}

impl Default for PdfManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Helvetica is set up with WinAnsiEncoding: Latin-1 characters map to
/// their own byte, everything else becomes '?'.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

impl PdfManager {
    pub fn new() -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);

        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        Self {
            pdf,
            catalog_id,
            pages_id,
            page_refs: Vec::new(),
            current_content_id: None,

            page_w: 595.0,
            page_h: 842.0,
            margin: 50.0,
            row_h: 20.0,

            next_id: 4,
            font_id,

            font_size: 10.0,
            header_font_size: 11.0,
            title_font_size: 14.0,
        }
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    fn new_page(&mut self) -> Content {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();

        self.page_refs.push(page_id);

        let mut page = self.pdf.page(page_id);
        page.parent(self.pages_id)
            .media_box(Rect::new(0.0, 0.0, self.page_w, self.page_h))
            .contents(content_id);
        page.resources().fonts().pair(Name(b"F1"), self.font_id);

        self.current_content_id = Some(content_id);
        Content::new()
    }

    fn finalize_page(&mut self, content: Content) {
        if let Some(id) = self.current_content_id.take() {
            self.pdf.stream(id, &content.finish());
        }
    }

    fn draw_text(&self, content: &mut Content, x: f32, y: f32, size: f32, text: &str) {
        let bytes = encode_text(text);
        content.begin_text();
        content.set_font(Name(b"F1"), size);
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
        content.show(Str(&bytes));
        content.end_text();
    }

    fn draw_cell_borders(&self, content: &mut Content, x: f32, y: f32, w: f32, h: f32) {
        content.save_state();
        content.set_stroke_rgb(0.65, 0.65, 0.65);
        content.rect(x, y, w, h);
        content.stroke();
        content.restore_state();
    }

    fn fill_band(&self, content: &mut Content, y: f32, width: f32, gray: f32) {
        content.save_state();
        content.set_fill_rgb(gray, gray, gray + 0.03);
        content.rect(self.margin, y, width, self.row_h);
        content.fill_nonzero();
        content.restore_state();
    }

    fn draw_row(&self, content: &mut Content, y: f32, col_widths: &[f32], row: &[String], font_size: f32) {
        let mut x = self.margin;
        for (text, w) in row.iter().zip(col_widths) {
            self.draw_text(content, x + 4.0, y + 5.0, font_size, text);
            self.draw_cell_borders(content, x, y, *w, self.row_h);
            x += w;
        }
    }

    /// Column widths from header and content, scaled down to fit the page.
    fn compute_col_widths(&self, headers: &[String], rows: &[Vec<String>]) -> Vec<f32> {
        let mut widths: Vec<f32> = headers
            .iter()
            .map(|h| h.chars().count() as f32 * 6.5)
            .collect();

        for row in rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(cell.chars().count() as f32 * 6.2);
            }
        }

        let total: f32 = widths.iter().sum();
        let max = self.page_w - 2.0 * self.margin;
        if total > max {
            let scale = max / total;
            for w in &mut widths {
                *w *= scale;
            }
        }
        widths
    }

    fn draw_page_header_footer(&self, content: &mut Content, title: &str) {
        self.draw_text(
            content,
            self.margin,
            self.page_h - self.margin + 15.0,
            self.title_font_size,
            title,
        );

        let pg = format!("Page {}", self.page_refs.len());
        self.draw_text(
            content,
            self.page_w - self.margin - 60.0,
            self.margin - 35.0,
            self.font_size,
            &pg,
        );
    }

    /// Multi-page table under `title`. A table without rows still gets a
    /// page with its header.
    pub fn write_table(&mut self, title: &str, headers: &[String], rows: &[Vec<String>]) {
        let col_widths = self.compute_col_widths(headers, rows);
        let total_w: f32 = col_widths.iter().sum();

        let mut remaining: &[Vec<String>] = rows;
        loop {
            let mut content = self.new_page();
            self.draw_page_header_footer(&mut content, title);

            let mut y = self.page_h - self.margin - 30.0;
            self.fill_band(&mut content, y, total_w, 0.85);
            self.draw_row(&mut content, y, &col_widths, headers, self.header_font_size);
            y -= self.row_h;

            let mut consumed = 0;
            for (i, row) in remaining.iter().enumerate() {
                if y - self.row_h < self.margin {
                    break;
                }
                if i % 2 == 0 {
                    self.fill_band(&mut content, y, total_w, 0.96);
                }
                self.draw_row(&mut content, y, &col_widths, row, self.font_size);
                y -= self.row_h;
                consumed += 1;
            }

            self.finalize_page(content);
            remaining = &remaining[consumed..];
            if remaining.is_empty() {
                break;
            }
        }
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        let count = self.page_refs.len() as i32;
        self.pdf
            .pages(self.pages_id)
            .count(count)
            .kids(self.page_refs.iter().copied());
        self.pdf.finish()
    }
}

/// One titled section per table, prefixed with the report title.
pub(crate) fn export_pdf(tables: &[Table], path: &Path, title: &str) -> AppResult<()> {
    info(format!("Exporting to PDF: {}", path.display()));

    let mut pdf = PdfManager::new();
    for table in tables {
        pdf.write_table(&format!("{title} - {}", table.title), &table.headers, &table.rows);
    }

    fs::write(path, pdf.finish())
        .map_err(|e| AppError::Export(format!("PDF export error: {e}")))?;

    notify_export_success("PDF", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_text_is_single_byte() {
        assert_eq!(encode_text("Asistió"), b"Asisti\xf3".to_vec());
        assert_eq!(encode_text("€"), b"?".to_vec());
    }

    #[test]
    fn pdf_bytes_have_header_and_trailer() {
        let mut pdf = PdfManager::new();
        pdf.write_table(
            "Ranking",
            &["Jugadora".to_string(), "Total presencias".to_string()],
            &[vec!["Ana".to_string(), "3".to_string()]],
        );
        let bytes = pdf.finish();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.windows(5).any(|w| w == b"%%EOF"));
    }
}
