// src/reports/pdf_table.rs
//
// Thin cursor-and-pagination layer over printpdf. Both report generators
// write top-down in millimetres from the page's top edge; this module owns
// the conversion to PDF's bottom-left origin, page breaks, and the
// character-budget estimates used for wrapping and truncation.

use crate::errors::ServerError;
use crate::format;
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerIndex,
    PdfLayerReference, PdfPageIndex, Point,
};

#[derive(Debug, Clone, Copy)]
pub struct PageSpec {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

/// Letter, portrait: the checklist.
pub const LETTER_PORTRAIT: PageSpec = PageSpec {
    width: 215.9,
    height: 279.4,
    margin: 15.0,
};

/// Legal, landscape: the inventory report's 16-column tables.
pub const LEGAL_LANDSCAPE: PageSpec = PageSpec {
    width: 355.6,
    height: 215.9,
    margin: 12.0,
};

/// One table column: width in mm, and whether over-long text wraps onto
/// extra lines (names) or is hard-truncated (everything else).
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub width: f64,
    pub wrap: bool,
}

const MM_PER_PT: f64 = 0.3528;
const LEADING: f64 = 1.3;
// Helvetica's average advance width, as a fraction of the font size.
const GLYPH_WIDTH_EM: f64 = 0.52;

fn mm(value: f64) -> Mm {
    Mm(value as _)
}

fn line_height(font_size: f64) -> f64 {
    font_size * MM_PER_PT * LEADING
}

/// How many characters fit a column at a font size.
pub fn char_budget(width_mm: f64, font_size: f64) -> usize {
    (width_mm / (font_size * MM_PER_PT * GLYPH_WIDTH_EM)).floor() as usize
}

pub struct PdfBuilder {
    doc: PdfDocumentReference,
    page: PdfPageIndex,
    layer: PdfLayerIndex,
    spec: PageSpec,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Distance from the top of the page to the last written baseline.
    cursor: f64,
}

impl PdfBuilder {
    pub fn new(title: &str, spec: PageSpec) -> Result<Self, ServerError> {
        let (doc, page, layer) = PdfDocument::new(title, mm(spec.width), mm(spec.height), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ServerError::PdfError(format!("Font load failed: {e}")))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ServerError::PdfError(format!("Font load failed: {e}")))?;

        Ok(Self {
            doc,
            page,
            layer,
            spec,
            regular,
            bold,
            cursor: spec.margin,
        })
    }

    fn layer(&self) -> PdfLayerReference {
        self.doc.get_page(self.page).get_layer(self.layer)
    }

    pub fn usable_width(&self) -> f64 {
        self.spec.width - 2.0 * self.spec.margin
    }

    pub fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(mm(self.spec.width), mm(self.spec.height), "Layer 1");
        self.page = page;
        self.layer = layer;
        self.cursor = self.spec.margin;
    }

    /// Starts a new page unless `needed_mm` still fits below the cursor.
    pub fn ensure_room(&mut self, needed_mm: f64) {
        if self.cursor + needed_mm > self.spec.height - self.spec.margin {
            self.new_page();
        }
    }

    pub fn advance(&mut self, mm: f64) {
        self.cursor += mm;
    }

    fn put_text(&self, x_mm: f64, baseline_from_top: f64, font_size: f64, bold: bool, text: &str) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer().use_text(
            text,
            font_size as _,
            mm(self.spec.margin + x_mm),
            mm(self.spec.height - baseline_from_top),
            font,
        );
    }

    /// One full-width line of text.
    pub fn text_line(&mut self, font_size: f64, bold: bool, text: &str) {
        let h = line_height(font_size);
        self.ensure_room(h);
        self.cursor += h;
        self.put_text(0.0, self.cursor, font_size, bold, text);
    }

    pub fn heading(&mut self, font_size: f64, text: &str) {
        self.advance(line_height(font_size) * 0.5);
        self.text_line(font_size, true, text);
    }

    pub fn gap(&mut self, mm: f64) {
        self.advance(mm);
    }

    /// Horizontal rule across the usable width.
    pub fn rule(&mut self) {
        self.ensure_room(2.0);
        self.cursor += 1.0;
        let y = self.spec.height - self.cursor;
        let line = Line {
            points: vec![
                (Point::new(mm(self.spec.margin), mm(y)), false),
                (
                    Point::new(mm(self.spec.width - self.spec.margin), mm(y)),
                    false,
                ),
            ],
            is_closed: false,
        };
        self.layer().set_outline_thickness(0.4);
        self.layer().add_line(line);
        self.cursor += 1.0;
    }

    /// One table row. Wrapping cells spread over extra lines; the row is
    /// as tall as its tallest cell, and page-breaks as a unit.
    pub fn table_row(&mut self, columns: &[Column], cells: &[&str], font_size: f64, bold: bool) {
        let wrapped: Vec<Vec<String>> = columns
            .iter()
            .zip(cells)
            .map(|(col, cell)| {
                let budget = char_budget(col.width, font_size).max(1);
                if col.wrap {
                    format::wrap_text(cell, budget)
                } else {
                    vec![format::truncate_ellipsis(cell, budget)]
                }
            })
            .collect();

        let row_lines = wrapped.iter().map(Vec::len).max().unwrap_or(1);
        let h = line_height(font_size);
        self.ensure_room(h * row_lines as f64);

        let top = self.cursor;
        let mut x = 0.0;
        for (col, lines) in columns.iter().zip(&wrapped) {
            for (i, line) in lines.iter().enumerate() {
                self.put_text(x, top + h * (i + 1) as f64, font_size, bold, line);
            }
            x += col.width;
        }
        self.cursor = top + h * row_lines as f64;
    }

    pub fn finish(self) -> Result<Vec<u8>, ServerError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| ServerError::PdfError(format!("Failed to serialize PDF: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_budget_scales_with_width_and_size() {
        let narrow = char_budget(10.0, 7.0);
        let wide = char_budget(40.0, 7.0);
        assert!(wide > narrow * 3);
        assert!(char_budget(40.0, 12.0) < wide);
    }

    #[test]
    fn builder_produces_a_pdf_header() {
        let mut pdf = PdfBuilder::new("test", LETTER_PORTRAIT).unwrap();
        pdf.heading(14.0, "Heading");
        pdf.rule();
        pdf.table_row(
            &[
                Column {
                    width: 60.0,
                    wrap: true,
                },
                Column {
                    width: 30.0,
                    wrap: false,
                },
            ],
            &["A name long enough to wrap across the column", "$1,000"],
            8.0,
            false,
        );
        let bytes = pdf.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn many_lines_paginate_without_panicking() {
        let mut pdf = PdfBuilder::new("test", LETTER_PORTRAIT).unwrap();
        for i in 0..300 {
            pdf.text_line(9.0, false, &format!("line {i}"));
        }
        let bytes = pdf.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
