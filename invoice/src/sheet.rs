//! A single A4 page addressed in millimetres from the top-left corner.
//!
//! `Sheet` keeps the pen state (font, text/draw/fill colors, line
//! width) between calls the way fpdf does, and turns each call into
//! `pdf_core` operations in points.

use std::io::Write;
use std::path::Path;

use pdf_core::{
    mm_to_pt, resolve_size, Align, Border, BuiltinFont, CellCursor, CellStyle, Color,
    PdfDocument, TextStyle, PT_PER_MM,
};

use crate::error::{InvoiceError, Result};

pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;
pub const MARGIN_MM: f64 = 10.0;

/// fpdf's default line width, 0.567pt.
const DEFAULT_LINE_WIDTH_MM: f64 = 0.2;

pub struct Sheet<W: Write> {
    doc: PdfDocument<W>,
    cursor: CellCursor,
    font: TextStyle,
    text_color: Color,
    draw_color: Color,
    fill_color: Color,
    line_width: f64,
}

impl<W: Write> Sheet<W> {
    /// Open an A4 page on `doc`.
    pub fn new(mut doc: PdfDocument<W>) -> Result<Self> {
        doc.begin_page(mm_to_pt(PAGE_WIDTH_MM), mm_to_pt(PAGE_HEIGHT_MM))?;
        Ok(Sheet {
            doc,
            cursor: CellCursor::new(mm_to_pt(PAGE_WIDTH_MM), mm_to_pt(MARGIN_MM)),
            font: TextStyle::default(),
            text_color: Color::BLACK,
            draw_color: Color::BLACK,
            fill_color: Color::WHITE,
            line_width: DEFAULT_LINE_WIDTH_MM,
        })
    }

    /// Select a font by family name (`Helvetica`, `Times`, `Courier`,
    /// `Arial`) and a style made of `B` and `I`.
    pub fn set_font(&mut self, family: &str, style: &str, size: f64) -> Result<()> {
        let font = BuiltinFont::from_family(family, style)
            .ok_or_else(|| InvoiceError::UnknownFont(family.to_string()))?;
        self.font = TextStyle::new(font, size);
        Ok(())
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
    }

    pub fn set_draw_color(&mut self, color: Color) {
        self.draw_color = color;
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    pub fn set_line_width(&mut self, width_mm: f64) {
        self.line_width = width_mm;
    }

    pub fn x(&self) -> f64 {
        self.cursor.x() / PT_PER_MM
    }

    pub fn y(&self) -> f64 {
        self.cursor.y() / PT_PER_MM
    }

    pub fn set_x(&mut self, x: f64) {
        self.cursor.set_x(mm_to_pt(x));
    }

    /// Also moves x back to the left margin.
    pub fn set_y(&mut self, y: f64) {
        self.cursor.set_y(mm_to_pt(y));
    }

    pub fn set_xy(&mut self, x: f64, y: f64) {
        self.cursor.set_xy(mm_to_pt(x), mm_to_pt(y));
    }

    pub fn ln(&mut self, height: f64) {
        self.cursor.ln(Some(mm_to_pt(height)));
    }

    /// Borderless, unfilled, left-aligned cell.
    pub fn text(&mut self, width: f64, height: f64, text: &str) -> Result<()> {
        self.cell(width, height, text, Border::NONE, Align::Left, false)
    }

    /// A cell at the cursor using the current pen. `fill` paints the
    /// background with the fill color; borders use the draw color.
    pub fn cell(
        &mut self,
        width: f64,
        height: f64,
        text: &str,
        border: Border,
        align: Align,
        fill: bool,
    ) -> Result<()> {
        let style = CellStyle {
            text: self.font,
            text_color: self.text_color,
            fill_color: fill.then_some(self.fill_color),
            border,
            border_color: self.draw_color,
            border_width: mm_to_pt(self.line_width),
            align,
        };
        self.doc.cell(
            &mut self.cursor,
            mm_to_pt(width),
            mm_to_pt(height),
            text,
            &style,
        )?;
        Ok(())
    }

    /// Straight line in the draw color.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        let page_height = mm_to_pt(PAGE_HEIGHT_MM);
        self.doc
            .save_state()?
            .set_stroke_color(self.draw_color)?
            .set_line_width(mm_to_pt(self.line_width))?
            .line(
                mm_to_pt(x1),
                page_height - mm_to_pt(y1),
                mm_to_pt(x2),
                page_height - mm_to_pt(y2),
            )?
            .restore_state()?;
        Ok(())
    }

    /// Place an image file with its top-left corner at (x, y). A zero
    /// width or height is derived from the image's aspect ratio.
    /// Returns the drawn height in millimetres.
    pub fn image(&mut self, path: &Path, x: f64, y: f64, width: f64, height: f64) -> Result<f64> {
        let id = self.doc.load_image_file(path)?;
        let (px_w, px_h) = self.doc.image_size(id)?;
        let (w, h) = resolve_size(px_w, px_h, mm_to_pt(width), mm_to_pt(height));
        let bottom = mm_to_pt(PAGE_HEIGHT_MM) - mm_to_pt(y) - h;
        self.doc.draw_image(id, mm_to_pt(x), bottom, w, h)?;
        Ok(h / PT_PER_MM)
    }

    /// Close the page and the document, returning the writer.
    pub fn finish(self) -> Result<W> {
        Ok(self.doc.end_document()?)
    }
}
