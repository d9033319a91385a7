//! Cursor-driven cells in the style of fpdf's `Cell`/`CellFormat`.
//!
//! A [`CellCursor`] tracks a writing position measured from the
//! top-left corner of the page. Each cell draws an optional fill and
//! border, places its text, and advances the cursor to the right;
//! [`CellCursor::ln`] starts a new line at the left margin.

use std::io::Write;

use crate::document::{color_components, format_coord, text_ops, PdfDocument, TextStyle};
use crate::error::{PdfError, Result};
use crate::fonts::FontMetrics;
use crate::graphics::Color;

/// Horizontal text alignment within a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Which edges of a cell are stroked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Border {
    pub left: bool,
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
}

impl Border {
    pub const NONE: Border = Border {
        left: false,
        top: false,
        right: false,
        bottom: false,
    };
    pub const ALL: Border = Border {
        left: true,
        top: true,
        right: true,
        bottom: true,
    };
}

/// Visual style of a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    pub text: TextStyle,
    pub text_color: Color,
    /// Background fill; `None` leaves the cell transparent.
    pub fill_color: Option<Color>,
    pub border: Border,
    pub border_color: Color,
    /// Border line width in points.
    pub border_width: f64,
    pub align: Align,
}

impl Default for CellStyle {
    fn default() -> Self {
        CellStyle {
            text: TextStyle::default(),
            text_color: Color::BLACK,
            fill_color: None,
            border: Border::NONE,
            border_color: Color::BLACK,
            border_width: 0.567,
            align: Align::Left,
        }
    }
}

/// Writing position for cells, in points from the top-left corner.
#[derive(Debug, Clone)]
pub struct CellCursor {
    x: f64,
    y: f64,
    left_margin: f64,
    right_margin: f64,
    page_width: f64,
    cell_margin: f64,
    last_height: f64,
}

impl CellCursor {
    /// Start at the top-left margin. The horizontal text padding
    /// inside cells defaults to a tenth of the margin.
    pub fn new(page_width: f64, margin: f64) -> Self {
        CellCursor {
            x: margin,
            y: margin,
            left_margin: margin,
            right_margin: margin,
            page_width,
            cell_margin: margin / 10.0,
            last_height: 0.0,
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    /// Move to a new vertical position; x returns to the left margin.
    pub fn set_y(&mut self, y: f64) {
        self.x = self.left_margin;
        self.y = y;
    }

    pub fn set_xy(&mut self, x: f64, y: f64) {
        self.set_y(y);
        self.set_x(x);
    }

    /// Line break: back to the left margin and down by `height`,
    /// or by the height of the last cell when `None`.
    pub fn ln(&mut self, height: Option<f64>) {
        self.x = self.left_margin;
        self.y += height.unwrap_or(self.last_height);
    }

    /// Width from the cursor to the right margin.
    pub fn remaining_width(&self) -> f64 {
        (self.page_width - self.right_margin - self.x).max(0.0)
    }
}

impl<W: Write> PdfDocument<W> {
    /// Draw a cell at the cursor and advance the cursor by its width.
    ///
    /// A `width` of 0 extends the cell to the right margin. Text is
    /// centered vertically and aligned horizontally per the style.
    pub fn cell(
        &mut self,
        cursor: &mut CellCursor,
        width: f64,
        height: f64,
        text: &str,
        style: &CellStyle,
    ) -> Result<&mut Self> {
        let (_, page_height) = self.page_size().ok_or(PdfError::NoOpenPage("cell"))?;
        let width = if width == 0.0 {
            cursor.remaining_width()
        } else {
            width
        };
        let left = cursor.x;
        let right = left + width;
        let top = page_height - cursor.y;
        let bottom = top - height;

        let mut ops = String::from("q\n");
        let stroke_setup = format!(
            "{} RG\n{} w\n",
            color_components(style.border_color),
            format_coord(style.border_width)
        );

        let full_border = style.border == Border::ALL;
        if style.fill_color.is_some() || full_border {
            if let Some(fill) = style.fill_color {
                ops.push_str(&format!("{} rg\n", color_components(fill)));
            }
            if full_border {
                ops.push_str(&stroke_setup);
            }
            let paint = match (style.fill_color.is_some(), full_border) {
                (true, true) => "B",
                (true, false) => "f",
                _ => "S",
            };
            ops.push_str(&format!(
                "{} {} {} {} re\n{}\n",
                format_coord(left),
                format_coord(bottom),
                format_coord(width),
                format_coord(height),
                paint
            ));
        } else if style.border != Border::NONE {
            ops.push_str(&stroke_setup);
            let edges = [
                (style.border.left, (left, top), (left, bottom)),
                (style.border.top, (left, top), (right, top)),
                (style.border.right, (right, top), (right, bottom)),
                (style.border.bottom, (left, bottom), (right, bottom)),
            ];
            for (_, (x1, y1), (x2, y2)) in edges.iter().filter(|(on, _, _)| *on) {
                ops.push_str(&format!(
                    "{} {} m\n{} {} l\nS\n",
                    format_coord(*x1),
                    format_coord(*y1),
                    format_coord(*x2),
                    format_coord(*y2)
                ));
            }
        }

        if !text.is_empty() {
            let font_size = style.text.font_size;
            let text_width = FontMetrics::measure_text(text, style.text.font, font_size);
            let dx = match style.align {
                Align::Left => cursor.cell_margin,
                Align::Center => (width - text_width) / 2.0,
                Align::Right => width - cursor.cell_margin - text_width,
            };
            let baseline = top - (0.5 * height + 0.3 * font_size);
            ops.push_str(&format!("{} rg\n", color_components(style.text_color)));
            ops.push_str(&text_ops(text, left + dx, baseline, &style.text));
            self.use_font("cell", style.text.font)?;
        }
        ops.push_str("Q\n");
        self.push_ops("cell", &ops)?;

        cursor.last_height = height;
        cursor.x += width;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_line_break_returns_to_margin() {
        let mut cursor = CellCursor::new(600.0, 20.0);
        cursor.set_x(100.0);
        cursor.ln(Some(12.0));
        assert_eq!((cursor.x(), cursor.y()), (20.0, 32.0));
    }

    #[test]
    fn set_y_resets_x() {
        let mut cursor = CellCursor::new(600.0, 20.0);
        cursor.set_xy(300.0, 100.0);
        assert_eq!(cursor.x(), 300.0);
        cursor.set_y(150.0);
        assert_eq!((cursor.x(), cursor.y()), (20.0, 150.0));
    }

    #[test]
    fn remaining_width_stops_at_right_margin() {
        let mut cursor = CellCursor::new(600.0, 20.0);
        cursor.set_x(100.0);
        assert_eq!(cursor.remaining_width(), 480.0);
        cursor.set_x(590.0);
        assert_eq!(cursor.remaining_width(), 0.0);
    }
}
