pub mod cells;
pub mod document;
pub mod error;
pub mod fonts;
pub mod graphics;
pub mod images;
pub mod objects;
pub mod writer;

pub use cells::{Align, Border, CellCursor, CellStyle};
pub use document::{PdfDocument, TextStyle};
pub use error::PdfError;
pub use fonts::{encode_win_ansi, BuiltinFont, FontMetrics};
pub use graphics::{mm_to_pt, Color, PT_PER_MM};
pub use images::{resolve_size, ImageError, ImageId};
