use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{PdfError, Result};
use crate::fonts::{encode_win_ansi, BuiltinFont};
use crate::graphics::Color;
use crate::images::{self, ImageError, ImageId};
use crate::objects::{ObjId, PdfObject};
use crate::writer::{escape_pdf_bytes, PdfWriter};

const CATALOG_OBJ: ObjId = ObjId(1, 0);
const PAGES_OBJ: ObjId = ObjId(2, 0);
const FIRST_FREE_OBJ_NUM: u32 = 3;

/// Text styling options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: BuiltinFont,
    pub font_size: f64,
}

impl TextStyle {
    pub fn new(font: BuiltinFont, font_size: f64) -> Self {
        TextStyle { font, font_size }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            font: BuiltinFont::Helvetica,
            font_size: 12.0,
        }
    }
}

#[derive(Debug)]
struct LoadedImage {
    obj: ObjId,
    width: u32,
    height: u32,
}

/// High-level API for building PDF documents.
///
/// Generic over `Write` so it works with files (`BufWriter<File>`),
/// in-memory buffers (`Vec<u8>`), or any other writer.
///
/// Pages are written incrementally: `end_page()` flushes page data
/// to the writer and frees page content from memory. Font objects are
/// written the first time a page uses them, so the file only carries
/// the fonts that actually appear.
///
/// Coordinates use PDF's default bottom-left origin, in points.
#[derive(Debug)]
pub struct PdfDocument<W: Write> {
    writer: PdfWriter<W>,
    info: Vec<(String, String)>,
    page_obj_ids: Vec<ObjId>,
    current_page: Option<PageBuilder>,
    next_obj_num: u32,
    compress: bool,
    font_objs: BTreeMap<BuiltinFont, ObjId>,
    images: Vec<LoadedImage>,
}

#[derive(Debug)]
struct PageBuilder {
    width: f64,
    height: f64,
    content_ops: Vec<u8>,
    fonts: BTreeSet<BuiltinFont>,
    images: BTreeSet<ImageId>,
}

impl PdfDocument<BufWriter<File>> {
    /// Create a new PDF document that writes to a file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> PdfDocument<W> {
    /// Create a new PDF document that writes to the given writer.
    /// Writes the PDF header immediately.
    pub fn new(writer: W) -> Result<Self> {
        let mut pdf_writer = PdfWriter::new(writer);
        pdf_writer.write_header()?;

        Ok(PdfDocument {
            writer: pdf_writer,
            info: Vec::new(),
            page_obj_ids: Vec::new(),
            current_page: None,
            next_obj_num: FIRST_FREE_OBJ_NUM,
            compress: false,
            font_objs: BTreeMap::new(),
            images: Vec::new(),
        })
    }

    /// Set a document info entry (e.g. "Creator", "Title").
    pub fn set_info(&mut self, key: &str, value: &str) -> &mut Self {
        self.info.push((key.to_string(), value.to_string()));
        self
    }

    /// Compress page content streams with FlateDecode. Off by default
    /// so content stays readable when debugging.
    pub fn set_compression(&mut self, enabled: bool) -> &mut Self {
        self.compress = enabled;
        self
    }

    fn alloc_obj(&mut self) -> ObjId {
        let id = ObjId(self.next_obj_num, 0);
        self.next_obj_num += 1;
        id
    }

    /// Begin a new page with the given dimensions in points.
    /// If a page is currently open, it is closed first.
    pub fn begin_page(&mut self, width: f64, height: f64) -> Result<&mut Self> {
        if self.current_page.is_some() {
            self.end_page()?;
        }
        self.current_page = Some(PageBuilder {
            width,
            height,
            content_ops: Vec::new(),
            fonts: BTreeSet::new(),
            images: BTreeSet::new(),
        });
        Ok(self)
    }

    /// Width and height of the open page, if any.
    pub fn page_size(&self) -> Option<(f64, f64)> {
        self.current_page.as_ref().map(|p| (p.width, p.height))
    }

    fn page_mut(&mut self, op: &'static str) -> Result<&mut PageBuilder> {
        self.current_page.as_mut().ok_or(PdfError::NoOpenPage(op))
    }

    /// Append raw operators to the open page's content stream.
    pub(crate) fn push_ops(&mut self, op: &'static str, ops: &str) -> Result<&mut Self> {
        self.page_mut(op)?.content_ops.extend_from_slice(ops.as_bytes());
        Ok(self)
    }

    pub(crate) fn use_font(&mut self, op: &'static str, font: BuiltinFont) -> Result<()> {
        self.page_mut(op)?.fonts.insert(font);
        Ok(())
    }

    // -------------------------------------------------------
    // Graphics state and paths
    // -------------------------------------------------------

    /// Push the graphics state (`q`).
    pub fn save_state(&mut self) -> Result<&mut Self> {
        self.push_ops("save_state", "q\n")
    }

    /// Pop the graphics state (`Q`).
    pub fn restore_state(&mut self) -> Result<&mut Self> {
        self.push_ops("restore_state", "Q\n")
    }

    /// Set the stroke color used by lines and borders.
    pub fn set_stroke_color(&mut self, color: Color) -> Result<&mut Self> {
        let ops = format!("{} RG\n", color_components(color));
        self.push_ops("set_stroke_color", &ops)
    }

    /// Set the fill color used by shapes and text.
    pub fn set_fill_color(&mut self, color: Color) -> Result<&mut Self> {
        let ops = format!("{} rg\n", color_components(color));
        self.push_ops("set_fill_color", &ops)
    }

    pub fn set_line_width(&mut self, width: f64) -> Result<&mut Self> {
        let ops = format!("{} w\n", format_coord(width));
        self.push_ops("set_line_width", &ops)
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> Result<&mut Self> {
        let ops = format!("{} {} m\n", format_coord(x), format_coord(y));
        self.push_ops("move_to", &ops)
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> Result<&mut Self> {
        let ops = format!("{} {} l\n", format_coord(x), format_coord(y));
        self.push_ops("line_to", &ops)
    }

    /// Append a rectangle path with lower-left corner (x, y).
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<&mut Self> {
        let ops = format!(
            "{} {} {} {} re\n",
            format_coord(x),
            format_coord(y),
            format_coord(width),
            format_coord(height),
        );
        self.push_ops("rect", &ops)
    }

    pub fn close_path(&mut self) -> Result<&mut Self> {
        self.push_ops("close_path", "h\n")
    }

    pub fn stroke(&mut self) -> Result<&mut Self> {
        self.push_ops("stroke", "S\n")
    }

    pub fn fill(&mut self) -> Result<&mut Self> {
        self.push_ops("fill", "f\n")
    }

    /// Fill then stroke the current path (`B`).
    pub fn fill_stroke(&mut self) -> Result<&mut Self> {
        self.push_ops("fill_stroke", "B\n")
    }

    /// Stroke a single straight line with the current stroke color.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<&mut Self> {
        self.move_to(x1, y1)?.line_to(x2, y2)?.stroke()
    }

    // -------------------------------------------------------
    // Text
    // -------------------------------------------------------

    /// Place text with its baseline starting at (x, y), using the
    /// current fill color. Text is encoded as WinAnsi, so Latin-1
    /// letters and signs such as `€` render with the standard fonts.
    pub fn place_text_styled(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        style: &TextStyle,
    ) -> Result<&mut Self> {
        self.use_font("place_text_styled", style.font)?;
        let ops = text_ops(text, x, y, style);
        self.push_ops("place_text_styled", &ops)
    }

    // -------------------------------------------------------
    // Images
    // -------------------------------------------------------

    /// Load a JPEG or PNG from memory. The image XObject is written
    /// immediately and can be drawn on any number of pages.
    pub fn load_image_bytes(&mut self, data: Vec<u8>) -> Result<ImageId> {
        let image = images::load_image(data)?;

        let smask = match images::smask_xobject(&image)? {
            Some(obj) => {
                let id = self.alloc_obj();
                self.writer.write_object(id, &obj)?;
                Some(PdfObject::Reference(id))
            }
            None => None,
        };
        let obj = images::image_xobject(&image, smask)?;
        let id = self.alloc_obj();
        self.writer.write_object(id, &obj)?;

        self.images.push(LoadedImage {
            obj: id,
            width: image.width,
            height: image.height,
        });
        Ok(ImageId(self.images.len() - 1))
    }

    /// Load a JPEG or PNG from a file.
    pub fn load_image_file<P: AsRef<Path>>(&mut self, path: P) -> Result<ImageId> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| ImageError::Read {
            path: path.display().to_string(),
            source,
        })?;
        self.load_image_bytes(data)
    }

    /// Pixel dimensions of a loaded image.
    pub fn image_size(&self, id: ImageId) -> Result<(u32, u32)> {
        self.images
            .get(id.0)
            .map(|img| (img.width, img.height))
            .ok_or(PdfError::UnknownImage(id.0))
    }

    /// Draw a loaded image with its lower-left corner at (x, y),
    /// scaled to `width` x `height` points.
    pub fn draw_image(
        &mut self,
        id: ImageId,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<&mut Self> {
        if id.0 >= self.images.len() {
            return Err(PdfError::UnknownImage(id.0));
        }
        self.page_mut("draw_image")?.images.insert(id);
        let ops = format!(
            "q\n{} 0 0 {} {} {} cm\n/Im{} Do\nQ\n",
            format_coord(width),
            format_coord(height),
            format_coord(x),
            format_coord(y),
            id.0 + 1,
        );
        self.push_ops("draw_image", &ops)
    }

    // -------------------------------------------------------
    // Page and document lifecycle
    // -------------------------------------------------------

    fn font_obj(&mut self, font: BuiltinFont) -> Result<ObjId> {
        if let Some(id) = self.font_objs.get(&font) {
            return Ok(*id);
        }
        let id = self.alloc_obj();
        let mut dict = vec![
            ("Type", PdfObject::name("Font")),
            ("Subtype", PdfObject::name("Type1")),
            ("BaseFont", PdfObject::name(font.pdf_base_name())),
        ];
        if font.uses_win_ansi() {
            dict.push(("Encoding", PdfObject::name("WinAnsiEncoding")));
        }
        self.writer.write_object(id, &PdfObject::dict(dict))?;
        self.font_objs.insert(font, id);
        Ok(id)
    }

    /// End the current page. Writes page objects to the
    /// writer and frees page content from memory.
    pub fn end_page(&mut self) -> Result<()> {
        let page = self
            .current_page
            .take()
            .ok_or(PdfError::NoOpenPage("end_page"))?;

        let mut font_entries = Vec::new();
        for font in &page.fonts {
            let id = self.font_obj(*font)?;
            font_entries.push((font.pdf_name(), PdfObject::Reference(id)));
        }
        let image_entries: Vec<(String, PdfObject)> = page
            .images
            .iter()
            .map(|id| (format!("Im{}", id.0 + 1), PdfObject::Reference(self.images[id.0].obj)))
            .collect();

        let content_id = self.alloc_obj();
        let page_id = self.alloc_obj();

        let content_stream = if self.compress {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&page.content_ops)?;
            PdfObject::stream(
                vec![("Filter", PdfObject::name("FlateDecode"))],
                encoder.finish()?,
            )
        } else {
            PdfObject::stream(vec![], page.content_ops)
        };
        self.writer.write_object(content_id, &content_stream)?;

        let mut resources = Vec::new();
        if !font_entries.is_empty() {
            resources.push(("Font", PdfObject::dict(font_entries)));
        }
        if !image_entries.is_empty() {
            resources.push(("XObject", PdfObject::Dictionary(image_entries)));
        }

        let page_dict = PdfObject::dict(vec![
            ("Type", PdfObject::name("Page")),
            ("Parent", PdfObject::Reference(PAGES_OBJ)),
            (
                "MediaBox",
                PdfObject::array(vec![
                    PdfObject::Integer(0),
                    PdfObject::Integer(0),
                    PdfObject::Real(page.width),
                    PdfObject::Real(page.height),
                ]),
            ),
            ("Contents", PdfObject::Reference(content_id)),
            ("Resources", PdfObject::dict(resources)),
        ]);
        self.writer.write_object(page_id, &page_dict)?;

        self.page_obj_ids.push(page_id);
        Ok(())
    }

    /// Finish the document. Writes the catalog, pages tree,
    /// info dictionary, xref table, and trailer.
    /// Consumes self; no further operations are possible.
    pub fn end_document(mut self) -> Result<W> {
        if self.current_page.is_some() {
            self.end_page()?;
        }

        let info_id = if self.info.is_empty() {
            None
        } else {
            let id = self.alloc_obj();
            let entries: Vec<(&str, PdfObject)> = self
                .info
                .iter()
                .map(|(k, v)| (k.as_str(), PdfObject::text_string(v)))
                .collect();
            self.writer.write_object(id, &PdfObject::dict(entries))?;
            Some(id)
        };

        let kids: Vec<PdfObject> = self
            .page_obj_ids
            .iter()
            .map(|id| PdfObject::Reference(*id))
            .collect();
        let pages = PdfObject::dict(vec![
            ("Type", PdfObject::name("Pages")),
            ("Kids", PdfObject::Array(kids)),
            ("Count", PdfObject::Integer(self.page_obj_ids.len() as i64)),
        ]);
        self.writer.write_object(PAGES_OBJ, &pages)?;

        let catalog = PdfObject::dict(vec![
            ("Type", PdfObject::name("Catalog")),
            ("Pages", PdfObject::Reference(PAGES_OBJ)),
        ]);
        self.writer.write_object(CATALOG_OBJ, &catalog)?;

        self.writer.write_xref_and_trailer(CATALOG_OBJ, info_id)?;
        Ok(self.writer.into_inner())
    }
}

/// Content stream operators for one run of text with its baseline at (x, y).
pub(crate) fn text_ops(text: &str, x: f64, y: f64, style: &TextStyle) -> String {
    format!(
        "BT\n/{} {} Tf\n{} {} Td\n({}) Tj\nET\n",
        style.font.pdf_name(),
        format_coord(style.font_size),
        format_coord(x),
        format_coord(y),
        escape_pdf_bytes(&encode_win_ansi(text)),
    )
}

pub(crate) fn color_components(color: Color) -> String {
    format!(
        "{} {} {}",
        format_coord(color.r),
        format_coord(color.g),
        format_coord(color.b)
    )
}

/// Format a coordinate value for PDF content streams.
pub(crate) fn format_coord(v: f64) -> String {
    if v == v.floor() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{:.4}", v);
        let s = s.trim_end_matches('0').trim_end_matches('.');
        if s == "-0" {
            "0".to_string()
        } else {
            s.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_coord_trims() {
        assert_eq!(format_coord(100.0), "100");
        assert_eq!(format_coord(12.5), "12.5");
        assert_eq!(format_coord(0.968627451), "0.9686");
        assert_eq!(format_coord(-0.00001), "0");
    }

    #[test]
    fn text_ops_encode_win_ansi() {
        let style = TextStyle::new(BuiltinFont::TimesRoman, 8.0);
        let ops = text_ops("€ 1,000.00", 10.0, 20.0, &style);
        assert_eq!(ops, "BT\n/F5 8 Tf\n10 20 Td\n(\\200 1,000.00) Tj\nET\n");
    }
}
