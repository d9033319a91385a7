use std::io::{self, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::objects::PdfObject;

/// Opaque handle to a loaded image within a PdfDocument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub usize);

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// PDF color space for image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceRGB,
    DeviceGray,
}

impl ColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceGray => "DeviceGray",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image data too short to detect format")]
    TooShort,
    #[error("unsupported image format (expected JPEG or PNG)")]
    UnsupportedFormat,
    #[error("JPEG SOF marker truncated")]
    JpegTruncated,
    #[error("no SOF marker found in JPEG data")]
    JpegNoFrame,
    #[error("unsupported JPEG component count: {0} (expected 1 or 3)")]
    JpegComponents(u8),
    #[error("PNG decode error: {0}")]
    Png(#[from] png::DecodingError),
    #[error("unsupported PNG color type: {0}")]
    PngColorType(String),
    #[error("failed to read image {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Parsed image data ready for embedding into a PDF.
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub color_space: ColorSpace,
    /// Raw 8-bit pixel data (RGB/Gray) or the untouched JPEG bytes.
    pub data: Vec<u8>,
    /// Separate alpha channel (grayscale), if present.
    pub smask_data: Option<Vec<u8>>,
}

/// Detect image format from magic bytes.
pub fn detect_format(data: &[u8]) -> Result<ImageFormat, ImageError> {
    if data.len() < 4 {
        return Err(ImageError::TooShort);
    }
    if data[0] == 0xFF && data[1] == 0xD8 {
        Ok(ImageFormat::Jpeg)
    } else if data[..4] == [0x89, b'P', b'N', b'G'] {
        Ok(ImageFormat::Png)
    } else {
        Err(ImageError::UnsupportedFormat)
    }
}

/// Load and parse image data from raw bytes.
pub fn load_image(data: Vec<u8>) -> Result<ImageData, ImageError> {
    match detect_format(&data)? {
        ImageFormat::Jpeg => parse_jpeg(data),
        ImageFormat::Png => parse_png(&data),
    }
}

/// JPEG data is embedded as-is (DCTDecode); only the frame header
/// is read for dimensions and component count.
fn parse_jpeg(data: Vec<u8>) -> Result<ImageData, ImageError> {
    let (width, height, components) = jpeg_dimensions(&data)?;
    let color_space = match components {
        1 => ColorSpace::DeviceGray,
        3 => ColorSpace::DeviceRGB,
        n => return Err(ImageError::JpegComponents(n)),
    };

    Ok(ImageData {
        width,
        height,
        format: ImageFormat::Jpeg,
        color_space,
        data,
        smask_data: None,
    })
}

/// Scan JPEG data for SOF0-SOF3 markers and extract width/height/components.
fn jpeg_dimensions(data: &[u8]) -> Result<(u32, u32, u8), ImageError> {
    let len = data.len();
    let mut i = 0;
    while i + 1 < len {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }
        let marker = data[i + 1];
        if (0xC0..=0xC3).contains(&marker) {
            if i + 9 >= len {
                return Err(ImageError::JpegTruncated);
            }
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Ok((width, height, data[i + 9]));
        }
        match marker {
            // Fill bytes and stuffed zeros.
            0xFF | 0x00 => i += 1,
            // Standalone markers carry no length.
            0xD8 | 0xD9 | 0xD0..=0xD7 => i += 2,
            _ => {
                if i + 3 >= len {
                    break;
                }
                let seg_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
                i += 2 + seg_len;
            }
        }
    }
    Err(ImageError::JpegNoFrame)
}

/// Decode PNG to 8-bit gray or RGB samples plus an optional alpha mask.
fn parse_png(data: &[u8]) -> Result<ImageData, ImageError> {
    let mut decoder = png::Decoder::new(data);
    // Palette and sub-byte depths expand to 8 bits; 16-bit is stripped.
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    let (color_space, channels, has_alpha) = match info.color_type {
        png::ColorType::Rgb => (ColorSpace::DeviceRGB, 3, false),
        png::ColorType::Rgba => (ColorSpace::DeviceRGB, 4, true),
        png::ColorType::Grayscale => (ColorSpace::DeviceGray, 1, false),
        png::ColorType::GrayscaleAlpha => (ColorSpace::DeviceGray, 2, true),
        other => return Err(ImageError::PngColorType(format!("{:?}", other))),
    };

    let (pixels, smask_data) = if has_alpha {
        let color_channels = channels - 1;
        let pixel_count = (info.width * info.height) as usize;
        let mut color = Vec::with_capacity(pixel_count * color_channels);
        let mut alpha = Vec::with_capacity(pixel_count);
        for px in buf.chunks_exact(channels) {
            color.extend_from_slice(&px[..color_channels]);
            alpha.push(px[color_channels]);
        }
        (color, Some(alpha))
    } else {
        (buf, None)
    };

    Ok(ImageData {
        width: info.width,
        height: info.height,
        format: ImageFormat::Png,
        color_space,
        data: pixels,
        smask_data,
    })
}

/// Resolve the displayed size of an image, fpdf style: a zero
/// dimension is derived from the other using the aspect ratio; when
/// both are zero the image is placed at 1 pixel = 1 point.
pub fn resolve_size(img_w: u32, img_h: u32, width: f64, height: f64) -> (f64, f64) {
    let iw = img_w.max(1) as f64;
    let ih = img_h.max(1) as f64;
    match (width > 0.0, height > 0.0) {
        (true, true) => (width, height),
        (true, false) => (width, width * ih / iw),
        (false, true) => (height * iw / ih, height),
        (false, false) => (iw, ih),
    }
}

fn deflate(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Build the alpha mask XObject for an image, if it has one.
pub(crate) fn smask_xobject(image: &ImageData) -> io::Result<Option<PdfObject>> {
    let Some(alpha) = &image.smask_data else {
        return Ok(None);
    };
    Ok(Some(PdfObject::stream(
        vec![
            ("Type", PdfObject::name("XObject")),
            ("Subtype", PdfObject::name("Image")),
            ("Width", PdfObject::Integer(image.width as i64)),
            ("Height", PdfObject::Integer(image.height as i64)),
            ("ColorSpace", PdfObject::name("DeviceGray")),
            ("BitsPerComponent", PdfObject::Integer(8)),
            ("Filter", PdfObject::name("FlateDecode")),
        ],
        deflate(alpha)?,
    )))
}

/// Build the image XObject. `smask` references the alpha mask object
/// written by the caller.
pub(crate) fn image_xobject(image: &ImageData, smask: Option<PdfObject>) -> io::Result<PdfObject> {
    let (filter, data) = match image.format {
        ImageFormat::Jpeg => ("DCTDecode", image.data.clone()),
        ImageFormat::Png => ("FlateDecode", deflate(&image.data)?),
    };
    let mut dict = vec![
        ("Type", PdfObject::name("XObject")),
        ("Subtype", PdfObject::name("Image")),
        ("Width", PdfObject::Integer(image.width as i64)),
        ("Height", PdfObject::Integer(image.height as i64)),
        ("ColorSpace", PdfObject::name(image.color_space.pdf_name())),
        ("BitsPerComponent", PdfObject::Integer(8)),
        ("Filter", PdfObject::name(filter)),
    ];
    if let Some(smask) = smask {
        dict.push(("SMask", smask));
    }
    Ok(PdfObject::stream(dict, data))
}
