/// Font identifier for the 14 standard PDF fonts.
/// These fonts are guaranteed available in all PDF viewers
/// without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
    Symbol,
    ZapfDingbats,
}

impl BuiltinFont {
    /// Returns the PDF resource name used in content streams
    /// (e.g. "F1"). Fixed mapping by variant order.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "F1",
            BuiltinFont::HelveticaBold => "F2",
            BuiltinFont::HelveticaOblique => "F3",
            BuiltinFont::HelveticaBoldOblique => "F4",
            BuiltinFont::TimesRoman => "F5",
            BuiltinFont::TimesBold => "F6",
            BuiltinFont::TimesItalic => "F7",
            BuiltinFont::TimesBoldItalic => "F8",
            BuiltinFont::Courier => "F9",
            BuiltinFont::CourierBold => "F10",
            BuiltinFont::CourierOblique => "F11",
            BuiltinFont::CourierBoldOblique => "F12",
            BuiltinFont::Symbol => "F13",
            BuiltinFont::ZapfDingbats => "F14",
        }
    }

    /// Returns the PDF BaseFont name (e.g. "Helvetica",
    /// "Times-Roman").
    pub fn pdf_base_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
            BuiltinFont::HelveticaOblique => "Helvetica-Oblique",
            BuiltinFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            BuiltinFont::TimesRoman => "Times-Roman",
            BuiltinFont::TimesBold => "Times-Bold",
            BuiltinFont::TimesItalic => "Times-Italic",
            BuiltinFont::TimesBoldItalic => "Times-BoldItalic",
            BuiltinFont::Courier => "Courier",
            BuiltinFont::CourierBold => "Courier-Bold",
            BuiltinFont::CourierOblique => "Courier-Oblique",
            BuiltinFont::CourierBoldOblique => "Courier-BoldOblique",
            BuiltinFont::Symbol => "Symbol",
            BuiltinFont::ZapfDingbats => "ZapfDingbats",
        }
    }

    /// Resolve a font family plus an fpdf-style style string made of
    /// `B` (bold) and `I` (italic), e.g. `("Times", "BI")`.
    ///
    /// Family names are case-insensitive; `Arial` is an alias for
    /// Helvetica. Returns `None` for unknown families.
    pub fn from_family(family: &str, style: &str) -> Option<BuiltinFont> {
        let style = style.to_ascii_uppercase();
        let bold = style.contains('B');
        let italic = style.contains('I');

        let font = match family.trim().to_ascii_lowercase().as_str() {
            "helvetica" | "arial" => match (bold, italic) {
                (false, false) => BuiltinFont::Helvetica,
                (true, false) => BuiltinFont::HelveticaBold,
                (false, true) => BuiltinFont::HelveticaOblique,
                (true, true) => BuiltinFont::HelveticaBoldOblique,
            },
            "times" | "times-roman" => match (bold, italic) {
                (false, false) => BuiltinFont::TimesRoman,
                (true, false) => BuiltinFont::TimesBold,
                (false, true) => BuiltinFont::TimesItalic,
                (true, true) => BuiltinFont::TimesBoldItalic,
            },
            "courier" => match (bold, italic) {
                (false, false) => BuiltinFont::Courier,
                (true, false) => BuiltinFont::CourierBold,
                (false, true) => BuiltinFont::CourierOblique,
                (true, true) => BuiltinFont::CourierBoldOblique,
            },
            "symbol" => BuiltinFont::Symbol,
            "zapfdingbats" => BuiltinFont::ZapfDingbats,
            _ => return None,
        };
        Some(font)
    }

    /// Symbol and ZapfDingbats carry their own encodings and must not
    /// be declared as WinAnsi.
    pub(crate) fn uses_win_ansi(&self) -> bool {
        !matches!(self, BuiltinFont::Symbol | BuiltinFont::ZapfDingbats)
    }
}

// Character widths for printable ASCII (32..=126) in units of 1/1000 em,
// sixteen per row. Source: Adobe AFM data.

const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const TIMES_ROMAN_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

const TIMES_BOLD_WIDTHS: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

const TIMES_ITALIC_WIDTHS: [u16; 95] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 675, 675, 675, 500,
    920, 611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833, 667, 722,
    611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556, 389, 278, 389, 422, 500,
    333, 500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722, 500, 500,
    500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389, 400, 275, 400, 541,
];

const TIMES_BOLD_ITALIC_WIDTHS: [u16; 95] = [
    250, 389, 555, 500, 500, 833, 778, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    832, 667, 667, 667, 722, 667, 667, 722, 778, 389, 500, 667, 611, 889, 722, 722,
    611, 722, 667, 556, 611, 722, 667, 889, 667, 611, 611, 333, 278, 333, 570, 500,
    333, 500, 500, 444, 500, 444, 333, 500, 556, 278, 278, 500, 278, 778, 556, 500,
    556, 556, 389, 389, 278, 556, 444, 667, 500, 444, 389, 348, 220, 348, 570,
];

/// Courier uses a uniform width of 600 for all characters.
const COURIER_WIDTH: u16 = 600;

/// Default width for characters outside the mapped range (1/1000 em).
const DEFAULT_WIDTH: u16 = 278;

/// Font metrics for built-in PDF fonts.
pub struct FontMetrics;

impl FontMetrics {
    /// Returns the width of a character in 1/1000 em units.
    ///
    /// Latin-1 letters are measured as their unaccented base letter and
    /// currency signs as a digit, which matches the AFM data closely
    /// enough for alignment.
    pub fn char_width(font: BuiltinFont, ch: char) -> u16 {
        let table = match font {
            BuiltinFont::Courier
            | BuiltinFont::CourierBold
            | BuiltinFont::CourierOblique
            | BuiltinFont::CourierBoldOblique => return COURIER_WIDTH,
            BuiltinFont::Symbol | BuiltinFont::ZapfDingbats => return DEFAULT_WIDTH,
            BuiltinFont::Helvetica | BuiltinFont::HelveticaOblique => &HELVETICA_WIDTHS,
            BuiltinFont::HelveticaBold | BuiltinFont::HelveticaBoldOblique => {
                &HELVETICA_BOLD_WIDTHS
            }
            BuiltinFont::TimesRoman => &TIMES_ROMAN_WIDTHS,
            BuiltinFont::TimesBold => &TIMES_BOLD_WIDTHS,
            BuiltinFont::TimesItalic => &TIMES_ITALIC_WIDTHS,
            BuiltinFont::TimesBoldItalic => &TIMES_BOLD_ITALIC_WIDTHS,
        };

        let code = base_char(ch) as u32;
        if !(32..=126).contains(&code) {
            return DEFAULT_WIDTH;
        }
        table[(code - 32) as usize]
    }

    /// Measures the width of a text string in points.
    pub fn measure_text(text: &str, font: BuiltinFont, font_size: f64) -> f64 {
        let total: u32 = text
            .chars()
            .map(|ch| Self::char_width(font, ch) as u32)
            .sum();
        total as f64 * font_size / 1000.0
    }
}

/// Map a character to the ASCII character whose width it shares.
fn base_char(ch: char) -> char {
    match ch {
        'À'..='Å' => 'A',
        'Æ' => 'E',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ð' => 'D',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'ß' => 'B',
        'à'..='å' => 'a',
        'æ' => 'e',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        '€' | '£' | '¥' | '¢' => '0',
        '\u{a0}' => ' ',
        '–' => '-',
        '‘' | '’' => '\'',
        '“' | '”' => '"',
        other => other,
    }
}

/// Windows-1252 code points 0x80..=0x9F; `None` marks undefined slots.
const WIN_ANSI_HIGH: [Option<char>; 32] = [
    Some('€'), None, Some('‚'), Some('ƒ'), Some('„'), Some('…'), Some('†'), Some('‡'),
    Some('ˆ'), Some('‰'), Some('Š'), Some('‹'), Some('Œ'), None, Some('Ž'), None,
    None, Some('‘'), Some('’'), Some('“'), Some('”'), Some('•'), Some('–'), Some('—'),
    Some('˜'), Some('™'), Some('š'), Some('›'), Some('œ'), None, Some('ž'), Some('Ÿ'),
];

/// Encode text as WinAnsiEncoding (Windows-1252) bytes for the
/// standard Type1 fonts. Characters with no WinAnsi code become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| {
            let code = ch as u32;
            if code < 0x80 || (0xA0..=0xFF).contains(&code) {
                return code as u8;
            }
            WIN_ANSI_HIGH
                .iter()
                .position(|&slot| slot == Some(ch))
                .map(|i| 0x80 + i as u8)
                .unwrap_or(b'?')
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_and_style_resolve() {
        assert_eq!(
            BuiltinFont::from_family("Helvetica", ""),
            Some(BuiltinFont::Helvetica)
        );
        assert_eq!(
            BuiltinFont::from_family("helvetica", "BI"),
            Some(BuiltinFont::HelveticaBoldOblique)
        );
        assert_eq!(
            BuiltinFont::from_family("Times", "B"),
            Some(BuiltinFont::TimesBold)
        );
        assert_eq!(
            BuiltinFont::from_family("Arial", "i"),
            Some(BuiltinFont::HelveticaOblique)
        );
        assert_eq!(
            BuiltinFont::from_family("Courier", "IB"),
            Some(BuiltinFont::CourierBoldOblique)
        );
        assert_eq!(BuiltinFont::from_family("Comic Sans", ""), None);
    }

    #[test]
    fn ascii_widths_come_from_tables() {
        assert_eq!(FontMetrics::char_width(BuiltinFont::Helvetica, 'A'), 667);
        assert_eq!(FontMetrics::char_width(BuiltinFont::TimesBold, 'W'), 1000);
        assert_eq!(FontMetrics::char_width(BuiltinFont::CourierBold, 'i'), 600);
    }

    #[test]
    fn accented_letters_use_base_width() {
        assert_eq!(
            FontMetrics::char_width(BuiltinFont::TimesRoman, 'ö'),
            FontMetrics::char_width(BuiltinFont::TimesRoman, 'o')
        );
        assert_eq!(FontMetrics::char_width(BuiltinFont::Helvetica, '€'), 556);
    }

    #[test]
    fn measure_text_scales_with_size() {
        // "Hi" in Helvetica: 722 + 222 = 944 units.
        let w = FontMetrics::measure_text("Hi", BuiltinFont::Helvetica, 10.0);
        assert!((w - 9.44).abs() < 1e-9);
    }

    #[test]
    fn win_ansi_maps_currency_and_latin1() {
        assert_eq!(encode_win_ansi("abc"), b"abc".to_vec());
        assert_eq!(encode_win_ansi("€"), vec![0x80]);
        assert_eq!(encode_win_ansi("£"), vec![0xA3]);
        assert_eq!(encode_win_ansi("Förfallodag"), b"F\xf6rfallodag".to_vec());
        assert_eq!(encode_win_ansi("—"), vec![0x97]);
        assert_eq!(encode_win_ansi("₹"), b"?".to_vec());
    }
}
