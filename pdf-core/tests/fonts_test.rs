use pdf_core::{encode_win_ansi, BuiltinFont, FontMetrics, PdfDocument, TextStyle};

#[test]
fn bold_is_wider_than_regular() {
    let regular = FontMetrics::measure_text("Invoice", BuiltinFont::TimesRoman, 10.0);
    let bold = FontMetrics::measure_text("Invoice", BuiltinFont::TimesBold, 10.0);
    assert!(bold > regular);
}

#[test]
fn courier_is_monospace() {
    let a = FontMetrics::measure_text("iiii", BuiltinFont::Courier, 10.0);
    let b = FontMetrics::measure_text("WWWW", BuiltinFont::Courier, 10.0);
    assert_eq!(a, b);
    assert_eq!(a, 24.0);
}

#[test]
fn accented_letters_measure_like_base_letter() {
    let plain = FontMetrics::measure_text("Jons", BuiltinFont::Helvetica, 12.0);
    let accented = FontMetrics::measure_text("Jöns", BuiltinFont::Helvetica, 12.0);
    assert_eq!(plain, accented);
}

#[test]
fn win_ansi_maps_currency_signs() {
    assert_eq!(encode_win_ansi("€"), vec![0x80]);
    assert_eq!(encode_win_ansi("£5"), vec![0xA3, b'5']);
    assert_eq!(encode_win_ansi("Förfallodag"), b"F\xF6rfallodag".to_vec());
    assert_eq!(encode_win_ansi("→"), b"?".to_vec());
}

#[test]
fn non_ascii_text_is_octal_escaped_in_stream() {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    doc.begin_page(595.0, 842.0).unwrap();
    doc.place_text_styled("Jöns £", 10.0, 10.0, &TextStyle::default())
        .unwrap();
    let bytes = doc.end_document().unwrap();
    let output = String::from_utf8_lossy(&bytes);
    assert!(output.contains("(J\\366ns \\243) Tj"));
}

#[test]
fn symbol_font_has_no_win_ansi_encoding() {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    doc.begin_page(595.0, 842.0).unwrap();
    doc.place_text_styled("a", 10.0, 10.0, &TextStyle::new(BuiltinFont::Symbol, 10.0))
        .unwrap();
    let bytes = doc.end_document().unwrap();
    let output = String::from_utf8_lossy(&bytes);
    assert!(output.contains("/BaseFont /Symbol >>"));
}
