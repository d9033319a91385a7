use pdf_core::{Color, PdfDocument};

fn render(build: impl FnOnce(&mut PdfDocument<Vec<u8>>)) -> String {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    doc.begin_page(595.0, 842.0).unwrap();
    build(&mut doc);
    let bytes = doc.end_document().unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[test]
fn stroke_line_produces_operators() {
    let output = render(|doc| {
        doc.move_to(100.0, 200.0)
            .unwrap()
            .line_to(300.0, 400.0)
            .unwrap()
            .stroke()
            .unwrap();
    });
    assert!(output.contains("100 200 m\n300 400 l\nS\n"));
}

#[test]
fn line_convenience_strokes() {
    let output = render(|doc| {
        doc.line(22.68, 694.49, 566.93, 694.49).unwrap();
    });
    assert!(output.contains("22.68 694.49 m\n566.93 694.49 l\nS\n"));
}

#[test]
fn color_operators() {
    let output = render(|doc| {
        doc.set_stroke_color(Color::rgb(1.0, 0.0, 0.0)).unwrap();
        doc.set_fill_color(Color::rgb(0.0, 0.5, 1.0)).unwrap();
    });
    assert!(output.contains("1 0 0 RG\n"));
    assert!(output.contains("0 0.5 1 rg\n"));
}

#[test]
fn brand_color_from_rgb8() {
    let output = render(|doc| {
        doc.set_fill_color(Color::from_rgb8(68, 54, 152)).unwrap();
    });
    assert!(output.contains("0.2667 0.2118 0.5961 rg\n"));
}

#[test]
fn gray_is_equal_components() {
    assert_eq!(Color::gray(0.25), Color::rgb(0.25, 0.25, 0.25));
}

#[test]
fn line_width_and_rect() {
    let output = render(|doc| {
        doc.set_line_width(0.85).unwrap();
        doc.rect(50.0, 50.0, 200.0, 100.0).unwrap().fill_stroke().unwrap();
    });
    assert!(output.contains("0.85 w\n"));
    assert!(output.contains("50 50 200 100 re\nB\n"));
}

#[test]
fn close_and_fill_path() {
    let output = render(|doc| {
        doc.move_to(0.0, 0.0).unwrap();
        doc.line_to(10.0, 0.0).unwrap();
        doc.line_to(10.0, 10.0).unwrap();
        doc.close_path().unwrap().fill().unwrap();
    });
    assert!(output.contains("h\nf\n"));
}

#[test]
fn save_restore_state() {
    let output = render(|doc| {
        doc.save_state()
            .unwrap()
            .set_line_width(3.0)
            .unwrap()
            .restore_state()
            .unwrap();
    });
    assert!(output.contains("q\n3 w\nQ\n"));
}

#[test]
fn graphics_only_page_has_no_font_resources() {
    let output = render(|doc| {
        doc.rect(0.0, 0.0, 10.0, 10.0).unwrap().stroke().unwrap();
    });
    assert!(!output.contains("/Font"));
    assert!(output.contains("/Resources <<"));
}
