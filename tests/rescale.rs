use folio::rescale::{default_output_path, rescale_file, DEFAULT_TARGET_WIDTH};
use folio::{colours, Colour, Document, PDFError, Page, Pt, Rect, Shape};
use lopdf::Object;
use pretty_assertions::assert_eq;
use std::path::Path;

/// A tall, web-page-like document: wide pages with a card and a link each
fn case_study(pages: &[(f32, f32)]) -> Vec<u8> {
    let mut doc = Document::default();
    for &(width, height) in pages {
        let mut page = Page::new((Pt(width), Pt(height)), None);
        let card = Rect::from_top_left(Pt(100.0), Pt(height - 100.0), Pt(width - 200.0), Pt(400.0));
        page.fill_shape(Shape::rounded(card, Pt(24.0)), Colour::from_hex("#F7F6F4").unwrap());
        page.fill_shape(Shape::circle(card.centre(), Pt(50.0)), colours::BLACK);
        page.add_link(card, "https://example.com/case-study");
        doc.add_page(page);
    }
    doc.to_bytes().unwrap()
}

fn number(object: &Object) -> f32 {
    match object {
        Object::Integer(i) => *i as f32,
        Object::Real(r) => *r as f32,
        other => panic!("not a number: {other:?}"),
    }
}

fn media_boxes(path: &Path) -> Vec<Vec<f32>> {
    let doc = lopdf::Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| {
            let page = doc.get_dictionary(id).unwrap();
            page.get(b"MediaBox").unwrap().as_array().unwrap().iter().map(number).collect()
        })
        .collect()
}

fn assert_close(actual: f32, expected: f32) {
    assert!((actual - expected).abs() < 0.01, "{actual} != {expected}");
}

#[test]
fn every_page_becomes_a4_wide() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Homepage_case_study.pdf");
    std::fs::write(&input, case_study(&[(1440.0, 3200.0), (1440.0, 900.0), (595.0, 842.0)])).unwrap();

    let output = default_output_path(&input, DEFAULT_TARGET_WIDTH);
    let report = rescale_file(&input, &output, DEFAULT_TARGET_WIDTH).unwrap();
    assert_eq!(report.len(), 3);

    let boxes = media_boxes(&output);
    let expected_heights = [3200.0 * 595.0 / 1440.0, 900.0 * 595.0 / 1440.0, 842.0];
    for (media_box, expected_height) in boxes.iter().zip(expected_heights) {
        assert_close(media_box[0], 0.0);
        assert_close(media_box[1], 0.0);
        assert_close(media_box[2], 595.0);
        assert_close(media_box[3], expected_height);
    }
    for (page, expected_height) in report.iter().zip(expected_heights) {
        assert_eq!(page.rescaled.0, Pt(595.0));
        assert_close(*page.rescaled.1, expected_height);
    }
}

#[test]
fn custom_width_scales_up() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("small.pdf");
    let output = dir.path().join("large.pdf");
    std::fs::write(&input, case_study(&[(300.0, 400.0)])).unwrap();

    rescale_file(&input, &output, Pt(900.0)).unwrap();
    let boxes = media_boxes(&output);
    assert_close(boxes[0][2], 900.0);
    assert_close(boxes[0][3], 1200.0);
}

#[test]
fn links_survive_and_are_scaled() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("links.pdf");
    let output = dir.path().join("links_A4width.pdf");
    std::fs::write(&input, case_study(&[(1190.0, 1684.0)])).unwrap();

    rescale_file(&input, &output, DEFAULT_TARGET_WIDTH).unwrap();

    let doc = lopdf::Document::load(&output).unwrap();
    let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
    let annotations = doc.get_dictionary(page_id).unwrap().get(b"Annots").unwrap().as_array().unwrap().clone();
    assert_eq!(annotations.len(), 1);

    let annotation = doc.get_dictionary(annotations[0].as_reference().unwrap()).unwrap();
    let rect: Vec<f32> = annotation.get(b"Rect").unwrap().as_array().unwrap().iter().map(number).collect();
    // the card was 100pt in from the left and 990pt wide, at half scale
    assert_close(rect[0], 50.0);
    assert_close(rect[2], 545.0);
}

#[test]
fn missing_input_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.pdf");
    let result = rescale_file(&dir.path().join("nope.pdf"), &output, DEFAULT_TARGET_WIDTH);
    assert!(matches!(result, Err(PDFError::Io(_))));
    assert!(!output.exists());
}

#[test]
fn garbage_input_is_a_pdf_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("garbage.pdf");
    let output = dir.path().join("out.pdf");
    std::fs::write(&input, b"this is not a pdf").unwrap();

    let result = rescale_file(&input, &output, DEFAULT_TARGET_WIDTH);
    assert!(matches!(result, Err(PDFError::Lopdf(_))));
    assert!(!output.exists());
}
