use folio::portfolio::{generate, render, Portfolio, Showcase};
use folio::PDFError;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use lopdf::Object;
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

fn fixture_fonts() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/fonts")
}

/// The sample portfolio, set in fonts that ship with the tests
fn sample() -> Portfolio {
    let mut portfolio = Portfolio::sample().unwrap();
    portfolio.theme.fonts.regular = fixture_fonts().join("DejaVuSans.ttf");
    portfolio.theme.fonts.bold = fixture_fonts().join("DejaVuSans-Bold.ttf");
    portfolio
}

fn write_png(path: &Path, width: u32, height: u32) {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([184, 202, 147])))
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

fn string_entry(doc: &lopdf::Document, dict: &lopdf::Dictionary, key: &[u8]) -> Vec<u8> {
    let object = match dict.get(key).unwrap() {
        Object::Reference(id) => doc.get_object(*id).unwrap(),
        other => other,
    };
    object.as_str().unwrap().to_vec()
}

#[test]
fn sample_portfolio_is_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("Amritha_Portfolio.pdf");

    let pages = generate(&sample(), dir.path(), &output).unwrap();
    assert!(pages >= 2);

    let doc = lopdf::Document::load(&output).unwrap();
    assert_eq!(doc.get_pages().len(), pages);

    // A4 pages
    let (_, first_page) = doc.get_pages().into_iter().next().unwrap();
    let media_box = doc.get_dictionary(first_page).unwrap().get(b"MediaBox").unwrap().as_array().unwrap().len();
    assert_eq!(media_box, 4);

    // document info
    let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let info = doc.get_dictionary(info_id).unwrap();
    assert_eq!(string_entry(&doc, info, b"Title"), b"Amritha Preetha Anil Portfolio".to_vec());
    assert_eq!(string_entry(&doc, info, b"Author"), b"Amritha Preetha Anil".to_vec());

    // one bookmark per section
    let catalog_id = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
    let catalog = doc.get_dictionary(catalog_id).unwrap();
    let outlines_id = catalog.get(b"Outlines").unwrap().as_reference().unwrap();
    let outlines = doc.get_dictionary(outlines_id).unwrap();
    assert_eq!(outlines.get(b"Count").unwrap().as_i64().unwrap(), 6);
}

#[test]
fn rendering_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let first = render(&sample(), dir.path()).unwrap();
    let second = render(&sample(), dir.path()).unwrap();
    assert_eq!(first.page_count(), second.page_count());
    assert_eq!(first.outline.entries, second.outline.entries);
}

#[test]
fn images_are_embedded_once() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("photo.png"), 64, 64);
    write_png(&dir.path().join("timer.png"), 320, 180);

    let mut portfolio = sample();
    portfolio.profile.photo = Some(PathBuf::from("photo.png"));
    portfolio.showcase = vec![
        Showcase {
            image: Some(PathBuf::from("timer.png")),
            caption: "Aesthetic Egg Timer".into(),
            link: None,
        },
        Showcase {
            image: Some(PathBuf::from("timer.png")),
            caption: "Aesthetic Egg Timer, dark mode".into(),
            link: Some("https://example.com/timer".into()),
        },
    ];

    let doc = render(&portfolio, dir.path()).unwrap();
    assert_eq!(doc.images.len(), 2);

    let bytes = doc.to_bytes().unwrap();
    let parsed = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(parsed.get_pages().len(), doc.page_count());
}

#[test]
fn missing_photo_fails_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("Portfolio.pdf");

    let mut portfolio = sample();
    portfolio.profile.photo = Some(PathBuf::from("does-not-exist.jpg"));

    let result = generate(&portfolio, dir.path(), &output);
    assert!(matches!(result, Err(PDFError::Io(_))));
    assert!(!output.exists());
}

#[test]
fn missing_fonts_are_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let portfolio = Portfolio::sample().unwrap();
    assert!(matches!(render(&portfolio, dir.path()), Err(PDFError::Io(_))));
}

#[test]
fn custom_content_file() {
    let dir = tempfile::tempdir().unwrap();
    let content = dir.path().join("portfolio.json");
    std::fs::write(
        &content,
        format!(
            r##"{{
                "document": {{ "file_name": "Ada.pdf", "title": "Ada Lovelace" }},
                "theme": {{
                    "palette": {{ "primary": "#222" }},
                    "fonts": {{ "regular": {:?}, "bold": {:?} }}
                }},
                "profile": {{ "name": "Ada Lovelace", "title": "Analyst" }},
                "skills": ["Mathematics", "Poetical science"]
            }}"##,
            fixture_fonts().join("DejaVuSans.ttf"),
            fixture_fonts().join("DejaVuSans-Bold.ttf"),
        ),
    )
    .unwrap();

    let portfolio = Portfolio::from_path(&content).unwrap();
    assert_eq!(portfolio.title(), "Ada Lovelace");

    let output = dir.path().join(&portfolio.document.file_name);
    assert_eq!(generate(&portfolio, dir.path(), &output).unwrap(), 1);
    assert!(output.exists());
}
