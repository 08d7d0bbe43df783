//! Turns laid-out portfolio pages into a PDF [Document].

use super::layout::{sections, Flow, LaidOutPage, Node, TextMetrics, Weight, MARGIN};
use super::model::Portfolio;
use crate::layout::{baseline_offset, width_of_text, Margins};
use crate::{Document, Font, Image, ImageLayout, Info, Page, PDFError, Pt, SpanFont, SpanLayout};
use id_arena::Id;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Measures text with the two loaded portfolio fonts
struct FontPair<'f> {
    regular: &'f Font,
    bold: &'f Font,
}

impl FontPair<'_> {
    fn font(&self, weight: Weight) -> &Font {
        match weight {
            Weight::Regular => self.regular,
            Weight::Bold => self.bold,
        }
    }
}

impl TextMetrics for FontPair<'_> {
    fn width(&self, text: &str, weight: Weight, size: Pt) -> Pt {
        width_of_text(text, self.font(weight), size)
    }

    fn ascent(&self, weight: Weight, size: Pt) -> Pt {
        -baseline_offset(self.font(weight), size)
    }

    fn line_height(&self, weight: Weight, size: Pt) -> Pt {
        self.font(weight).line_height(size)
    }
}

/// Resolves asset paths and loads every image file only once, however many
/// times it is placed
struct Assets<'a> {
    dir: &'a Path,
    images: HashMap<PathBuf, Id<Image>>,
}

impl<'a> Assets<'a> {
    fn new(dir: &'a Path) -> Self {
        Assets {
            dir,
            images: HashMap::new(),
        }
    }

    /// Absolute paths are kept as they are
    fn resolve(&self, path: &Path) -> PathBuf {
        self.dir.join(path)
    }

    fn font(&self, path: &Path) -> Result<Font, PDFError> {
        let path = self.resolve(path);
        log::info!("loading font {}", path.display());
        Font::load_from_disk(&path)
    }

    fn image(&mut self, doc: &mut Document, path: &Path) -> Result<Id<Image>, PDFError> {
        let path = self.resolve(path);
        if let Some(&id) = self.images.get(&path) {
            return Ok(id);
        }
        log::info!("loading image {}", path.display());
        let id = doc.add_image(Image::new_from_disk(&path)?);
        self.images.insert(path, id);
        Ok(id)
    }
}

/// Lay out and render a portfolio. Fonts, the photo and screenshots are
/// resolved relative to `asset_dir`.
pub fn render(portfolio: &Portfolio, asset_dir: &Path) -> Result<Document, PDFError> {
    let mut assets = Assets::new(asset_dir);
    let mut doc = Document::default();
    let regular = doc.add_font(assets.font(&portfolio.theme.fonts.regular)?);
    let bold = doc.add_font(assets.font(&portfolio.theme.fonts.bold)?);

    let metrics = FontPair {
        regular: &doc.fonts[regular],
        bold: &doc.fonts[bold],
    };
    let flow = Flow::new(&metrics, portfolio.theme.palette);
    let page_size = flow.page_size();
    let laid_out = flow.layout(&sections(portfolio));
    log::debug!("laid out {} page(s)", laid_out.len());

    for (page_index, laid_out_page) in laid_out.into_iter().enumerate() {
        let LaidOutPage { nodes, bookmarks } = laid_out_page;
        let mut page = Page::new(page_size, Some(Margins::all(MARGIN)));

        for node in nodes {
            match node {
                Node::Shape { shape, fill } => page.fill_shape(shape, fill),
                Node::Text(text) => page.add_span(SpanLayout {
                    text: text.text,
                    font: SpanFont {
                        id: match text.weight {
                            Weight::Regular => regular,
                            Weight::Bold => bold,
                        },
                        size: text.size,
                    },
                    colour: text.colour,
                    coords: text.origin,
                }),
                Node::Image { path, frame, clip } => {
                    let image_id = assets.image(&mut doc, &path)?;
                    page.add_image(ImageLayout {
                        image_id,
                        frame,
                        clip: Some(clip),
                    });
                }
                Node::Link { area, uri } => page.add_link(area, uri),
            }
        }

        doc.add_page(page);
        for title in bookmarks {
            doc.add_bookmark(title, page_index);
        }
    }

    let mut info = Info::new();
    info.title(portfolio.title()).author(&portfolio.profile.name);
    if let Some(subject) = &portfolio.document.subject {
        info.subject(subject);
    }
    if let Some(keywords) = &portfolio.document.keywords {
        info.keywords(keywords);
    }
    doc.set_info(info);

    Ok(doc)
}

/// Render a portfolio and write it to `output`. The file is only created
/// once the whole document has rendered. Returns the number of pages.
pub fn generate(portfolio: &Portfolio, asset_dir: &Path, output: &Path) -> Result<usize, PDFError> {
    let doc = render(portfolio, asset_dir)?;
    let bytes = doc.to_bytes()?;
    std::fs::write(output, bytes)?;
    log::info!("wrote {} page(s) to {}", doc.page_count(), output.display());
    Ok(doc.page_count())
}

