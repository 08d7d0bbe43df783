use crate::{
    font::Font,
    image::Image,
    info::Info,
    outline::Outline,
    page::Page,
    refs::{ObjectReferences, RefType},
    PDFError,
};
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Pdf, Ref};
use std::io::Write;

/// A document is the main object that stores all the contents of the PDF
/// then renders it out with a call to [Document::write]
#[derive(Default)]
pub struct Document {
    pub info: Option<Info>,
    pub pages: Arena<Page>,
    pub page_order: Vec<Id<Page>>,
    pub fonts: Arena<Font>,
    pub images: Arena<Image>,
    pub outline: Outline,
}

impl Document {
    /// Sets information about the document. If not provided, no information
    /// block will be written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Append a page to the end of the document
    pub fn add_page(&mut self, page: Page) -> Id<Page> {
        let id = self.pages.alloc(page);
        self.page_order.push(id);
        id
    }

    pub fn page_count(&self) -> usize {
        self.page_order.len()
    }

    /// Fonts are stored document-wide; any page may refer to the returned id
    pub fn add_font(&mut self, font: Font) -> Id<Font> {
        self.fonts.alloc(font)
    }

    /// Images are stored document-wide and written once, however many times
    /// they are placed
    pub fn add_image(&mut self, image: Image) -> Id<Image> {
        self.images.alloc(image)
    }

    /// Add a bookmark pointing at the page with the given index. Viewers
    /// jump to the top of that page.
    pub fn add_bookmark<S: ToString>(&mut self, title: S, page_index: usize) {
        self.outline.add_bookmark(page_index, title.to_string());
    }

    /// Render the document to PDF bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, PDFError> {
        let mut refs = ObjectReferences::new();
        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        // every page, font and image gets its id up front so that pages can
        // refer to them before they are written
        let page_refs: Vec<Ref> = (0..self.page_order.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();
        for (id, _) in self.fonts.iter() {
            refs.gen(RefType::Font(id.index()));
        }
        for (id, _) in self.images.iter() {
            refs.gen(RefType::Image(id.index()));
        }

        let mut writer = Pdf::new();
        if let Some(info) = &self.info {
            info.write(&mut refs, &mut writer);
        }

        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs.iter().copied());

        for (id, font) in self.fonts.iter() {
            font.write(&mut refs, id, &mut writer);
        }
        for (id, image) in self.images.iter() {
            image.write(&mut refs, id.index(), &mut writer);
        }

        for (page_index, id) in self.page_order.iter().enumerate() {
            let page = self.pages.get(*id).ok_or(PDFError::PageMissing(page_index))?;
            page.write(&mut refs, page_index, &self.fonts, &self.images, &mut writer)?;
        }

        let outline_id = self.outline.write(&mut refs, &mut writer)?;

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        if let Some(outline_id) = outline_id {
            catalog.outlines(outline_id);
        }
        catalog.finish();

        Ok(writer.finish())
    }

    /// Write the entire document to the writer. The document is rendered in
    /// memory first, so nothing is written if rendering fails.
    pub fn write<W: Write>(&self, mut w: W) -> Result<(), PDFError> {
        let bytes = self.to_bytes()?;
        w.write_all(&bytes).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{colours, layout::Margins, pagesize, Pt, Rect, Shape};
    use pdf_writer::Content;

    #[test]
    fn shape_only_document_round_trips_through_lopdf() {
        let mut doc = Document::default();
        for _ in 0..3 {
            let mut page = Page::new(pagesize::A4, Some(Margins::all(Pt(50.0))));
            page.fill_shape(
                Shape::rounded(Rect::from_origin(Pt(50.0), Pt(50.0), Pt(240.0), Pt(75.0)), Pt(12.0)),
                colours::BLACK,
            );
            page.add_link(Rect::from_origin(Pt(50.0), Pt(50.0), Pt(240.0), Pt(75.0)), "https://example.com");
            doc.add_page(page);
        }
        doc.add_bookmark("Certificates", 1);
        doc.set_info(Info::new().title("Test").clone());

        let bytes = doc.to_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        let parsed = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 3);
    }

    #[test]
    fn bookmark_to_missing_page_is_an_error() {
        let mut doc = Document::default();
        doc.add_page(Page::new(pagesize::A4, None));
        doc.add_bookmark("Nowhere", 4);
        assert!(matches!(doc.to_bytes(), Err(PDFError::PageMissing(4))));
    }

    #[test]
    fn bookmarks_open_their_page_in_full() {
        let mut doc = Document::default();
        doc.add_page(Page::new(pagesize::A4, None));
        doc.add_page(Page::new(pagesize::A4, None));
        doc.add_bookmark("Second", 1);

        let parsed = lopdf::Document::load_mem(&doc.to_bytes().unwrap()).unwrap();
        let root = parsed.trailer.get(b"Root").and_then(lopdf::Object::as_reference).unwrap();
        let catalog = parsed.get_dictionary(root).unwrap();
        let outlines = parsed
            .get_dictionary(catalog.get(b"Outlines").unwrap().as_reference().unwrap())
            .unwrap();
        let first = parsed
            .get_dictionary(outlines.get(b"First").unwrap().as_reference().unwrap())
            .unwrap();

        let dest = first.get(b"Dest").unwrap().as_array().unwrap();
        assert_eq!(dest[0].as_reference().unwrap(), parsed.get_pages()[&2]);
        assert_eq!(dest[1].as_name().unwrap(), b"Fit");
    }

    #[test]
    fn pinned_creation_date_makes_output_reproducible() {
        let build = || {
            let mut doc = Document::default();
            let mut page = Page::new(pagesize::A4, None);
            let mut content = Content::new();
            content.move_to(0.0, 0.0).line_to(100.0, 100.0).stroke();
            page.add_content(content);
            doc.add_page(page);

            let created = chrono::DateTime::parse_from_rfc3339("2024-03-01T09:30:00+01:00").unwrap();
            doc.set_info(Info::new().title("Pinned").created(created).clone());

            let mut bytes = Vec::new();
            doc.write(&mut bytes).unwrap();
            bytes
        };

        let first = build();
        assert_eq!(first, build());
        assert!(String::from_utf8_lossy(&first).contains("D:20240301093000"));
    }
}
