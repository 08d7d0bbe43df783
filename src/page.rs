use crate::colour::Colour;
use crate::content::render_contents;
use crate::font::Font;
use crate::image::Image;
use crate::layout::Margins;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::shape::Shape;
use crate::units::*;
use crate::PDFError;
use id_arena::{Arena, Id};
use pdf_writer::types::{ActionType, AnnotationType};
use pdf_writer::{Content, Finish, Name, Pdf, Str};

/// Which font and size a span is set in
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub id: Id<Font>,
    pub size: Pt,
}

/// A run of text on a single line, positioned by its baseline origin
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: SpanFont,
    pub colour: Colour,
    pub coords: (Pt, Pt),
}

/// An image drawn to cover `frame`, optionally clipped to a shape
#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    pub image_id: Id<Image>,
    pub frame: Rect,
    pub clip: Option<Shape>,
}

/// A filled and/or stroked shape
#[derive(Clone, PartialEq, Debug)]
pub struct ShapeLayout {
    pub shape: Shape,
    pub fill: Option<Colour>,
    pub stroke: Option<(Colour, Pt)>,
}

/// A clickable area that opens a URI
#[derive(Clone, PartialEq, Debug)]
pub struct LinkLayout {
    pub area: Rect,
    pub uri: String,
}

#[derive(Clone, PartialEq, Debug)]
pub enum PageContents {
    Text(Vec<SpanLayout>),
    Image(ImageLayout),
    Shape(ShapeLayout),
    RawContent(Vec<u8>),
}

pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// Where content can live, i.e. within the margins
    pub content_box: Rect,
    /// Everything drawn on the page, in painting order
    pub contents: Vec<PageContents>,
    /// Link annotations, which sit above the contents
    pub links: Vec<LinkLayout>,
}

impl Page {
    pub fn new(size: PageSize, margins: Option<Margins>) -> Page {
        let (width, height) = size;
        let margins = margins.unwrap_or_else(Margins::empty);
        Page {
            media_box: Rect {
                x1: Pt(0.0),
                y1: Pt(0.0),
                x2: width,
                y2: height,
            },
            content_box: margins.frame(size),
            contents: Vec::default(),
            links: Vec::default(),
        }
    }

    pub fn width(&self) -> Pt {
        self.media_box.width()
    }

    pub fn height(&self) -> Pt {
        self.media_box.height()
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        // consecutive spans share one text block
        if let Some(PageContents::Text(spans)) = self.contents.last_mut() {
            spans.push(span);
        } else {
            self.contents.push(PageContents::Text(vec![span]));
        }
    }

    pub fn add_image(&mut self, image: ImageLayout) {
        self.contents.push(PageContents::Image(image));
    }

    pub fn add_shape(&mut self, shape: ShapeLayout) {
        self.contents.push(PageContents::Shape(shape));
    }

    /// Convenience for the most common shape: filled, no outline
    pub fn fill_shape(&mut self, shape: Shape, colour: Colour) {
        self.add_shape(ShapeLayout {
            shape,
            fill: Some(colour),
            stroke: None,
        });
    }

    pub fn add_link<S: Into<String>>(&mut self, area: Rect, uri: S) {
        self.links.push(LinkLayout {
            area,
            uri: uri.into(),
        });
    }

    /// Add arbitrary pdf_writer::Content to the page
    pub fn add_content(&mut self, content: Content) {
        self.contents
            .push(PageContents::RawContent(content.finish().to_vec()));
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        fonts: &Arena<Font>,
        images: &Arena<Image>,
        writer: &mut Pdf,
    ) -> Result<(), PDFError> {
        let id = refs.get_or_gen(RefType::Page(page_index));
        let parent = refs.get_or_gen(RefType::PageTree);
        let content_id = refs.gen(RefType::ContentForPage(page_index));
        let link_ids: Vec<_> = (0..self.links.len())
            .map(|i| refs.gen(RefType::LinkAnnotation(page_index, i)))
            .collect();

        let image_aspects = |id: Id<Image>| images.get(id).map(|image| image.aspect_ratio());
        let rendered = render_contents(&self.contents, fonts, image_aspects)?;

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.art_box(self.content_box.into());
        page.parent(parent);

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for (font_id, _) in fonts.iter() {
            let font_ref = refs.get_or_gen(RefType::Font(font_id.index()));
            resource_fonts.pair(Name(format!("F{}", font_id.index()).as_bytes()), font_ref);
        }
        resource_fonts.finish();
        let mut resource_xobjects = resources.x_objects();
        for (image_id, _) in images.iter() {
            let image_ref = refs.get_or_gen(RefType::Image(image_id.index()));
            resource_xobjects.pair(Name(format!("I{}", image_id.index()).as_bytes()), image_ref);
        }
        resource_xobjects.finish();
        resources.finish();

        page.contents(content_id);
        if !link_ids.is_empty() {
            page.annotations(link_ids.iter().copied());
        }
        page.finish();

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&rendered, 6);
        writer
            .stream(content_id, &compressed)
            .filter(pdf_writer::Filter::FlateDecode);

        for (link, link_id) in self.links.iter().zip(link_ids) {
            let mut annotation = writer.annotation(link_id);
            annotation.subtype(AnnotationType::Link);
            annotation.rect(link.area.into());
            annotation.border(0.0, 0.0, 0.0, None);
            annotation
                .action()
                .action_type(ActionType::Uri)
                .uri(Str(link.uri.as_bytes()));
        }

        Ok(())
    }
}
