//! Turns portfolio content into positioned drawing nodes, page by page.
//!
//! The portfolio is a linear sequence of [Block]s. A [Flow] places them top
//! down inside the page frame, starting a new page whenever the next block
//! would cross the bottom margin. Everything here is measured through
//! [TextMetrics], so layouts can be computed (and tested) without loading
//! any font files.

use super::model::{Certificate, Contact, Portfolio, Project, Showcase};
use super::theme::Palette;
use crate::layout::{wrap_greedy, Margins};
use crate::pagesize::{self, PageSize};
use crate::{Colour, Pt, Rect, Shape};
use std::path::PathBuf;

pub const MARGIN: Pt = Pt(50.0);
const BLOCK_GAP: Pt = Pt(20.0);

const HEADER_HEIGHT: Pt = Pt(240.0);
/// Content after the banner starts this far below the top of the page
const BANNER_DEPTH: Pt = Pt(280.0);
const PHOTO_RADIUS: Pt = Pt(35.0);

const SKILL_SIZE: (Pt, Pt) = (Pt(150.0), Pt(42.0));
const SKILL_GAP: Pt = Pt(20.0);

const CERTIFICATE_SIZE: (Pt, Pt) = (Pt(240.0), Pt(75.0));
const CERTIFICATE_GAP: Pt = Pt(20.0);

const SHOWCASE_SIZE: (Pt, Pt) = (Pt(220.0), Pt(100.0));
const SHOWCASE_GAP: Pt = Pt(30.0);

const CARD_PADDING: Pt = Pt(18.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weight {
    Regular,
    Bold,
}

/// Font measurements the layout needs, for each weight at any size
pub trait TextMetrics {
    /// Advance width of `text` on a single line
    fn width(&self, text: &str, weight: Weight, size: Pt) -> Pt;
    /// Distance from the top of a line to its baseline
    fn ascent(&self, weight: Weight, size: Pt) -> Pt;
    /// Distance from one baseline to the next
    fn line_height(&self, weight: Weight, size: Pt) -> Pt;
}

/// A single line of text, positioned by the left end of its baseline
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub text: String,
    pub weight: Weight,
    pub size: Pt,
    pub colour: Colour,
    pub origin: (Pt, Pt),
}

/// Drawing primitives, in painting order
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Shape { shape: Shape, fill: Colour },
    Text(TextNode),
    /// An image file scaled to cover `frame`, clipped to `clip`
    Image { path: PathBuf, frame: Rect, clip: Shape },
    Link { area: Rect, uri: String },
}

/// A self-contained piece of the portfolio that is never split across pages
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// The full-width header band with photo, name and title. Only placed
    /// at the top of the first page.
    Banner {
        name: String,
        title: String,
        photo: Option<PathBuf>,
    },
    /// A section title. Always kept on the same page as the block after it,
    /// and bookmarked.
    Heading { text: String, size: Pt },
    Paragraph { text: String, size: Pt },
    SkillRow(Vec<String>),
    /// Up to two certificate cards side by side
    CertificateRow(Vec<Certificate>),
    ProjectCard(Project),
    /// Up to two screenshots side by side
    ShowcaseRow(Vec<Showcase>),
    ContactCard(Contact),
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct LaidOutPage {
    pub nodes: Vec<Node>,
    /// Titles of the sections that start on this page
    pub bookmarks: Vec<String>,
}

/// The sequence of blocks for a portfolio, section by section. Empty
/// sections are left out entirely.
pub fn sections(portfolio: &Portfolio) -> Vec<Block> {
    let heading = |text: &str, size: f32| Block::Heading {
        text: text.to_string(),
        size: Pt(size),
    };

    let mut blocks = vec![Block::Banner {
        name: portfolio.profile.name.clone(),
        title: portfolio.profile.title.clone(),
        photo: portfolio.profile.photo.clone(),
    }];

    if !portfolio.overview.trim().is_empty() {
        blocks.push(heading("Professional Overview", 15.0));
        blocks.push(Block::Paragraph {
            text: portfolio.overview.clone(),
            size: Pt(11.0),
        });
    }

    if !portfolio.skills.is_empty() {
        blocks.push(heading("Core Skills", 14.0));
        blocks.push(Block::SkillRow(portfolio.skills.clone()));
    }

    if !portfolio.certificates.is_empty() {
        blocks.push(heading("Certificates & Achievements", 14.0));
        blocks.extend(
            portfolio
                .certificates
                .chunks(2)
                .map(|row| Block::CertificateRow(row.to_vec())),
        );
    }

    if !portfolio.projects.is_empty() {
        blocks.push(heading("Fun Projects & Learning", 14.0));
        blocks.extend(portfolio.projects.iter().cloned().map(Block::ProjectCard));
    }

    if !portfolio.showcase.is_empty() {
        blocks.push(heading("Project Showcase", 14.0));
        blocks.extend(
            portfolio
                .showcase
                .chunks(2)
                .map(|row| Block::ShowcaseRow(row.to_vec())),
        );
    }

    if let Some(contact) = &portfolio.contact {
        blocks.push(heading("Get in Touch", 14.0));
        blocks.push(Block::ContactCard(contact.clone()));
    }

    blocks
}

/// Where a block is being placed
#[derive(Debug, Clone, Copy)]
struct Region {
    x: Pt,
    top: Pt,
    width: Pt,
    page: PageSize,
}

/// A drawn block. `extent` is how far it reaches below its top, `advance`
/// also includes the spacing before whatever comes next.
struct Placed {
    nodes: Vec<Node>,
    extent: Pt,
    advance: Pt,
}

struct Painter<'a, M: ?Sized> {
    metrics: &'a M,
    palette: &'a Palette,
    nodes: Vec<Node>,
}

impl<M: TextMetrics + ?Sized> Painter<'_, M> {
    fn fill(&mut self, shape: Shape, fill: Colour) {
        self.nodes.push(Node::Shape { shape, fill });
    }

    fn text(&mut self, text: &str, weight: Weight, size: Pt, colour: Colour, origin: (Pt, Pt)) {
        self.nodes.push(Node::Text(TextNode {
            text: text.to_string(),
            weight,
            size,
            colour,
            origin,
        }));
    }

    fn centred(&mut self, text: &str, weight: Weight, size: Pt, colour: Colour, (cx, y): (Pt, Pt)) {
        let width = self.metrics.width(text, weight, size);
        self.text(text, weight, size, colour, (cx - width / 2.0, y));
    }

    fn link(&mut self, area: Rect, uri: &str) {
        self.nodes.push(Node::Link {
            area,
            uri: uri.to_string(),
        });
    }

    /// Greedily wrapped lines hanging down from `top`. Returns the height used.
    fn paragraph(
        &mut self,
        text: &str,
        weight: Weight,
        size: Pt,
        colour: Colour,
        (x, top): (Pt, Pt),
        max_width: Pt,
    ) -> Pt {
        let metrics = self.metrics;
        let ascent = metrics.ascent(weight, size);
        let line_height = metrics.line_height(weight, size);

        let mut used = Pt(0.0);
        for line in wrap_greedy(text, max_width, |s| metrics.width(s, weight, size)) {
            self.text(&line, weight, size, colour, (x, top - used - ascent));
            used += line_height;
        }
        used
    }

    /// Put a card background behind everything drawn since `start`
    fn card_behind(&mut self, start: usize, card: Rect, fill: Colour) {
        self.nodes.insert(
            start,
            Node::Shape {
                shape: Shape::rounded(card, Pt(12.0)),
                fill,
            },
        );
    }
}

impl Block {
    fn draw<M: TextMetrics + ?Sized>(&self, metrics: &M, palette: &Palette, region: Region) -> Placed {
        let mut painter = Painter {
            metrics,
            palette,
            nodes: Vec::new(),
        };
        let (extent, spacing) = match self {
            Block::Banner { name, title, photo } => {
                (draw_banner(&mut painter, region, name, title, photo.as_ref()), Pt(0.0))
            }
            Block::Heading { text, size } => {
                let ascent = metrics.ascent(Weight::Bold, *size);
                painter.text(text, Weight::Bold, *size, palette.primary, (region.x, region.top - ascent));
                (metrics.line_height(Weight::Bold, *size), Pt(10.0))
            }
            Block::Paragraph { text, size } => {
                let used = painter.paragraph(
                    text,
                    Weight::Regular,
                    *size,
                    palette.primary,
                    (region.x, region.top),
                    region.width,
                );
                (used, Pt(24.0))
            }
            Block::SkillRow(skills) => (draw_skills(&mut painter, region, skills), Pt(38.0)),
            Block::CertificateRow(certificates) => {
                (draw_certificates(&mut painter, region, certificates), CERTIFICATE_GAP)
            }
            Block::ProjectCard(project) => (draw_project(&mut painter, region, project), BLOCK_GAP),
            Block::ShowcaseRow(items) => (draw_showcase(&mut painter, region, items), BLOCK_GAP),
            Block::ContactCard(contact) => (draw_contact(&mut painter, region, contact), BLOCK_GAP),
        };

        Placed {
            nodes: painter.nodes,
            extent,
            advance: extent + spacing,
        }
    }
}

fn draw_banner<M: TextMetrics + ?Sized>(
    p: &mut Painter<'_, M>,
    region: Region,
    name: &str,
    title: &str,
    photo: Option<&PathBuf>,
) -> Pt {
    let (page_width, page_height) = region.page;
    let palette = p.palette;

    p.fill(
        Shape::Rect(Rect::from_origin(Pt(0.0), page_height - HEADER_HEIGHT, page_width, HEADER_HEIGHT)),
        palette.soft_green,
    );

    let centre = (region.x + Pt(40.0), page_height - Pt(120.0));
    let circle = Shape::circle(centre, PHOTO_RADIUS);
    match photo {
        Some(path) => p.nodes.push(Node::Image {
            path: path.clone(),
            frame: circle.bounds(),
            clip: circle,
        }),
        None => {
            p.fill(circle, palette.white);
            p.centred("Profile", Weight::Regular, Pt(8.0), palette.primary, (centre.0, centre.1 - Pt(5.0)));
        }
    }

    let text_x = region.x + Pt(100.0);
    p.text(name, Weight::Bold, Pt(22.0), palette.primary, (text_x, page_height - Pt(95.0)));

    // long titles wrap beneath the name, inside the band
    let title_size = Pt(12.0);
    let title_top = page_height - Pt(125.0) + p.metrics.ascent(Weight::Regular, title_size);
    let title_width = region.x + region.width - text_x;
    p.paragraph(title, Weight::Regular, title_size, palette.primary, (text_x, title_top), title_width);

    (region.top - (page_height - BANNER_DEPTH)).max(Pt(0.0))
}

fn draw_skills<M: TextMetrics + ?Sized>(p: &mut Painter<'_, M>, region: Region, skills: &[String]) -> Pt {
    if skills.is_empty() {
        return Pt(0.0);
    }

    let (width, height) = SKILL_SIZE;
    let per_row = (((region.width + SKILL_GAP) / (width + SKILL_GAP)).floor() as usize).max(1);
    let palette = p.palette;

    for (i, skill) in skills.iter().enumerate() {
        let (row, col) = (i / per_row, i % per_row);
        let card = Rect::from_top_left(
            region.x + (width + SKILL_GAP) * col as f32,
            region.top - (height + SKILL_GAP) * row as f32,
            width,
            height,
        );
        p.fill(Shape::rounded(card, Pt(10.0)), palette.accent);
        p.centred(skill, Weight::Bold, Pt(11.0), palette.primary, (card.centre().0, card.y2 - Pt(27.0)));
    }

    let rows = skills.len().div_ceil(per_row);
    height * rows as f32 + SKILL_GAP * (rows - 1) as f32
}

fn draw_certificates<M: TextMetrics + ?Sized>(
    p: &mut Painter<'_, M>,
    region: Region,
    certificates: &[Certificate],
) -> Pt {
    let (width, height) = CERTIFICATE_SIZE;
    let palette = p.palette;

    for (i, certificate) in certificates.iter().take(2).enumerate() {
        let card = Rect::from_top_left(region.x + (width + CERTIFICATE_GAP) * i as f32, region.top, width, height);
        p.fill(Shape::rounded(card, Pt(12.0)), palette.card_bg);

        let bar = Rect::from_top_left(card.x1 + Pt(6.0), card.y2 - Pt(18.0), Pt(4.0), height - Pt(36.0));
        let accent = certificate.colour.unwrap_or(palette.accent);
        p.fill(Shape::rounded(bar, Pt(2.0)), accent);

        let text_x = card.x1 + Pt(15.0);
        p.text(&certificate.title, Weight::Bold, Pt(11.0), palette.primary, (text_x, card.y2 - Pt(28.0)));
        p.text(&certificate.subtitle, Weight::Regular, Pt(9.5), palette.primary, (text_x, card.y2 - Pt(48.0)));

        if let Some(url) = &certificate.url {
            p.text("Verify", Weight::Bold, Pt(9.0), palette.cta, (text_x, card.y2 - Pt(64.0)));
            p.link(card, url);
        }
    }

    if certificates.is_empty() {
        Pt(0.0)
    } else {
        height
    }
}

fn draw_project<M: TextMetrics + ?Sized>(p: &mut Painter<'_, M>, region: Region, project: &Project) -> Pt {
    let palette = p.palette;
    let metrics = p.metrics;
    let start = p.nodes.len();

    let inner_x = region.x + CARD_PADDING;
    let inner_width = region.width - CARD_PADDING * 2.0;
    let mut cursor = region.top - CARD_PADDING;

    let badge = Pt(28.0);
    let text_x = match &project.icon {
        Some(icon) => {
            let centre = (inner_x + badge / 2.0, cursor - badge / 2.0);
            p.fill(Shape::circle(centre, badge / 2.0), palette.accent);
            let baseline = centre.1 - metrics.ascent(Weight::Bold, Pt(12.0)) / 2.0;
            p.centred(icon, Weight::Bold, Pt(12.0), palette.white, (centre.0, baseline));
            inner_x + badge + Pt(12.0)
        }
        None => inner_x,
    };
    let heading_width = inner_x + inner_width - text_x;

    cursor -= p.paragraph(&project.title, Weight::Bold, Pt(13.0), palette.primary, (text_x, cursor), heading_width);
    if !project.subtitle.trim().is_empty() {
        cursor -= p.paragraph(&project.subtitle, Weight::Regular, Pt(10.0), palette.cta, (text_x, cursor), heading_width);
    }
    if project.icon.is_some() {
        cursor = cursor.min(region.top - CARD_PADDING - badge);
    }
    cursor -= Pt(6.0);

    cursor -= p.paragraph(&project.description, Weight::Regular, Pt(10.0), palette.primary, (inner_x, cursor), inner_width);

    if !project.tags.is_empty() {
        cursor -= Pt(8.0);
        let chip_height = Pt(18.0);
        let chip_gap = Pt(6.0);
        let mut x = inner_x;
        for tag in &project.tags {
            let chip_width = metrics.width(tag, Weight::Regular, Pt(9.0)) + Pt(16.0);
            if x > inner_x && x + chip_width > inner_x + inner_width {
                x = inner_x;
                cursor -= chip_height + chip_gap;
            }
            let chip = Rect::from_top_left(x, cursor, chip_width, chip_height);
            p.fill(Shape::rounded(chip, chip_height / 2.0), palette.soft_green);
            p.text(tag, Weight::Regular, Pt(9.0), palette.primary, (x + Pt(8.0), cursor - Pt(12.5)));
            x += chip_width + chip_gap;
        }
        cursor -= chip_height + chip_gap;
    }

    if !project.learned.trim().is_empty() {
        cursor -= Pt(4.0);
        cursor -= p.paragraph("What I learned", Weight::Bold, Pt(10.0), palette.primary, (inner_x, cursor), inner_width);
        cursor -= p.paragraph(&project.learned, Weight::Regular, Pt(10.0), palette.primary, (inner_x, cursor), inner_width);
    }

    let height = region.top - cursor + CARD_PADDING;
    let card = Rect::from_top_left(region.x, region.top, region.width, height);
    p.card_behind(start, card, palette.card_bg);
    height
}

fn draw_showcase<M: TextMetrics + ?Sized>(p: &mut Painter<'_, M>, region: Region, items: &[Showcase]) -> Pt {
    let (width, height) = SHOWCASE_SIZE;
    let palette = p.palette;
    let caption_space = Pt(24.0);

    for (i, item) in items.iter().take(2).enumerate() {
        let frame = Rect::from_top_left(region.x + (width + SHOWCASE_GAP) * i as f32, region.top, width, height);
        let clip = Shape::rounded(frame, Pt(14.0));
        match &item.image {
            Some(path) => p.nodes.push(Node::Image {
                path: path.clone(),
                frame,
                clip,
            }),
            None => {
                p.fill(clip, palette.soft_green);
                p.centred(
                    "Project Image",
                    Weight::Regular,
                    Pt(10.0),
                    palette.primary,
                    (frame.centre().0, frame.y2 - Pt(55.0)),
                );
            }
        }

        let caption_colour = if item.link.is_some() { palette.cta } else { palette.primary };
        p.text(&item.caption, Weight::Bold, Pt(10.0), caption_colour, (frame.x1, frame.y1 - Pt(16.0)));
        if let Some(link) = &item.link {
            let area = Rect {
                y1: frame.y1 - caption_space,
                ..frame
            };
            p.link(area, link);
        }
    }

    if items.is_empty() {
        Pt(0.0)
    } else {
        height + caption_space
    }
}

fn draw_contact<M: TextMetrics + ?Sized>(p: &mut Painter<'_, M>, region: Region, contact: &Contact) -> Pt {
    let palette = p.palette;
    let metrics = p.metrics;
    let start = p.nodes.len();

    let inner_x = region.x + CARD_PADDING;
    let inner_width = region.width - CARD_PADDING * 2.0;
    let mut cursor = region.top - CARD_PADDING;

    let email_size = Pt(11.0);
    let baseline = cursor - metrics.ascent(Weight::Regular, email_size);
    p.text(&contact.email, Weight::Regular, email_size, palette.cta, (inner_x, baseline));
    let email_width = metrics.width(&contact.email, Weight::Regular, email_size);
    let mailto = if contact.email.starts_with("mailto:") {
        contact.email.clone()
    } else {
        format!("mailto:{}", contact.email)
    };
    p.link(Rect::from_top_left(inner_x, cursor, email_width, metrics.line_height(Weight::Regular, email_size)), &mailto);
    cursor -= metrics.line_height(Weight::Regular, email_size);

    if !contact.location.trim().is_empty() {
        cursor -= p.paragraph(&contact.location, Weight::Regular, Pt(10.0), palette.primary, (inner_x, cursor), inner_width);
    }

    if !contact.links.is_empty() {
        cursor -= Pt(6.0);
        let size = Pt(10.0);
        let line_height = metrics.line_height(Weight::Bold, size);
        let mut x = inner_x;
        for link in &contact.links {
            let width = metrics.width(&link.label, Weight::Bold, size);
            if x > inner_x && x + width > inner_x + inner_width {
                x = inner_x;
                cursor -= line_height;
            }
            let baseline = cursor - metrics.ascent(Weight::Bold, size);
            p.text(&link.label, Weight::Bold, size, palette.cta, (x, baseline));
            p.link(Rect::from_top_left(x, cursor, width, line_height), &link.url);
            x += width + Pt(24.0);
        }
        cursor -= line_height;
    }

    let height = region.top - cursor + CARD_PADDING;
    let card = Rect::from_top_left(region.x, region.top, region.width, height);
    p.card_behind(start, card, palette.card_bg);
    height
}

/// Places blocks onto pages
pub struct Flow<'m, M: ?Sized> {
    metrics: &'m M,
    palette: Palette,
    page_size: PageSize,
    margins: Margins,
}

impl<'m, M: TextMetrics + ?Sized> Flow<'m, M> {
    /// A4 pages with a 50pt margin all round
    pub fn new(metrics: &'m M, palette: Palette) -> Self {
        Flow {
            metrics,
            palette,
            page_size: pagesize::A4,
            margins: Margins::all(MARGIN),
        }
    }

    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    fn draw(&self, block: &Block, top: Pt) -> Placed {
        let frame = self.margins.frame(self.page_size);
        let region = Region {
            x: frame.x1,
            top,
            width: frame.width(),
            page: self.page_size,
        };
        block.draw(self.metrics, &self.palette, region)
    }

    /// How far below `top` the block reaches, including the block after it
    /// if the two have to stay together
    fn reach(&self, blocks: &[Block], index: usize, placed: &Placed, top: Pt) -> Pt {
        match (&blocks[index], blocks.get(index + 1)) {
            (Block::Heading { .. }, Some(next)) => {
                placed.advance + self.draw(next, top - placed.advance).extent
            }
            _ => placed.extent,
        }
    }

    pub fn layout(&self, blocks: &[Block]) -> Vec<LaidOutPage> {
        let frame = self.margins.frame(self.page_size);
        let mut pages = Vec::new();
        let mut page = LaidOutPage::default();
        let mut top = frame.y2;
        // a heading that opened its page must not be left there alone
        let mut heading_opened_page = false;

        for (index, block) in blocks.iter().enumerate() {
            if let Block::Banner { .. } = block {
                if !pages.is_empty() || !page.nodes.is_empty() {
                    log::warn!("the banner can only open the first page, skipping it");
                    continue;
                }
            }

            let mut placed = self.draw(block, top);
            if top - self.reach(blocks, index, &placed, top) < frame.y1 {
                if top >= frame.y2 {
                    log::warn!("{} does not fit on a single page and will overflow it", block.describe());
                } else if heading_opened_page {
                    log::warn!("{} does not fit below its heading and will overflow the page", block.describe());
                } else {
                    log::debug!("page {} is full, starting a new page for {}", pages.len() + 1, block.describe());
                    pages.push(std::mem::take(&mut page));
                    top = frame.y2;
                    placed = self.draw(block, top);
                }
            }

            heading_opened_page = matches!(block, Block::Heading { .. }) && top >= frame.y2;
            if let Block::Heading { text, .. } = block {
                page.bookmarks.push(text.clone());
            }
            page.nodes.extend(placed.nodes);
            top -= placed.advance;
        }

        pages.push(page);
        pages
    }
}

impl Block {
    fn describe(&self) -> String {
        match self {
            Block::Banner { name, .. } => format!("the banner for {name:?}"),
            Block::Heading { text, .. } => format!("heading {text:?}"),
            Block::Paragraph { .. } => "a paragraph".to_string(),
            Block::SkillRow(_) => "the skills".to_string(),
            Block::CertificateRow(row) => format!("{} certificate(s)", row.len()),
            Block::ProjectCard(project) => format!("project {:?}", project.title),
            Block::ShowcaseRow(row) => format!("{} showcase image(s)", row.len()),
            Block::ContactCard(_) => "the contact card".to_string(),
        }
    }
}
