//! Scales every page of an existing PDF so that it is exactly as wide as a
//! target width (A4 by default), keeping its aspect ratio.
//!
//! Pages are changed in place: the media box gets the new size and the
//! original content streams are wrapped in a scaling transform. Nothing is
//! re-rendered, so text stays text and vector art stays vector art.

use crate::pagesize::A4_WIDTH;
use crate::{PDFError, Pt};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// The width pages are rescaled to unless asked otherwise
pub const DEFAULT_TARGET_WIDTH: Pt = A4_WIDTH;

/// Boxes that would clip the rescaled content if left in their original
/// coordinates
const CLIPPING_BOXES: [&[u8]; 4] = [b"CropBox", b"BleedBox", b"TrimBox", b"ArtBox"];

/// What happened to one page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRescale {
    /// 1-based, as shown by viewers
    pub page_number: u32,
    pub original: (Pt, Pt),
    pub rescaled: (Pt, Pt),
}

impl PageRescale {
    pub fn scale(&self) -> f32 {
        self.rescaled.0 / self.original.0
    }
}

/// `report.pdf` becomes `report_A4width.pdf` in the same directory, or
/// `report_842ptwidth.pdf` for any width other than A4's
pub fn default_output_path(input: &Path, target_width: Pt) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    if target_width == A4_WIDTH {
        input.with_file_name(format!("{stem}_A4width.pdf"))
    } else {
        input.with_file_name(format!("{stem}_{}ptwidth.pdf", target_width.0))
    }
}

/// Rescale `input` and write the result to `output`. The output is only
/// written if every page could be rescaled.
pub fn rescale_file(input: &Path, output: &Path, target_width: Pt) -> Result<Vec<PageRescale>, PDFError> {
    log::info!("rescaling {} to {}pt wide", input.display(), target_width);
    let bytes = std::fs::read(input)?;
    let (rescaled, report) = rescale_bytes(&bytes, target_width)?;
    std::fs::write(output, rescaled)?;
    Ok(report)
}

pub fn rescale_bytes(input: &[u8], target_width: Pt) -> Result<(Vec<u8>, Vec<PageRescale>), PDFError> {
    let mut doc = Document::load_mem(input)?;
    let report = rescale_document(&mut doc, target_width)?;

    let mut output = Vec::new();
    doc.save_to(&mut output)?;
    Ok((output, report))
}

/// Rescale every page of an already loaded document
pub fn rescale_document(doc: &mut Document, target_width: Pt) -> Result<Vec<PageRescale>, PDFError> {
    if !target_width.is_finite() || target_width <= Pt(0.0) {
        return Err(PDFError::InvalidScale(format!(
            "target width must be a positive number of points, got {target_width}"
        )));
    }

    let mut scaled_annotations = HashSet::new();
    let mut report = Vec::new();
    for (page_number, page_id) in doc.get_pages() {
        report.push(rescale_page(doc, page_number, page_id, target_width, &mut scaled_annotations)?);
    }
    Ok(report)
}

fn rescale_page(
    doc: &mut Document,
    page_number: u32,
    page_id: ObjectId,
    target_width: Pt,
    scaled_annotations: &mut HashSet<ObjectId>,
) -> Result<PageRescale, PDFError> {
    let media_box = inherited_box(doc, page_id, b"MediaBox").ok_or(PDFError::MissingMediaBox(page_number))?;
    let (x1, y1, x2, y2) = media_box;
    let (width, height) = (x2 - x1, y2 - y1);
    if width <= 0.0 || height <= 0.0 {
        return Err(PDFError::InvalidScale(format!(
            "page {page_number} has an empty media box ({width} x {height})"
        )));
    }

    let scale = *target_width / width;
    let new_height = height * scale;
    log::debug!(
        "page {page_number}: {width} x {height} -> {} x {new_height} (scale {scale})",
        *target_width
    );

    let inherits_crop_box = inherited_box(doc, page_id, b"CropBox").is_some();
    let contents = content_refs(doc, page_id)?;
    let annotations = annotation_refs(doc, page_id)?;

    // the original content runs inside `q <scale> cm ... Q`
    let prefix = doc.add_object(Stream::new(
        Dictionary::new(),
        Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        real(scale),
                        real(0.0),
                        real(0.0),
                        real(scale),
                        real(-x1 * scale),
                        real(-y1 * scale),
                    ],
                ),
            ],
        }
        .encode()?,
    ));
    let suffix = doc.add_object(Stream::new(
        Dictionary::new(),
        Content {
            operations: vec![Operation::new("Q", vec![])],
        }
        .encode()?,
    ));

    let new_box = Object::Array(vec![real(0.0), real(0.0), real(*target_width), real(new_height)]);
    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page.set("MediaBox", new_box.clone());
    for key in CLIPPING_BOXES {
        page.remove(key);
    }
    if inherits_crop_box {
        page.set("CropBox", new_box);
    }

    let mut wrapped = vec![Object::Reference(prefix)];
    wrapped.extend(contents.into_iter().map(Object::Reference));
    wrapped.push(Object::Reference(suffix));
    page.set("Contents", Object::Array(wrapped));

    for annotation_id in annotations {
        // pages can share annotations, which must only be scaled once
        if scaled_annotations.insert(annotation_id) {
            scale_annotation(doc, annotation_id, (x1, y1), scale)?;
        }
    }

    Ok(PageRescale {
        page_number,
        original: (Pt(width), Pt(height)),
        rescaled: (target_width, Pt(new_height)),
    })
}

fn real(value: f32) -> Object {
    Object::Real(value.into())
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Read a rectangle as (x1, y1, x2, y2), normalised so that x1 <= x2 and
/// y1 <= y2
fn rectangle(doc: &Document, object: &Object) -> Option<(f32, f32, f32, f32)> {
    let Object::Array(values) = resolve(doc, object)? else {
        return None;
    };
    if values.len() != 4 {
        return None;
    }
    let mut coords = [0.0f32; 4];
    for (coord, value) in coords.iter_mut().zip(values) {
        *coord = number(resolve(doc, value)?)?;
    }
    let [ax, ay, bx, by] = coords;
    Some((ax.min(bx), ay.min(by), ax.max(bx), ay.max(by)))
}

/// Look a page box up on the page, then on its ancestors in the page tree
fn inherited_box(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<(f32, f32, f32, f32)> {
    let mut visited = HashSet::new();
    let mut node = doc.get_dictionary(page_id).ok()?;
    loop {
        if let Ok(value) = node.get(key) {
            return rectangle(doc, value);
        }
        let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
        if !visited.insert(parent) {
            return None;
        }
        node = doc.get_dictionary(parent).ok()?;
    }
}

/// The page's content streams, moving any stream stored inline into an
/// object of its own so it can be referenced
fn content_refs(doc: &mut Document, page_id: ObjectId) -> Result<Vec<ObjectId>, PDFError> {
    let contents = doc.get_dictionary(page_id)?.get(b"Contents").ok().cloned();
    let contents = match contents {
        None => return Ok(Vec::new()),
        Some(Object::Reference(id)) => match doc.get_object(id)? {
            Object::Array(items) => items.clone(),
            _ => return Ok(vec![id]),
        },
        Some(Object::Array(items)) => items,
        Some(other) => vec![other],
    };

    let mut ids = Vec::with_capacity(contents.len());
    for item in contents {
        match item {
            Object::Reference(id) => ids.push(id),
            Object::Stream(stream) => ids.push(doc.add_object(stream)),
            other => log::warn!("ignoring content entry that is not a stream: {other:?}"),
        }
    }
    Ok(ids)
}

/// The page's annotations, moving any annotation stored inline into an
/// object of its own so that every annotation is scaled the same way
fn annotation_refs(doc: &mut Document, page_id: ObjectId) -> Result<Vec<ObjectId>, PDFError> {
    let page = doc.get_dictionary(page_id)?;
    let items = match page.get(b"Annots").ok().and_then(|a| resolve(doc, a)) {
        Some(Object::Array(items)) => items.clone(),
        _ => return Ok(Vec::new()),
    };

    let has_inline = items.iter().any(|item| matches!(item, Object::Dictionary(_)));
    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Object::Reference(id) => ids.push(id),
            Object::Dictionary(annotation) => ids.push(doc.add_object(annotation)),
            other => log::warn!("ignoring annotation entry that is not a dictionary: {other:?}"),
        }
    }

    if has_inline {
        let annotations = ids.iter().copied().map(Object::Reference).collect();
        doc.get_object_mut(page_id)?
            .as_dict_mut()?
            .set("Annots", Object::Array(annotations));
    }
    Ok(ids)
}

fn scale_annotation(doc: &mut Document, id: ObjectId, origin: (f32, f32), scale: f32) -> Result<(), PDFError> {
    let Some(rect) = doc
        .get_object(id)
        .ok()
        .and_then(|a| a.as_dict().ok())
        .and_then(|a| a.get(b"Rect").ok())
        .and_then(|r| rectangle(doc, r))
    else {
        return Ok(());
    };

    let (ox, oy) = origin;
    let (x1, y1, x2, y2) = rect;
    let scaled = vec![
        real((x1 - ox) * scale),
        real((y1 - oy) * scale),
        real((x2 - ox) * scale),
        real((y2 - oy) * scale),
    ];
    doc.get_object_mut(id)?.as_dict_mut()?.set("Rect", Object::Array(scaled));
    Ok(())
}
