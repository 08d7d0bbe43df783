//! Turns page contents into a PDF content stream.

use crate::font::Font;
use crate::image::Image;
use crate::page::{ImageLayout, PageContents, ShapeLayout, SpanLayout};
use crate::transform::Transform;
use crate::PDFError;
use id_arena::{Arena, Id};
use pdf_writer::{Content, Name, Str};

/// Render page contents in painting order. Every item is wrapped in its own
/// save/restore pair, so colours, clips and transforms never leak into the
/// next item.
pub(crate) fn render_contents<A>(
    contents: &[PageContents],
    fonts: &Arena<Font>,
    aspect_ratio: A,
) -> Result<Vec<u8>, PDFError>
where
    A: Fn(Id<Image>) -> Option<f32>,
{
    let mut rendered: Vec<u8> = Vec::new();

    for item in contents.iter() {
        // raw bytes can't go through `Content`, so every item is its own segment
        if let PageContents::RawContent(raw) = item {
            rendered.extend_from_slice(b"q\n");
            rendered.extend_from_slice(raw);
            rendered.extend_from_slice(b"\nQ\n");
            continue;
        }

        let mut content = Content::new();
        content.save_state();
        match item {
            PageContents::Text(spans) => render_text_spans(&mut content, spans, fonts)?,
            PageContents::Shape(shape) => render_shape(&mut content, shape),
            PageContents::Image(image) => match aspect_ratio(image.image_id) {
                Some(ratio) => render_image(&mut content, image, ratio),
                None => log::warn!("skipping image {:?}: not part of the document", image.image_id),
            },
            PageContents::RawContent(_) => unreachable!("raw content is handled above"),
        }
        content.restore_state();
        rendered.extend_from_slice(&content.finish());
    }

    Ok(rendered)
}

fn render_text_spans(
    content: &mut Content,
    spans: &[SpanLayout],
    fonts: &Arena<Font>,
) -> Result<(), PDFError> {
    let mut current_font = None;
    let mut current_colour = None;

    content.begin_text();
    for span in spans.iter() {
        let Some(font) = fonts.get(span.font.id) else {
            log::warn!("skipping span {:?}: font is not part of the document", span.text);
            continue;
        };

        if current_font != Some(span.font) {
            let name = format!("F{}", span.font.id.index());
            content.set_font(Name(name.as_bytes()), *span.font.size);
            current_font = Some(span.font);
        }
        if current_colour != Some(span.colour) {
            span.colour.apply_fill(content);
            current_colour = Some(span.colour);
        }

        // absolute positioning: reset the text matrix for every span
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, *span.coords.0, *span.coords.1]);
        content.show(Str(&font.encode(&span.text)?));
    }
    content.end_text();

    Ok(())
}

fn render_shape(content: &mut Content, layout: &ShapeLayout) {
    if layout.fill.is_none() && layout.stroke.is_none() {
        return;
    }

    if let Some(colour) = layout.fill {
        colour.apply_fill(content);
    }
    if let Some((colour, width)) = layout.stroke {
        colour.apply_stroke(content);
        content.set_line_width(*width);
    }

    layout.shape.append_path(content);
    match (layout.fill.is_some(), layout.stroke.is_some()) {
        (true, true) => content.fill_nonzero_and_stroke(),
        (true, false) => content.fill_nonzero(),
        _ => content.stroke(),
    };
}

fn render_image(content: &mut Content, layout: &ImageLayout, aspect_ratio: f32) {
    // clip to the requested shape, or at least to the frame the image covers
    match layout.clip {
        Some(shape) => shape.append_path(content),
        None => crate::Shape::Rect(layout.frame).append_path(content),
    }
    content.clip_nonzero();
    content.end_path();

    let placement = Transform::cover(layout.frame, aspect_ratio);
    content.transform(placement.to_array());
    let name = format!("I{}", layout.image_id.index());
    content.x_object(Name(name.as_bytes()));
}
