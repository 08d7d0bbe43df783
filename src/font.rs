use crate::{
    refs::{ObjectReferences, RefType},
    PDFError, Pt,
};
use id_arena::Id;
use owned_ttf_parser::{AsFaceRef, Face, GlyphId, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Finish, Name, Pdf, Ref, Str,
};
use std::collections::BTreeMap;
use std::path::Path;

/// A parsed TrueType / OpenType face. The whole font file is embedded in the
/// generated PDF as a Type0 font with `Identity-H` encoding, so text is
/// written as big-endian glyph ids.
pub struct Font {
    pub face: OwnedFace,
}

/// Per-glyph data gathered from the cmap, ordered by glyph id
struct GlyphTable {
    /// glyph id => (first char mapping to it, horizontal advance in font units)
    glyphs: BTreeMap<u16, (char, u16)>,
}

impl Font {
    /// Load a font from raw bytes, returning an error if the font could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, PDFError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font { face })
    }

    /// Read and parse a font file
    pub fn load_from_disk<P: AsRef<Path>>(path: P) -> Result<Font, PDFError> {
        let bytes = std::fs::read(path.as_ref())?;
        log::debug!("loaded font {:?} ({} bytes)", path.as_ref(), bytes.len());
        Font::load(bytes)
    }

    fn face(&self) -> &Face<'_> {
        self.face.as_face_ref()
    }

    fn name_entry(&self, name_id: u16) -> Option<String> {
        self.face()
            .names()
            .into_iter()
            .find(|name| name.name_id == name_id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// The full name of the font, or "Unnamed" if the name table lacks one
    pub fn name(&self) -> String {
        self.name_entry(owned_ttf_parser::name_id::FULL_NAME)
            .unwrap_or_else(|| "Unnamed".to_string())
    }

    /// The family name of the font, falling back to the full name
    pub fn family(&self) -> String {
        self.name_entry(owned_ttf_parser::name_id::FAMILY)
            .unwrap_or_else(|| self.name())
    }

    fn scaling(&self, size: Pt) -> Pt {
        size / self.face().units_per_em() as f32
    }

    /// Distance from the baseline to the top of the font at the given size
    pub fn ascent(&self, size: Pt) -> Pt {
        self.scaling(size) * self.face().ascender() as f32
    }

    /// Distance from the baseline to the bottom of the font. Usually negative
    pub fn descent(&self, size: Pt) -> Pt {
        self.scaling(size) * self.face().descender() as f32
    }

    /// How far to move down from one baseline to the next
    pub fn line_height(&self, size: Pt) -> Pt {
        let face = self.face();
        self.scaling(size) * (face.line_gap() as f32 + face.ascender() as f32 - face.descender() as f32)
    }

    /// Width of `text` on a single line; newlines and unmapped characters are
    /// measured as the glyph that would be drawn in their place
    pub fn width_of(&self, text: &str, size: Pt) -> Pt {
        let units: u32 = text
            .chars()
            .filter(|&ch| ch != '\n')
            .filter_map(|ch| self.glyph_or_replacement(ch).ok())
            .map(|gid| self.face().glyph_hor_advance(GlyphId(gid)).unwrap_or_default() as u32)
            .sum();
        self.scaling(size) * units as f32
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face().glyph_index(ch).map(|i| i.0)
    }

    /// The glyph for `ch`, or U+FFFD, or '?', in that order of preference
    pub fn glyph_or_replacement(&self, ch: char) -> Result<u16, PDFError> {
        self.glyph_id(ch)
            .or_else(|| self.glyph_id('\u{FFFD}'))
            .or_else(|| self.glyph_id('?'))
            .ok_or(PDFError::MissingGlyph(ch))
    }

    /// Encode text as the 2-byte glyph ids an `Identity-H` font expects
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, PDFError> {
        let mut encoded = Vec::with_capacity(text.len() * 2);
        for ch in text.chars() {
            encoded.extend_from_slice(&self.glyph_or_replacement(ch)?.to_be_bytes());
        }
        Ok(encoded)
    }

    fn glyph_table(&self) -> GlyphTable {
        let face = self.face();
        let mut glyphs = BTreeMap::new();

        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables.into_iter().filter(|t| t.is_unicode()) {
                subtable.codepoints(|codepoint| {
                    let Ok(ch) = char::try_from(codepoint) else {
                        return;
                    };
                    let Some(gid) = subtable.glyph_index(codepoint).filter(|g| g.0 > 0) else {
                        return;
                    };
                    let advance = face.glyph_hor_advance(gid).unwrap_or_default();
                    glyphs.entry(gid.0).or_insert((ch, advance));
                });
            }
        }

        GlyphTable { glyphs }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, id: Id<Font>, writer: &mut Pdf) {
        let index = id.index();
        let table = self.glyph_table();
        let base_font = format!("F{index}");

        let descriptor_id = self.write_descriptor(refs, index, &table, writer);
        let cid_font_id = self.write_cid(refs, index, &base_font, descriptor_id, &table, writer);
        let to_unicode_id = write_to_unicode(refs, index, &table, writer);

        let font_id = refs.get_or_gen(RefType::Font(index));
        let mut font = writer.type0_font(font_id);
        font.base_font(Name(base_font.as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font_id);
        font.to_unicode(to_unicode_id);
    }

    fn write_cid(
        &self,
        refs: &mut ObjectReferences,
        index: usize,
        base_font: &str,
        descriptor_id: Ref,
        table: &GlyphTable,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::CidFont(index));
        let to_pdf_units = 1000.0 / self.face().units_per_em() as f32;

        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(CidFontType::Type2);
        cid_font.base_font(Name(base_font.as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(descriptor_id);
        cid_font.default_width(1000.0);
        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

        // group consecutive glyph ids into `start [w1 w2 ...]` runs
        let mut widths = cid_font.widths();
        let mut run_start: Option<u16> = None;
        let mut run: Vec<f32> = Vec::new();
        for (&gid, &(_, advance)) in table.glyphs.iter() {
            if let Some(start) = run_start {
                if gid as usize != start as usize + run.len() {
                    widths.consecutive(start, run.drain(..));
                    run_start = Some(gid);
                }
            } else {
                run_start = Some(gid);
            }
            run.push(advance as f32 * to_pdf_units);
        }
        if let Some(start) = run_start {
            widths.consecutive(start, run.drain(..));
        }
        widths.finish();

        id
    }

    fn write_descriptor(
        &self,
        refs: &mut ObjectReferences,
        index: usize,
        table: &GlyphTable,
        writer: &mut Pdf,
    ) -> Ref {
        let data_id = refs.gen(RefType::FontData(index));
        let data = self.face.as_slice();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(data, 6);
        writer
            .stream(data_id, &compressed)
            .filter(Filter::FlateDecode)
            .pair(Name(b"Length1"), data.len() as i32);

        let face = self.face();
        let to_pdf_units = 1000.0 / face.units_per_em() as f32;
        let advances: Vec<u16> = table.glyphs.values().map(|&(_, a)| a).collect();
        let max_width = advances.iter().copied().max().unwrap_or_default() as f32;
        let avg_width = if advances.is_empty() {
            0.0
        } else {
            advances.iter().map(|&a| a as f32).sum::<f32>() / advances.len() as f32
        };
        let bbox = face.global_bounding_box();

        let id = refs.gen(RefType::FontDescriptor(index));
        let mut descriptor = writer.font_descriptor(id);
        descriptor.name(Name(self.name().replace(' ', "").as_bytes()));
        descriptor.family(Str(self.family().as_bytes()));
        descriptor.weight(face.weight().to_number());

        let mut flags = FontFlags::NON_SYMBOLIC;
        if face.is_monospaced() {
            flags.insert(FontFlags::FIXED_PITCH);
        }
        if face.is_italic() {
            flags.insert(FontFlags::ITALIC);
        }
        descriptor.flags(flags);

        descriptor.bbox(pdf_writer::Rect {
            x1: bbox.x_min as f32 * to_pdf_units,
            y1: bbox.y_min as f32 * to_pdf_units,
            x2: bbox.x_max as f32 * to_pdf_units,
            y2: bbox.y_max as f32 * to_pdf_units,
        });
        descriptor.italic_angle(0.0);
        descriptor.ascent(face.ascender() as f32 * to_pdf_units);
        descriptor.descent(face.descender() as f32 * to_pdf_units);
        descriptor.leading(face.line_gap() as f32 * to_pdf_units);
        let cap_height = face.capital_height().unwrap_or(face.ascender());
        descriptor.cap_height(cap_height as f32 * to_pdf_units);
        descriptor.x_height(face.x_height().unwrap_or(cap_height) as f32 * to_pdf_units);
        // TrueType has no stem width; 80 is the usual regular-weight guess
        descriptor.stem_v(if face.is_bold() { 140.0 } else { 80.0 });
        descriptor.avg_width(avg_width * to_pdf_units);
        descriptor.max_width(max_width * to_pdf_units);
        descriptor.missing_width(max_width * to_pdf_units);
        descriptor.font_file2(data_id);
        descriptor.finish();

        id
    }
}

/// The ToUnicode CMap that lets viewers copy and search the embedded text
fn write_to_unicode(
    refs: &mut ObjectReferences,
    index: usize,
    table: &GlyphTable,
    writer: &mut Pdf,
) -> Ref {
    let id = refs.gen(RefType::ToUnicode(index));

    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );

    // bfchar blocks hold at most 100 entries
    let entries: Vec<(u16, char)> = table.glyphs.iter().map(|(&gid, &(ch, _))| (gid, ch)).collect();
    for block in entries.chunks(100) {
        cmap.push_str(&format!("{} beginbfchar\n", block.len()));
        for &(gid, ch) in block {
            let mut utf16 = [0u16; 2];
            let units: String = ch
                .encode_utf16(&mut utf16)
                .iter()
                .map(|unit| format!("{unit:04x}"))
                .collect();
            cmap.push_str(&format!("<{gid:04x}> <{units}>\n"));
        }
        cmap.push_str("endbfchar\n");
    }
    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");

    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(cmap.as_bytes(), 6);
    writer.stream(id, &compressed).filter(Filter::FlateDecode);

    id
}
