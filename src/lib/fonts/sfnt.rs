//! OpenType (TTF/OTF) reader built on skrifa.
//!
//! Outlines are drawn unhinted at the font's own units, so they live in the
//! same Y-up coordinate space as SVG font glyphs and go through the same
//! transform afterwards.

use super::LoadedFont;
use crate::model::{FontMetadata, RawGlyph};
use crate::unicode::encode_codepoint;
use log::{debug, trace, warn};
use read_fonts::types::GlyphId16;
use read_fonts::{FontRef as ReadFontRef, TableProvider};
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::string::StringId;
use skrifa::{FontRef, GlyphId, MetadataProvider};
use std::collections::HashMap;
use std::fmt::Write;

const NOTDEF_GLYPH_NAME: &str = ".notdef";

/// [`OutlinePen`] that records an absolute SVG path string.
#[derive(Debug, Default)]
pub struct SvgPathPen {
    path: String,
}

impl SvgPathPen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_path(self) -> String {
        self.path
    }

    fn push(&mut self, command: char, coords: &[f32]) {
        self.path.push(command);
        for (i, v) in coords.iter().enumerate() {
            if i > 0 {
                self.path.push(' ');
            }
            let _ = write!(self.path, "{}", v);
        }
    }
}

impl OutlinePen for SvgPathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.push('M', &[x, y]);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push('L', &[x, y]);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.push('Q', &[cx0, cy0, x, y]);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.push('C', &[cx0, cy0, cx1, cy1, x, y]);
    }

    fn close(&mut self) {
        self.path.push('Z');
    }
}

/// Extracts font metadata and the glyph table from TTF/OTF bytes.
///
/// Every glyph id except `.notdef` becomes one raw glyph, in glyph id order.
/// The first codepoint mapped to a glyph is stored as its `unicode` attribute.
pub fn read_sfnt_font(data: &[u8]) -> Result<LoadedFont, String> {
    let font = FontRef::new(data).map_err(|e| format!("Failed to parse font: {:?}", e))?;

    let metrics = font.metrics(Size::unscaled(), LocationRef::default());
    let font_name = font
        .localized_strings(StringId::FAMILY_NAME)
        .english_or_first()
        .map(|name| name.to_string())
        .filter(|name| !name.is_empty());
    let metadata = FontMetadata {
        ascent: metrics.ascent as f64,
        units_per_em: metrics.units_per_em as u32,
        unicode_range_start: None,
        font_name,
    };
    debug!("OpenType font metadata: {:?}", metadata);

    let mut codepoints: HashMap<GlyphId, u32> = HashMap::new();
    for (codepoint, glyph_id) in font.charmap().mappings() {
        codepoints.entry(glyph_id).or_insert(codepoint);
    }

    // Raw table access for glyph count and PostScript names
    let raw = ReadFontRef::new(data).map_err(|e| format!("Failed to parse font: {:?}", e))?;
    let num_glyphs = raw
        .maxp()
        .map(|maxp| maxp.num_glyphs())
        .map_err(|e| format!("Failed to read maxp table: {:?}", e))?;
    let post = raw.post().ok();
    let outlines = font.outline_glyphs();

    // Glyph 0 is the fallback glyph of the font, not an icon.
    let glyphs = (1..num_glyphs)
        .filter_map(|id| {
            let glyph_id = GlyphId::new(id as u32);
            let glyph_name = post
                .as_ref()
                .and_then(|post| post.glyph_name(GlyphId16::new(id)))
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("gid{}", id));
            if glyph_name == NOTDEF_GLYPH_NAME {
                debug!("Skipping '{}' at glyph {}", NOTDEF_GLYPH_NAME, id);
                return None;
            }

            let path_data = outlines.get(glyph_id).and_then(|outline| {
                let mut pen = SvgPathPen::new();
                let settings = DrawSettings::unhinted(Size::unscaled(), LocationRef::default());
                match outline.draw(settings, &mut pen) {
                    Ok(_) => Some(pen.into_path()).filter(|p| !p.is_empty()),
                    Err(e) => {
                        warn!("Cannot draw glyph '{}': {:?}", glyph_name, e);
                        None
                    }
                }
            });
            trace!("OpenType glyph {} '{}'", id, glyph_name);

            Some(RawGlyph {
                unicode_attribute: codepoints.get(&glyph_id).map(|cp| encode_codepoint(*cp)),
                glyph_name,
                path_data,
            })
        })
        .collect();

    Ok(LoadedFont { metadata, glyphs })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pen_records_absolute_path() {
        let mut pen = SvgPathPen::new();
        pen.move_to(0.0, 0.0);
        pen.line_to(100.0, 0.0);
        pen.quad_to(150.0, 50.0, 100.0, 100.0);
        pen.curve_to(80.0, 120.0, 20.0, 120.0, 0.5, 100.0);
        pen.close();
        assert_eq!(
            pen.into_path(),
            "M0 0L100 0Q150 50 100 100C80 120 20 120 0.5 100Z"
        );
    }

    #[test]
    fn test_pen_output_is_parseable() {
        let mut pen = SvgPathPen::new();
        pen.move_to(10.0, 20.0);
        pen.line_to(-30.0, 40.0);
        pen.close();
        assert_eq!(
            crate::path::normalize(&pen.into_path(), 1).as_deref(),
            Some("M10 20L-30 40Z")
        );
    }

    #[test]
    fn test_reads_truetype_font() {
        let data = std::fs::read(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/mini-icons.ttf"
        ))
        .unwrap();
        let font = read_sfnt_font(&data).unwrap();

        assert_eq!(font.metadata.ascent, 800.0);
        assert_eq!(font.metadata.units_per_em, 1000);
        assert_eq!(font.metadata.unicode_range_start, None);
        assert_eq!(font.metadata.font_name.as_deref(), Some("Mini Icons"));

        let names: Vec<&str> = font.glyphs.iter().map(|g| g.glyph_name.as_str()).collect();
        assert_eq!(names, vec!["house", "uniF102", "space"]);

        let house = &font.glyphs[0];
        assert_eq!(house.unicode_attribute.as_deref(), Some("&#xf101;"));
        assert_eq!(house.path_data.as_deref(), Some("M0 0L500 800L1000 0Z"));
        assert_eq!(font.glyphs[1].unicode_attribute.as_deref(), Some("&#xf102;"));

        let space = &font.glyphs[2];
        assert_eq!(space.unicode_attribute.as_deref(), Some("&#x20;"));
        assert_eq!(space.path_data, None);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(read_sfnt_font(b"definitely not a font").is_err());
        assert!(read_sfnt_font(&[]).is_err());
    }
}
