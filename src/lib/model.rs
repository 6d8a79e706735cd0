//! Data types shared by the glyph resolution pipeline.
//!
//! [`FontMetadata`] and [`RawGlyph`] are produced by the font readers in
//! [`crate::fonts`] (or by any caller that already parsed a font), and
//! [`ResolvedGlyph`] is what the pipeline hands to the document assembler.

use serde::{Deserialize, Serialize};

/// Provenance tag written into every emitted glyph.
pub const DEFAULT_GLYPH_SOURCE: &str = "custom_icons";

/// Nominal advance width written into every emitted glyph.
pub const DEFAULT_GLYPH_WIDTH: u32 = 1000;

/// Font-level values read once from the source font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetadata {
    /// Baseline height of the glyph coordinate space.
    pub ascent: f64,
    pub units_per_em: u32,
    /// Lower bound of the font's declared unicode range, if any.
    pub unicode_range_start: Option<u32>,
    pub font_name: Option<String>,
}

impl Default for FontMetadata {
    fn default() -> Self {
        FontMetadata {
            ascent: 850.0,
            units_per_em: 1000,
            unicode_range_start: None,
            font_name: None,
        }
    }
}

/// One entry of the source glyph table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGlyph {
    /// Glyph name as found in the font, possibly a placeholder like `uniE001`.
    pub glyph_name: String,
    /// HTML-entity encoded codepoint reference, e.g. `&#xe001;`.
    pub unicode_attribute: Option<String>,
    /// Outline data; may span several lines.
    pub path_data: Option<String>,
}

impl RawGlyph {
    pub fn new(
        glyph_name: impl Into<String>,
        unicode_attribute: Option<&str>,
        path_data: Option<&str>,
    ) -> Self {
        RawGlyph {
            glyph_name: glyph_name.into(),
            unicode_attribute: unicode_attribute.map(str::to_string),
            path_data: path_data.map(str::to_string),
        }
    }

    /// Returns the outline data when the glyph actually carries some.
    pub fn outline(&self) -> Option<&str> {
        self.path_data
            .as_deref()
            .filter(|d| !d.trim().is_empty())
    }
}

/// Transformed outline of an emitted glyph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphSvg {
    pub path: String,
    pub width: u32,
}

/// A finished glyph record, ready to be serialized into the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedGlyph {
    pub css: String,
    pub src: String,
    pub code: u32,
    pub selected: bool,
    pub svg: GlyphSvg,
    pub search: Vec<String>,
}
