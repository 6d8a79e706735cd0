//! Font readers that turn a font file into [`FontMetadata`] and the raw glyph
//! table consumed by the pipeline.
//!
//! Two formats are supported:
//! - SVG fonts (`.svg`), the format icon font vendors usually publish
//! - OpenType fonts (`.ttf`, `.otf`), read through skrifa
//!
//! Readers only extract what the pipeline needs; they do not validate the
//! font beyond that.

pub mod sfnt;
pub mod svg_font;

use crate::model::{FontMetadata, RawGlyph};
use crate::IconError;
use log::debug;
use std::fs;
use std::path::Path;

/// Font formats the readers understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFormat {
    Svg,
    OpenType,
}

impl FontFormat {
    /// Determines the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "svg" => Some(FontFormat::Svg),
            "ttf" | "otf" => Some(FontFormat::OpenType),
            _ => None,
        }
    }
}

/// Metadata and glyph table extracted from one font.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFont {
    pub metadata: FontMetadata,
    pub glyphs: Vec<RawGlyph>,
}

/// Reads `path` and extracts its metadata and glyph table.
pub fn load_font_file(path: &Path) -> Result<LoadedFont, IconError> {
    let format = FontFormat::from_path(path)
        .ok_or_else(|| IconError::font_error(path, "Unsupported font format"))?;
    debug!("Reading {:?} font from: {:?}", format, path);

    match format {
        FontFormat::Svg => {
            let svg = fs::read_to_string(path).map_err(|e| IconError::io(e, path))?;
            svg_font::parse_svg_font(&svg).map_err(|message| IconError::font_error(path, message))
        }
        FontFormat::OpenType => {
            let data = fs::read(path).map_err(|e| IconError::io(e, path))?;
            sfnt::read_sfnt_font(&data).map_err(|message| IconError::font_error(path, message))
        }
    }
}
