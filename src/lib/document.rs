//! Assembly of the Fontello `config.json` document.

use crate::model::{FontMetadata, ResolvedGlyph};
use crate::IconError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Font name used when neither the caller nor the font provides one.
pub const DEFAULT_FONT_NAME: &str = "icons";

pub const DEFAULT_CSS_PREFIX: &str = "icon-";

/// Document-level settings that do not come from the font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Overrides the font's own name.
    pub name: Option<String>,
    pub css_prefix_text: String,
    pub css_use_suffix: bool,
    pub hinting: bool,
    /// Drop glyphs the selection table did not select.
    pub only_selected: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        DocumentOptions {
            name: None,
            css_prefix_text: DEFAULT_CSS_PREFIX.to_string(),
            css_use_suffix: false,
            hinting: true,
            only_selected: false,
        }
    }
}

/// A Fontello configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontelloConfig {
    pub name: String,
    pub css_prefix_text: String,
    pub css_use_suffix: bool,
    pub hinting: bool,
    pub units_per_em: u32,
    pub ascent: i64,
    pub glyphs: Vec<ResolvedGlyph>,
}

/// Combines font metadata with the pipeline's glyph list.
pub fn assemble(
    metadata: &FontMetadata,
    glyphs: Vec<ResolvedGlyph>,
    options: &DocumentOptions,
) -> FontelloConfig {
    let name = options
        .name
        .clone()
        .or_else(|| metadata.font_name.clone())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FONT_NAME.to_string());

    let glyphs: Vec<ResolvedGlyph> = if options.only_selected {
        glyphs.into_iter().filter(|g| g.selected).collect()
    } else {
        glyphs
    };
    debug!("Assembling '{}' with {} glyphs", name, glyphs.len());

    FontelloConfig {
        name,
        css_prefix_text: options.css_prefix_text.clone(),
        css_use_suffix: options.css_use_suffix,
        hinting: options.hinting,
        units_per_em: metadata.units_per_em,
        ascent: metadata.ascent.round() as i64,
        glyphs,
    }
}

impl FontelloConfig {
    pub fn to_json(&self, pretty: bool) -> Result<String, IconError> {
        let result = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        result.map_err(|e| IconError::SerializeError {
            message: e.to_string(),
        })
    }

    /// Writes the document to `path`, creating missing parent directories.
    pub fn write_to_file(&self, path: impl AsRef<Path>, pretty: bool) -> Result<(), IconError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                debug!("Creating output directory: {:?}", parent);
                fs::create_dir_all(parent).map_err(|e| IconError::io(e, parent))?;
            }
        }
        let json = self.to_json(pretty)?;
        fs::write(path, json).map_err(|e| IconError::io(e, path))
    }
}
