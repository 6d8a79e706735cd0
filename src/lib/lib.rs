//! The icon2fontello library turns the glyph table of a vector icon font into a
//! [Fontello](https://fontello.com) configuration document.
//!
//! The interesting part is the glyph resolution pipeline. For every glyph that
//! carries an outline it derives a stable, unique, human readable name,
//! optionally filters and renames it through a selection table, transforms its
//! outline into Fontello's coordinate space and assigns it the next code point.
//!
//! Basic usage with glyphs that were already extracted from a font:
//! ```rust
//! use icon2fontello::config::PipelineConfig;
//! use icon2fontello::model::{FontMetadata, RawGlyph};
//!
//! let metadata = FontMetadata {
//!     ascent: 850.0,
//!     units_per_em: 1000,
//!     unicode_range_start: Some(0xF000),
//!     font_name: Some("my-icons".to_string()),
//! };
//! let glyphs = vec![
//!     RawGlyph::new("home", Some("&#xf000;"), Some("M0 0L500 800L1000 0Z")),
//!     RawGlyph::new("uniF001", Some("&#xf001;"), Some("M0 0L1000 0L1000 1000Z")),
//! ];
//!
//! let document = icon2fontello::build_config(&glyphs, &metadata, None, &PipelineConfig::default());
//! assert_eq!(document.glyphs[0].css, "home");
//! assert_eq!(document.glyphs[0].svg.path, "M0 850L500 50L1000 850Z");
//! assert_eq!(document.glyphs[1].css, "\u{f001}");
//! ```
//!
//! Reading a font file and a selection file from disk:
//! ```rust,no_run
//! use icon2fontello::config::ConfigSource;
//! use std::error::Error;
//!
//! fn example() -> Result<(), Box<dyn Error>> {
//!     let document = icon2fontello::convert_font_file(
//!         "WebHostingHub-Glyphs.svg",
//!         Some("selection.json".as_ref()),
//!         ConfigSource::Default,
//!     )?;
//!     document.write_to_file("config.json", true)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Data Flow
//! ```text
//! +-------------+     +------------------+     +----------------+
//! | Font file   |     | Glyph pipeline   |     | config.json    |
//! | .svg / .ttf | --> | - names          | --> | - name, ascent |
//! | metadata    |     | - selection      |     | - glyphs[]     |
//! | glyphs[]    |     | - outlines/codes |     |                |
//! +-------------+     +------------------+     +----------------+
//!                              ^
//!                     +------------------+
//!                     | Selection table  |
//!                     | .txt / .json     |
//!                     +------------------+
//! ```

pub mod config;
pub mod document;
pub mod fonts;
pub mod model;
pub mod names;
pub mod path;
pub mod pipeline;
pub mod selection;
pub mod unicode;

use config::{ConfigSource, PipelineConfig};
use document::FontelloConfig;
use log::info;
use model::{FontMetadata, RawGlyph};
use pipeline::GlyphPipeline;
use selection::SelectionTable;
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Errors raised at the boundaries of the conversion: reading the font,
/// reading configuration and writing the document. The glyph pipeline itself
/// never fails.
#[derive(Debug)]
pub enum IconError {
    /// The source font could not be read or understood
    FontError {
        path: String,
        message: String,
        suggestion: String,
    },
    /// Indicates an invalid configuration
    ConfigError { message: String, suggestion: String },
    /// Indicates an I/O error
    IoError {
        message: String,
        path: String,
        suggestion: String,
    },
    /// The document could not be serialized
    SerializeError { message: String },
}

impl Error for IconError {}
impl fmt::Display for IconError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IconError::FontError {
                path,
                message,
                suggestion,
            } => {
                write!(f, "❌ Font Error: {}", message)?;
                write!(f, "\n📁 Path: {}", path)?;
                write!(f, "\n💡 Suggestion: {}", suggestion)?;
                Ok(())
            }
            IconError::ConfigError {
                message,
                suggestion,
            } => {
                write!(f, "❌ Configuration Error: {}", message)?;
                write!(f, "\n💡 Suggestion: {}", suggestion)?;
                Ok(())
            }
            IconError::IoError {
                message,
                path,
                suggestion,
            } => {
                write!(f, "❌ File Error: {}", message)?;
                write!(f, "\n📁 Path: {}", path)?;
                write!(f, "\n💡 Suggestion: {}", suggestion)?;
                Ok(())
            }
            IconError::SerializeError { message } => {
                write!(f, "❌ Serialization Error: {}", message)
            }
        }
    }
}

impl IconError {
    /// Wraps an I/O failure on `path`
    pub fn io(err: std::io::Error, path: &Path) -> Self {
        let suggestion = match err.kind() {
            std::io::ErrorKind::NotFound => "Check that the path exists and is spelled correctly",
            std::io::ErrorKind::PermissionDenied => "Check the file permissions",
            _ => "Check that the path is accessible",
        };
        IconError::IoError {
            message: err.to_string(),
            path: path.display().to_string(),
            suggestion: suggestion.to_string(),
        }
    }

    /// Creates a font error for `path`
    pub fn font_error(path: &Path, message: impl Into<String>) -> Self {
        IconError::FontError {
            path: path.display().to_string(),
            message: message.into(),
            suggestion: "Provide an SVG font (.svg) or an OpenType font (.ttf, .otf)".to_string(),
        }
    }
}

/// Runs the glyph pipeline over already extracted glyphs and assembles the
/// Fontello document.
///
/// This never fails: glyphs without outlines are skipped and odd names are
/// reported through the log.
pub fn build_config(
    glyphs: &[RawGlyph],
    metadata: &FontMetadata,
    selection: Option<&SelectionTable>,
    config: &PipelineConfig,
) -> FontelloConfig {
    let pipeline = GlyphPipeline::new(config.pipeline.clone());
    let resolved = pipeline.run(glyphs, metadata, selection);
    document::assemble(&pipeline.output_metadata(metadata), resolved, &config.document)
}

/// Reads a font file and an optional selection file, and builds the Fontello
/// document for them.
///
/// # Arguments
/// * `font_path` - SVG font or OpenType font to convert
/// * `selection_path` - Optional `.txt` or `.json` selection file; when it cannot
///   be used every glyph is selected
/// * `config` - Configuration source (Default, File path, or Embedded TOML)
///
/// # Returns
/// * `Ok(FontelloConfig)` with the assembled document
/// * `Err(IconError)` if the font cannot be read or parsed
pub fn convert_font_file(
    font_path: impl AsRef<Path>,
    selection_path: Option<&Path>,
    config: ConfigSource,
) -> Result<FontelloConfig, IconError> {
    let config = config::load_config_from_source(config);
    let font = fonts::load_font_file(font_path.as_ref())?;
    info!(
        "Loaded {} glyphs from {}",
        font.glyphs.len(),
        font_path.as_ref().display()
    );
    let selection = selection_path.and_then(|p| selection::load_selection_file(p));
    Ok(build_config(
        &font.glyphs,
        &font.metadata,
        selection.as_ref(),
        &config,
    ))
}
