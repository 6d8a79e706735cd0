//! Configuration module for the conversion pipeline.
//!
//! This module handles loading and parsing of pipeline settings from TOML
//! files. Every key is optional; anything missing or of the wrong type keeps
//! its default value.
//!
//! # Configuration Structure
//!
//! - The `font` section controls document-level fields (name, CSS prefix, ...)
//! - `glyphs` controls code allocation, selection lookup and glyph records
//! - `transform` controls outline rescaling
//!
//! # Configuration Example
//!
//! ```toml
//! [font]
//! name = "webhostinghub-glyphs"
//! css_prefix_text = "icon-"
//! css_use_suffix = false
//! hinting = true
//!
//! [glyphs]
//! code_base = "font"       # "pua", "font", or a number such as 0xE000
//! selection_key = "name"   # "name" or "unicode"
//! src = "custom_icons"
//! width = 1000
//! only_selected = false
//!
//! [transform]
//! compensate_ascent = true
//! target_ascent = 850
//! ```

use crate::document::DocumentOptions;
use crate::pipeline::{CodeBase, PipelineOptions};
use crate::selection::SelectionKey;
use crate::IconError;
use log::warn;
use std::fs;
use std::path::Path;
use toml::Value;

/// File picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "icon2fontello.toml";

/// Configuration source for pipeline configuration.
#[derive(Debug, Clone)]
pub enum ConfigSource<'a> {
    /// Use built-in defaults
    Default,
    /// Load configuration from a file path
    File(&'a str),
    /// Use an in-memory TOML string
    Embedded(&'a str),
}

/// Complete settings of one conversion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineConfig {
    pub pipeline: PipelineOptions,
    pub document: DocumentOptions,
}

fn get_str<'v>(section: Option<&'v Value>, key: &str) -> Option<&'v str> {
    section.and_then(|s| s.get(key)).and_then(|v| v.as_str())
}

fn get_bool(section: Option<&Value>, key: &str) -> Option<bool> {
    section.and_then(|s| s.get(key)).and_then(|v| v.as_bool())
}

/// Reads a number that may be written as an integer or a float.
fn get_number(section: Option<&Value>, key: &str) -> Option<f64> {
    let value = section.and_then(|s| s.get(key))?;
    value
        .as_float()
        .or_else(|| value.as_integer().map(|i| i as f64))
}

/// Parses `code_base`, written either as a string or as an integer.
fn parse_code_base(section: Option<&Value>) -> Option<CodeBase> {
    let value = section.and_then(|s| s.get("code_base"))?;
    let parsed: Result<CodeBase, String> = match value.as_integer() {
        Some(code) => u32::try_from(code)
            .map_err(|_| format!("invalid code base {}", code))
            .and_then(CodeBase::explicit),
        None => value.as_str()?.parse(),
    };
    match parsed {
        Ok(base) => Some(base),
        Err(e) => {
            warn!("Ignoring glyphs.code_base: {}", e);
            None
        }
    }
}

fn parse_selection_key(section: Option<&Value>) -> Option<SelectionKey> {
    match get_str(section, "selection_key")?.parse() {
        Ok(key) => Some(key),
        Err(e) => {
            warn!("Ignoring glyphs.selection_key: {}", e);
            None
        }
    }
}

fn parse_pipeline_options(glyphs: Option<&Value>, transform: Option<&Value>) -> PipelineOptions {
    let mut options = PipelineOptions::default();

    if let Some(base) = parse_code_base(glyphs) {
        options.code_base = base;
    }
    if let Some(key) = parse_selection_key(glyphs) {
        options.selection_key = key;
    }
    if let Some(src) = get_str(glyphs, "src") {
        options.glyph_source = src.to_string();
    }
    if let Some(width) = glyphs
        .and_then(|g| g.get("width"))
        .and_then(|v| v.as_integer())
        .and_then(|w| u32::try_from(w).ok())
    {
        options.glyph_width = width;
    }

    if let Some(compensate) = get_bool(transform, "compensate_ascent") {
        options.compensate_ascent = compensate;
    }
    if let Some(target) = get_number(transform, "target_ascent").filter(|t| *t > 0.0) {
        options.target_ascent = target;
    }
    options
}

fn parse_document_options(font: Option<&Value>, glyphs: Option<&Value>) -> DocumentOptions {
    let mut options = DocumentOptions::default();

    if let Some(name) = get_str(font, "name") {
        options.name = Some(name.to_string());
    }
    if let Some(prefix) = get_str(font, "css_prefix_text") {
        options.css_prefix_text = prefix.to_string();
    }
    if let Some(suffix) = get_bool(font, "css_use_suffix") {
        options.css_use_suffix = suffix;
    }
    if let Some(hinting) = get_bool(font, "hinting") {
        options.hinting = hinting;
    }
    if let Some(only_selected) = get_bool(glyphs, "only_selected") {
        options.only_selected = only_selected;
    }
    options
}

/// Parses a TOML string into a [`PipelineConfig`], returning an error when
/// the string is not valid TOML.
pub fn try_parse_config_string(config_str: &str) -> Result<PipelineConfig, IconError> {
    let config: Value = toml::from_str(config_str).map_err(|e| IconError::ConfigError {
        message: e.to_string(),
        suggestion: format!(
            "Check the TOML syntax; see the [font], [glyphs] and [transform] sections in {}",
            DEFAULT_CONFIG_FILE
        ),
    })?;

    let glyphs = config.get("glyphs");
    Ok(PipelineConfig {
        pipeline: parse_pipeline_options(glyphs, config.get("transform")),
        document: parse_document_options(config.get("font"), glyphs),
    })
}

/// Parses a TOML configuration string, falling back to defaults when it is
/// not valid TOML.
///
/// # Example
/// ```rust
/// use icon2fontello::config::parse_config_string;
/// use icon2fontello::pipeline::CodeBase;
///
/// let config = parse_config_string(r#"
/// [glyphs]
/// code_base = "font"
///
/// [transform]
/// compensate_ascent = true
/// "#);
/// assert_eq!(config.pipeline.code_base, CodeBase::FontRange);
/// assert!(config.pipeline.compensate_ascent);
/// ```
pub fn parse_config_string(config_str: &str) -> PipelineConfig {
    try_parse_config_string(config_str).unwrap_or_else(|e| {
        warn!("Using default configuration: {}", e);
        PipelineConfig::default()
    })
}

/// Loads configuration from `path`, reporting unreadable files and invalid
/// TOML instead of falling back to defaults.
pub fn try_load_config(path: impl AsRef<Path>) -> Result<PipelineConfig, IconError> {
    let path = path.as_ref();
    let config_str = fs::read_to_string(path).map_err(|e| IconError::io(e, path))?;
    try_parse_config_string(&config_str)
}

/// Loads the configuration for the given source; problems with a file fall
/// back to the defaults.
pub fn load_config_from_source(source: ConfigSource) -> PipelineConfig {
    match source {
        ConfigSource::Default => PipelineConfig::default(),
        ConfigSource::File(path) => match fs::read_to_string(Path::new(path)) {
            Ok(s) => parse_config_string(&s),
            Err(e) => {
                warn!("Cannot read configuration {}: {}", path, e);
                PipelineConfig::default()
            }
        },
        ConfigSource::Embedded(content) => parse_config_string(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_number_accepts_integers_and_floats() {
        let value: Value = toml::from_str("a = 850\nb = 850.5\nc = \"x\"").unwrap();
        assert_eq!(get_number(Some(&value), "a"), Some(850.0));
        assert_eq!(get_number(Some(&value), "b"), Some(850.5));
        assert_eq!(get_number(Some(&value), "c"), None);
        assert_eq!(get_number(None, "a"), None);
    }

    #[test]
    fn test_parse_code_base_forms() {
        let value: Value = toml::from_str(
            "a = 57344\nb = \"font\"\nc = \"0xF000\"\nd = \"nowhere\"\ne = -1\nf = 1114112\ng = \"U+110000\"",
        )
        .unwrap();
        let section = |key: &str| {
            let mut t = toml::Table::new();
            t.insert("code_base".to_string(), value.get(key).unwrap().clone());
            Value::Table(t)
        };
        assert_eq!(parse_code_base(Some(&section("a"))), Some(CodeBase::Explicit(0xE000)));
        assert_eq!(parse_code_base(Some(&section("b"))), Some(CodeBase::FontRange));
        assert_eq!(parse_code_base(Some(&section("c"))), Some(CodeBase::Explicit(0xF000)));
        assert_eq!(parse_code_base(Some(&section("d"))), None);
        assert_eq!(parse_code_base(Some(&section("e"))), None);
        assert_eq!(parse_code_base(Some(&section("f"))), None);
        assert_eq!(parse_code_base(Some(&section("g"))), None);
    }

    #[test]
    fn test_parse_config_string() {
        let config = parse_config_string(
            r#"
            [font]
            name = "webhostinghub-glyphs"
            css_prefix_text = "whhg-"
            css_use_suffix = true
            hinting = false

            [glyphs]
            code_base = 61440
            selection_key = "unicode"
            src = "fontawesome"
            width = 1200
            only_selected = true

            [transform]
            compensate_ascent = true
            target_ascent = 800
            "#,
        );

        assert_eq!(config.document.name.as_deref(), Some("webhostinghub-glyphs"));
        assert_eq!(config.document.css_prefix_text, "whhg-");
        assert!(config.document.css_use_suffix);
        assert!(!config.document.hinting);
        assert!(config.document.only_selected);

        assert_eq!(config.pipeline.code_base, CodeBase::Explicit(0xF000));
        assert_eq!(config.pipeline.selection_key, SelectionKey::Unicode);
        assert_eq!(config.pipeline.glyph_source, "fontawesome");
        assert_eq!(config.pipeline.glyph_width, 1200);
        assert!(config.pipeline.compensate_ascent);
        assert_eq!(config.pipeline.target_ascent, 800.0);
    }

    #[test]
    fn test_parse_config_string_partial() {
        let config = parse_config_string("[glyphs]\nsrc = \"mine\"\n");
        let default = PipelineConfig::default();
        assert_eq!(config.pipeline.glyph_source, "mine");
        assert_eq!(config.pipeline.code_base, default.pipeline.code_base);
        assert_eq!(config.document, default.document);
    }

    #[test]
    fn test_parse_config_string_invalid_values() {
        let config = parse_config_string(
            r#"
            [glyphs]
            width = "wide"
            selection_key = "color"

            [transform]
            compensate_ascent = "yes"
            target_ascent = -5
            "#,
        );
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_parse_config_string_invalid_toml() {
        assert_eq!(
            parse_config_string("this is not valid toml {{{"),
            PipelineConfig::default()
        );
        assert!(matches!(
            try_parse_config_string("[[["),
            Err(IconError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_load_config() {
        assert_eq!(
            load_config_from_source(ConfigSource::Default),
            PipelineConfig::default()
        );
        assert_eq!(
            load_config_from_source(ConfigSource::File("nonexistent.toml")),
            PipelineConfig::default()
        );
        let embedded = load_config_from_source(ConfigSource::Embedded(
            "[font]\nname = \"embedded\"",
        ));
        assert_eq!(embedded.document.name.as_deref(), Some("embedded"));
    }

    #[test]
    fn test_try_load_config_missing_file() {
        assert!(matches!(
            try_load_config("nonexistent.toml"),
            Err(IconError::IoError { .. })
        ));
    }
}
