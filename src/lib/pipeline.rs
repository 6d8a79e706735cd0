//! The glyph pipeline: raw glyph table in, finished glyph list out.
//!
//! Glyphs without outline data are dropped before anything else happens, so
//! they neither consume a code slot nor a name. Every remaining glyph gets a
//! name from the [`NameResolver`], a transformed outline from the
//! [`PathTransformer`] and the next sequential code point.

use crate::model::{
    FontMetadata, GlyphSvg, RawGlyph, ResolvedGlyph, DEFAULT_GLYPH_SOURCE, DEFAULT_GLYPH_WIDTH,
};
use crate::names::NameResolver;
use crate::path::{compensation_scale, AffinePathTransformer, PathTransformer, FONTELLO_ASCENT};
use crate::selection::{SelectionKey, SelectionTable};
use crate::unicode::{MAX_CODEPOINT, PRIVATE_USE_AREA_START};
use log::{debug, info, warn};
use std::str::FromStr;

/// Where the first emitted code point comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeBase {
    /// Start of the private-use area, `U+E000`.
    #[default]
    PrivateUseArea,
    /// Lower bound of the font's `unicode-range`, or the private-use area
    /// when the font declares none.
    FontRange,
    Explicit(u32),
}

impl CodeBase {
    /// Explicit base, or an error when `code` is not a Unicode codepoint.
    pub fn explicit(code: u32) -> Result<Self, String> {
        if code > MAX_CODEPOINT {
            return Err(format!(
                "code base U+{:X} is past the last codepoint U+{:X}",
                code, MAX_CODEPOINT
            ));
        }
        Ok(CodeBase::Explicit(code))
    }

    pub fn resolve(&self, metadata: &FontMetadata) -> u32 {
        match self {
            CodeBase::PrivateUseArea => PRIVATE_USE_AREA_START,
            CodeBase::FontRange => metadata
                .unicode_range_start
                .unwrap_or(PRIVATE_USE_AREA_START),
            CodeBase::Explicit(code) => *code,
        }
    }
}

impl FromStr for CodeBase {
    type Err = String;

    /// Accepts `pua`, `font`, a decimal number, or a hexadecimal one written
    /// as `0xE000` or `U+E000`. Values past `U+10FFFF` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "pua" | "private-use" => return Ok(CodeBase::PrivateUseArea),
            "font" | "font-range" => return Ok(CodeBase::FontRange),
            _ => {}
        }
        let hex = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .or_else(|| s.strip_prefix("U+"))
            .or_else(|| s.strip_prefix("u+"));
        let parsed = match hex {
            Some(digits) => u32::from_str_radix(digits, 16),
            None => s.parse::<u32>(),
        };
        let code = parsed.map_err(|_| format!("invalid code base '{}'", s))?;
        CodeBase::explicit(code)
    }
}

/// Knobs of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub code_base: CodeBase,
    pub selection_key: SelectionKey,
    /// Rescale outlines so that the font's ascent lands on `target_ascent`.
    pub compensate_ascent: bool,
    pub target_ascent: f64,
    pub glyph_source: String,
    pub glyph_width: u32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            code_base: CodeBase::default(),
            selection_key: SelectionKey::default(),
            compensate_ascent: false,
            target_ascent: FONTELLO_ASCENT,
            glyph_source: DEFAULT_GLYPH_SOURCE.to_string(),
            glyph_width: DEFAULT_GLYPH_WIDTH,
        }
    }
}

/// Resolves raw glyphs into the glyph list of a Fontello configuration.
///
/// # Example
/// ```rust
/// use icon2fontello::model::{FontMetadata, RawGlyph};
/// use icon2fontello::pipeline::GlyphPipeline;
///
/// let glyphs = vec![
///     RawGlyph::new("star", Some("&#xe001;"), Some("M0 0L100 100Z")),
///     RawGlyph::new("space", Some(" "), None),
///     RawGlyph::new("star", Some("&#xe002;"), Some("M0 0L50 50Z")),
/// ];
/// let resolved = GlyphPipeline::default().run(&glyphs, &FontMetadata::default(), None);
///
/// assert_eq!(resolved.len(), 2);
/// assert_eq!(resolved[0].css, "star");
/// assert_eq!(resolved[1].css, "star0");
/// assert_eq!(resolved[1].code, 0xE001);
/// ```
#[derive(Debug, Clone)]
pub struct GlyphPipeline<T: PathTransformer = AffinePathTransformer> {
    transformer: T,
    options: PipelineOptions,
}

impl Default for GlyphPipeline {
    fn default() -> Self {
        GlyphPipeline::new(PipelineOptions::default())
    }
}

impl GlyphPipeline {
    pub fn new(options: PipelineOptions) -> Self {
        GlyphPipeline {
            transformer: AffinePathTransformer::default(),
            options,
        }
    }
}

impl<T: PathTransformer> GlyphPipeline<T> {
    /// Builds a pipeline around an alternate geometry backend.
    pub fn with_transformer(transformer: T, options: PipelineOptions) -> Self {
        GlyphPipeline {
            transformer,
            options,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Scale applied to every outline for `metadata`.
    pub fn scale(&self, metadata: &FontMetadata) -> f64 {
        if self.options.compensate_ascent {
            compensation_scale(metadata.ascent, self.options.target_ascent)
        } else {
            1.0
        }
    }

    /// Font metadata as seen by the output document: with ascent
    /// compensation the whole coordinate space is rescaled.
    pub fn output_metadata(&self, metadata: &FontMetadata) -> FontMetadata {
        if !self.options.compensate_ascent {
            return metadata.clone();
        }
        let scale = self.scale(metadata);
        FontMetadata {
            ascent: self.options.target_ascent,
            units_per_em: (metadata.units_per_em as f64 * scale).round() as u32,
            ..metadata.clone()
        }
    }

    /// Runs the pipeline over `glyphs` in source order.
    ///
    /// With `selection` the glyphs are filtered and renamed through the
    /// table; unselected glyphs are still emitted with `selected: false`.
    ///
    /// Codes never go past `U+10FFFF`: glyphs that would land there are
    /// dropped with a warning.
    pub fn run(
        &self,
        glyphs: &[RawGlyph],
        metadata: &FontMetadata,
        selection: Option<&SelectionTable>,
    ) -> Vec<ResolvedGlyph> {
        let mut resolver = match selection {
            Some(table) => NameResolver::with_selection(table, self.options.selection_key),
            None => NameResolver::new(),
        };
        let code_base = self.options.code_base.resolve(metadata);
        let scale = self.scale(metadata);
        let ascent = self.output_metadata(metadata).ascent;
        debug!(
            "Running glyph pipeline: code base U+{:04X}, ascent {}, scale {}",
            code_base, ascent, scale
        );

        let outlined: Vec<(&RawGlyph, &str)> = glyphs
            .iter()
            .filter_map(|glyph| glyph.outline().map(|outline| (glyph, outline)))
            .collect();
        let capacity = MAX_CODEPOINT
            .checked_sub(code_base)
            .map_or(0, |room| room as usize + 1);
        if outlined.len() > capacity {
            warn!(
                "Dropping {} glyphs that do not fit between U+{:04X} and U+{:X}",
                outlined.len() - capacity,
                code_base,
                MAX_CODEPOINT
            );
        }

        let resolved: Vec<ResolvedGlyph> = outlined
            .into_iter()
            .zip(code_base..=MAX_CODEPOINT)
            .map(|((glyph, outline), code)| {
                let resolution =
                    resolver.resolve(&glyph.glyph_name, glyph.unicode_attribute.as_deref());
                if resolution.final_name.is_empty() {
                    warn!(
                        "Glyph '{}' at U+{:04X} resolved to an empty name",
                        glyph.glyph_name, code
                    );
                }
                ResolvedGlyph {
                    search: resolution.search_terms(),
                    css: resolution.final_name,
                    src: self.options.glyph_source.clone(),
                    code,
                    selected: resolution.selected,
                    svg: GlyphSvg {
                        path: self.transformer.transform(outline, ascent, scale),
                        width: self.options.glyph_width,
                    },
                }
            })
            .collect();

        for identifier in resolver.unmatched_selections() {
            warn!("Selection entry '{}' matched no glyph", identifier);
        }

        let selected = resolved.iter().filter(|g| g.selected).count();
        info!(
            "Resolved {} of {} glyphs ({} selected)",
            resolved.len(),
            glyphs.len(),
            selected
        );
        resolved
    }
}
