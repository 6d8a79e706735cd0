/// Command-line argument parsing module
///
/// This module defines the CLI structure using clap with derive macros.
/// It supports:
/// - Standard verbosity flags: -v, -vv
/// - Quiet flag: -q
/// - Verbose level flag: --verbose-level=LEVEL
/// - Environment variable RUST_LOG integration
/// - Overrides for every setting of the TOML configuration that matters on
///   the command line

use clap::Parser;
use icon2fontello::config::PipelineConfig;
use icon2fontello::pipeline::CodeBase;
use icon2fontello::selection::SelectionKey;
use std::path::PathBuf;

/// Convert an icon font's glyph table into a Fontello configuration
///
/// Reads an SVG font (.svg) or an OpenType font (.ttf, .otf), names every glyph
/// that has an outline, optionally filters and renames glyphs through a
/// selection file, and writes a config.json that fontello.com can import.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Icon2FontelloArgs {
    /// Path to the source icon font
    #[arg(long, value_name = "PATH")]
    pub font: PathBuf,

    /// Optional selection file (.txt or .json) mapping glyph names to output names
    #[arg(long, value_name = "PATH")]
    pub selection: Option<PathBuf>,

    /// Optional TOML configuration file
    /// If not specified, icon2fontello.toml in the current directory is used when present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output path for the generated configuration
    /// If the path contains a directory component, it will be created if it doesn't exist.
    #[arg(short, long, value_name = "PATH", default_value = "config.json")]
    pub output: PathBuf,

    /// Font name written into the configuration
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// First code point to assign: "pua", "font" (the font's unicode-range) or a number
    #[arg(long, value_name = "BASE")]
    pub code_base: Option<CodeBase>,

    /// Glyph identifier looked up in the selection file: "name" or "unicode"
    #[arg(long, value_name = "KEY")]
    pub selection_key: Option<SelectionKey>,

    /// Rescale outlines so the font's ascent matches Fontello's 850 units
    #[arg(long)]
    pub compensate_ascent: bool,

    /// Leave glyphs the selection file does not select out of the output
    #[arg(long)]
    pub only_selected: bool,

    /// Pretty-print the generated JSON
    #[arg(long)]
    pub pretty: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Decrease verbosity level (suppress most output except errors)
    #[arg(short)]
    pub quiet: bool,

    /// Set explicit verbosity level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub verbose_level: Option<String>,
}

impl Icon2FontelloArgs {
    /// Determine the effective log level based on CLI flags and environment variables
    ///
    /// Priority:
    /// 1. RUST_LOG environment variable (highest priority)
    /// 2. --verbose-level flag
    /// 3. Count of -v flags or -q flag (lowest priority)
    pub fn effective_log_level(&self) -> String {
        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            return rust_log;
        }

        if let Some(level) = &self.verbose_level {
            return level.clone();
        }

        if self.quiet {
            return "error".to_string();
        }

        match self.verbose {
            0 => "info".to_string(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    }

    /// Apply command-line overrides on top of the file configuration
    pub fn apply_overrides(&self, config: &mut PipelineConfig) {
        if let Some(name) = &self.name {
            config.document.name = Some(name.clone());
        }
        if let Some(base) = self.code_base {
            config.pipeline.code_base = base;
        }
        if let Some(key) = self.selection_key {
            config.pipeline.selection_key = key;
        }
        if self.compensate_ascent {
            config.pipeline.compensate_ascent = true;
        }
        if self.only_selected {
            config.document.only_selected = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = Icon2FontelloArgs::parse_from([
            "icon2fontello",
            "--font",
            "icons.svg",
            "--code-base",
            "0xF000",
            "--selection-key",
            "unicode",
            "--name",
            "my-icons",
            "--compensate-ascent",
        ]);
        let mut config = PipelineConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(args.output, PathBuf::from("config.json"));
        assert_eq!(config.pipeline.code_base, CodeBase::Explicit(0xF000));
        assert_eq!(config.pipeline.selection_key, SelectionKey::Unicode);
        assert_eq!(config.document.name.as_deref(), Some("my-icons"));
        assert!(config.pipeline.compensate_ascent);
        assert!(!config.document.only_selected);
    }

    #[test]
    fn rejects_bad_code_base() {
        let result = Icon2FontelloArgs::try_parse_from([
            "icon2fontello",
            "--font",
            "icons.svg",
            "--code-base",
            "somewhere",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_code_base_past_last_codepoint() {
        let result = Icon2FontelloArgs::try_parse_from([
            "icon2fontello",
            "--font",
            "icons.svg",
            "--code-base",
            "0x110000",
        ]);
        assert!(result.is_err());
    }
}
