/// Fontello configuration generator binary entry point
///
/// This binary converts an icon font's glyph table into a Fontello config.json.
///
/// # Examples
///
/// Basic usage:
/// ```sh
/// cargo run --bin icon2fontello -- --font libs/WebHostingHub-Glyphs.svg -o build/config.json
/// ```
///
/// With a selection file and verbosity control:
/// ```sh
/// cargo run --bin icon2fontello -- -vv --font icons.svg --selection selection.json --only-selected
/// ```
use clap::Parser;
use icon2fontello::config::{self, ConfigSource, PipelineConfig, DEFAULT_CONFIG_FILE};
use icon2fontello::{fonts, selection};
use log::{debug, error, info, warn};
use std::path::Path;
use std::process;

mod args;
mod logging;

use args::Icon2FontelloArgs;
use logging::init_logging;

fn main() {
    let args = Icon2FontelloArgs::parse();

    // Initialize logging based on CLI arguments and RUST_LOG environment variable
    if let Err(e) = init_logging(&args) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    debug!("Parsed arguments: {:?}", args);

    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }

    info!("Fontello configuration written to {:?}", args.output);
}

/// Get the pipeline configuration based on CLI arguments or default behavior.
///
/// Priority order:
/// 1. If `--config` is explicitly provided, use that file (errors are fatal)
/// 2. If `icon2fontello.toml` exists in current directory, use it
/// 3. Otherwise use default configuration
///
/// Command-line overrides are applied on top in every case.
fn get_config(args: &Icon2FontelloArgs) -> Result<PipelineConfig, icon2fontello::IconError> {
    let mut config = if let Some(path) = &args.config {
        debug!("Loading configuration from: {:?}", path);
        config::try_load_config(path)?
    } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
        debug!("Using {} from the current directory", DEFAULT_CONFIG_FILE);
        config::load_config_from_source(ConfigSource::File(DEFAULT_CONFIG_FILE))
    } else {
        PipelineConfig::default()
    };
    args.apply_overrides(&mut config);
    Ok(config)
}

/// Main entry point for the conversion logic
fn run(args: &Icon2FontelloArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = get_config(args)?;
    debug!("Effective configuration: {:?}", config);

    let font = fonts::load_font_file(&args.font)?;
    info!(
        "Font '{}' loaded with {} glyphs",
        font.metadata.font_name.as_deref().unwrap_or("(unnamed)"),
        font.glyphs.len()
    );

    let selection = args.selection.as_ref().and_then(|path| {
        let table = selection::load_selection_file(path);
        if table.is_none() {
            warn!("Selection file {:?} not applied, selecting every glyph", path);
        }
        table
    });
    if let Some(table) = &selection {
        info!("Applying selection with {} entries", table.len());
    }

    let document = icon2fontello::build_config(
        &font.glyphs,
        &font.metadata,
        selection.as_ref(),
        &config,
    );
    if document.glyphs.is_empty() {
        warn!("No glyphs with outline data were found");
    }

    document.write_to_file(&args.output, args.pretty)?;
    info!(
        "Wrote {} glyphs for '{}'",
        document.glyphs.len(),
        document.name
    );
    Ok(())
}
