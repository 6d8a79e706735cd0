//! Log setup for icon2fontello.
//!
//! Everything goes to stderr as `[LEVEL] message`, so stdout stays free and
//! the document only ever lands in the output file. At the default `info`
//! level a run reports the loaded font, the applied selection and the
//! written document; warnings cover dropped glyphs, empty names and
//! selection entries that matched no glyph. `-v` adds per-glyph decisions,
//! `-vv` the raw font parsing.

use crate::args::Icon2FontelloArgs;
use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;
use std::str::FromStr;

/// Level used when the requested filter names modules instead of a level.
const MODULE_FILTER_BASE: LevelFilter = LevelFilter::Info;

/// Plain level names (`debug`, `WARN`, `off`, ...) map to a filter; anything
/// else is treated as an env_logger directive such as
/// `icon2fontello::names=trace`.
fn plain_level(filters: &str) -> Option<LevelFilter> {
    LevelFilter::from_str(filters.trim()).ok()
}

/// Installs the logger for the level chosen by [`Icon2FontelloArgs::effective_log_level`].
pub fn init_logging(args: &Icon2FontelloArgs) -> Result<(), Box<dyn std::error::Error>> {
    let filters = args.effective_log_level();
    let mut builder = Builder::new();

    match plain_level(&filters) {
        Some(level) => {
            builder.filter_level(level);
        }
        None => {
            builder.filter_level(MODULE_FILTER_BASE);
            builder.parse_filters(&filters);
        }
    }

    builder.format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()));
    builder.try_init()?;
    Ok(())
}
