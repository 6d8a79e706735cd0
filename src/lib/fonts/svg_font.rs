//! SVG font reader.
//!
//! Extracts `<font-face>` metrics and every `<glyph>` element, in document
//! order, from an SVG font such as:
//!
//! ```xml
//! <svg><defs><font id="icons" horiz-adv-x="1000">
//!   <font-face font-family="icons" units-per-em="1000" ascent="850"
//!              descent="-150" unicode-range="U+E000-E0FF" />
//!   <glyph glyph-name="home" unicode="&#xe000;" d="M0 0L500 800Z" />
//! </font></defs></svg>
//! ```
//!
//! The `unicode` attribute is kept entity-encoded; decoding it is up to the
//! name resolver.

use super::LoadedFont;
use crate::model::{FontMetadata, RawGlyph};
use crate::unicode::{decode_html_entities, parse_unicode_range};
use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;
use std::collections::HashMap;

// Tag bodies may hold `>` inside quoted attribute values.
lazy_static! {
    static ref COMMENT: Regex = Regex::new(r"(?s)<!--.*?-->").unwrap();
    static ref FONT_TAG: Regex =
        Regex::new(r#"(?s)<font(?:\s((?:[^>"']|"[^"]*"|'[^']*')*))?>"#).unwrap();
    static ref FONT_FACE_TAG: Regex =
        Regex::new(r#"(?s)<font-face\b((?:[^>"']|"[^"]*"|'[^']*')*)>"#).unwrap();
    static ref GLYPH_TAG: Regex =
        Regex::new(r#"(?s)<glyph\b((?:[^>"']|"[^"]*"|'[^']*')*)>"#).unwrap();
    static ref ATTRIBUTE: Regex =
        Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap();
}

/// Parses the attributes of one tag body into a name/value map.
fn parse_attributes(tag_body: &str) -> HashMap<&str, &str> {
    ATTRIBUTE
        .captures_iter(tag_body)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            let value = caps.get(2).or_else(|| caps.get(3))?.as_str();
            Some((name, value))
        })
        .collect()
}

fn parse_number(attrs: &HashMap<&str, &str>, name: &str) -> Option<f64> {
    attrs.get(name).and_then(|v| v.trim().parse::<f64>().ok())
}

/// Extracts font metadata and the glyph table from SVG font markup.
///
/// Commented-out markup is ignored.
pub fn parse_svg_font(svg: &str) -> Result<LoadedFont, String> {
    let svg = COMMENT.replace_all(svg, "");
    let svg: &str = &svg;

    let face_body = FONT_FACE_TAG
        .captures(svg)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| "No <font-face> element found in SVG font".to_string())?;
    let face = parse_attributes(face_body);

    let font_attrs = FONT_TAG
        .captures(svg)
        .and_then(|c| c.get(1))
        .map(|m| parse_attributes(m.as_str()))
        .unwrap_or_default();

    let units_per_em = parse_number(&face, "units-per-em")
        .filter(|u| *u > 0.0)
        .map(|u| u.round() as u32)
        .unwrap_or(1000);
    let ascent = parse_number(&face, "ascent").unwrap_or_else(|| {
        let descent = parse_number(&face, "descent").unwrap_or(0.0);
        units_per_em as f64 + descent
    });
    let unicode_range_start = face
        .get("unicode-range")
        .and_then(|range| parse_unicode_range(range))
        .map(|(start, _)| start);
    let font_name = face
        .get("font-family")
        .or_else(|| font_attrs.get("id"))
        .map(|name| decode_html_entities(name.trim()))
        .filter(|name| !name.is_empty());

    let metadata = FontMetadata {
        ascent,
        units_per_em,
        unicode_range_start,
        font_name,
    };
    debug!("SVG font metadata: {:?}", metadata);

    let glyphs: Vec<RawGlyph> = GLYPH_TAG
        .captures_iter(svg)
        .filter_map(|caps| caps.get(1))
        .map(|body| {
            let attrs = parse_attributes(body.as_str());
            let glyph = RawGlyph {
                glyph_name: attrs
                    .get("glyph-name")
                    .map(|name| decode_html_entities(name))
                    .unwrap_or_default(),
                unicode_attribute: attrs.get("unicode").map(|u| u.to_string()),
                path_data: attrs.get("d").map(|d| d.to_string()),
            };
            trace!("SVG glyph '{}'", glyph.glyph_name);
            glyph
        })
        .collect();

    Ok(LoadedFont { metadata, glyphs })
}
