//! Glyph outline transformation.
//!
//! Font outlines are authored with the Y axis growing upwards from the
//! baseline, while the Fontello renderer expects SVG coordinates with Y
//! growing downwards from the top of the em box. [`AffinePathTransformer`]
//! mirrors the outline vertically, scales it, moves it back down by the
//! ascent and writes it out with absolute commands only.
//!
//! ```text
//!  font units (Y up)            fontello (Y down)
//!  y=ascent +------+            y=0      +------+
//!           |  /\  |   scale,            |  /\  |
//!           | /  \ |   flip,    -->      | /  \ |
//!  y=0      +------+   +ascent  y=ascent +------+
//! ```

use kurbo::{Affine, BezPath, PathEl, Point};
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;

/// Ascent Fontello assumes for a 1000 unit em.
pub const FONTELLO_ASCENT: f64 = 850.0;

/// Decimal places kept in emitted coordinates.
pub const DEFAULT_PRECISION: u32 = 1;

lazy_static! {
    static ref LINE_BREAKS: Regex = Regex::new(r"[\r\n]+").unwrap();
}

/// Geometry backend used by the glyph pipeline.
///
/// Implementations accept any string; malformed path grammar is the
/// caller's problem, not an error.
pub trait PathTransformer {
    /// Scales `raw_path` by `scale` on X and `-scale` on Y, translates it by
    /// `(0, ascent)` and returns it in absolute, rounded form.
    fn transform(&self, raw_path: &str, ascent: f64, scale: f64) -> String;
}

/// [`PathTransformer`] built on `kurbo` path parsing and affine maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffinePathTransformer {
    precision: u32,
}

impl Default for AffinePathTransformer {
    fn default() -> Self {
        AffinePathTransformer {
            precision: DEFAULT_PRECISION,
        }
    }
}

impl AffinePathTransformer {
    pub fn with_precision(precision: u32) -> Self {
        AffinePathTransformer { precision }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }
}

impl PathTransformer for AffinePathTransformer {
    fn transform(&self, raw_path: &str, ascent: f64, scale: f64) -> String {
        let collapsed = collapse_line_breaks(raw_path);
        let path = match BezPath::from_svg(&collapsed) {
            Ok(path) => path,
            Err(e) => {
                warn!("Leaving unparseable path data untouched: {}", e);
                return collapsed;
            }
        };

        let affine = Affine::translate((0.0, ascent)) * Affine::scale_non_uniform(scale, -scale);
        format_path(&(affine * path), self.precision)
    }
}

/// Replaces every run of line breaks with a single space.
pub fn collapse_line_breaks(raw_path: &str) -> String {
    LINE_BREAKS.replace_all(raw_path, " ").into_owned()
}

/// Converts `raw_path` to absolute commands and rounds it, without any
/// geometric change.
///
/// Returns `None` when the path cannot be parsed.
pub fn normalize(raw_path: &str, precision: u32) -> Option<String> {
    let path = BezPath::from_svg(&collapse_line_breaks(raw_path)).ok()?;
    Some(format_path(&path, precision))
}

/// Scale that maps an outline drawn for `source_ascent` onto `target_ascent`.
///
/// A non-positive or non-finite source ascent yields `1.0`.
pub fn compensation_scale(source_ascent: f64, target_ascent: f64) -> f64 {
    if source_ascent.is_finite() && source_ascent > 0.0 {
        target_ascent / source_ascent
    } else {
        1.0
    }
}

fn format_path(path: &BezPath, precision: u32) -> String {
    let mut out = String::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => push_command(&mut out, 'M', &[p], precision),
            PathEl::LineTo(p) => push_command(&mut out, 'L', &[p], precision),
            PathEl::QuadTo(p1, p2) => push_command(&mut out, 'Q', &[p1, p2], precision),
            PathEl::CurveTo(p1, p2, p3) => push_command(&mut out, 'C', &[p1, p2, p3], precision),
            PathEl::ClosePath => out.push('Z'),
        }
    }
    out
}

fn push_command(out: &mut String, command: char, points: &[Point], precision: u32) {
    out.push(command);
    let coords = points
        .iter()
        .flat_map(|p| [p.x, p.y])
        .map(|v| format_number(v, precision))
        .collect::<Vec<_>>();
    out.push_str(&coords.join(" "));
}

fn format_number(value: f64, precision: u32) -> String {
    let factor = 10f64.powi(precision as i32);
    let rounded = (value * factor).round() / factor;
    // avoid "-0"
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{}", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform(raw: &str, ascent: f64, scale: f64) -> String {
        AffinePathTransformer::default().transform(raw, ascent, scale)
    }

    #[test]
    fn test_flip_and_translate() {
        assert_eq!(transform("M0 0L100 200Z", 850.0, 1.0), "M0 850L100 650Z");
    }

    #[test]
    fn test_relative_commands_become_absolute() {
        assert_eq!(
            normalize("m10 10l5 5h10v-20z", 1).unwrap(),
            "M10 10L15 15L25 15L25 -5Z"
        );
    }

    #[test]
    fn test_rounds_to_one_decimal() {
        assert_eq!(
            normalize("M0.04 1.26L3.333 -4.449", 1).unwrap(),
            "M0 1.3L3.3 -4.4"
        );
        assert_eq!(
            AffinePathTransformer::with_precision(2).transform("M1.234 0", 0.0, 1.0),
            "M1.23 0"
        );
    }

    #[test]
    fn test_scale_applies_to_both_axes() {
        assert_eq!(transform("M10 20L30 40", 0.0, 0.5), "M5 -10L15 -20");
    }

    #[test]
    fn test_line_breaks_collapse() {
        assert_eq!(collapse_line_breaks("M0 0\r\nL1 1\n\nZ"), "M0 0 L1 1 Z");
        assert_eq!(
            transform("M0 0\nL10\n10\nZ", 0.0, 1.0),
            transform("M0 0 L10 10 Z", 0.0, 1.0)
        );
    }

    #[test]
    fn test_curves_are_kept() {
        assert_eq!(
            normalize("M0 0Q10 10 20 0C30 10 40 10 50 0", 1).unwrap(),
            "M0 0Q10 10 20 0C30 10 40 10 50 0"
        );
        assert_eq!(
            normalize("M0 0q10 10 20 0", 1).unwrap(),
            "M0 0Q10 10 20 0"
        );
    }

    #[test]
    fn test_double_flip_returns_to_baseline() {
        let raw = "M12.34 56.78l10 -3.21c1 2 3 4 5 6z";
        let once = transform(raw, 425.0, 1.0);
        let twice = transform(&once, 425.0, 1.0);
        assert_eq!(twice, normalize(raw, 1).unwrap());
    }

    #[test]
    fn test_unparseable_path_is_passed_through() {
        assert_eq!(transform("M0 0\nXYZ", 850.0, 1.0), "M0 0 XYZ");
        assert!(normalize("not a path", 1).is_none());
    }

    #[test]
    fn test_compensation_scale() {
        assert_eq!(compensation_scale(1700.0, FONTELLO_ASCENT), 0.5);
        assert_eq!(compensation_scale(850.0, FONTELLO_ASCENT), 1.0);
        assert_eq!(compensation_scale(0.0, FONTELLO_ASCENT), 1.0);
        assert_eq!(compensation_scale(f64::NAN, FONTELLO_ASCENT), 1.0);
    }
}
