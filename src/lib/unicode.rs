//! Codepoint helpers: HTML entity decoding of `unicode` attributes and
//! parsing of `unicode-range` descriptors.

/// First codepoint of the Basic Multilingual Plane private-use area.
pub const PRIVATE_USE_AREA_START: u32 = 0xE000;

/// Highest valid Unicode codepoint.
pub const MAX_CODEPOINT: u32 = 0x10FFFF;

/// Decodes HTML character references in `input`.
///
/// Numeric references (`&#xE001;`, `&#57345;`) and the XML named entities are
/// replaced by the characters they denote. Anything that does not form a
/// valid reference is copied through untouched.
///
/// # Example
/// ```rust
/// use icon2fontello::unicode::decode_html_entities;
///
/// assert_eq!(decode_html_entities("&#x41;&amp;&#66;"), "A&B");
/// assert_eq!(decode_html_entities("&bogus;"), "&bogus;");
/// ```
pub fn decode_html_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match candidate.find(';').and_then(|end| {
            decode_reference(&candidate[1..end]).map(|decoded| (decoded, end))
        }) {
            Some((decoded, end)) => {
                out.push(decoded);
                rest = &candidate[end + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(body: &str) -> Option<char> {
    if let Some(numeric) = body.strip_prefix('#') {
        let hex = numeric
            .strip_prefix('x')
            .or_else(|| numeric.strip_prefix('X'));
        let value = match hex {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(value);
    }
    match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => None,
    }
}

/// Encodes a codepoint as a hexadecimal character reference (`&#xe001;`).
pub fn encode_codepoint(codepoint: u32) -> String {
    format!("&#x{:x};", codepoint)
}

/// Parses a CSS/SVG `unicode-range` descriptor into its first interval.
///
/// Accepts `U+E000-E0FF`, a single `U+E001`, and wildcard forms like
/// `U+E0??`. When several comma-separated ranges are given only the first
/// one is considered.
pub fn parse_unicode_range(descriptor: &str) -> Option<(u32, u32)> {
    let first = descriptor.split(',').next()?.trim();
    let body = first
        .strip_prefix("U+")
        .or_else(|| first.strip_prefix("u+"))
        .unwrap_or(first);

    if body.contains('?') {
        let low = u32::from_str_radix(&body.replace('?', "0"), 16).ok()?;
        let high = u32::from_str_radix(&body.replace('?', "F"), 16).ok()?;
        return Some((low, high));
    }

    match body.split_once('-') {
        Some((low, high)) => {
            let low = u32::from_str_radix(low.trim(), 16).ok()?;
            let high = u32::from_str_radix(high.trim(), 16).ok()?;
            Some((low, high))
        }
        None => {
            let single = u32::from_str_radix(body, 16).ok()?;
            Some((single, single))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_numeric_references() {
        assert_eq!(decode_html_entities("&#xe001;"), "\u{e001}");
        assert_eq!(decode_html_entities("&#XE001;"), "\u{e001}");
        assert_eq!(decode_html_entities("&#57345;"), "\u{e001}");
        assert_eq!(decode_html_entities("a&#x62;c"), "abc");
    }

    #[test]
    fn test_decode_leaves_invalid_references() {
        assert_eq!(decode_html_entities("&"), "&");
        assert_eq!(decode_html_entities("& ;"), "& ;");
        assert_eq!(decode_html_entities("&#xZZ;"), "&#xZZ;");
        assert_eq!(decode_html_entities("&#xD800;"), "&#xD800;");
        assert_eq!(decode_html_entities("fish & chips;"), "fish & chips;");
    }

    #[test]
    fn test_decode_named_entities() {
        assert_eq!(decode_html_entities("&lt;&gt;&quot;&apos;"), "<>\"'");
        assert_eq!(decode_html_entities("&amp;#x41;"), "&#x41;");
    }

    #[test]
    fn test_encode_codepoint() {
        assert_eq!(encode_codepoint(0xE001), "&#xe001;");
        assert_eq!(decode_html_entities(&encode_codepoint(0x1F600)), "\u{1F600}");
    }

    #[test]
    fn test_parse_unicode_range() {
        assert_eq!(parse_unicode_range("U+E000-E0FF"), Some((0xE000, 0xE0FF)));
        assert_eq!(parse_unicode_range("U+f000"), Some((0xF000, 0xF000)));
        assert_eq!(parse_unicode_range("U+E0??"), Some((0xE000, 0xE0FF)));
        assert_eq!(
            parse_unicode_range("U+E100-E1FF, U+0020-007E"),
            Some((0xE100, 0xE1FF))
        );
        assert_eq!(parse_unicode_range("nonsense"), None);
        assert_eq!(parse_unicode_range(""), None);
    }
}
