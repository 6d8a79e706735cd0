//! Selection tables: which glyphs end up selected, and under which name.
//!
//! A table maps an original glyph identifier (glyph name, or decoded unicode
//! value, see [`SelectionKey`]) to the desired output name. A missing entry
//! or a falsy one (`false`, `null`, empty string) means the glyph is not
//! selected.
//!
//! Two file formats are understood:
//!
//! - line oriented text (`.txt`), one `original [desired]` pair per line:
//!
//!   ```text
//!   # keep as is
//!   star
//!   heart favorite
//!   &#xe003; cart
//!   ```
//!
//! - JSON (`.json`, `.jsonc`), comments allowed, either an array of
//!   identifiers and `[original, desired]` pairs or an object:
//!
//!   ```json
//!   { "star": "star", "heart": "favorite", "cloud": false }
//!   ```
//!
//! Loading never fails: an unreadable file, an unknown extension or broken
//! content yields no table at all, and the pipeline then runs as if no
//! selection had been given.

use crate::unicode::decode_html_entities;
use log::{debug, warn};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Which identifier of a glyph is looked up in the selection table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionKey {
    /// The placeholder-resolved, de-duplicated glyph name.
    #[default]
    Name,
    /// The decoded `unicode` attribute of the glyph.
    Unicode,
}

impl FromStr for SelectionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" | "glyph-name" => Ok(SelectionKey::Name),
            "unicode" | "codepoint" => Ok(SelectionKey::Unicode),
            other => Err(format!(
                "unknown selection key '{}', expected 'name' or 'unicode'",
                other
            )),
        }
    }
}

/// Read-only mapping from original identifiers to desired names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTable {
    entries: HashMap<String, Option<String>>,
}

impl SelectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(original, desired)` pairs; `None` excludes.
    /// Later pairs win over earlier ones for the same identifier.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, Option<V>)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.map(Into::into)))
            .collect();
        SelectionTable { entries }
    }

    /// Desired output name for `identifier`, or `None` when the glyph is not
    /// selected.
    pub fn desired_name(&self, identifier: &str) -> Option<&str> {
        self.entries
            .get(identifier)?
            .as_deref()
            .filter(|name| !name.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifiers that map to a desired name.
    pub fn selected_identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, v)| v.as_deref().is_some_and(|name| !name.is_empty()))
            .map(|(k, _)| k.as_str())
    }

    fn insert(&mut self, identifier: &str, desired: Option<String>) {
        self.entries
            .insert(decode_html_entities(identifier), desired);
    }
}

/// A selection file format.
pub trait SelectionLoader {
    /// Parses `content`; `None` means the content could not be understood.
    fn parse(&self, content: &str) -> Option<SelectionTable>;
}

/// `original [desired]` per line, whitespace separated. Blank lines and
/// lines starting with `#` are ignored, extra tokens too.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSelectionLoader;

impl SelectionLoader for TextSelectionLoader {
    fn parse(&self, content: &str) -> Option<SelectionTable> {
        let mut table = SelectionTable::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut tokens = line.split_whitespace();
            let Some(original) = tokens.next() else {
                continue;
            };
            let desired = tokens.next().unwrap_or(original);
            table.insert(original, Some(desired.to_string()));
        }
        Some(table)
    }
}

/// JSON array or object, `//` and `/* */` comments allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSelectionLoader;

impl SelectionLoader for JsonSelectionLoader {
    fn parse(&self, content: &str) -> Option<SelectionTable> {
        let stripped = strip_json_comments(content);
        let value: Value = match serde_json::from_str(&stripped) {
            Ok(v) => v,
            Err(e) => {
                warn!("Ignoring malformed JSON selection: {}", e);
                return None;
            }
        };

        let mut table = SelectionTable::new();
        match value {
            Value::Array(items) => {
                for item in &items {
                    match item {
                        Value::String(id) => table.insert(id, Some(id.clone())),
                        Value::Array(pair) => {
                            let Some(Value::String(id)) = pair.first() else {
                                debug!("Skipping selection entry without identifier: {}", item);
                                continue;
                            };
                            let desired = match pair.get(1) {
                                None => Some(id.clone()),
                                Some(v) => desired_from_json(id, v),
                            };
                            table.insert(id, desired);
                        }
                        other => debug!("Skipping unsupported selection entry: {}", other),
                    }
                }
            }
            Value::Object(map) => {
                for (id, v) in &map {
                    table.insert(id, desired_from_json(id, v));
                }
            }
            other => {
                warn!("Ignoring JSON selection that is neither array nor object: {}", other);
                return None;
            }
        }
        Some(table)
    }
}

fn desired_from_json(id: &str, value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Bool(true) => Some(id.to_string()),
        _ => None,
    }
}

/// Removes `//` line comments and `/* */` block comments outside of string
/// literals. Newlines inside comments are kept so error positions still
/// point at the right line.
pub fn strip_json_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    if skipped == '\n' {
                        out.push('\n');
                    }
                    prev = skipped;
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Picks the loader for a selection file from its extension.
pub fn loader_for_path(path: &Path) -> Option<Box<dyn SelectionLoader>> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "txt" | "list" => Some(Box::new(TextSelectionLoader)),
        "json" | "jsonc" => Some(Box::new(JsonSelectionLoader)),
        _ => None,
    }
}

/// Reads and parses a selection file.
///
/// Returns `None` (no selection applied) when the file cannot be read, its
/// extension is not recognized, or its content is malformed.
///
/// # Example
/// ```no_run
/// use icon2fontello::selection::load_selection_file;
///
/// match load_selection_file("icons.json") {
///     Some(table) => println!("{} entries", table.len()),
///     None => println!("every glyph will be selected"),
/// }
/// ```
pub fn load_selection_file(path: impl AsRef<Path>) -> Option<SelectionTable> {
    let path = path.as_ref();
    let Some(loader) = loader_for_path(path) else {
        warn!(
            "Unsupported selection file extension, ignoring {}",
            path.display()
        );
        return None;
    };
    load_selection_with(path, loader.as_ref())
}

/// Reads `path` and parses it with an explicit `loader`, whatever the
/// file's extension.
pub fn load_selection_with(
    path: impl AsRef<Path>,
    loader: &dyn SelectionLoader,
) -> Option<SelectionTable> {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Cannot read selection file {}: {}", path.display(), e);
            return None;
        }
    };
    let table = loader.parse(&content)?;
    debug!(
        "Loaded {} selection entries from {}",
        table.len(),
        path.display()
    );
    Some(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desired_name_treats_falsy_as_excluded() {
        let table = SelectionTable::from_pairs([
            ("a", Some("alpha")),
            ("b", None),
            ("c", Some("")),
        ]);
        assert_eq!(table.desired_name("a"), Some("alpha"));
        assert_eq!(table.desired_name("b"), None);
        assert_eq!(table.desired_name("c"), None);
        assert_eq!(table.desired_name("d"), None);
        assert_eq!(table.selected_identifiers().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_text_loader() {
        let table = TextSelectionLoader
            .parse("star\n\n# comment\n  heart   favorite extra\n&#xe003; cart\n")
            .unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.desired_name("star"), Some("star"));
        assert_eq!(table.desired_name("heart"), Some("favorite"));
        assert_eq!(table.desired_name("\u{e003}"), Some("cart"));
    }

    #[test]
    fn test_json_array_loader() {
        let table = JsonSelectionLoader
            .parse(r#"["star", ["heart", "favorite"], ["cloud", false], ["sun"], 42]"#)
            .unwrap();
        assert_eq!(table.desired_name("star"), Some("star"));
        assert_eq!(table.desired_name("heart"), Some("favorite"));
        assert_eq!(table.desired_name("cloud"), None);
        assert_eq!(table.desired_name("sun"), Some("sun"));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_json_object_loader_with_comments() {
        let json = r#"
        {
            // keep the star
            "star": "star",
            /* renamed
               icon */
            "heart": "favorite",
            "cloud": false,
            "moon": null,
            "sun": true,
            "url": "http://example.com/*not-a-comment*/"
        }
        "#;
        let table = JsonSelectionLoader.parse(json).unwrap();
        assert_eq!(table.desired_name("star"), Some("star"));
        assert_eq!(table.desired_name("heart"), Some("favorite"));
        assert_eq!(table.desired_name("cloud"), None);
        assert_eq!(table.desired_name("moon"), None);
        assert_eq!(table.desired_name("sun"), Some("sun"));
        assert_eq!(
            table.desired_name("url"),
            Some("http://example.com/*not-a-comment*/")
        );
    }

    #[test]
    fn test_json_loader_rejects_malformed_input() {
        assert!(JsonSelectionLoader.parse("{ not json").is_none());
        assert!(JsonSelectionLoader.parse("\"just a string\"").is_none());
    }

    #[test]
    fn test_strip_json_comments() {
        assert_eq!(strip_json_comments("[1, // one\n2]"), "[1, \n2]");
        assert_eq!(strip_json_comments("[1 /* a\nb */, 2]"), "[1 \n, 2]");
        assert_eq!(
            strip_json_comments(r#"["a\"//b"]"#),
            r#"["a\"//b"]"#
        );
    }

    #[test]
    fn test_loader_for_path() {
        assert!(loader_for_path(Path::new("sel.txt")).is_some());
        assert!(loader_for_path(Path::new("sel.JSON")).is_some());
        assert!(loader_for_path(Path::new("sel.yaml")).is_none());
        assert!(loader_for_path(Path::new("sel")).is_none());
    }

    #[test]
    fn test_load_selection_file_missing_or_unsupported() {
        assert!(load_selection_file("does/not/exist.json").is_none());
        assert!(load_selection_file("Cargo.toml").is_none());
    }

    #[test]
    fn test_selection_key_from_str() {
        assert_eq!("name".parse::<SelectionKey>(), Ok(SelectionKey::Name));
        assert_eq!(" Unicode ".parse::<SelectionKey>(), Ok(SelectionKey::Unicode));
        assert!("glyph".parse::<SelectionKey>().is_err());
    }
}
