//! Glyph naming: placeholder detection, uniqueness enforcement and the
//! selection-aware [`NameResolver`].
//!
//! # Resolution flow
//!
//! ```text
//! glyph-name ──placeholder?──> decoded unicode ──┐
//!      │                                         v
//!      └──────────── meaningful ──────> original name
//!                                               │
//!             no selection table: unique in `used` ──> css (selected)
//!                                               │
//!             selection table: unique in `available` ──> lookup
//!                     hit  ──> desired name, unique in `used` ──> css (selected)
//!                     miss ──> available name, unique in `used` ──> css (unselected)
//! ```
//!
//! Uniqueness suffixes start at `0`: the second `star` becomes `star0`, the
//! third `star1`, and so on.

use crate::selection::{SelectionKey, SelectionTable};
use crate::unicode::decode_html_entities;
use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref PLACEHOLDER_NAME: Regex = Regex::new(r"(?i)^uni[0-9a-f]{4}$").unwrap();
}

/// Marker some font editors put into names they generated themselves.
const UNNAMED_MARKER: &str = "NameMe";

/// Returns true for auto-generated glyph names that carry no meaning, such as
/// `uniE001` or `NameMe.123`.
pub fn is_placeholder_name(name: &str) -> bool {
    PLACEHOLDER_NAME.is_match(name) || name.contains(UNNAMED_MARKER)
}

/// Set of names already claimed during one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    claimed: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }

    /// Claims `candidate`, or the first free `candidate0`, `candidate1`, ...
    /// and returns the claimed name.
    pub fn find_available_name(&mut self, candidate: &str) -> String {
        let mut name = candidate.to_string();
        let mut suffix = 0u32;
        while self.claimed.contains(&name) {
            name = format!("{}{}", candidate, suffix);
            suffix += 1;
        }
        self.claimed.insert(name.clone());
        name
    }
}

/// Outcome of resolving one glyph's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Unique name emitted as the glyph's `css`.
    pub final_name: String,
    /// Placeholder-resolved name before any rename; unique among all glyphs
    /// when a selection table is in use.
    pub original_name: String,
    pub selected: bool,
}

impl Resolution {
    /// Lookup terms for the glyph: the final name, then the original one when
    /// a rename happened and it is not empty.
    pub fn search_terms(&self) -> Vec<String> {
        let mut terms = vec![self.final_name.clone()];
        if !self.original_name.is_empty() && self.original_name != self.final_name {
            terms.push(self.original_name.clone());
        }
        terms
    }
}

/// Computes unique display names for a sequence of glyphs.
///
/// A resolver owns the registries of one pipeline run; build a fresh one for
/// every run.
#[derive(Debug, Clone)]
pub struct NameResolver<'a> {
    selection: Option<&'a SelectionTable>,
    selection_key: SelectionKey,
    available: NameRegistry,
    used: NameRegistry,
    matched: HashSet<String>,
}

impl<'a> NameResolver<'a> {
    /// Resolver without a selection table: every glyph is selected.
    pub fn new() -> Self {
        NameResolver {
            selection: None,
            selection_key: SelectionKey::Name,
            available: NameRegistry::new(),
            used: NameRegistry::new(),
            matched: HashSet::new(),
        }
    }

    /// Resolver that filters and renames glyphs through `selection`, looking
    /// entries up by `key`.
    pub fn with_selection(selection: &'a SelectionTable, key: SelectionKey) -> Self {
        NameResolver {
            selection: Some(selection),
            selection_key: key,
            available: NameRegistry::new(),
            used: NameRegistry::new(),
            matched: HashSet::new(),
        }
    }

    /// Selection entries with a desired name that no glyph resolved so far
    /// has matched, sorted.
    pub fn unmatched_selections(&self) -> Vec<&'a str> {
        let Some(selection) = self.selection else {
            return Vec::new();
        };
        let mut unmatched: Vec<&'a str> = selection
            .selected_identifiers()
            .filter(|id| !self.matched.contains(*id))
            .collect();
        unmatched.sort_unstable();
        unmatched
    }

    /// Resolves the name of the next glyph.
    ///
    /// `unicode_attribute` is the raw, entity-encoded attribute. When the
    /// glyph name is a placeholder and the attribute is missing the working
    /// name is empty; that is reported, not rejected.
    pub fn resolve(&mut self, glyph_name: &str, unicode_attribute: Option<&str>) -> Resolution {
        let decoded = unicode_attribute.map(decode_html_entities);
        let working_name = if is_placeholder_name(glyph_name) {
            trace!(
                "Glyph name '{}' is a placeholder, using its unicode value",
                glyph_name
            );
            decoded.clone().unwrap_or_default()
        } else {
            glyph_name.to_string()
        };

        let Some(selection) = self.selection else {
            let final_name = self.used.find_available_name(&working_name);
            return Resolution {
                final_name,
                original_name: working_name,
                selected: true,
            };
        };

        let available_name = self.available.find_available_name(&working_name);
        let lookup_key = match self.selection_key {
            SelectionKey::Name => Some(available_name.as_str()),
            SelectionKey::Unicode => decoded.as_deref(),
        };
        let desired =
            lookup_key.and_then(|key| selection.desired_name(key).map(|name| (key, name)));

        match desired {
            Some((key, desired)) => {
                self.matched.insert(key.to_string());
                let final_name = self.used.find_available_name(desired);
                debug!("Selected '{}' as '{}'", available_name, final_name);
                Resolution {
                    final_name,
                    original_name: available_name,
                    selected: true,
                }
            }
            None => {
                let final_name = self.used.find_available_name(&available_name);
                debug!("Glyph '{}' is not selected", available_name);
                Resolution {
                    final_name,
                    original_name: available_name,
                    selected: false,
                }
            }
        }
    }
}

impl Default for NameResolver<'_> {
    fn default() -> Self {
        Self::new()
    }
}
