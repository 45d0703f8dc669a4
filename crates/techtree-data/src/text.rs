//! Localized text lookup.
//!
//! Text is resolved in two phases. A [`TextResolverBuilder`] absorbs every
//! text table first; [`TextResolverBuilder::build`] then freezes it into a
//! read-only [`TextResolver`]. Resolving a tag before all tables are loaded
//! would silently produce fallback names, so the resolver cannot be obtained
//! until loading is finished.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::schema::TextRecord;

static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[^>]+>").unwrap());
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]+\}").unwrap());

/// Literal emphasis marker used by the game's text tables.
const EMPHASIS: char = '~';

/// Strip presentation markup from a game string.
///
/// Applied in order: `<...>` markup pairs, `{...}` inline codes, emphasis
/// markers, surrounding whitespace. Entities are not unescaped.
pub fn clean_text(text: &str) -> String {
    let text = MARKUP.replace_all(text, "");
    let text = INLINE_CODE.replace_all(&text, "");
    let text = text.replace(EMPHASIS, "");
    text.trim().to_string()
}

/// Accumulates tag → text pairs from any number of text tables.
#[derive(Debug, Default)]
pub struct TextResolverBuilder {
    entries: HashMap<String, String>,
}

impl TextResolverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a text table. Entries with an empty tag or text are ignored;
    /// a tag already present is overwritten by the later table.
    pub fn load(&mut self, table: &[TextRecord]) -> &mut Self {
        for record in table {
            let (Some(tag), Some(text)) = (record.tag.as_deref(), record.text.as_deref()) else {
                continue;
            };
            if tag.is_empty() || text.is_empty() {
                continue;
            }
            self.entries.insert(tag.to_string(), clean_text(text));
        }
        self
    }

    /// Finish loading and freeze the table.
    pub fn build(self) -> TextResolver {
        TextResolver {
            entries: self.entries,
        }
    }
}

/// Read-only tag → cleaned text lookup.
#[derive(Debug, Clone, Default)]
pub struct TextResolver {
    entries: HashMap<String, String>,
}

impl TextResolver {
    /// Build a resolver from text tables given in layering order.
    pub fn from_tables<'a>(tables: impl IntoIterator<Item = &'a [TextRecord]>) -> Self {
        let mut builder = TextResolverBuilder::new();
        for table in tables {
            builder.load(table);
        }
        builder.build()
    }

    /// The cleaned text for `tag`, if any.
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.entries.get(tag).map(String::as_str)
    }

    /// The cleaned text for `tag`, or `fallback` when the tag is absent or
    /// unknown.
    pub fn resolve(&self, tag: Option<&str>, fallback: impl FnOnce() -> String) -> String {
        match tag.and_then(|t| self.get(t)) {
            Some(text) => text.to_string(),
            None => fallback(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
