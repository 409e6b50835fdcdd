//! `{tag}` placeholders in notification text.
//!
//! Services prefix titles with category tags such as `{social}`. Titles
//! render them as glyphs; bodies drop them.

use std::collections::BTreeMap;

/// Mapping from tag name to its glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDictionary {
    tags: BTreeMap<String, String>,
}

impl TagDictionary {
    /// Build a dictionary from `(name, glyph)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            tags: pairs
                .into_iter()
                .map(|(name, glyph)| (name.into(), glyph.into()))
                .collect(),
        }
    }

    /// Glyph for `name`, if the tag is known.
    pub fn glyph(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }
}

impl Default for TagDictionary {
    fn default() -> Self {
        Self::from_pairs([
            ("article", "📰"),
            ("social", "🍻"),
            ("video", "📺"),
            ("comment", "🗣"),
            ("package", "💽"),
            ("developer", "🖥"),
            ("audio", "📻"),
        ])
    }
}

/// Replace every known `{tag}` with its glyph.
///
/// Unknown tags and unbalanced braces are copied through unchanged.
pub fn format_tags(content: &str, dictionary: &TagDictionary) -> String {
    substitute(content, |name| dictionary.glyph(name))
}

/// Remove every known `{tag}`, leaving surrounding whitespace alone.
pub fn remove_tags(content: &str, dictionary: &TagDictionary) -> String {
    substitute(content, |name| dictionary.glyph(name).map(|_| ""))
}

fn substitute<'a, F>(content: &str, mut replacement: F) -> String
where
    F: FnMut(&str) -> Option<&'a str>,
{
    let mut output = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        match after_open.find(['{', '}']) {
            Some(close) if after_open.as_bytes()[close] == b'}' => {
                let name = &after_open[..close];
                match replacement(name) {
                    Some(value) => output.push_str(value),
                    None => output.push_str(&rest[open..open + close + 2]),
                }
                rest = &after_open[close + 1..];
            }
            _ => {
                output.push('{');
                rest = after_open;
            }
        }
    }

    output.push_str(rest);
    output
}
