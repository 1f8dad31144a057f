//! Minimal element selector language.
//!
//! Widgets locate their parts with a handful of selector forms; anything
//! richer belongs to a real DOM backend. Supported: `tag`, `.class`,
//! `[attr]`, `[attr=value]`.

/// An element selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Matches elements with the given tag name.
    Tag(String),
    /// Matches elements whose `class` attribute contains the given token.
    Class(String),
    /// Matches elements carrying the given attribute.
    Attr(String),
    /// Matches elements whose attribute equals the given value.
    AttrEq(String, String),
}

impl Selector {
    pub fn tag(name: impl Into<String>) -> Selector {
        Selector::Tag(name.into())
    }

    pub fn class(name: impl Into<String>) -> Selector {
        Selector::Class(name.into())
    }

    pub fn attr(name: impl Into<String>) -> Selector {
        Selector::Attr(name.into())
    }

    pub fn attr_eq(name: impl Into<String>, value: impl Into<String>) -> Selector {
        Selector::AttrEq(name.into(), value.into())
    }

    /// Parse a selector string. Returns `None` for unsupported syntax.
    pub fn parse(raw: &str) -> Option<Selector> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Some(class) = raw.strip_prefix('.') {
            return (!class.is_empty()).then(|| Selector::class(class));
        }
        if let Some(inner) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            return match inner.split_once('=') {
                Some((name, value)) => {
                    let value = value.trim_matches('"');
                    (!name.is_empty()).then(|| Selector::attr_eq(name, value))
                }
                None => (!inner.is_empty()).then(|| Selector::attr(inner)),
            };
        }
        // Bare tag names only; combinators are out of scope
        raw.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
            .then(|| Selector::tag(raw))
    }

    /// Test this selector against an element's tag and attribute lookup.
    pub fn matches(&self, tag: &str, attr: impl Fn(&str) -> Option<String>) -> bool {
        match self {
            Selector::Tag(name) => tag == name,
            Selector::Class(token) => attr("class")
                .is_some_and(|v| v.split_whitespace().any(|t| t == token)),
            Selector::Attr(name) => attr(name).is_some(),
            Selector::AttrEq(name, value) => attr(name).as_deref() == Some(value),
        }
    }
}
