//! Key normalization and dotted key paths.
//!
//! Every raw label is normalized before it touches the tree: lower-cased,
//! with everything outside `[0-9a-z]` stripped. Two raw labels that
//! normalize to the same text are indistinguishable as map keys; that
//! collision risk is accepted rather than treated as an error.

use std::fmt;

/// Separator between segments of a dotted key path.
pub const KEY_SEPARATOR: &str = ".";

/// A single normalized path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    /// Normalize a raw label: lower-case it and strip every character
    /// outside `[0-9a-z]`. Total; never fails.
    pub fn normalize(raw: &str) -> Self {
        let normalized = raw
            .chars()
            .filter_map(|c| {
                let c = c.to_ascii_lowercase();
                (c.is_ascii_lowercase() || c.is_ascii_digit()).then_some(c)
            })
            .collect();
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered sequence of normalized keys identifying a node by traversal
/// from the root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyPath(Vec<Key>);

impl KeyPath {
    /// The zero-segment path, which resolves to the root node itself.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Split a dotted string on [`KEY_SEPARATOR`] and normalize each
    /// segment independently.
    ///
    /// An empty string yields a single empty-segment path, not the root
    /// path; only [`KeyPath::root`] resolves to the root. Callers that
    /// want to avoid stray empty segments must avoid leading or trailing
    /// separators.
    pub fn parse(raw: &str) -> Self {
        Self(raw.split(KEY_SEPARATOR).map(Key::normalize).collect())
    }

    /// Serialize back to a dotted string using the same separator.
    pub fn join(&self) -> String {
        self.0
            .iter()
            .map(Key::as_str)
            .collect::<Vec<_>>()
            .join(KEY_SEPARATOR)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Key> {
        self.0.iter()
    }

    /// Split off the leading segment, returning it together with the
    /// remaining suffix path.
    pub fn split_first(&self) -> Option<(&Key, KeyPath)> {
        self.0
            .split_first()
            .map(|(head, rest)| (head, KeyPath(rest.to_vec())))
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_strips() {
        assert_eq!(Key::normalize("Spam"), Key::normalize("spam"));
        assert_eq!(Key::normalize("DB_PORT").as_str(), "dbport");
        assert_eq!(Key::normalize("listen-port2").as_str(), "listenport2");
        assert_eq!(Key::normalize("über!").as_str(), "ber");
    }

    #[test]
    fn test_normalize_is_total() {
        assert_eq!(Key::normalize("").as_str(), "");
        assert_eq!(Key::normalize("___").as_str(), "");
    }

    #[test]
    fn test_parse_splits_and_normalizes_each_segment() {
        let path = KeyPath::parse("Web.Server.Listen_Port");
        assert_eq!(path.len(), 3);
        assert_eq!(path.join(), "web.server.listenport");
    }

    #[test]
    fn test_equivalent_raw_paths_parse_identically() {
        assert_eq!(KeyPath::parse("db.PORT"), KeyPath::parse("D-B.port"));
    }

    #[test]
    fn test_empty_string_is_single_empty_segment() {
        let path = KeyPath::parse("");
        assert_eq!(path.len(), 1);
        assert!(!path.is_empty());
        assert_eq!(KeyPath::root().len(), 0);
    }

    #[test]
    fn test_join_roundtrip() {
        let path = KeyPath::parse("spam.salad.x0");
        assert_eq!(KeyPath::parse(&path.join()), path);
    }

    #[test]
    fn test_split_first() {
        let path = KeyPath::parse("a.b.c");
        let (head, rest) = path.split_first().unwrap();
        assert_eq!(head.as_str(), "a");
        assert_eq!(rest.join(), "b.c");
        assert!(KeyPath::root().split_first().is_none());
    }
}
