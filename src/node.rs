//! The node tree: resolution, right-biased deep merge, and scalar access.
//!
//! A node is either a scalar leaf (string value, no children) or an
//! interior node (named children). Scalar-ness is decided solely by
//! whether the children map is empty; there is no separate discriminant.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::time::Duration;

use num_complex::Complex64;

use crate::duration::parse_duration;
use crate::error::ConfigError;
use crate::key::{Key, KeyPath};

/// One element of a configuration tree.
///
/// Child iteration order is unspecified; merge and lookup never depend
/// on it. List order survives through stringified index keys instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    value: String,
    children: HashMap<Key, Node>,
}

impl Node {
    /// A scalar leaf holding the given text.
    pub fn leaf(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            children: HashMap::new(),
        }
    }

    /// Whether this node carries a scalar value (it has no children).
    pub fn is_scalar(&self) -> bool {
        self.children.is_empty()
    }

    /// Look up a direct child.
    pub fn child(&self, key: &Key) -> Option<&Node> {
        self.children.get(key)
    }

    /// Iterate the direct children.
    pub fn children(&self) -> impl Iterator<Item = (&Key, &Node)> {
        self.children.iter()
    }

    /// Walk the path one segment at a time. Any missing segment yields
    /// `None`; the empty path yields the node itself.
    pub fn resolve(&self, path: &KeyPath) -> Option<&Node> {
        let mut current = self;
        for key in path.iter() {
            current = current.children.get(key)?;
        }
        Some(current)
    }

    /// Right-biased deep merge, in place.
    ///
    /// This node's value is replaced by `other`'s (even when `other` is
    /// interior; callers must not rely on value survival once a node
    /// gains children). Children unique to `other` are adopted by move;
    /// shared children merge recursively.
    pub fn overwrite_with(&mut self, other: Node) {
        self.value = other.value;
        for (key, child) in other.children {
            self.merge_child(key, child);
        }
    }

    /// Insert a child, merging via [`Node::overwrite_with`] when the key
    /// is already taken.
    pub(crate) fn merge_child(&mut self, key: Key, node: Node) {
        match self.children.entry(key) {
            Entry::Occupied(mut existing) => existing.get_mut().overwrite_with(node),
            Entry::Vacant(slot) => {
                slot.insert(node);
            }
        }
    }

    /// The node's exclusive string value.
    ///
    /// Fails with [`ConfigError::NotAScalar`] when the node has children;
    /// never panics.
    pub fn scalar(&self) -> Result<&str, ConfigError> {
        if !self.children.is_empty() {
            return Err(ConfigError::NotAScalar);
        }
        Ok(&self.value)
    }

    /// Parse the scalar value as a boolean.
    ///
    /// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their false
    /// counterparts.
    pub fn as_bool(&self) -> Result<bool, ConfigError> {
        let text = self.scalar()?;
        parse_bool(text).ok_or_else(|| ConfigError::parse(text, "bool"))
    }

    pub fn as_i64(&self) -> Result<i64, ConfigError> {
        let text = self.scalar()?;
        text.parse().map_err(|_| ConfigError::parse(text, "i64"))
    }

    pub fn as_u64(&self) -> Result<u64, ConfigError> {
        let text = self.scalar()?;
        text.parse().map_err(|_| ConfigError::parse(text, "u64"))
    }

    pub fn as_f64(&self) -> Result<f64, ConfigError> {
        let text = self.scalar()?;
        text.parse().map_err(|_| ConfigError::parse(text, "f64"))
    }

    /// Parse the scalar value as a complex number, e.g. `1+2i`.
    pub fn as_complex(&self) -> Result<Complex64, ConfigError> {
        let text = self.scalar()?;
        text.parse()
            .map_err(|_| ConfigError::parse(text, "complex"))
    }

    /// Parse the scalar value with the duration grammar, e.g. `2s`, `150ms`.
    pub fn as_duration(&self) -> Result<Duration, ConfigError> {
        parse_duration(self.scalar()?)
    }
}

pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
