//! The configuration facade: one merged tree with typed, read-only access.
//!
//! [`Config`] owns the tree produced by merging every loader's output in
//! order; [`Section`] is a non-owning view into a subtree. Neither exposes
//! mutation, so a constructed `Config` is immutable and safe to share
//! across threads.

use std::time::Duration;

use num_complex::Complex64;
use tracing::debug;

use crate::bind::{FromConfig, bind_root};
use crate::error::ConfigError;
use crate::key::KeyPath;
use crate::loader::Loader;
use crate::node::Node;

/// Generates the accessor family shared by [`Config`] and [`Section`].
///
/// The non-failing variants return the zero value of the target type on
/// any failure — absent key, interior node, or malformed text — matching
/// the uniform silent-zero policy documented on [`Config`]. The `try_`
/// variants keep the three conditions distinguishable.
macro_rules! key_accessors {
    () => {
        /// Whether the key resolves at all, scalar or interior.
        pub fn has_key(&self, key: &str) -> bool {
            self.lookup(key).is_some()
        }

        /// Resolve and convert, returning the zero value of `T` on any
        /// failure.
        pub fn get<T: FromConfig>(&self, key: &str) -> T {
            self.try_get(key).unwrap_or_default()
        }

        /// Resolve and convert, keeping "no such key" distinct from
        /// conversion and shape failures.
        pub fn try_get<T: FromConfig>(&self, key: &str) -> Result<T, ConfigError> {
            match self.lookup(key) {
                None => Err(ConfigError::no_such_key(key)),
                Some(node) => T::from_node(node),
            }
        }

        pub fn get_string(&self, key: &str) -> String {
            self.get(key)
        }

        pub fn try_get_string(&self, key: &str) -> Result<String, ConfigError> {
            self.try_get(key)
        }

        pub fn get_bool(&self, key: &str) -> bool {
            self.get(key)
        }

        pub fn try_get_bool(&self, key: &str) -> Result<bool, ConfigError> {
            self.try_get(key)
        }

        pub fn get_i64(&self, key: &str) -> i64 {
            self.get(key)
        }

        pub fn try_get_i64(&self, key: &str) -> Result<i64, ConfigError> {
            self.try_get(key)
        }

        pub fn get_u64(&self, key: &str) -> u64 {
            self.get(key)
        }

        pub fn try_get_u64(&self, key: &str) -> Result<u64, ConfigError> {
            self.try_get(key)
        }

        pub fn get_f64(&self, key: &str) -> f64 {
            self.get(key)
        }

        pub fn try_get_f64(&self, key: &str) -> Result<f64, ConfigError> {
            self.try_get(key)
        }

        pub fn get_complex(&self, key: &str) -> Complex64 {
            self.get(key)
        }

        pub fn try_get_complex(&self, key: &str) -> Result<Complex64, ConfigError> {
            self.try_get(key)
        }

        pub fn get_duration(&self, key: &str) -> Duration {
            self.get(key)
        }

        pub fn try_get_duration(&self, key: &str) -> Result<Duration, ConfigError> {
            self.try_get(key)
        }
    };
}

/// The owner of one merged configuration tree.
///
/// Built once from an ordered list of loaders (later loaders win on
/// conflicting leaves) and never mutated afterwards; every accessor is a
/// pure read.
#[derive(Debug, Clone)]
pub struct Config {
    root: Node,
}

impl Config {
    /// Merge every loader's output in order into one tree.
    ///
    /// Fails atomically on the first loader error; no partial
    /// configuration is returned.
    pub fn load(loaders: &[&dyn Loader]) -> Result<Self, ConfigError> {
        let mut root = Node::default();
        for loader in loaders {
            root.overwrite_with(loader.load()?);
        }
        debug!(loaders = loaders.len(), "merged configuration tree");
        Ok(Self { root })
    }

    /// Wrap an already-built tree.
    pub fn from_tree(root: Node) -> Self {
        Self { root }
    }

    /// View the whole tree as a [`Section`].
    pub fn root(&self) -> Section<'_> {
        Section {
            node: Some(&self.root),
        }
    }

    /// Navigate to a subtree view.
    ///
    /// A key that does not resolve yields a harmlessly-empty view rather
    /// than an error; use [`Config::try_sub`] when a typo should surface.
    pub fn sub(&self, key: &str) -> Section<'_> {
        self.root().sub(key)
    }

    /// Navigate to a subtree view, failing when the key does not resolve.
    pub fn try_sub(&self, key: &str) -> Result<Section<'_>, ConfigError> {
        self.root().try_sub(key)
    }

    /// Bind the whole tree onto a record or string-map target.
    pub fn bind<T: FromConfig>(&self) -> Result<T, ConfigError> {
        bind_root(&self.root)
    }

    fn lookup(&self, key: &str) -> Option<&Node> {
        self.root.resolve(&KeyPath::parse(key))
    }

    key_accessors!();
}

/// A non-owning, read-only view into a subtree of a [`Config`].
///
/// A `Section` over a key that never resolved behaves like a view over an
/// empty tree: every lookup is absent, every non-failing getter returns
/// its zero value.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    node: Option<&'a Node>,
}

impl<'a> Section<'a> {
    /// Navigate further down; absent keys yield an empty view.
    pub fn sub(&self, key: &str) -> Section<'a> {
        Section {
            node: self.lookup(key),
        }
    }

    /// Navigate further down, failing when the key does not resolve.
    pub fn try_sub(&self, key: &str) -> Result<Section<'a>, ConfigError> {
        match self.lookup(key) {
            Some(node) => Ok(Section { node: Some(node) }),
            None => Err(ConfigError::no_such_key(key)),
        }
    }

    /// Bind this subtree onto a record or string-map target.
    pub fn bind<T: FromConfig>(&self) -> Result<T, ConfigError> {
        match self.node {
            Some(node) => bind_root(node),
            None => bind_root(&Node::default()),
        }
    }

    fn lookup(&self, key: &str) -> Option<&'a Node> {
        self.node?.resolve(&KeyPath::parse(key))
    }

    key_accessors!();
}
