//! Configuration loaders: in-memory maps, decoded files, and environment
//! snapshots.
//!
//! A loader produces one fresh node tree per [`Loader::load`] call; the
//! facade merges trees in the order the loaders are given, later loaders
//! taking precedence on conflicting leaves.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::error::ConfigError;
use crate::key::KEY_SEPARATOR;
use crate::node::Node;
use crate::value::{ConfigMap, ConfigValue};

/// A provider of one configuration tree.
pub trait Loader {
    /// Load the configuration values as a fresh tree. No caching: every
    /// call rebuilds from the source.
    fn load(&self) -> Result<Node, ConfigError>;
}

/// Serves static configuration values from an in-memory map.
#[derive(Debug, Clone)]
pub struct Static {
    values: ConfigMap,
}

impl Static {
    pub fn new(values: ConfigMap) -> Self {
        Self { values }
    }
}

impl Loader for Static {
    fn load(&self) -> Result<Node, ConfigError> {
        Node::from_map(self.values.clone())
    }
}

/// Decodes raw file text into a tree.
pub type DecodeFn = fn(&str) -> Result<Node, ConfigError>;

/// Reads a file and feeds its content through a pluggable decoder.
///
/// With `required` unset, a missing file yields an empty tree instead of
/// an error; any other I/O failure, and a missing file with `required`
/// set, propagate.
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
    required: bool,
    decode: DecodeFn,
}

impl File {
    pub fn with_decoder(path: impl Into<PathBuf>, required: bool, decode: DecodeFn) -> Self {
        Self {
            path: path.into(),
            required,
            decode,
        }
    }

    /// A loader for a JSON file.
    pub fn json(path: impl Into<PathBuf>, required: bool) -> Self {
        Self::with_decoder(path, required, decode_json)
    }

    /// A loader for a YAML file.
    pub fn yaml(path: impl Into<PathBuf>, required: bool) -> Self {
        Self::with_decoder(path, required, decode_yaml)
    }

    /// A loader for a TOML file.
    pub fn toml(path: impl Into<PathBuf>, required: bool) -> Self {
        Self::with_decoder(path, required, decode_toml)
    }
}

impl Loader for File {
    fn load(&self) -> Result<Node, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !self.required => {
                debug!(path = %self.path.display(), "optional config file missing, using empty tree");
                return Ok(Node::default());
            }
            Err(err) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source: err,
                });
            }
        };

        (self.decode)(&text).map_err(|err| ConfigError::Decode {
            path: self.path.clone(),
            source: Box::new(err),
        })
    }
}

/// Decode JSON text; the top-level value must be an object.
pub fn decode_json(text: &str) -> Result<Node, ConfigError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|err| ConfigError::Syntax {
            format: "JSON",
            message: err.to_string(),
        })?;
    tree_from_value(ConfigValue::try_from(value)?)
}

/// Decode YAML text; the top-level value must be a mapping.
pub fn decode_yaml(text: &str) -> Result<Node, ConfigError> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|err| ConfigError::Syntax {
            format: "YAML",
            message: err.to_string(),
        })?;
    tree_from_value(ConfigValue::try_from(value)?)
}

/// Decode TOML text.
pub fn decode_toml(text: &str) -> Result<Node, ConfigError> {
    let value: toml::Value = toml::from_str(text).map_err(|err| ConfigError::Syntax {
        format: "TOML",
        message: err.to_string(),
    })?;
    tree_from_value(ConfigValue::try_from(value)?)
}

fn tree_from_value(value: ConfigValue) -> Result<Node, ConfigError> {
    match value {
        ConfigValue::Map(map) => Node::from_map(map),
        _ => Err(ConfigError::unsupported(
            "top-level value is not a string-keyed mapping",
        )),
    }
}

/// Reads configuration from an environment-variable snapshot.
///
/// Only entries whose name starts with the prefix (case-sensitive,
/// normalized to end with a single `_`) are retained; the prefix is
/// stripped and the remainder lower-cased with `_` turned into the key
/// separator, so `PREFIX_DB_PORT` becomes `db.port`.
#[derive(Debug, Clone)]
pub struct Env {
    prefix: String,
    vars: Vec<(String, String)>,
}

impl Env {
    /// Snapshot the process environment at construction time.
    pub fn new(prefix: &str) -> Self {
        Self::with_vars(prefix, std::env::vars())
    }

    /// Use an explicit snapshot instead of the process environment.
    pub fn with_vars(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut prefix = prefix.to_string();
        if !prefix.is_empty() && !prefix.ends_with('_') {
            prefix.push('_');
        }
        Self {
            prefix,
            vars: vars.into_iter().collect(),
        }
    }
}

impl Loader for Env {
    fn load(&self) -> Result<Node, ConfigError> {
        let mut map = ConfigMap::new();
        for (name, value) in &self.vars {
            let Some(stripped) = name.strip_prefix(&self.prefix) else {
                continue;
            };
            let key = stripped.to_lowercase().replace('_', KEY_SEPARATOR);
            map.insert(key, ConfigValue::String(value.clone()));
        }
        Node::from_map(map)
    }
}
