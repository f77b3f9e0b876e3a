//! Error types for configuration loading, access, and binding.

use std::path::PathBuf;
use thiserror::Error;

/// All failure conditions surfaced by this crate.
///
/// The first three variants stay distinguishable so callers can tell
/// "never configured" (`NoSuchKey`) apart from "configured as a
/// substructure" (`NotAScalar`) apart from "present but malformed"
/// (`Parse`).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Resolution found no node at the given key path.
    #[error("no such key: {key}")]
    NoSuchKey { key: String },

    /// The node exists but has children, so it carries no scalar value.
    #[error("not a scalar value")]
    NotAScalar,

    /// The scalar text could not be parsed into the requested type.
    #[error("cannot parse {text:?} as {target}")]
    Parse { text: String, target: &'static str },

    /// A source value has no representation in the node model.
    #[error("unsupported value: {kind}")]
    UnsupportedValue { kind: String },

    /// The bind target, or a field inside it, cannot be populated.
    #[error("invalid binding target: {reason}")]
    InvalidBinding { reason: String },

    /// An ingested structure nests deeper than the supported limit.
    #[error("configuration nests deeper than {limit} levels")]
    TooDeep { limit: usize },

    /// Reading a configuration file failed.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Raw text was rejected by a format decoder.
    #[error("invalid {format}: {message}")]
    Syntax {
        format: &'static str,
        message: String,
    },

    /// Decoding a configuration file failed.
    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    pub(crate) fn no_such_key(key: &str) -> Self {
        Self::NoSuchKey {
            key: key.to_string(),
        }
    }

    pub(crate) fn parse(text: &str, target: &'static str) -> Self {
        Self::Parse {
            text: text.to_string(),
            target,
        }
    }

    pub(crate) fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedValue { kind: kind.into() }
    }

    pub(crate) fn invalid_binding(reason: impl Into<String>) -> Self {
        Self::InvalidBinding {
            reason: reason.into(),
        }
    }
}
