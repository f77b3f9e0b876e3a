//! Untyped source values and their ingestion into the node tree.
//!
//! Loaders produce a [`ConfigMap`] of [`ConfigValue`]s — the closed set of
//! shapes the node model can represent — and [`Node::from_map`] converts it
//! into a tree. Foreign decoder values (JSON, YAML, TOML) are converted to
//! this set first; anything outside it fails with an unsupported-value
//! error rather than producing a partial tree.

use std::collections::BTreeMap;
use std::time::Duration;

use num_complex::Complex64;

use crate::duration::format_duration;
use crate::error::ConfigError;
use crate::key::{Key, KeyPath};
use crate::node::Node;

/// Maximum nesting depth accepted during ingestion.
///
/// Configuration trees are shallow in practice; the limit only guards
/// against pathological input.
pub const MAX_DEPTH: usize = 128;

/// A string-keyed mapping of source values.
pub type ConfigMap = BTreeMap<String, ConfigValue>;

/// An untyped configuration source value.
///
/// Every scalar variant stores as its canonical text form in the tree;
/// the original typing is not preserved.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Complex(Complex64),
    Duration(Duration),
    String(String),
    List(Vec<ConfigValue>),
    Map(ConfigMap),
}

impl Node {
    /// Build a tree from an untyped nested map.
    ///
    /// Labels are parsed as key paths: a label that itself contains the
    /// separator (e.g. `"spam.salad"`) produces the same nested tree as a
    /// naturally nested source. Lists become interior nodes keyed by
    /// stringified 0-based index. Entries resolving to the same key merge
    /// right-biased, so ingestion order matters for conflicting leaves.
    pub fn from_map(map: ConfigMap) -> Result<Node, ConfigError> {
        from_map_at(map, 0)
    }
}

fn from_map_at(map: ConfigMap, depth: usize) -> Result<Node, ConfigError> {
    if depth >= MAX_DEPTH {
        return Err(ConfigError::TooDeep { limit: MAX_DEPTH });
    }

    let mut root = Node::default();
    for (label, value) in map {
        let path = KeyPath::parse(&label);
        // parse() yields at least one segment for any input.
        let Some((head, rest)) = path.split_first() else {
            continue;
        };
        let subtree = if rest.is_empty() {
            node_from_value(value, depth + 1)?
        } else {
            let mut suffix = ConfigMap::new();
            suffix.insert(rest.join(), value);
            from_map_at(suffix, depth + 1)?
        };
        root.merge_child(head.clone(), subtree);
    }
    Ok(root)
}

fn node_from_value(value: ConfigValue, depth: usize) -> Result<Node, ConfigError> {
    if depth >= MAX_DEPTH {
        return Err(ConfigError::TooDeep { limit: MAX_DEPTH });
    }

    Ok(match value {
        ConfigValue::Bool(b) => Node::leaf(b.to_string()),
        ConfigValue::Int(i) => Node::leaf(i.to_string()),
        ConfigValue::Uint(u) => Node::leaf(u.to_string()),
        ConfigValue::Float(f) => Node::leaf(f.to_string()),
        ConfigValue::Complex(c) => Node::leaf(c.to_string()),
        ConfigValue::Duration(d) => Node::leaf(format_duration(d)),
        ConfigValue::String(s) => Node::leaf(s),
        ConfigValue::List(items) => {
            let mut node = Node::default();
            for (index, item) in items.into_iter().enumerate() {
                let child = node_from_value(item, depth + 1)?;
                node.merge_child(Key::normalize(&index.to_string()), child);
            }
            node
        }
        ConfigValue::Map(map) => from_map_at(map, depth + 1)?,
    })
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for ConfigValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for ConfigValue {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<Complex64> for ConfigValue {
    fn from(v: Complex64) -> Self {
        Self::Complex(v)
    }
}

impl From<Duration> for ConfigValue {
    fn from(v: Duration) -> Self {
        Self::Duration(v)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(v: Vec<ConfigValue>) -> Self {
        Self::List(v)
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(v: ConfigMap) -> Self {
        Self::Map(v)
    }
}

impl TryFrom<serde_json::Value> for ConfigValue {
    type Error = ConfigError;

    fn try_from(value: serde_json::Value) -> Result<Self, ConfigError> {
        use serde_json::Value;

        match value {
            Value::Null => Err(ConfigError::unsupported("JSON null")),
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Self::Uint(u))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::Float(f))
                } else {
                    Err(ConfigError::unsupported(format!("JSON number {n}")))
                }
            }
            Value::String(s) => Ok(Self::String(s)),
            Value::Array(items) => items
                .into_iter()
                .map(Self::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            Value::Object(entries) => {
                let mut map = ConfigMap::new();
                for (key, item) in entries {
                    map.insert(key, Self::try_from(item)?);
                }
                Ok(Self::Map(map))
            }
        }
    }
}

impl TryFrom<serde_yaml::Value> for ConfigValue {
    type Error = ConfigError;

    fn try_from(value: serde_yaml::Value) -> Result<Self, ConfigError> {
        use serde_yaml::Value;

        match value {
            Value::Null => Err(ConfigError::unsupported("YAML null")),
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Self::Uint(u))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::Float(f))
                } else {
                    Err(ConfigError::unsupported(format!("YAML number {n:?}")))
                }
            }
            Value::String(s) => Ok(Self::String(s)),
            Value::Sequence(items) => items
                .into_iter()
                .map(Self::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            Value::Mapping(entries) => {
                let mut map = ConfigMap::new();
                for (key, item) in entries {
                    let Value::String(key) = key else {
                        return Err(ConfigError::unsupported("non-string YAML mapping key"));
                    };
                    map.insert(key, Self::try_from(item)?);
                }
                Ok(Self::Map(map))
            }
            Value::Tagged(tagged) => Err(ConfigError::unsupported(format!(
                "YAML tagged value {}",
                tagged.tag
            ))),
        }
    }
}

impl TryFrom<toml::Value> for ConfigValue {
    type Error = ConfigError;

    fn try_from(value: toml::Value) -> Result<Self, ConfigError> {
        use toml::Value;

        match value {
            Value::Boolean(b) => Ok(Self::Bool(b)),
            Value::Integer(i) => Ok(Self::Int(i)),
            Value::Float(f) => Ok(Self::Float(f)),
            Value::String(s) => Ok(Self::String(s)),
            Value::Datetime(dt) => Err(ConfigError::unsupported(format!("TOML datetime {dt}"))),
            Value::Array(items) => items
                .into_iter()
                .map(Self::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            Value::Table(entries) => {
                let mut map = ConfigMap::new();
                for (key, item) in entries {
                    map.insert(key, Self::try_from(item)?);
                }
                Ok(Self::Map(map))
            }
        }
    }
}

/// Build a [`ConfigMap`] literal.
///
/// Values go through [`ConfigValue::from`], so plain scalars, nested
/// `config_map!` invocations, and `Vec<ConfigValue>` lists all work:
///
/// ```
/// use conftree::config_map;
///
/// let map = config_map! {
///     "db.port" => 3306,
///     "db.host" => "localhost",
/// };
/// assert_eq!(map.len(), 2);
/// ```
#[macro_export]
macro_rules! config_map {
    () => { $crate::ConfigMap::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::ConfigMap::new();
        $(
            map.insert(
                ::std::string::String::from($key),
                $crate::ConfigValue::from($value),
            );
        )+
        map
    }};
}
