//! Type-directed binding: projecting a node subtree onto typed targets.
//!
//! Each bindable type declares its shape through [`FromConfig`] — the
//! compile-time equivalent of runtime field reflection. Scalars, lists,
//! and generic string maps are covered here; records implement the trait
//! through the [`bind_record!`](crate::bind_record) macro or by hand with
//! a [`Binder`].

use std::any::type_name;
use std::collections::BTreeMap;
use std::time::Duration;

use num_complex::Complex64;

use crate::error::ConfigError;
use crate::key::{Key, KeyPath};
use crate::node::Node;
use crate::value::ConfigValue;

/// The closed set of shapes the binder can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindKind {
    Scalar,
    Record,
    List,
    Map,
}

/// A type that can be populated from a node subtree.
///
/// The `Default` bound supplies the zero value used when a key is absent
/// or a present value cannot be converted.
pub trait FromConfig: Default + Sized {
    /// The shape this type binds as.
    const KIND: BindKind;

    /// Populate a value from the given node.
    fn from_node(node: &Node) -> Result<Self, ConfigError>;
}

/// Drives field population for record targets.
///
/// A missing key yields the field's zero value; a present value that
/// fails conversion does too. Only [`ConfigError::InvalidBinding`]
/// aborts the whole bind, carrying the offending field's context.
pub struct Binder<'a> {
    node: &'a Node,
}

impl<'a> Binder<'a> {
    pub fn new(node: &'a Node) -> Self {
        Self { node }
    }

    /// Bind one field by its (possibly dotted) key.
    pub fn field<T: FromConfig>(&self, key: &str) -> Result<T, ConfigError> {
        match self.node.resolve(&KeyPath::parse(key)) {
            None => Ok(T::default()),
            Some(node) => bind_or_zero(node).map_err(|err| match err {
                ConfigError::InvalidBinding { reason } => {
                    ConfigError::invalid_binding(format!("field {key:?}: {reason}"))
                }
                other => other,
            }),
        }
    }
}

/// Top-level entry used by the facade: only record and map shapes may be
/// bound at the root.
pub(crate) fn bind_root<T: FromConfig>(node: &Node) -> Result<T, ConfigError> {
    match T::KIND {
        BindKind::Record | BindKind::Map => T::from_node(node),
        BindKind::Scalar | BindKind::List => Err(ConfigError::invalid_binding(format!(
            "cannot bind {} at the top level; use a record or string-map target",
            type_name::<T>()
        ))),
    }
}

fn bind_or_zero<T: FromConfig>(node: &Node) -> Result<T, ConfigError> {
    match T::from_node(node) {
        Ok(value) => Ok(value),
        Err(err @ ConfigError::InvalidBinding { .. }) => Err(err),
        Err(_) => Ok(T::default()),
    }
}

macro_rules! scalar_from_config {
    ($($ty:ty),+ $(,)?) => {$(
        impl FromConfig for $ty {
            const KIND: BindKind = BindKind::Scalar;

            fn from_node(node: &Node) -> Result<Self, ConfigError> {
                let text = node.scalar()?;
                text.parse()
                    .map_err(|_| ConfigError::parse(text, stringify!($ty)))
            }
        }
    )+};
}

scalar_from_config!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl FromConfig for String {
    const KIND: BindKind = BindKind::Scalar;

    fn from_node(node: &Node) -> Result<Self, ConfigError> {
        Ok(node.scalar()?.to_string())
    }
}

impl FromConfig for bool {
    const KIND: BindKind = BindKind::Scalar;

    fn from_node(node: &Node) -> Result<Self, ConfigError> {
        node.as_bool()
    }
}

impl FromConfig for Complex64 {
    const KIND: BindKind = BindKind::Scalar;

    fn from_node(node: &Node) -> Result<Self, ConfigError> {
        node.as_complex()
    }
}

impl FromConfig for Duration {
    const KIND: BindKind = BindKind::Scalar;

    fn from_node(node: &Node) -> Result<Self, ConfigError> {
        node.as_duration()
    }
}

/// Lists bind by iterating stringified indices `0, 1, 2, …` while each
/// resolves; the first missing index terminates, so a hole at index `k`
/// truncates the list to length `k`.
impl<T: FromConfig> FromConfig for Vec<T> {
    const KIND: BindKind = BindKind::List;

    fn from_node(node: &Node) -> Result<Self, ConfigError> {
        let mut items = Vec::new();
        for index in 0usize.. {
            let key = Key::normalize(&index.to_string());
            let Some(child) = node.child(&key) else {
                break;
            };
            items.push(bind_or_zero(child)?);
        }
        Ok(items)
    }
}

/// A present node binds to `Some`; the zero value is `None`.
impl<T: FromConfig> FromConfig for Option<T> {
    const KIND: BindKind = T::KIND;

    fn from_node(node: &Node) -> Result<Self, ConfigError> {
        T::from_node(node).map(Some)
    }
}

/// The structural inverse of ingestion: scalar children contribute their
/// string value, interior children contribute a nested map, recursively.
/// Total on shape.
impl FromConfig for BTreeMap<String, ConfigValue> {
    const KIND: BindKind = BindKind::Map;

    fn from_node(node: &Node) -> Result<Self, ConfigError> {
        let mut map = BTreeMap::new();
        for (key, child) in node.children() {
            let value = if child.is_scalar() {
                ConfigValue::String(child.scalar()?.to_string())
            } else {
                ConfigValue::Map(Self::from_node(child)?)
            };
            map.insert(key.as_str().to_string(), value);
        }
        Ok(map)
    }
}

/// Define a record struct together with its [`FromConfig`] impl.
///
/// Each field binds under its own name (normalized) by default. A field
/// may override its binding key with `= "key"` or opt out entirely with
/// `= ignore`; an ignored field performs no lookup and keeps its zero
/// value. The struct must derive (or implement) `Default`.
///
/// ```
/// use std::time::Duration;
/// use conftree::{bind_record, config_map, Config, Static};
///
/// bind_record! {
///     #[derive(Debug, Default, PartialEq)]
///     pub struct DbConfig {
///         pub host: String,
///         pub port: u16 = "listen_port",
///         pub timeout: Duration,
///         pub scratch: String = ignore,
///     }
/// }
///
/// let config = Config::load(&[&Static::new(config_map! {
///     "host" => "db01",
///     "listen_port" => 5432,
///     "timeout" => "2s",
///     "scratch" => "never read",
/// })])?;
///
/// let db: DbConfig = config.bind()?;
/// assert_eq!(db.host, "db01");
/// assert_eq!(db.port, 5432);
/// assert_eq!(db.timeout, Duration::from_secs(2));
/// assert_eq!(db.scratch, "");
/// # Ok::<(), conftree::ConfigError>(())
/// ```
#[macro_export]
macro_rules! bind_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $fname:ident : $fty:ty $(= $spec:tt)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $fname: $fty,
            )*
        }

        impl $crate::FromConfig for $name {
            const KIND: $crate::BindKind = $crate::BindKind::Record;

            fn from_node(
                node: &$crate::Node,
            ) -> ::core::result::Result<Self, $crate::ConfigError> {
                let binder = $crate::Binder::new(node);
                ::core::result::Result::Ok(Self {
                    $(
                        $fname: $crate::bind_record!(@field binder, $fname $(, $spec)?),
                    )*
                })
            }
        }
    };

    (@field $binder:ident, $fname:ident) => {
        $binder.field(stringify!($fname))?
    };
    (@field $binder:ident, $fname:ident, ignore) => {
        ::core::default::Default::default()
    };
    (@field $binder:ident, $fname:ident, $key:literal) => {
        $binder.field($key)?
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_map;

    fn tree(map: crate::value::ConfigMap) -> Node {
        Node::from_map(map).unwrap()
    }

    bind_record! {
        #[derive(Debug, Default, PartialEq)]
        struct Web {
            host: String,
            port: u16,
            timeout: Duration,
            enabled: bool,
        }
    }

    bind_record! {
        #[derive(Debug, Default, PartialEq)]
        struct App {
            name: String,
            web: Web,
            tags: Vec<String>,
        }
    }

    #[test]
    fn test_flat_record_binding() {
        let node = tree(config_map! {
            "host" => "localhost",
            "port" => 8080,
            "timeout" => "2s",
            "enabled" => true,
        });
        let web = Web::from_node(&node).unwrap();
        assert_eq!(
            web,
            Web {
                host: "localhost".to_string(),
                port: 8080,
                timeout: Duration::from_secs(2),
                enabled: true,
            }
        );
    }

    #[test]
    fn test_missing_fields_keep_zero_values() {
        let node = tree(config_map! { "host" => "localhost" });
        let web = Web::from_node(&node).unwrap();
        assert_eq!(web.host, "localhost");
        assert_eq!(web.port, 0);
        assert_eq!(web.timeout, Duration::ZERO);
        assert!(!web.enabled);
    }

    #[test]
    fn test_malformed_scalar_yields_zero_value() {
        let node = tree(config_map! { "port" => "not a number" });
        let web = Web::from_node(&node).unwrap();
        assert_eq!(web.port, 0);
    }

    #[test]
    fn test_nested_record_and_list() {
        let node = tree(config_map! {
            "name" => "svc",
            "web" => config_map! { "host" => "h", "port" => 80 },
            "tags" => vec![ConfigValue::from("a"), ConfigValue::from("b")],
        });
        let app = App::from_node(&node).unwrap();
        assert_eq!(app.web.host, "h");
        assert_eq!(app.web.port, 80);
        assert_eq!(app.tags, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_missing_nested_record_is_zero() {
        let node = tree(config_map! { "name" => "svc" });
        let app = App::from_node(&node).unwrap();
        assert_eq!(app.web, Web::default());
        assert!(app.tags.is_empty());
    }

    #[test]
    fn test_list_gap_truncates() {
        let node = tree(config_map! {
            "tags.0" => "a",
            "tags.2" => "c",
        });
        let app = App::from_node(&node).unwrap();
        assert_eq!(app.tags, vec!["a".to_string()]);
    }

    bind_record! {
        #[derive(Debug, Default, PartialEq)]
        struct Tagged {
            renamed: String = "actual_key",
            skipped: String = ignore,
            plain: String,
        }
    }

    #[test]
    fn test_rename_and_ignore() {
        let node = tree(config_map! {
            "actual_key" => "found",
            "skipped" => "present but never read",
            "plain" => "p",
        });
        let tagged = Tagged::from_node(&node).unwrap();
        assert_eq!(tagged.renamed, "found");
        assert_eq!(tagged.skipped, "");
        assert_eq!(tagged.plain, "p");
    }

    #[test]
    fn test_map_target_mirrors_tree() {
        let node = tree(config_map! {
            "db" => config_map! { "host" => "h", "port" => 1 },
            "flag" => true,
        });
        let map = BTreeMap::<String, ConfigValue>::from_node(&node).unwrap();
        assert_eq!(map["flag"], ConfigValue::String("true".to_string()));
        let ConfigValue::Map(db) = &map["db"] else {
            panic!("db should be a nested map");
        };
        assert_eq!(db["host"], ConfigValue::String("h".to_string()));
        assert_eq!(db["port"], ConfigValue::String("1".to_string()));
    }

    #[test]
    fn test_option_binds_presence() {
        bind_record! {
            #[derive(Debug, Default, PartialEq)]
            struct Opt {
                present: Option<u16>,
                absent: Option<u16>,
            }
        }
        let node = tree(config_map! { "present" => 5 });
        let opt = Opt::from_node(&node).unwrap();
        assert_eq!(opt.present, Some(5));
        assert_eq!(opt.absent, None);
    }

    #[test]
    fn test_top_level_scalar_is_invalid_binding() {
        let node = tree(config_map! { "x" => 1 });
        let err = bind_root::<u16>(&node).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBinding { .. }));
        let err = bind_root::<Vec<String>>(&node).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBinding { .. }));
    }

    #[test]
    fn test_binder_field_resolves_dotted_keys() {
        let node = tree(config_map! {
            "db" => config_map! { "port" => 5432 },
        });
        let binder = Binder::new(&node);
        let port: u16 = binder.field("db.port").unwrap();
        assert_eq!(port, 5432);
    }
}
