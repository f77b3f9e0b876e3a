//! Layered configuration trees with dotted-key access, loader merging,
//! and type-directed binding.
//!
//! Configuration is held as a tree of string-valued nodes. Loaders
//! ([`Static`], [`File`], [`Env`]) each produce one tree; [`Config::load`]
//! merges them in order with later loaders winning on conflicting leaves.
//! Values are read back through typed accessors, [`Section`] subtree
//! views, or by binding whole subtrees onto structs declared with
//! [`bind_record!`].
//!
//! ```
//! use conftree::{Config, Static, config_map};
//!
//! let defaults = Static::new(config_map! {
//!     "db" => config_map! { "host" => "localhost", "port" => 3306 },
//! });
//! let overrides = Static::new(config_map! { "db.port" => 4000 });
//!
//! let config = Config::load(&[&defaults, &overrides])?;
//! assert_eq!(config.get_string("db.host"), "localhost");
//! assert_eq!(config.get_i64("db.port"), 4000);
//! # Ok::<(), conftree::ConfigError>(())
//! ```

pub mod bind;
pub mod config;
pub mod duration;
pub mod error;
pub mod key;
pub mod loader;
pub mod node;
pub mod value;

pub use bind::{BindKind, Binder, FromConfig};
pub use config::{Config, Section};
pub use duration::{format_duration, parse_duration};
pub use error::ConfigError;
pub use key::{KEY_SEPARATOR, Key, KeyPath};
pub use loader::{DecodeFn, Env, File, Loader, Static, decode_json, decode_toml, decode_yaml};
pub use node::Node;
pub use value::{ConfigMap, ConfigValue, MAX_DEPTH};
