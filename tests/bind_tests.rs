//! End-to-end binding tests: records declared with `bind_record!` bound
//! from loader-built configurations.

use std::collections::BTreeMap;
use std::time::Duration;

use conftree::{
    Config, ConfigError, ConfigValue, Env, Static, bind_record, config_map,
};

bind_record! {
    #[derive(Debug, Default, PartialEq)]
    pub struct Server {
        pub host: String,
        pub port: u16,
        pub timeout: Duration,
    }
}

bind_record! {
    #[derive(Debug, Default, PartialEq)]
    pub struct App {
        pub name: String,
        pub server: Server,
        pub replicas: Vec<Server>,
        pub tags: Vec<String>,
    }
}

fn fixture() -> Config {
    Config::load(&[&Static::new(config_map! {
        "name" => "svc",
        "server" => config_map! {
            "host" => "primary",
            "port" => 8080,
            "timeout" => "2s",
        },
        "replicas" => vec![
            ConfigValue::from(config_map! { "host" => "r0", "port" => 8081 }),
            ConfigValue::from(config_map! { "host" => "r1", "port" => 8082 }),
        ],
        "tags" => vec![ConfigValue::from("blue"), ConfigValue::from("canary")],
    })])
    .unwrap()
}

#[test]
fn test_bind_nested_records_and_lists() {
    let app: App = fixture().bind().unwrap();
    assert_eq!(app.name, "svc");
    assert_eq!(app.server.host, "primary");
    assert_eq!(app.server.port, 8080);
    assert_eq!(app.server.timeout, Duration::from_secs(2));
    assert_eq!(app.replicas.len(), 2);
    assert_eq!(app.replicas[1].host, "r1");
    assert_eq!(app.replicas[1].port, 8082);
    assert_eq!(app.replicas[1].timeout, Duration::ZERO);
    assert_eq!(app.tags, vec!["blue".to_string(), "canary".to_string()]);
}

#[test]
fn test_bind_section_view() {
    let config = fixture();
    let server: Server = config.sub("server").bind().unwrap();
    assert_eq!(server.host, "primary");

    // an absent section binds to the all-zero record
    let ghost: Server = config.sub("no.such").bind().unwrap();
    assert_eq!(ghost, Server::default());
}

#[test]
fn test_bind_zeroes_missing_and_malformed_fields() {
    let config = Config::load(&[&Static::new(config_map! {
        "server" => config_map! { "host" => "h", "port" => "not a number" },
    })])
    .unwrap();
    let app: App = config.bind().unwrap();
    assert_eq!(app.server.host, "h");
    assert_eq!(app.server.port, 0);
    assert_eq!(app.name, "");
    assert!(app.replicas.is_empty());
}

#[test]
fn test_list_hole_truncates_bound_vec() {
    let config = Config::load(&[&Static::new(config_map! {
        "tags.0" => "a",
        "tags.2" => "c",
    })])
    .unwrap();
    let app: App = config.bind().unwrap();
    assert_eq!(app.tags, vec!["a".to_string()]);
}

bind_record! {
    #[derive(Debug, Default, PartialEq)]
    pub struct Renamed {
        pub db_url: String = "database.url",
        pub secret: String = ignore,
    }
}

#[test]
fn test_rename_and_ignore_through_facade() {
    let config = Config::load(&[&Static::new(config_map! {
        "database" => config_map! { "url" => "postgres://x" },
        "secret" => "present but skipped",
    })])
    .unwrap();
    let bound: Renamed = config.bind().unwrap();
    assert_eq!(bound.db_url, "postgres://x");
    assert_eq!(bound.secret, "");
}

#[test]
fn test_env_layer_feeds_bound_records() {
    let defaults = Static::new(config_map! {
        "server" => config_map! { "host" => "localhost", "port" => 80 },
    });
    let env = Env::with_vars(
        "MYAPP",
        [("MYAPP_SERVER_PORT".to_string(), "8443".to_string())],
    );
    let config = Config::load(&[&defaults, &env]).unwrap();
    let app: App = config.bind().unwrap();
    assert_eq!(app.server.host, "localhost");
    assert_eq!(app.server.port, 8443);
}

#[test]
fn test_bind_generic_map_target() {
    let config = fixture();
    let map: BTreeMap<String, ConfigValue> = config.bind().unwrap();
    let ConfigValue::Map(server) = &map["server"] else {
        panic!("server should be a nested map");
    };
    assert_eq!(server["host"], ConfigValue::String("primary".to_string()));
    assert_eq!(server["port"], ConfigValue::String("8080".to_string()));
}

#[test]
fn test_top_level_scalar_target_is_rejected() {
    let config = fixture();
    let err = config.bind::<u16>().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBinding { .. }));
    let err = config.bind::<Vec<String>>().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBinding { .. }));
}
