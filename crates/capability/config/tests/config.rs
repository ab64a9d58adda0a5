use rental_config::{AppConfig, BootstrapManager, ConfigError};
use std::collections::HashMap;

fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    AppConfig::from_lookup(|key| map.get(key).cloned())
}

#[test]
fn load_config_from_env() {
    // Rust 2024 中 set_var 需要显式标注 unsafe（测试进程内可控）。
    unsafe {
        std::env::set_var("RENTAL_JWT_SECRET", "secret");
        std::env::set_var("RENTAL_JWT_ACCESS_TTL_SECONDS", "600");
        std::env::set_var("RENTAL_HTTP_ADDR", "127.0.0.1:8081");
    }

    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.http_addr, "127.0.0.1:8081");
    assert_eq!(config.jwt_access_ttl_seconds, 600);
}

#[test]
fn defaults_apply() {
    let config = load(&[("RENTAL_JWT_SECRET", "secret")]).expect("config");
    assert_eq!(config.http_addr, "127.0.0.1:8080");
    assert!(config.database_url.is_none());
    assert_eq!(config.db_max_connections, 8);
    assert_eq!(config.jwt_access_ttl_seconds, 3600);
    assert_eq!(config.sync_echo_timeout_ms, 2000);
    assert!(config.bootstrap_manager.is_none());
}

#[test]
fn missing_secret_is_reported() {
    let result = load(&[]);
    assert!(matches!(result, Err(ConfigError::Missing(key)) if key == "RENTAL_JWT_SECRET"));
}

#[test]
fn invalid_numbers_are_reported() {
    let result = load(&[
        ("RENTAL_JWT_SECRET", "secret"),
        ("RENTAL_DB_MAX_CONNECTIONS", "0"),
    ]);
    assert!(matches!(result, Err(ConfigError::Invalid(key, _)) if key == "RENTAL_DB_MAX_CONNECTIONS"));

    let result = load(&[
        ("RENTAL_JWT_SECRET", "secret"),
        ("RENTAL_SYNC_ECHO_TIMEOUT_MS", "soon"),
    ]);
    assert!(matches!(result, Err(ConfigError::Invalid(_, value)) if value == "soon"));
}

#[test]
fn bootstrap_manager_parses() {
    let config = load(&[
        ("RENTAL_JWT_SECRET", "secret"),
        ("RENTAL_BOOTSTRAP_MANAGER", "admin:pa:ss"),
        ("RENTAL_DATABASE_URL", "postgres://localhost/rental"),
    ])
    .expect("config");
    assert_eq!(
        config.bootstrap_manager,
        Some(BootstrapManager {
            username: "admin".to_string(),
            password: "pa:ss".to_string(),
        })
    );
    assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/rental"));

    let result = load(&[
        ("RENTAL_JWT_SECRET", "secret"),
        ("RENTAL_BOOTSTRAP_MANAGER", "admin"),
    ]);
    assert!(matches!(result, Err(ConfigError::Invalid(_, _))));
}
