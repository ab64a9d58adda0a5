//! 应用运行配置加载。
//!
//! 所有配置来自 `RENTAL_*` 环境变量；未设置 `RENTAL_DATABASE_URL` 时使用内存后端。

use std::env;

/// 默认监听地址。
pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8080";

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 首个管理员账号（仅在操作者集合为空时创建）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapManager {
    pub username: String,
    pub password: String,
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_access_ttl_seconds: u64,
    pub bootstrap_manager: Option<BootstrapManager>,
    pub sync_echo_timeout_ms: u64,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源读取配置（测试中传入 HashMap）。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let reader = Reader { lookup };
        let jwt_secret = reader
            .optional("RENTAL_JWT_SECRET")
            .ok_or_else(|| ConfigError::Missing("RENTAL_JWT_SECRET".to_string()))?;
        let http_addr = reader
            .optional("RENTAL_HTTP_ADDR")
            .unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string());
        let database_url = reader.optional("RENTAL_DATABASE_URL");
        let db_max_connections = reader.u32_with_default("RENTAL_DB_MAX_CONNECTIONS", 8)?;
        let jwt_access_ttl_seconds =
            reader.u64_with_default("RENTAL_JWT_ACCESS_TTL_SECONDS", 3600)?;
        let bootstrap_manager = reader
            .optional("RENTAL_BOOTSTRAP_MANAGER")
            .map(|value| parse_bootstrap("RENTAL_BOOTSTRAP_MANAGER", value))
            .transpose()?;
        let sync_echo_timeout_ms = reader.u64_with_default("RENTAL_SYNC_ECHO_TIMEOUT_MS", 2000)?;

        Ok(Self {
            http_addr,
            database_url,
            db_max_connections,
            jwt_secret,
            jwt_access_ttl_seconds,
            bootstrap_manager,
            sync_echo_timeout_ms,
        })
    }
}

struct Reader<F> {
    lookup: F,
}

impl<F> Reader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// 空字符串视为未设置。
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.trim().is_empty())
    }

    fn u64_with_default(&self, key: &str, default: u64) -> Result<u64, ConfigError> {
        let Some(value) = self.optional(key) else {
            return Ok(default);
        };
        value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid(key.to_string(), value))
    }

    fn u32_with_default(&self, key: &str, default: u32) -> Result<u32, ConfigError> {
        let Some(value) = self.optional(key) else {
            return Ok(default);
        };
        match value.trim().parse::<u32>() {
            Ok(parsed) if parsed > 0 => Ok(parsed),
            _ => Err(ConfigError::Invalid(key.to_string(), value)),
        }
    }
}

/// 解析 `username:password`，口令中允许出现冒号。
fn parse_bootstrap(key: &str, value: String) -> Result<BootstrapManager, ConfigError> {
    match value.split_once(':') {
        Some((username, password)) if !username.trim().is_empty() && !password.is_empty() => {
            Ok(BootstrapManager {
                username: username.trim().to_string(),
                password: password.to_string(),
            })
        }
        _ => Err(ConfigError::Invalid(key.to_string(), "<redacted>".to_string())),
    }
}
