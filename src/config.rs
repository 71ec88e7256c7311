//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/students-service/config.toml`).
//! Every section and field is optional; anything missing falls back to
//! the defaults below. `DATABASE_PROVIDER` and `DATABASE_URL` override
//! the `[database]` section.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::shared::types::errors::ConfigError;
use crate::shared::types::pagination::{PaginationPolicy, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

const APP_DIR: &str = "students-service";

/// Default config file location
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub pagination: PaginationConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load from `path`, apply environment overrides and validate.
    ///
    /// A missing file is not an error: defaults are used.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
            Self::from_toml_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(provider) = std::env::var("DATABASE_PROVIDER") {
            self.database.provider = provider.parse()?;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.is_empty() {
                self.database.url = Some(url);
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.pagination;
        if p.default_limit == 0 || p.max_limit == 0 {
            return Err(ConfigError::Invalid(
                "pagination limits must be positive".into(),
            ));
        }
        if p.default_limit > p.max_limit {
            return Err(ConfigError::Invalid(format!(
                "pagination.default_limit ({}) exceeds pagination.max_limit ({})",
                p.default_limit, p.max_limit
            )));
        }
        if self.database.pool.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.pool.max_connections must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// ── [server] ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds given to in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            shutdown_timeout: 30,
        }
    }
}

// ── [database] ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseProvider {
    Postgres,
    Mysql,
    Sqlite,
    /// Non-persistent, for development
    Memory,
}

impl fmt::Display for DatabaseProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Postgres => write!(f, "postgres"),
            Self::Mysql => write!(f, "mysql"),
            Self::Sqlite => write!(f, "sqlite"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for DatabaseProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "mysql" => Ok(Self::Mysql),
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::Invalid(format!(
                "unknown database provider '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub provider: DatabaseProvider,
    /// Full connection URL; when set, the discrete fields are ignored
    pub url: Option<String>,
    pub host: String,
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
    pub name: String,
    pub sqlite_path: String,
    pub pool: PoolConfig,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            provider: DatabaseProvider::Postgres,
            url: None,
            host: "localhost".to_string(),
            port: None,
            username: "postgres".to_string(),
            password: "postgres".to_string(),
            name: "students".to_string(),
            sqlite_path: "./students.db".to_string(),
            pool: PoolConfig::default(),
        }
    }
}

impl DatabaseSection {
    /// Connection URL for the selected provider. `None` for `memory`.
    ///
    /// Built from the discrete fields unless `url` is set; the username
    /// and password are percent-encoded.
    pub fn connection_url(&self) -> Result<Option<String>, ConfigError> {
        let (scheme, default_port) = match self.provider {
            DatabaseProvider::Memory => return Ok(None),
            DatabaseProvider::Sqlite => {
                return Ok(Some(
                    self.url
                        .clone()
                        .unwrap_or_else(|| format!("sqlite://{}?mode=rwc", self.sqlite_path)),
                ))
            }
            DatabaseProvider::Postgres => ("postgres", 5432),
            DatabaseProvider::Mysql => ("mysql", 3306),
        };
        if let Some(url) = &self.url {
            return Ok(Some(url.clone()));
        }

        let base = format!(
            "{}://{}:{}",
            scheme,
            self.host,
            self.port.unwrap_or(default_port)
        );
        let mut url = Url::parse(&base).map_err(|e| {
            ConfigError::Invalid(format!("invalid database host '{}': {}", self.host, e))
        })?;
        url.set_username(&self.username)
            .and_then(|()| url.set_password(Some(&self.password)))
            .map_err(|()| {
                ConfigError::Invalid(format!("cannot set credentials on '{}'", base))
            })?;
        url.set_path(&self.name);
        Ok(Some(url.into()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub sqlx_logging: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 10,
            sqlx_logging: false,
        }
    }
}

// ── [pagination] / [cache] / [logging] ─────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_LIMIT,
            max_limit: MAX_PAGE_LIMIT,
        }
    }
}

impl From<&PaginationConfig> for PaginationPolicy {
    fn from(c: &PaginationConfig) -> Self {
        PaginationPolicy::new(c.default_limit, c.max_limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_ms: 1000,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn, error (or any `EnvFilter` directive)
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
