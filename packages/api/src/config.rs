//! Runtime configuration of the API.
//!
//! Built once at startup (usually through [`ApiConfig::from_env`]) and handed to
//! [`crate::state::State`]. Nothing in the crate reads the environment after that.

use std::{env, str::FromStr, time::Duration};

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
    /// Create missing tables from the entity definitions at startup
    pub auto_migrate: bool,
}

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub pagination: PaginationConfig,
}

impl ApiConfig {
    /// Configuration with defaults for everything but the two required values.
    pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            database: DatabaseConfig {
                url: database_url.into(),
                max_connections: 10,
                connect_timeout: Duration::from_secs(8),
                auto_migrate: false,
            },
            jwt: JwtConfig {
                secret: jwt_secret.into(),
                issuer: "storage-metrics".to_string(),
                access_ttl: Duration::from_secs(86_400),
                refresh_ttl: Duration::from_secs(604_800),
            },
            pagination: PaginationConfig::default(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`ApiConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?;
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::MissingVar("JWT_SECRET"))?;

        let mut config = Self::new(database_url, jwt_secret);

        config.database.max_connections = parse_or(
            &lookup,
            "DATABASE_MAX_CONNECTIONS",
            config.database.max_connections,
        )?;
        config.database.auto_migrate = lookup("DATABASE_AUTO_MIGRATE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        if let Some(issuer) = lookup("JWT_ISSUER") {
            config.jwt.issuer = issuer;
        }
        config.jwt.access_ttl = Duration::from_secs(parse_or(
            &lookup,
            "JWT_ACCESS_TTL_SECS",
            config.jwt.access_ttl.as_secs(),
        )?);
        config.jwt.refresh_ttl = Duration::from_secs(parse_or(
            &lookup,
            "JWT_REFRESH_TTL_SECS",
            config.jwt.refresh_ttl.as_secs(),
        )?);

        let max_limit = parse_or(
            &lookup,
            "PAGINATION_MAX_LIMIT",
            config.pagination.max_limit,
        )?
        .max(1);
        let default_limit = parse_or(
            &lookup,
            "PAGINATION_DEFAULT_LIMIT",
            config.pagination.default_limit,
        )?
        .clamp(1, max_limit);
        config.pagination = PaginationConfig {
            default_limit,
            max_limit,
        };

        Ok(config)
    }
}

/// Parses `name` if it is set, falling back to `default` otherwise.
pub fn parse_or<T: FromStr>(
    lookup: impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        None => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVar(var) => write!(f, "Missing environment variable: {}", var),
            ConfigError::InvalidValue(var) => write!(f, "Invalid value for: {}", var),
        }
    }
}

impl std::error::Error for ConfigError {}
