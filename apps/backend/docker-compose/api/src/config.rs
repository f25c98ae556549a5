use std::{env, time::Duration};

use storage_metrics_api::config::{self as api_config, ApiConfig};

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    /// Scheduled aggregation period; `None` disables the job.
    pub metrics_interval: Option<Duration>,
    pub api: ApiConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api = ApiConfig::from_env().map_err(ConfigError::Api)?;

        let metrics_interval = match env::var("METRICS_INTERVAL_SECS") {
            Ok(value) if !value.trim().is_empty() => {
                let secs: u64 = value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("METRICS_INTERVAL_SECS".to_string()))?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            _ => None,
        };

        Ok(Config {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,
            metrics_interval,
            api,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
    Api(api_config::ConfigError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(var) => write!(f, "Invalid value for: {}", var),
            ConfigError::Api(err) => write!(f, "API config error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}
