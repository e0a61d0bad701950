use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "INFO";

/// `DATABASE_URL` value that selects the in-process store instead of PostgreSQL.
pub const MEMORY_DATABASE_URL: &str = "memory://";

#[derive(Debug, Clone)]
pub struct SigningConfig {
    pub common: core_config::Config,
    pub provider: ProviderConfig,
    pub database: DatabaseConfig,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

/// External signing provider connection settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_token: Secret<String>,
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl DatabaseConfig {
    pub fn is_memory(&self) -> bool {
        self.url.starts_with(MEMORY_DATABASE_URL)
    }
}

impl SigningConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;
        let is_prod = common_config.is_production();

        Ok(SigningConfig {
            provider: ProviderConfig {
                api_token: Secret::new(get_env("SIGNING_PROVIDER_API_TOKEN", None, is_prod)?),
                base_url: get_env("SIGNING_PROVIDER_BASE_URL", None, is_prod)?,
                timeout_seconds: parse_env(
                    "REQUEST_TIMEOUT",
                    DEFAULT_REQUEST_TIMEOUT_SECS,
                    is_prod,
                )?,
            },
            database: DatabaseConfig {
                url: get_env("DATABASE_URL", None, is_prod)?,
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 5, is_prod)?,
                min_connections: parse_env("DATABASE_MIN_CONNECTIONS", 1, is_prod)?,
            },
            log_level: get_env("LOG_LEVEL", Some(DEFAULT_LOG_LEVEL), is_prod)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
            common: common_config,
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_env<T>(key: &str, default: T, is_prod: bool) -> Result<T, AppError>
where
    T: std::str::FromStr + ToString,
    T::Err: std::fmt::Display,
{
    get_env(key, Some(&default.to_string()), is_prod)?
        .trim()
        .parse()
        .map_err(|e: T::Err| {
            AppError::ConfigError(anyhow::anyhow!("{} has an invalid value: {}", key, e))
        })
}
