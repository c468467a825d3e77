// Service configuration loaded from environment variables

use std::env;
use std::str::FromStr;

/// Errors raised while reading configuration from the environment
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable {0} not set")]
    Missing(&'static str),

    #[error("Environment variable {key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime configuration for the API server
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub token_ttl_secs: i64,
    /// Adds the `Secure` attribute to the auth cookie
    pub cookie_secure: bool,
    /// Interval between sweeps of expired revoked tokens, in seconds
    pub purge_interval_secs: u64,
}

impl Config {
    pub const DEFAULT_TOKEN_TTL_SECS: i64 = 86_400;
    pub const DEFAULT_PURGE_INTERVAL_SECS: u64 = 3_600;

    /// Build the configuration from the process environment.
    /// Call `dotenv::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 8080u16)?;
        let token_ttl_secs = parse_or(&lookup, "JWT_EXPIRES_IN_SECS", Self::DEFAULT_TOKEN_TTL_SECS)?;
        if token_ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRES_IN_SECS",
                value: token_ttl_secs.to_string(),
            });
        }
        let cookie_secure = parse_or(&lookup, "COOKIE_SECURE", false)?;
        let purge_interval_secs = parse_or(
            &lookup,
            "REVOKED_PURGE_INTERVAL_SECS",
            Self::DEFAULT_PURGE_INTERVAL_SECS,
        )?;

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            token_ttl_secs,
            cookie_secure,
            purge_interval_secs,
        })
    }

    /// Address the HTTP listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}
