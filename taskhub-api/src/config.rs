/// Configuration management for the API server
///
/// Configuration comes from environment variables, optionally seeded from a
/// `.env` file in the working directory.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma separated allowed origins, `*` for any (default: *)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `DATABASE_MIN_CONNECTIONS`: Idle connections kept open (default: 2)
/// - `JWT_SECRET`: Secret key for JWT signing, at least 32 characters (required)
/// - `LOG_FORMAT`: `pretty` or `json` (default: pretty)
/// - `RUN_MIGRATIONS`: Apply migrations on startup (default: true)
/// - `RUST_LOG`: Log filter (default: taskhub_api=debug,taskhub_shared=info,tower_http=debug)
///
/// # Example
///
/// ```no_run
/// use taskhub_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{env, str::FromStr};
use taskhub_shared::db::pool;

/// Minimum accepted length of `JWT_SECRET`
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub logging: LoggingConfig,

    /// Apply pending migrations before serving
    pub run_migrations: bool,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; `*` allows any origin
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    pub max_connections: u32,
    pub min_connections: u32,
}

impl DatabaseConfig {
    /// Pool settings for `create_pool`
    pub fn pool_config(&self) -> pool::DatabaseConfig {
        pool::DatabaseConfig {
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            ..pool::DatabaseConfig::new(self.url.clone())
        }
    }
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// Generate with: `openssl rand -hex 32`
    #[serde(skip_serializing)]
    pub secret: String,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("Unknown LOG_FORMAT '{}', expected 'pretty' or 'json'", other),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl Config {
    /// Loads configuration from the environment (and `.env`, if present)
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value can't
    /// be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let api_port = parse_or(&lookup, "API_PORT", 8080u16)?;
        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let database_url =
            lookup("DATABASE_URL").context("DATABASE_URL environment variable is required")?;
        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10u32)?;
        let min_connections = parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", 2u32)?;

        if min_connections > max_connections {
            anyhow::bail!("DATABASE_MIN_CONNECTIONS must not exceed DATABASE_MAX_CONNECTIONS");
        }

        let jwt_secret =
            lookup("JWT_SECRET").context("JWT_SECRET environment variable is required")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            anyhow::bail!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            );
        }

        let log_format = parse_or(&lookup, "LOG_FORMAT", LogFormat::Pretty)?;
        let run_migrations = parse_or(&lookup, "RUN_MIGRATIONS", true)?;

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
                min_connections,
            },
            jwt: JwtConfig { secret: jwt_secret },
            logging: LoggingConfig { format: log_format },
            run_migrations,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// True if any origin may call the API
    pub fn cors_allows_any(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e)),
        None => Ok(default),
    }
}
