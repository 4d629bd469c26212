//! Server configuration from environment variables.

use std::net::{Ipv4Addr, SocketAddr};

use connect_ai::AiConfig;
use thiserror::Error;
use tracing::warn;

/// Signing secret used when `JWT_SECRET` is unset outside production.
const DEV_JWT_SECRET: &str = "bcet-connect-development-secret";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Credentials of the admin account ensured at startup.
#[derive(Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Everything the server reads at startup.
#[derive(Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub environment: String,
    pub jwt_secret: String,
    pub jwt_expiry_days: i64,
    /// `None` allows any origin
    pub cors_origin: Option<String>,
    pub admin: Option<AdminSeed>,
    pub ai: AiConfig,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("port", &self.port)
            .field("environment", &self.environment)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiry_days", &self.jwt_expiry_days)
            .field("cors_origin", &self.cors_origin)
            .field("admin", &self.admin)
            .field("ai", &self.ai)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: Self::DEFAULT_PORT,
            environment: "development".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiry_days: Self::DEFAULT_JWT_EXPIRY_DAYS,
            cors_origin: None,
            admin: None,
            ai: AiConfig::offline(),
        }
    }
}

impl ServerConfig {
    pub const DEFAULT_PORT: u16 = 5000;
    pub const DEFAULT_JWT_EXPIRY_DAYS: i64 = 7;

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT`: listen port (default: 5000)
    /// - `APP_ENV`: `development` or `production` (default: development)
    /// - `JWT_SECRET`: token signing secret, required in production
    /// - `JWT_EXPIRY_DAYS`: token lifetime in days (default: 7)
    /// - `CORS_ORIGIN`: allowed browser origin (default: any)
    /// - `ADMIN_EMAIL` / `ADMIN_PASSWORD` / `ADMIN_NAME`: bootstrap admin
    /// - `AI_*`: see [`AiConfig::from_env`]
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = var("APP_ENV").unwrap_or_else(|| "development".to_string());

        let jwt_secret = match var("JWT_SECRET") {
            Some(secret) => secret,
            None if environment.eq_ignore_ascii_case("production") => {
                return Err(ConfigError::MissingEnvVar("JWT_SECRET".to_string()));
            }
            None => {
                warn!("JWT_SECRET not set, using the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let admin = match (var("ADMIN_EMAIL"), var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed {
                name: var("ADMIN_NAME").unwrap_or_else(|| "Administrator".to_string()),
                email,
                password,
            }),
            (Some(_), None) => {
                warn!("ADMIN_EMAIL set without ADMIN_PASSWORD, skipping admin bootstrap");
                None
            }
            _ => None,
        };

        Ok(Self {
            port: parsed("PORT", Self::DEFAULT_PORT)?,
            environment,
            jwt_secret,
            jwt_expiry_days: parsed("JWT_EXPIRY_DAYS", Self::DEFAULT_JWT_EXPIRY_DAYS)?,
            cors_origin: var("CORS_ORIGIN").filter(|o| o != "*"),
            admin,
            ai: AiConfig::from_env(),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

fn var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match var(key) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        }),
    }
}
