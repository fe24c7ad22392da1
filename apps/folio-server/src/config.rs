//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use folio_infra::JwtConfig;
use folio_infra::media::DEFAULT_MAX_UPLOAD_BYTES;

/// `DATA_FILE` value selecting the in-memory store.
pub const IN_MEMORY_STORE: &str = ":memory:";

pub const DEFAULT_ADMIN_PASSWORD: &str = "change-me";

/// Longest accepted admin session: one year.
pub const MAX_JWT_EXPIRATION_HOURS: i64 = 24 * 365;

/// Where posts are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    InMemory,
    JsonFile(PathBuf),
}

/// How the admin password is supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminSecret {
    /// Plain password, hashed with Argon2 at startup.
    Plain(String),
    /// Pre-computed Argon2 PHC string.
    Hash(String),
}

/// Login throttling; `max_attempts == 0` disables it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginLimitConfig {
    pub max_attempts: u32,
    pub window: Duration,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    pub admin_secret: AdminSecret,
    pub jwt: JwtConfig,
    pub login_limit: LoginLimitConfig,
    pub max_upload_bytes: usize,
    pub max_json_bytes: usize,
    /// Take the client address from `Forwarded`/`X-Forwarded-For`.
    /// Only safe behind a proxy that overwrites those headers.
    pub trust_proxy_headers: bool,
    pub production: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_source(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = JwtConfig::default();

        let store = match var("DATA_FILE") {
            Some(path) if path == IN_MEMORY_STORE => StoreConfig::InMemory,
            Some(path) if !path.trim().is_empty() => StoreConfig::JsonFile(PathBuf::from(path)),
            _ => StoreConfig::JsonFile(PathBuf::from("data/posts.json")),
        };

        let admin_secret = match var("ADMIN_PASSWORD_HASH").filter(|h| !h.trim().is_empty()) {
            Some(hash) => AdminSecret::Hash(hash.trim().to_string()),
            None => AdminSecret::Plain(
                var("ADMIN_PASSWORD").unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
            ),
        };

        Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parsed(&var, "PORT").unwrap_or(8080),
            store,
            admin_secret,
            jwt: JwtConfig {
                secret: var("JWT_SECRET").unwrap_or(defaults.secret),
                expiration_hours: parsed(&var, "JWT_EXPIRATION_HOURS")
                    .map(|hours: i64| hours.clamp(1, MAX_JWT_EXPIRATION_HOURS))
                    .unwrap_or(defaults.expiration_hours),
                issuer: var("JWT_ISSUER").unwrap_or(defaults.issuer),
            },
            login_limit: LoginLimitConfig {
                max_attempts: parsed(&var, "LOGIN_RATE_LIMIT_MAX_ATTEMPTS").unwrap_or(5),
                window: Duration::from_secs(
                    parsed(&var, "LOGIN_RATE_LIMIT_WINDOW_SECS").unwrap_or(60),
                ),
            },
            max_upload_bytes: parsed(&var, "MAX_UPLOAD_BYTES")
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            max_json_bytes: parsed(&var, "MAX_JSON_BYTES").unwrap_or(10 * 1024 * 1024),
            trust_proxy_headers: parsed(&var, "TRUST_PROXY_HEADERS").unwrap_or(false),
            production: var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false),
        }
    }

    /// Log loudly about insecure defaults.
    pub fn warn_insecure_defaults(&self) {
        let mut insecure = Vec::new();
        if self.admin_secret == AdminSecret::Plain(DEFAULT_ADMIN_PASSWORD.to_string()) {
            insecure.push("ADMIN_PASSWORD");
        }
        if self.jwt.secret == folio_infra::auth::DEFAULT_SECRET {
            insecure.push("JWT_SECRET");
        }

        for name in insecure {
            if self.production {
                tracing::error!(variable = name, "SECURITY: Using default value in production!");
            } else {
                tracing::warn!(variable = name, "Using default value. Set it for production use.");
            }
        }
    }
}

fn parsed<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    var(key).and_then(|v| v.trim().parse().ok())
}
