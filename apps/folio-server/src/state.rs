//! Application state - shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, bail};

use folio_core::ports::{PasswordService, PostRepository, RateLimiter, TokenService};
use folio_infra::{Argon2PasswordService, ImagePolicy, JwtTokenService, PostStore};

use crate::config::{AdminSecret, AppConfig, LoginLimitConfig, StoreConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    /// Argon2 PHC hash of the admin password.
    pub admin_password_hash: Arc<str>,
    pub login_limiter: Option<Arc<dyn RateLimiter>>,
    /// Key login attempts on forwarded headers instead of the peer address.
    pub trust_proxy_headers: bool,
    pub images: ImagePolicy,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let posts: Arc<dyn PostRepository> = match &config.store {
            StoreConfig::JsonFile(path) => {
                let store = PostStore::open(path.clone())
                    .await
                    .with_context(|| format!("opening post store at {}", path.display()))?;
                tracing::info!(path = %path.display(), "Using JSON file post store");
                Arc::new(store)
            }
            StoreConfig::InMemory => {
                tracing::warn!("DATA_FILE is ':memory:'. Posts will be lost on restart.");
                Arc::new(PostStore::in_memory())
            }
        };

        let passwords = Arc::new(Argon2PasswordService::new());
        let admin_password_hash: Arc<str> = match &config.admin_secret {
            AdminSecret::Hash(hash) => {
                if !Argon2PasswordService::is_valid_hash(hash) {
                    bail!("ADMIN_PASSWORD_HASH is not a valid Argon2 PHC string");
                }
                hash.as_str().into()
            }
            AdminSecret::Plain(password) => passwords
                .hash(password)
                .context("hashing ADMIN_PASSWORD")?
                .into(),
        };

        let tokens = Arc::new(JwtTokenService::new(config.jwt.clone()));

        tracing::info!("Application state initialized");

        Ok(Self {
            posts,
            tokens,
            passwords,
            admin_password_hash,
            login_limiter: login_limiter(&config.login_limit),
            trust_proxy_headers: config.trust_proxy_headers,
            images: ImagePolicy::new(config.max_upload_bytes),
        })
    }
}

#[cfg(feature = "rate-limit")]
fn login_limiter(config: &LoginLimitConfig) -> Option<Arc<dyn RateLimiter>> {
    use folio_infra::{InMemoryRateLimiter, RateLimitConfig};

    if config.max_attempts == 0 {
        tracing::warn!("Login rate limiting disabled");
        return None;
    }

    Some(Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
        max_requests: config.max_attempts,
        window: config.window,
    })))
}

#[cfg(not(feature = "rate-limit"))]
fn login_limiter(_config: &LoginLimitConfig) -> Option<Arc<dyn RateLimiter>> {
    tracing::info!("Running without rate-limit feature - login attempts are not throttled");
    None
}
