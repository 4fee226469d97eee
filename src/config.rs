use std::env;
use std::net::SocketAddr;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// The URL of the Redis server.
    pub redis_url: String,
    /// The address the HTTP server binds to.
    pub listen_addr: SocketAddr,
    /// An extra origin allowed by CORS, if any.
    pub cors_origin: Option<String>,
    /// Whether the credential routes are rate limited per client IP.
    pub rate_limit_auth: bool,
    /// The secret used to sign session tokens.
    pub jwt_secret: Zeroizing<Vec<u8>>,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET")
            .context("JWT_SECRET must be set (generate with: openssl rand -hex 32)")?;

        if jwt_secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        let jwt_secret = Zeroizing::new(jwt_secret.into_bytes());

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            listen_addr: env::var("LISTEN_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
                .parse()
                .context("Invalid LISTEN_ADDR")?,
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|o| !o.is_empty()),
            rate_limit_auth: env::var("RATE_LIMIT_AUTH")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .context("Invalid RATE_LIMIT_AUTH")?,
            jwt_secret,
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &self.redis_url)
            .field("listen_addr", &self.listen_addr)
            .field("cors_origin", &self.cors_origin)
            .field("rate_limit_auth", &self.rate_limit_auth)
            .field("jwt_secret", &"[REDACTED]")
            .finish()
    }
}
