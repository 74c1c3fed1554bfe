//! Server configuration loaded from the environment.

use std::env;
use std::net::SocketAddr;

use tracing::warn;
use uuid::Uuid;

/// Resolved application configuration.
///
/// Connection handles are constructed from these values at startup and
/// injected into the components that need them; nothing reads the
/// environment after boot.
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub redis_url: String,
    pub jwt_secret: Vec<u8>,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// - `BIND_ADDR` (default `0.0.0.0:8080`)
    /// - `DATABASE_URL` (required)
    /// - `REDIS_URL` (default `redis://localhost:6379`)
    /// - `JWT_SECRET_FILE` (default `/var/run/secrets/jwt_secret`); when the
    ///   file is unreadable, debug builds (or `JWT_ALLOW_EPHEMERAL=1`) fall
    ///   back to a process-lifetime random secret, which invalidates every
    ///   token on restart.
    pub fn from_env() -> std::io::Result<Self> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".into())
            .parse::<SocketAddr>()
            .map_err(|err| std::io::Error::other(format!("invalid BIND_ADDR: {err}")))?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| std::io::Error::other("DATABASE_URL must be set"))?;

        let redis_url =
            env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".into());

        let secret_path = env::var("JWT_SECRET_FILE")
            .unwrap_or_else(|_| "/var/run/secrets/jwt_secret".into());
        let jwt_secret = match std::fs::read(&secret_path) {
            Ok(bytes) => bytes,
            Err(err) => {
                let allow_dev = env::var("JWT_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
                if cfg!(debug_assertions) || allow_dev {
                    warn!(path = %secret_path, error = %err, "using ephemeral JWT secret (dev only)");
                    ephemeral_secret()
                } else {
                    return Err(std::io::Error::other(format!(
                        "failed to read JWT secret at {secret_path}: {err}"
                    )));
                }
            }
        };

        Ok(Self {
            bind_addr,
            database_url,
            redis_url,
            jwt_secret,
        })
    }
}

fn ephemeral_secret() -> Vec<u8> {
    let mut secret = Vec::with_capacity(32);
    secret.extend_from_slice(Uuid::new_v4().as_bytes());
    secret.extend_from_slice(Uuid::new_v4().as_bytes());
    secret
}
