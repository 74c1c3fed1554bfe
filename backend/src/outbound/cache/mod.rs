//! Redis-backed revocation set over a bb8 connection pool.
//!
//! Revoked tokens are stored under namespaced keys with a 24-hour TTL, so
//! the set bounds its own size; expiry removal is Redis's job. Callers on
//! the read path treat errors from here as "not revoked" (see the port
//! contract) — this adapter only reports them.

use async_trait::async_trait;
use bb8_redis::redis::AsyncCommands;
use bb8_redis::{RedisConnectionManager, bb8};

use crate::domain::ports::{RevocationSet, RevocationSetError};

/// Lifetime of a revocation entry.
const REVOCATION_TTL_SECS: u64 = 86_400;

fn revocation_key(token: &str) -> String {
    format!("revoked:{token}")
}

/// Redis adapter implementing the revocation-set port.
#[derive(Clone)]
pub struct RedisRevocationSet {
    pool: bb8::Pool<RedisConnectionManager>,
}

impl RedisRevocationSet {
    /// Connect a pool against the given Redis URL.
    ///
    /// # Errors
    /// Returns a connection error when the URL is invalid or the pool
    /// cannot be built.
    pub async fn connect(url: &str) -> Result<Self, RevocationSetError> {
        let manager = RedisConnectionManager::new(url)
            .map_err(|err| RevocationSetError::connection(err.to_string()))?;
        let pool = bb8::Pool::builder()
            .build(manager)
            .await
            .map_err(|err| RevocationSetError::connection(err.to_string()))?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl RevocationSet for RedisRevocationSet {
    async fn revoke(&self, token: &str) -> Result<(), RevocationSetError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| RevocationSetError::connection(err.to_string()))?;

        let () = conn
            .set_ex(revocation_key(token), "revoked", REVOCATION_TTL_SECS)
            .await
            .map_err(|err| RevocationSetError::operation(err.to_string()))?;
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, RevocationSetError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| RevocationSetError::connection(err.to_string()))?;

        conn.exists(revocation_key(token))
            .await
            .map_err(|err| RevocationSetError::operation(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_per_token() {
        assert_eq!(revocation_key("abc.def"), "revoked:abc.def");
        assert_ne!(revocation_key("one"), revocation_key("two"));
    }
}
