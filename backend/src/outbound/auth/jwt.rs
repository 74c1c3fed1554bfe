//! JWT adapter implementing the token-issuer port.
//!
//! HS256 tokens carrying the user id as `sub`, issued with a seven-day
//! expiry. Every verification failure collapses to the port's `Invalid`
//! variant; callers treat it as "not authenticated".

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenIssuer, TokenIssuerError};
use crate::domain::user::UserId;

/// Token lifetime in the reference deployment.
const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// HS256 token issuer/verifier over a shared secret.
pub struct JwtTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtTokenIssuer {
    /// Create an issuer with the deployment's seven-day token lifetime.
    pub fn new(secret: &[u8]) -> Self {
        Self::with_ttl(secret, Duration::days(TOKEN_TTL_DAYS))
    }

    /// Create an issuer with an explicit token lifetime.
    pub fn with_ttl(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::default(),
            ttl,
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user: &UserId) -> Result<String, TokenIssuerError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| TokenIssuerError::issue(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenIssuerError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| TokenIssuerError::Invalid)?;
        UserId::new(data.claims.sub).map_err(|_| TokenIssuerError::Invalid)
    }
}
