//! Authentication infrastructure adapters: JWT issuing and Argon2 hashing.

mod jwt;
mod password;

pub use jwt::JwtTokenIssuer;
pub use password::Argon2PasswordHasher;
