//! Authentication primitives: login credentials and raw passwords.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

/// Minimum allowed password length.
pub const PASSWORD_MIN: usize = 6;

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
    /// Password is shorter than [`PASSWORD_MIN`] characters.
    PasswordTooShort { min: usize },
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// A registration password that satisfies the length policy.
///
/// The inner string is zeroized on drop so raw secrets do not linger in
/// freed memory.
#[derive(Debug, Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate and construct a [`Password`].
    pub fn new(password: impl Into<String>) -> Result<Self, CredentialValidationError> {
        let password = password.into();
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(CredentialValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self(Zeroizing::new(password)))
    }

    /// Raw secret, exposed only for hashing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `username` is trimmed and lowercased, matching stored handles.
/// - `password` is non-empty but otherwise unconstrained: login must accept
///   whatever the account was registered with.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let normalized = username.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(CredentialValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for account lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialValidationError::EmptyUsername)]
    #[case("   ", "pw", CredentialValidationError::EmptyUsername)]
    #[case("user", "", CredentialValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: CredentialValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn credentials_normalise_username() {
        let creds = LoginCredentials::try_from_parts("  Ada  ", "secret").expect("valid");
        assert_eq!(creds.username(), "ada");
        assert_eq!(creds.password(), "secret");
    }

    #[rstest]
    #[case("", CredentialValidationError::EmptyPassword)]
    #[case("short", CredentialValidationError::PasswordTooShort { min: PASSWORD_MIN })]
    fn password_policy(#[case] raw: &str, #[case] expected: CredentialValidationError) {
        assert_eq!(Password::new(raw).expect_err("must fail"), expected);
    }

    #[test]
    fn password_accepts_minimum_length() {
        let password = Password::new("secret").expect("valid password");
        assert_eq!(password.expose(), "secret");
    }
}
