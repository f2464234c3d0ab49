//! Authentication primitives: credentials, passwords, and API tokens.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::user::UserId;

/// Minimum number of characters in a password.
pub const PASSWORD_MIN: usize = 8;

/// Number of random bytes in a token key. Hex encoding doubles the length.
pub const TOKEN_KEY_BYTES: usize = 20;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use foodgram::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("cook@example.org", "password").unwrap();
/// assert_eq!(creds.email(), "cook@example.org");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email string suitable for user lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Reasons a new password is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordValidationError {
    TooShort { min: usize },
    EntirelyNumeric,
}

impl PasswordValidationError {
    /// Machine-readable validation code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TooShort { .. } => "password_too_short",
            Self::EntirelyNumeric => "password_entirely_numeric",
        }
    }
}

impl fmt::Display for PasswordValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { min } => {
                write!(f, "password must contain at least {min} characters")
            }
            Self::EntirelyNumeric => write!(f, "password must not be entirely numeric"),
        }
    }
}

impl std::error::Error for PasswordValidationError {}

/// Plain-text password that satisfies the password policy.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

impl Password {
    pub fn new(raw: impl Into<String>) -> Result<Self, PasswordValidationError> {
        let raw = Zeroizing::new(raw.into());
        if raw.chars().count() < PASSWORD_MIN {
            return Err(PasswordValidationError::TooShort { min: PASSWORD_MIN });
        }
        if raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(PasswordValidationError::EntirelyNumeric);
        }
        Ok(Self(raw))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

/// Encoded password hash as produced by a [`PasswordHasher`](super::ports::PasswordHasher).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Bearer key handed to a client after login.
///
/// Only the [`TokenDigest`] is ever stored.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    /// Draw a fresh key from `rng`.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::AuthToken;
    ///
    /// let token = AuthToken::generate(&mut rand::thread_rng());
    /// assert_eq!(token.as_str().len(), 40);
    /// ```
    pub fn generate<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = Zeroizing::new([0_u8; TOKEN_KEY_BYTES]);
        rng.fill_bytes(&mut bytes[..]);
        Self(Zeroizing::new(hex::encode(&bytes[..])))
    }

    /// Wrap a key presented by a client.
    pub fn from_presented(key: impl Into<String>) -> Self {
        Self(Zeroizing::new(key.into()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// SHA-256 digest used to look the token up.
    pub fn digest(&self) -> TokenDigest {
        TokenDigest(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Hex-encoded SHA-256 digest of an [`AuthToken`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenDigest(String);

impl TokenDigest {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Authenticated identity making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub is_admin: bool,
}

impl Actor {
    /// Whether this actor may modify a resource owned by `owner`.
    pub fn can_modify(&self, owner: UserId) -> bool {
        self.is_admin || self.user_id == owner
    }
}
