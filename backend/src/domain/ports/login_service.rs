//! Driving port for token login, logout and request authentication.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing (or importing) the backing
//! infrastructure. This makes HTTP handler tests deterministic because they
//! can substitute a test double instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::{Actor, AuthToken, Error, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Check credentials and issue a fresh API token.
    ///
    /// Unknown emails and wrong passwords fail identically.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthToken, Error>;

    /// Revoke the presented token.
    async fn logout(&self, token: &AuthToken) -> Result<(), Error>;

    /// Resolve a presented token to the identity behind it.
    ///
    /// Unknown tokens yield an unauthorized error.
    async fn authenticate(&self, token: &AuthToken) -> Result<Actor, Error>;
}
