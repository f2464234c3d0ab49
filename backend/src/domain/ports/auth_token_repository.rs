//! Port for API token storage.
//!
//! Adapters only ever see [`TokenDigest`] values; the plain key is returned
//! to the client once and never persisted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Actor, TokenDigest, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token repository adapters.
    pub enum AuthTokenRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "token repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthTokenRepository: Send + Sync {
    /// Record a newly issued token for `user_id`.
    async fn store(
        &self,
        user_id: UserId,
        digest: &TokenDigest,
        issued_at: DateTime<Utc>,
    ) -> Result<(), AuthTokenRepositoryError>;

    /// Resolve a token digest to the identity that owns it.
    async fn find_actor(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<Actor>, AuthTokenRepositoryError>;

    /// Delete a token. Returns `false` when no such token was stored.
    async fn revoke(&self, digest: &TokenDigest) -> Result<bool, AuthTokenRepositoryError>;
}
