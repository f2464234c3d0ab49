//! Driving port for user-facing queries.
//!
//! Inbound adapters (HTTP handlers) use this port to fetch user-visible data
//! without importing outbound persistence concerns.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Error, Listing, UserId, UserProfile};

/// Domain use-case port for reading user profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// One page of users ordered by username, seen by `viewer`.
    async fn list_users(
        &self,
        viewer: Option<UserId>,
        page: PageRequest,
    ) -> Result<Listing<UserProfile>, Error>;

    /// A single user seen by `viewer`; not found when absent.
    async fn profile(&self, viewer: Option<UserId>, id: UserId) -> Result<UserProfile, Error>;
}
