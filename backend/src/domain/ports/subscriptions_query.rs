//! Driving port for the followed-authors listing.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Actor, Error, FollowedAuthor, Listing};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionsQuery: Send + Sync {
    /// Authors followed by `actor`, newest follow first.
    async fn subscriptions(
        &self,
        actor: &Actor,
        page: PageRequest,
        recipes_limit: Option<u32>,
    ) -> Result<Listing<FollowedAuthor>, Error>;
}
