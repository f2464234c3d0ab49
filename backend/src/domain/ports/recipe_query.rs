//! Driving port for recipe reads.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Error, Listing, RecipeDetail, RecipeId, RecipeListQuery, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeQuery: Send + Sync {
    /// One page of recipes matching `query`, assembled for `viewer`.
    async fn list_recipes(
        &self,
        viewer: Option<UserId>,
        query: RecipeListQuery,
        page: PageRequest,
    ) -> Result<Listing<RecipeDetail>, Error>;

    /// A single recipe assembled for `viewer`.
    async fn recipe(&self, viewer: Option<UserId>, id: RecipeId) -> Result<RecipeDetail, Error>;
}
