//! Port for recipe persistence.
//!
//! Writes replace a recipe's whole composition. Adapters must apply the
//! scalar columns, the ingredient lines and the tag links of one call
//! atomically so readers never see a recipe mid-rewrite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::PageRequest;

use crate::domain::{
    RecipeDraft, RecipeFilter, RecipeId, RecipeIngredientLine, RecipeRecord, Tag, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recipe repository query failed: {message}",
        /// The recipe vanished between lookup and write.
        NotFound { id: i64 } => "recipe {id} not found",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Insert a recipe with its ingredient lines and tags in one transaction.
    async fn create(
        &self,
        author_id: UserId,
        draft: &RecipeDraft,
        pub_date: DateTime<Utc>,
    ) -> Result<RecipeRecord, RecipeRepositoryError>;

    /// Overwrite the scalar fields and replace the ingredient and tag sets in
    /// one transaction. The image is only replaced when the draft carries one.
    async fn update(
        &self,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<RecipeRecord, RecipeRepositoryError>;

    /// Delete a recipe. Returns `false` when it did not exist.
    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError>;

    async fn find(&self, id: RecipeId) -> Result<Option<RecipeRecord>, RecipeRepositoryError>;

    /// One page of recipes matching `filter` in (name, pub_date) order, plus
    /// the number of matching recipes.
    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<(Vec<RecipeRecord>, u64), RecipeRepositoryError>;

    /// Ingredient lines of a recipe in insertion order.
    async fn ingredient_lines(
        &self,
        id: RecipeId,
    ) -> Result<Vec<RecipeIngredientLine>, RecipeRepositoryError>;

    /// Tags of a recipe ordered by tag id.
    async fn tags(&self, id: RecipeId) -> Result<Vec<Tag>, RecipeRepositoryError>;

    /// At most `limit` recipes of `author_id` in default order.
    async fn by_author(
        &self,
        author_id: UserId,
        limit: u32,
    ) -> Result<Vec<RecipeRecord>, RecipeRepositoryError>;

    async fn count_by_author(&self, author_id: UserId) -> Result<u64, RecipeRepositoryError>;
}
