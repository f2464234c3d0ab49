//! Driving port for the favourite, shopping cart and follow toggles.
//!
//! Adding an existing pair is an error rather than a no-op, and so is
//! removing a missing one.

use async_trait::async_trait;

use crate::domain::{Actor, Error, FollowedAuthor, RecipeId, RecipeListKind, RecipeSummary, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationshipCommand: Send + Sync {
    async fn add_recipe(
        &self,
        actor: &Actor,
        kind: RecipeListKind,
        recipe_id: RecipeId,
    ) -> Result<RecipeSummary, Error>;

    async fn remove_recipe(
        &self,
        actor: &Actor,
        kind: RecipeListKind,
        recipe_id: RecipeId,
    ) -> Result<(), Error>;

    /// Follow `author_id`; the view nests at most `recipes_limit` recipes, or
    /// the configured default when `None`.
    async fn follow(
        &self,
        actor: &Actor,
        author_id: UserId,
        recipes_limit: Option<u32>,
    ) -> Result<FollowedAuthor, Error>;

    async fn unfollow(&self, actor: &Actor, author_id: UserId) -> Result<(), Error>;
}
