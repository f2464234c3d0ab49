//! Port for favourites, cart entries and follows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::PageRequest;

use crate::domain::{CartIngredientRow, RecipeId, RecipeListKind, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by relationship repository adapters.
    pub enum RelationshipRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "relationship repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "relationship repository query failed: {message}",
        /// The pair is already stored; raised by the unique constraint.
        AlreadyExists => "relationship already exists",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationshipRepository: Send + Sync {
    async fn add_recipe(
        &self,
        kind: RecipeListKind,
        user_id: UserId,
        recipe_id: RecipeId,
        added_at: DateTime<Utc>,
    ) -> Result<(), RelationshipRepositoryError>;

    /// Returns `false` when the pair was not stored.
    async fn remove_recipe(
        &self,
        kind: RecipeListKind,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<bool, RelationshipRepositoryError>;

    async fn has_recipe(
        &self,
        kind: RecipeListKind,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<bool, RelationshipRepositoryError>;

    async fn follow(
        &self,
        user_id: UserId,
        author_id: UserId,
        followed_at: DateTime<Utc>,
    ) -> Result<(), RelationshipRepositoryError>;

    /// Returns `false` when `user_id` did not follow `author_id`.
    async fn unfollow(
        &self,
        user_id: UserId,
        author_id: UserId,
    ) -> Result<bool, RelationshipRepositoryError>;

    async fn is_following(
        &self,
        user_id: UserId,
        author_id: UserId,
    ) -> Result<bool, RelationshipRepositoryError>;

    /// One page of authors followed by `user_id`, newest follow first, plus
    /// the total number followed.
    async fn followed_authors(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), RelationshipRepositoryError>;

    /// Every ingredient line of every recipe in the user's cart, in cart
    /// insertion order and then recipe line order.
    async fn cart_ingredients(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CartIngredientRow>, RelationshipRepositoryError>;
}
