//! Relationship domain services.
//!
//! Favourites, shopping cart entries and follows share one contract: adding
//! requires the target to exist and the pair to be absent; removing requires
//! the pair to exist. The database unique constraints back up the pre-checks
//! when two requests race.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::PageRequest;
use tracing::{debug, info};

use crate::domain::ports::{
    RecipeRepository, RelationshipCommand, RelationshipRepository, RelationshipRepositoryError,
    ShoppingListQuery, SubscriptionsQuery, UserRepository,
};
use crate::domain::repository_errors::{
    map_recipe_error, map_relationship_error, map_user_error,
};
use crate::domain::{
    Actor, Error, FollowedAuthor, Listing, RecipeId, RecipeListKind, RecipeRecord,
    RecipeSummary, ShoppingList, User, UserId, UserProfile,
};

/// Number of recipes nested under each followed author by default.
pub const DEFAULT_RECIPES_LIMIT: u32 = 6;

/// Decorate `user` with whether `viewer` follows them.
///
/// Anonymous viewers and users viewing themselves are never subscribed.
pub(crate) async fn profile_for<R>(
    relationships: &R,
    viewer: Option<UserId>,
    user: User,
) -> Result<UserProfile, RelationshipRepositoryError>
where
    R: RelationshipRepository + ?Sized,
{
    let is_subscribed = match viewer {
        Some(viewer) if viewer != user.id => relationships.is_following(viewer, user.id).await?,
        _ => false,
    };
    Ok(UserProfile {
        user,
        is_subscribed,
    })
}

/// Service implementing the toggle, subscription and shopping-list ports.
#[derive(Clone)]
pub struct RelationshipService<P, U, R> {
    recipes: Arc<P>,
    users: Arc<U>,
    relationships: Arc<R>,
    clock: Arc<dyn Clock>,
    recipes_limit: u32,
}

impl<P, U, R> RelationshipService<P, U, R> {
    /// Create a new service nesting [`DEFAULT_RECIPES_LIMIT`] recipes per
    /// followed author.
    pub fn new(
        recipes: Arc<P>,
        users: Arc<U>,
        relationships: Arc<R>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            recipes,
            users,
            relationships,
            clock,
            recipes_limit: DEFAULT_RECIPES_LIMIT,
        }
    }

    /// Override the default number of nested recipes.
    #[must_use]
    pub fn with_recipes_limit(mut self, recipes_limit: u32) -> Self {
        self.recipes_limit = recipes_limit;
        self
    }
}

impl<P, U, R> RelationshipService<P, U, R>
where
    P: RecipeRepository,
    U: UserRepository,
    R: RelationshipRepository,
{
    async fn existing_recipe(&self, id: RecipeId) -> Result<RecipeRecord, Error> {
        self.recipes
            .find(id)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(|| Error::not_found(format!("recipe {id} not found")))
    }

    async fn existing_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    async fn followed_author(
        &self,
        author: User,
        recipes_limit: Option<u32>,
    ) -> Result<FollowedAuthor, Error> {
        let limit = recipes_limit.unwrap_or(self.recipes_limit);
        let recipes = self
            .recipes
            .by_author(author.id, limit)
            .await
            .map_err(map_recipe_error)?;
        let recipes_count = self
            .recipes
            .count_by_author(author.id)
            .await
            .map_err(map_recipe_error)?;
        Ok(FollowedAuthor {
            profile: UserProfile {
                user: author,
                is_subscribed: true,
            },
            recipes: recipes.into_iter().map(RecipeSummary::from).collect(),
            recipes_count,
        })
    }
}

#[async_trait]
impl<P, U, R> RelationshipCommand for RelationshipService<P, U, R>
where
    P: RecipeRepository,
    U: UserRepository,
    R: RelationshipRepository,
{
    async fn add_recipe(
        &self,
        actor: &Actor,
        kind: RecipeListKind,
        recipe_id: RecipeId,
    ) -> Result<RecipeSummary, Error> {
        let recipe = self.existing_recipe(recipe_id).await?;
        let present = self
            .relationships
            .has_recipe(kind, actor.user_id, recipe_id)
            .await
            .map_err(map_relationship_error)?;
        if present {
            return Err(Error::already_exists(format!(
                "recipe {recipe_id} is already in {kind}"
            )));
        }

        self.relationships
            .add_recipe(kind, actor.user_id, recipe_id, self.clock.utc())
            .await
            .map_err(map_relationship_error)?;
        debug!(user_id = %actor.user_id, %recipe_id, %kind, "recipe added");
        Ok(RecipeSummary::from(recipe))
    }

    async fn remove_recipe(
        &self,
        actor: &Actor,
        kind: RecipeListKind,
        recipe_id: RecipeId,
    ) -> Result<(), Error> {
        self.existing_recipe(recipe_id).await?;
        let removed = self
            .relationships
            .remove_recipe(kind, actor.user_id, recipe_id)
            .await
            .map_err(map_relationship_error)?;
        if !removed {
            return Err(Error::not_found(format!(
                "recipe {recipe_id} is not in {kind}"
            )));
        }
        debug!(user_id = %actor.user_id, %recipe_id, %kind, "recipe removed");
        Ok(())
    }

    async fn follow(
        &self,
        actor: &Actor,
        author_id: UserId,
        recipes_limit: Option<u32>,
    ) -> Result<FollowedAuthor, Error> {
        let author = self.existing_user(author_id).await?;
        if author_id == actor.user_id {
            return Err(Error::already_exists("you cannot subscribe to yourself"));
        }
        let following = self
            .relationships
            .is_following(actor.user_id, author_id)
            .await
            .map_err(map_relationship_error)?;
        if following {
            return Err(Error::already_exists(format!(
                "already subscribed to user {author_id}"
            )));
        }

        self.relationships
            .follow(actor.user_id, author_id, self.clock.utc())
            .await
            .map_err(map_relationship_error)?;
        info!(user_id = %actor.user_id, %author_id, "subscribed");
        self.followed_author(author, recipes_limit).await
    }

    async fn unfollow(&self, actor: &Actor, author_id: UserId) -> Result<(), Error> {
        self.existing_user(author_id).await?;
        let removed = self
            .relationships
            .unfollow(actor.user_id, author_id)
            .await
            .map_err(map_relationship_error)?;
        if !removed {
            return Err(Error::not_found(format!(
                "not subscribed to user {author_id}"
            )));
        }
        info!(user_id = %actor.user_id, %author_id, "unsubscribed");
        Ok(())
    }
}

#[async_trait]
impl<P, U, R> SubscriptionsQuery for RelationshipService<P, U, R>
where
    P: RecipeRepository,
    U: UserRepository,
    R: RelationshipRepository,
{
    async fn subscriptions(
        &self,
        actor: &Actor,
        page: PageRequest,
        recipes_limit: Option<u32>,
    ) -> Result<Listing<FollowedAuthor>, Error> {
        let (authors, count) = self
            .relationships
            .followed_authors(actor.user_id, page)
            .await
            .map_err(map_relationship_error)?;
        let listing = Listing::new(authors, count).within(&page)?;

        let mut followed = Vec::with_capacity(listing.items.len());
        for author in listing.items {
            followed.push(self.followed_author(author, recipes_limit).await?);
        }
        Ok(Listing::new(followed, listing.count))
    }
}

#[async_trait]
impl<P, U, R> ShoppingListQuery for RelationshipService<P, U, R>
where
    P: RecipeRepository,
    U: UserRepository,
    R: RelationshipRepository,
{
    async fn shopping_list(&self, actor: &Actor) -> Result<ShoppingList, Error> {
        let rows = self
            .relationships
            .cart_ingredients(actor.user_id)
            .await
            .map_err(map_relationship_error)?;
        Ok(ShoppingList::aggregate(rows))
    }
}

#[cfg(test)]
#[path = "relationship_service_tests.rs"]
mod tests;
