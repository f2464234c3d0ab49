//! Recipe composition and read-side assembly.
//!
//! Writes validate the payload, confirm every referenced ingredient and tag
//! exists, then hand the whole composition to the repository which stores it
//! in one transaction. Reads rebuild the nested view for the requesting
//! viewer on every call.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::PageRequest;
use tracing::info;

use crate::domain::ports::{
    CatalogueRepository, RecipeCommand, RecipeQuery, RecipeRepository, RelationshipRepository,
    UserRepository,
};
use crate::domain::relationship_service::profile_for;
use crate::domain::repository_errors::{
    map_catalogue_error, map_recipe_error, map_relationship_error, map_user_error,
};
use crate::domain::{
    Actor, Error, IngredientId, Listing, RecipeDetail, RecipeDraft, RecipeFilter, RecipeId,
    RecipeInput, RecipeListKind, RecipeListQuery, RecipeRecord, RecipeValidationError, TagId,
    UserId,
};

/// Service implementing the recipe command and query ports.
#[derive(Clone)]
pub struct RecipeService<P, C, U, R> {
    recipes: Arc<P>,
    catalogue: Arc<C>,
    users: Arc<U>,
    relationships: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<P, C, U, R> RecipeService<P, C, U, R> {
    /// Create a new service with the given collaborators.
    pub fn new(
        recipes: Arc<P>,
        catalogue: Arc<C>,
        users: Arc<U>,
        relationships: Arc<R>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            recipes,
            catalogue,
            users,
            relationships,
            clock,
        }
    }
}

impl<P, C, U, R> RecipeService<P, C, U, R>
where
    P: RecipeRepository,
    C: CatalogueRepository,
    U: UserRepository,
    R: RelationshipRepository,
{
    async fn existing(&self, id: RecipeId) -> Result<RecipeRecord, Error> {
        self.recipes
            .find(id)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(|| Error::not_found(format!("recipe {id} not found")))
    }

    async fn modifiable(&self, actor: &Actor, id: RecipeId) -> Result<RecipeRecord, Error> {
        let recipe = self.existing(id).await?;
        if !actor.can_modify(recipe.author_id) {
            return Err(Error::forbidden(
                "only the author of a recipe may change it",
            ));
        }
        Ok(recipe)
    }

    async fn ensure_references(&self, draft: &RecipeDraft) -> Result<(), Error> {
        let ingredient_ids: Vec<IngredientId> = draft
            .ingredients()
            .iter()
            .map(|line| line.ingredient_id)
            .collect();
        let missing = self
            .catalogue
            .missing_ingredients(&ingredient_ids)
            .await
            .map_err(map_catalogue_error)?;
        if let Some(id) = missing.first() {
            return Err(RecipeValidationError::UnknownIngredient { id: id.get() }.into());
        }

        let missing: Vec<TagId> = if draft.tags().is_empty() {
            Vec::new()
        } else {
            self.catalogue
                .missing_tags(draft.tags())
                .await
                .map_err(map_catalogue_error)?
        };
        if let Some(id) = missing.first() {
            return Err(RecipeValidationError::UnknownTag { id: id.get() }.into());
        }
        Ok(())
    }

    async fn flag(
        &self,
        kind: RecipeListKind,
        viewer: Option<UserId>,
        recipe_id: RecipeId,
    ) -> Result<bool, Error> {
        match viewer {
            Some(user_id) => self
                .relationships
                .has_recipe(kind, user_id, recipe_id)
                .await
                .map_err(map_relationship_error),
            None => Ok(false),
        }
    }

    async fn detail(
        &self,
        viewer: Option<UserId>,
        recipe: RecipeRecord,
    ) -> Result<RecipeDetail, Error> {
        let author = self
            .users
            .find_by_id(recipe.author_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::internal(format!("author of recipe {} is missing", recipe.id)))?;
        let author = profile_for(self.relationships.as_ref(), viewer, author)
            .await
            .map_err(map_relationship_error)?;
        let tags = self.recipes.tags(recipe.id).await.map_err(map_recipe_error)?;
        let ingredients = self
            .recipes
            .ingredient_lines(recipe.id)
            .await
            .map_err(map_recipe_error)?;
        let is_favorited = self
            .flag(RecipeListKind::Favorites, viewer, recipe.id)
            .await?;
        let is_in_shopping_cart = self
            .flag(RecipeListKind::ShoppingCart, viewer, recipe.id)
            .await?;

        Ok(RecipeDetail {
            recipe,
            author,
            tags,
            ingredients,
            is_favorited,
            is_in_shopping_cart,
        })
    }
}

#[async_trait]
impl<P, C, U, R> RecipeCommand for RecipeService<P, C, U, R>
where
    P: RecipeRepository,
    C: CatalogueRepository,
    U: UserRepository,
    R: RelationshipRepository,
{
    async fn create(&self, actor: &Actor, input: RecipeInput) -> Result<RecipeDetail, Error> {
        let draft = RecipeDraft::for_create(input)?;
        self.ensure_references(&draft).await?;

        let recipe = self
            .recipes
            .create(actor.user_id, &draft, self.clock.utc())
            .await
            .map_err(map_recipe_error)?;
        info!(recipe_id = %recipe.id, author_id = %actor.user_id, "recipe created");
        self.detail(Some(actor.user_id), recipe).await
    }

    async fn update(
        &self,
        actor: &Actor,
        id: RecipeId,
        input: RecipeInput,
    ) -> Result<RecipeDetail, Error> {
        self.modifiable(actor, id).await?;
        let draft = RecipeDraft::for_update(input)?;
        self.ensure_references(&draft).await?;

        let recipe = self
            .recipes
            .update(id, &draft)
            .await
            .map_err(map_recipe_error)?;
        info!(recipe_id = %id, user_id = %actor.user_id, "recipe updated");
        self.detail(Some(actor.user_id), recipe).await
    }

    async fn delete(&self, actor: &Actor, id: RecipeId) -> Result<(), Error> {
        self.modifiable(actor, id).await?;
        let deleted = self.recipes.delete(id).await.map_err(map_recipe_error)?;
        if !deleted {
            return Err(Error::not_found(format!("recipe {id} not found")));
        }
        info!(recipe_id = %id, user_id = %actor.user_id, "recipe deleted");
        Ok(())
    }
}

#[async_trait]
impl<P, C, U, R> RecipeQuery for RecipeService<P, C, U, R>
where
    P: RecipeRepository,
    C: CatalogueRepository,
    U: UserRepository,
    R: RelationshipRepository,
{
    async fn list_recipes(
        &self,
        viewer: Option<UserId>,
        query: RecipeListQuery,
        page: PageRequest,
    ) -> Result<Listing<RecipeDetail>, Error> {
        let Some(filter) = RecipeFilter::for_viewer(query, viewer) else {
            return Listing::empty().within(&page);
        };
        let (records, count) = self
            .recipes
            .list(&filter, page)
            .await
            .map_err(map_recipe_error)?;
        let listing = Listing::new(records, count).within(&page)?;

        let mut details = Vec::with_capacity(listing.items.len());
        for record in listing.items {
            details.push(self.detail(viewer, record).await?);
        }
        Ok(Listing::new(details, listing.count))
    }

    async fn recipe(&self, viewer: Option<UserId>, id: RecipeId) -> Result<RecipeDetail, Error> {
        let record = self.existing(id).await?;
        self.detail(viewer, record).await
    }
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
