//! Driving port for recipe writes.

use async_trait::async_trait;

use crate::domain::{Actor, Error, RecipeDetail, RecipeId, RecipeInput};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCommand: Send + Sync {
    /// Validate and store a recipe authored by `actor`.
    async fn create(&self, actor: &Actor, input: RecipeInput) -> Result<RecipeDetail, Error>;

    /// Replace a recipe's fields and composition. Only the author or an admin
    /// may do this.
    async fn update(
        &self,
        actor: &Actor,
        id: RecipeId,
        input: RecipeInput,
    ) -> Result<RecipeDetail, Error>;

    /// Delete a recipe. Only the author or an admin may do this.
    async fn delete(&self, actor: &Actor, id: RecipeId) -> Result<(), Error>;
}
