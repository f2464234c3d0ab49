//! Driving port for tag and ingredient reads.

use async_trait::async_trait;

use crate::domain::{Error, Ingredient, IngredientId, Tag, TagId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    async fn tags(&self) -> Result<Vec<Tag>, Error>;

    async fn tag(&self, id: TagId) -> Result<Tag, Error>;

    /// Ingredients whose name starts with `name_prefix`, ignoring case.
    async fn ingredients(&self, name_prefix: Option<String>) -> Result<Vec<Ingredient>, Error>;

    async fn ingredient(&self, id: IngredientId) -> Result<Ingredient, Error>;
}
