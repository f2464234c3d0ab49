//! Read-side port for tag and ingredient reference data.

use async_trait::async_trait;

use crate::domain::{Ingredient, IngredientId, Tag, TagId};

use super::define_port_error;

define_port_error! {
    /// Errors raised when reading catalogue data.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "catalogue read connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } =>
            "catalogue read query failed: {message}",
    }
}

/// Port for reading tags and ingredients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// Every tag, ordered by id.
    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError>;

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, CatalogueRepositoryError>;

    /// Ingredients ordered by name, optionally restricted to names starting
    /// with `name_prefix` (case-insensitive).
    async fn list_ingredients(
        &self,
        name_prefix: Option<String>,
    ) -> Result<Vec<Ingredient>, CatalogueRepositoryError>;

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError>;

    /// The subset of `ids` with no matching ingredient, in input order.
    async fn missing_ingredients(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, CatalogueRepositoryError>;

    /// The subset of `ids` with no matching tag, in input order.
    async fn missing_tags(&self, ids: &[TagId]) -> Result<Vec<TagId>, CatalogueRepositoryError>;
}
