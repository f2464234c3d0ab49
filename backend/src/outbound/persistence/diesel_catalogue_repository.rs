//! PostgreSQL-backed read adapter for tags and ingredients.

use std::collections::HashSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{Ingredient, IngredientId, Tag, TagId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{IngredientRow, TagRow};
use super::pool::{DbPool, PoolError};
use super::schema::{ingredients, tags};

/// Diesel implementation of [`CatalogueRepository`].
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> CatalogueRepositoryError {
    map_pool_error(error, CatalogueRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> CatalogueRepositoryError {
    map_diesel_error(
        error,
        CatalogueRepositoryError::query,
        CatalogueRepositoryError::connection,
    )
}

/// Escape `LIKE` metacharacters so a user-supplied prefix matches literally.
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Ids from `requested` that are absent from `found`, in request order.
fn absent<T: Copy + Eq + std::hash::Hash>(requested: &[T], found: &[T]) -> Vec<T> {
    let found: HashSet<T> = found.iter().copied().collect();
    let mut seen = HashSet::new();
    requested
        .iter()
        .copied()
        .filter(|id| !found.contains(id) && seen.insert(*id))
        .collect()
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<TagRow> = tags::table
            .order(tags::id.asc())
            .select(TagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        tags::table
            .find(id.get())
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Tag::from))
            .map_err(diesel_error)
    }

    async fn list_ingredients(
        &self,
        name_prefix: Option<String>,
    ) -> Result<Vec<Ingredient>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = ingredients::table
            .order((ingredients::name.asc(), ingredients::id.asc()))
            .select(IngredientRow::as_select())
            .into_boxed();
        if let Some(prefix) = name_prefix {
            query = query.filter(ingredients::name.ilike(like_prefix(&prefix)));
        }

        let rows: Vec<IngredientRow> = query.load(&mut conn).await.map_err(diesel_error)?;
        Ok(rows.into_iter().map(Ingredient::from).collect())
    }

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        ingredients::table
            .find(id.get())
            .select(IngredientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Ingredient::from))
            .map_err(diesel_error)
    }

    async fn missing_ingredients(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, CatalogueRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let found: Vec<i64> = ingredients::table
            .filter(ingredients::id.eq_any(&raw))
            .select(ingredients::id)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(absent(&raw, &found)
            .into_iter()
            .map(IngredientId::new)
            .collect())
    }

    async fn missing_tags(&self, ids: &[TagId]) -> Result<Vec<TagId>, CatalogueRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let found: Vec<i64> = tags::table
            .filter(tags::id.eq_any(&raw))
            .select(tags::id)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(absent(&raw, &found).into_iter().map(TagId::new).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Sug", "Sug%")]
    #[case("100%", "100\\%%")]
    #[case("a_b", "a\\_b%")]
    fn prefix_metacharacters_are_escaped(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(like_prefix(raw), expected);
    }

    #[rstest]
    fn absent_ids_keep_request_order_without_repeats() {
        assert_eq!(absent(&[5, 3, 5, 1, 9], &[1, 9]), vec![5, 3]);
    }
}
