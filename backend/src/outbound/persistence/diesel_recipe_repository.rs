//! PostgreSQL-backed `RecipeRepository`.
//!
//! Creates and updates run in one transaction: the recipe row, then the
//! ingredient lines, then the tag links. Updates delete the previous lines
//! and links before inserting the new set, so a concurrent reader sees
//! either the old composition or the new one.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use pagination::PageRequest;
use tracing::debug;

use crate::domain::ports::{RecipeRepository, RecipeRepositoryError};
use crate::domain::{
    Ingredient, RecipeDraft, RecipeFilter, RecipeId, RecipeIngredientLine, RecipeRecord, Tag,
    UserId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::diesel_helpers::{page_window, row_count};
use super::models::{
    IngredientRow, NewRecipeIngredientRow, NewRecipeRow, NewRecipeTagRow, RecipeChangeset,
    RecipeRow, TagRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_cart, tags,
};

/// Diesel implementation of [`RecipeRepository`].
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> RecipeRepositoryError {
    map_pool_error(error, RecipeRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> RecipeRepositoryError {
    map_diesel_error(
        error,
        RecipeRepositoryError::query,
        RecipeRepositoryError::connection,
    )
}

/// Recipes matching `filter`, without ordering or paging applied.
fn filtered(filter: &RecipeFilter) -> recipes::BoxedQuery<'static, Pg> {
    let mut query = recipes::table.into_boxed();
    if let Some(author) = filter.author {
        query = query.filter(recipes::author_id.eq(author.get()));
    }
    if !filter.tags.is_empty() {
        let tagged = recipe_tags::table
            .inner_join(tags::table)
            .filter(tags::slug.eq_any(filter.tags.clone()))
            .select(recipe_tags::recipe_id);
        query = query.filter(recipes::id.eq_any(tagged));
    }
    if let Some(user) = filter.favorited_by {
        let favourites = favorites::table
            .filter(favorites::user_id.eq(user.get()))
            .select(favorites::recipe_id);
        query = query.filter(recipes::id.eq_any(favourites));
    }
    if let Some(user) = filter.in_cart_of {
        let cart = shopping_cart::table
            .filter(shopping_cart::user_id.eq(user.get()))
            .select(shopping_cart::recipe_id);
        query = query.filter(recipes::id.eq_any(cart));
    }
    query
}

/// Insert ingredient lines and tag links for a freshly written recipe row.
async fn insert_composition(
    conn: &mut AsyncPgConnection,
    recipe_id: i64,
    lines: &[NewRecipeIngredientRow],
    links: &[NewRecipeTagRow],
) -> Result<(), diesel::result::Error> {
    diesel::insert_into(recipe_ingredients::table)
        .values(lines)
        .execute(conn)
        .await?;
    if !links.is_empty() {
        diesel::insert_into(recipe_tags::table)
            .values(links)
            .execute(conn)
            .await?;
    }
    debug!(
        recipe_id,
        ingredients = lines.len(),
        tags = links.len(),
        "recipe composition written"
    );
    Ok(())
}

fn composition(
    recipe_id: i64,
    draft: &RecipeDraft,
) -> (Vec<NewRecipeIngredientRow>, Vec<NewRecipeTagRow>) {
    let lines = draft
        .ingredients()
        .iter()
        .map(|line| NewRecipeIngredientRow {
            recipe_id,
            ingredient_id: line.ingredient_id.get(),
            amount: line.amount,
        })
        .collect();
    let links = draft
        .tags()
        .iter()
        .map(|tag| NewRecipeTagRow {
            recipe_id,
            tag_id: tag.get(),
        })
        .collect();
    (lines, links)
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn create(
        &self,
        author_id: UserId,
        draft: &RecipeDraft,
        pub_date: DateTime<Utc>,
    ) -> Result<RecipeRecord, RecipeRepositoryError> {
        let image = draft
            .image()
            .ok_or_else(|| RecipeRepositoryError::query("a new recipe needs an image"))?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = conn
            .transaction::<RecipeRow, diesel::result::Error, _>(|conn| {
                async move {
                    let row = diesel::insert_into(recipes::table)
                        .values(&NewRecipeRow {
                            author_id: author_id.get(),
                            name: draft.name(),
                            image,
                            text: draft.text(),
                            cooking_time: draft.cooking_time(),
                            pub_date,
                        })
                        .returning(RecipeRow::as_returning())
                        .get_result(conn)
                        .await?;
                    let (lines, links) = composition(row.id, draft);
                    insert_composition(conn, row.id, &lines, &links).await?;
                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(diesel_error)?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<RecipeRecord, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let recipe_id = id.get();

        let row = conn
            .transaction::<Option<RecipeRow>, diesel::result::Error, _>(|conn| {
                async move {
                    let Some(row) = diesel::update(recipes::table.find(recipe_id))
                        .set(&RecipeChangeset {
                            name: draft.name(),
                            image: draft.image(),
                            text: draft.text(),
                            cooking_time: draft.cooking_time(),
                        })
                        .returning(RecipeRow::as_returning())
                        .get_result(conn)
                        .await
                        .optional()?
                    else {
                        return Ok(None);
                    };
                    diesel::delete(
                        recipe_ingredients::table
                            .filter(recipe_ingredients::recipe_id.eq(recipe_id)),
                    )
                    .execute(conn)
                    .await?;
                    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
                        .execute(conn)
                        .await?;
                    let (lines, links) = composition(recipe_id, draft);
                    insert_composition(conn, recipe_id, &lines, &links).await?;
                    Ok(Some(row))
                }
                .scope_boxed()
            })
            .await
            .map_err(diesel_error)?;

        row.map(RecipeRecord::from)
            .ok_or_else(|| RecipeRepositoryError::not_found(recipe_id))
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(recipes::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }

    async fn find(&self, id: RecipeId) -> Result<Option<RecipeRecord>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        recipes::table
            .find(id.get())
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(RecipeRecord::from))
            .map_err(diesel_error)
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<(Vec<RecipeRecord>, u64), RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let (limit, offset) = page_window(page);

        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        let rows: Vec<RecipeRow> = filtered(filter)
            .order((
                recipes::name.asc(),
                recipes::pub_date.asc(),
                recipes::id.asc(),
            ))
            .limit(limit)
            .offset(offset)
            .select(RecipeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok((
            rows.into_iter().map(RecipeRecord::from).collect(),
            row_count(total),
        ))
    }

    async fn ingredient_lines(
        &self,
        id: RecipeId,
    ) -> Result<Vec<RecipeIngredientLine>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<(IngredientRow, i16)> = recipe_ingredients::table
            .inner_join(ingredients::table)
            .filter(recipe_ingredients::recipe_id.eq(id.get()))
            .order(recipe_ingredients::id.asc())
            .select((IngredientRow::as_select(), recipe_ingredients::amount))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|(ingredient, amount)| RecipeIngredientLine {
                ingredient: Ingredient::from(ingredient),
                amount,
            })
            .collect())
    }

    async fn tags(&self, id: RecipeId) -> Result<Vec<Tag>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<TagRow> = recipe_tags::table
            .inner_join(tags::table)
            .filter(recipe_tags::recipe_id.eq(id.get()))
            .order(tags::id.asc())
            .select(TagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn by_author(
        &self,
        author_id: UserId,
        limit: u32,
    ) -> Result<Vec<RecipeRecord>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<RecipeRow> = recipes::table
            .filter(recipes::author_id.eq(author_id.get()))
            .order((
                recipes::name.asc(),
                recipes::pub_date.asc(),
                recipes::id.asc(),
            ))
            .limit(i64::from(limit))
            .select(RecipeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(RecipeRecord::from).collect())
    }

    async fn count_by_author(&self, author_id: UserId) -> Result<u64, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let total: i64 = recipes::table
            .filter(recipes::author_id.eq(author_id.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(row_count(total))
    }
}
