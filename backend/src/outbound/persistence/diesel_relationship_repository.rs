//! PostgreSQL-backed `RelationshipRepository` covering favourites, cart
//! entries and follows.
//!
//! Every pair table has a composite primary key. A duplicate insert that
//! slipped past the service's existence check trips that key and is
//! reported as [`RelationshipRepositoryError::AlreadyExists`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{RelationshipRepository, RelationshipRepositoryError};
use crate::domain::{CartIngredientRow, RecipeId, RecipeListKind, User, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, unique_violation};
use super::diesel_helpers::{page_window, row_count};
use super::models::{NewCartRow, NewFavoriteRow, NewFollowRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{favorites, follows, ingredients, recipe_ingredients, shopping_cart, users};

/// Diesel implementation of [`RelationshipRepository`].
#[derive(Clone)]
pub struct DieselRelationshipRepository {
    pool: DbPool,
}

impl DieselRelationshipRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> RelationshipRepositoryError {
    map_pool_error(error, RelationshipRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> RelationshipRepositoryError {
    if unique_violation(&error).is_some() {
        return RelationshipRepositoryError::already_exists();
    }
    map_diesel_error(
        error,
        RelationshipRepositoryError::query,
        RelationshipRepositoryError::connection,
    )
}

#[async_trait]
impl RelationshipRepository for DieselRelationshipRepository {
    async fn add_recipe(
        &self,
        kind: RecipeListKind,
        user_id: UserId,
        recipe_id: RecipeId,
        added_at: DateTime<Utc>,
    ) -> Result<(), RelationshipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let (user_id, recipe_id) = (user_id.get(), recipe_id.get());
        let inserted = match kind {
            RecipeListKind::Favorites => {
                diesel::insert_into(favorites::table)
                    .values(&NewFavoriteRow {
                        user_id,
                        recipe_id,
                        added_at,
                    })
                    .execute(&mut conn)
                    .await
            }
            RecipeListKind::ShoppingCart => {
                diesel::insert_into(shopping_cart::table)
                    .values(&NewCartRow {
                        user_id,
                        recipe_id,
                        added_at,
                    })
                    .execute(&mut conn)
                    .await
            }
        };
        inserted.map(|_| ()).map_err(diesel_error)
    }

    async fn remove_recipe(
        &self,
        kind: RecipeListKind,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<bool, RelationshipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let key = (user_id.get(), recipe_id.get());
        let deleted = match kind {
            RecipeListKind::Favorites => {
                diesel::delete(favorites::table.find(key))
                    .execute(&mut conn)
                    .await
            }
            RecipeListKind::ShoppingCart => {
                diesel::delete(shopping_cart::table.find(key))
                    .execute(&mut conn)
                    .await
            }
        };
        deleted.map(|rows| rows > 0).map_err(diesel_error)
    }

    async fn has_recipe(
        &self,
        kind: RecipeListKind,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<bool, RelationshipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let key = (user_id.get(), recipe_id.get());
        let found = match kind {
            RecipeListKind::Favorites => {
                diesel::select(diesel::dsl::exists(favorites::table.find(key)))
                    .get_result::<bool>(&mut conn)
                    .await
            }
            RecipeListKind::ShoppingCart => {
                diesel::select(diesel::dsl::exists(shopping_cart::table.find(key)))
                    .get_result::<bool>(&mut conn)
                    .await
            }
        };
        found.map_err(diesel_error)
    }

    async fn follow(
        &self,
        user_id: UserId,
        author_id: UserId,
        followed_at: DateTime<Utc>,
    ) -> Result<(), RelationshipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(follows::table)
            .values(&NewFollowRow {
                user_id: user_id.get(),
                author_id: author_id.get(),
                created_at: followed_at,
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn unfollow(
        &self,
        user_id: UserId,
        author_id: UserId,
    ) -> Result<bool, RelationshipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::delete(follows::table.find((user_id.get(), author_id.get())))
            .execute(&mut conn)
            .await
            .map(|rows| rows > 0)
            .map_err(diesel_error)
    }

    async fn is_following(
        &self,
        user_id: UserId,
        author_id: UserId,
    ) -> Result<bool, RelationshipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::select(diesel::dsl::exists(
            follows::table.find((user_id.get(), author_id.get())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(diesel_error)
    }

    async fn followed_authors(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), RelationshipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let (limit, offset) = page_window(page);

        let total: i64 = follows::table
            .filter(follows::user_id.eq(user_id.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        let rows: Vec<UserRow> = users::table
            .inner_join(follows::table.on(follows::author_id.eq(users::id)))
            .filter(follows::user_id.eq(user_id.get()))
            .order((follows::created_at.desc(), users::id.asc()))
            .limit(limit)
            .offset(offset)
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok((rows.into_iter().map(User::from).collect(), row_count(total)))
    }

    async fn cart_ingredients(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CartIngredientRow>, RelationshipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<(String, String, i16)> = shopping_cart::table
            .inner_join(
                recipe_ingredients::table
                    .on(recipe_ingredients::recipe_id.eq(shopping_cart::recipe_id)),
            )
            .inner_join(ingredients::table.on(ingredients::id.eq(recipe_ingredients::ingredient_id)))
            .filter(shopping_cart::user_id.eq(user_id.get()))
            .order((
                shopping_cart::added_at.asc(),
                shopping_cart::recipe_id.asc(),
                recipe_ingredients::id.asc(),
            ))
            .select((
                ingredients::name,
                ingredients::measurement_unit,
                recipe_ingredients::amount,
            ))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|(name, measurement_unit, amount)| CartIngredientRow {
                name,
                measurement_unit,
                amount,
            })
            .collect())
    }
}
