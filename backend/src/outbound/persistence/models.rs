//! Diesel row structs. Internal to the persistence layer; repositories
//! convert them into domain views before returning.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    Ingredient, IngredientId, PasswordHash, RecipeId, RecipeRecord, Tag, TagId, User, UserId,
};

use super::schema::{
    auth_tokens, favorites, follows, ingredients, recipe_ingredients, recipe_tags, recipes,
    shopping_cart, tags, users,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            email: row.email,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            is_admin: row.is_admin,
        }
    }
}

/// A user row together with its stored password hash, for credential checks.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialRow {
    #[diesel(embed)]
    pub user: UserRow,
    pub password_hash: String,
}

impl CredentialRow {
    pub fn password_hash(&self) -> PasswordHash {
        PasswordHash::new(self.password_hash.clone())
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password_hash: &'a str,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = auth_tokens)]
pub(crate) struct NewAuthTokenRow<'a> {
    pub digest: &'a str,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TagRow {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Self {
            id: TagId::new(row.id),
            name: row.name,
            color: row.color,
            slug: row.slug,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IngredientRow {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Self {
            id: IngredientId::new(row.id),
            name: row.name,
            measurement_unit: row.measurement_unit,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: i64,
    pub author_id: i64,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i16,
    pub pub_date: DateTime<Utc>,
}

impl From<RecipeRow> for RecipeRecord {
    fn from(row: RecipeRow) -> Self {
        Self {
            id: RecipeId::new(row.id),
            author_id: UserId::new(row.author_id),
            name: row.name,
            image: row.image,
            text: row.text,
            cooking_time: row.cooking_time,
            pub_date: row.pub_date,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = recipes)]
pub(crate) struct NewRecipeRow<'a> {
    pub author_id: i64,
    pub name: &'a str,
    pub image: &'a str,
    pub text: &'a str,
    pub cooking_time: i16,
    pub pub_date: DateTime<Utc>,
}

/// Scalar columns rewritten on update. `image` is skipped when `None`;
/// `pub_date` is never touched.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = recipes)]
pub(crate) struct RecipeChangeset<'a> {
    pub name: &'a str,
    pub image: Option<&'a str>,
    pub text: &'a str,
    pub cooking_time: i16,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = recipe_ingredients)]
pub(crate) struct NewRecipeIngredientRow {
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub amount: i16,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = recipe_tags)]
pub(crate) struct NewRecipeTagRow {
    pub recipe_id: i64,
    pub tag_id: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = follows)]
pub(crate) struct NewFollowRow {
    pub user_id: i64,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = favorites)]
pub(crate) struct NewFavoriteRow {
    pub user_id: i64,
    pub recipe_id: i64,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = shopping_cart)]
pub(crate) struct NewCartRow {
    pub user_id: i64,
    pub recipe_id: i64,
    pub added_at: DateTime<Utc>,
}
