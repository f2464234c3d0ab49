//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{NewUserRecord, StoredCredentials, UserPersistenceError, UserRepository};
use crate::domain::{PasswordHash, User, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, unique_violation};
use super::diesel_helpers::{page_window, row_count};
use super::models::{CredentialRow, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    if let Some(constraint) = unique_violation(&error) {
        let field = if constraint.contains("username") {
            "username"
        } else {
            "email"
        };
        return UserPersistenceError::duplicate_field(field);
    }
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUserRecord) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewUserRow {
            email: &user.email,
            username: &user.username,
            first_name: &user.first_name,
            last_name: &user.last_name,
            password_hash: user.password_hash.as_str(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(User::from)
            .map_err(diesel_error)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(User::from))
            .map_err(diesel_error)
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<CredentialRow> = users::table
            .filter(users::email.eq(email))
            .select(CredentialRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        Ok(row.map(|row| StoredCredentials {
            password_hash: row.password_hash(),
            user: row.user.into(),
        }))
    }

    async fn find_password_hash(
        &self,
        id: UserId,
    ) -> Result<Option<PasswordHash>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        users::table
            .find(id.get())
            .select(users::password_hash)
            .first::<String>(&mut conn)
            .await
            .optional()
            .map(|hash| hash.map(PasswordHash::new))
            .map_err(diesel_error)
    }

    async fn update_password_hash(
        &self,
        id: UserId,
        hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(users::table.find(id.get()))
            .set(users::password_hash.eq(hash.as_str()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        if updated == 0 {
            return Err(UserPersistenceError::query(format!("user {id} vanished")));
        }
        Ok(())
    }

    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let (limit, offset) = page_window(page);

        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        let rows: Vec<UserRow> = users::table
            .order((users::username.asc(), users::id.asc()))
            .limit(limit)
            .offset(offset)
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok((rows.into_iter().map(User::from).collect(), row_count(total)))
    }
}
