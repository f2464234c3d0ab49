//! PostgreSQL-backed `AuthTokenRepository`.
//!
//! Rows are keyed by the token digest, so a lookup is a primary-key probe
//! joined to `users` for the admin flag.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AuthTokenRepository, AuthTokenRepositoryError};
use crate::domain::{Actor, TokenDigest, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::NewAuthTokenRow;
use super::pool::{DbPool, PoolError};
use super::schema::{auth_tokens, users};

/// Diesel implementation of [`AuthTokenRepository`].
#[derive(Clone)]
pub struct DieselAuthTokenRepository {
    pool: DbPool,
}

impl DieselAuthTokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> AuthTokenRepositoryError {
    map_pool_error(error, AuthTokenRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> AuthTokenRepositoryError {
    map_diesel_error(
        error,
        AuthTokenRepositoryError::query,
        AuthTokenRepositoryError::connection,
    )
}

#[async_trait]
impl AuthTokenRepository for DieselAuthTokenRepository {
    async fn store(
        &self,
        user_id: UserId,
        digest: &TokenDigest,
        issued_at: DateTime<Utc>,
    ) -> Result<(), AuthTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(auth_tokens::table)
            .values(&NewAuthTokenRow {
                digest: digest.as_str(),
                user_id: user_id.get(),
                created_at: issued_at,
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn find_actor(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<Actor>, AuthTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<(i64, bool)> = auth_tokens::table
            .inner_join(users::table)
            .filter(auth_tokens::digest.eq(digest.as_str()))
            .select((users::id, users::is_admin))
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        Ok(row.map(|(id, is_admin)| Actor {
            user_id: UserId::new(id),
            is_admin,
        }))
    }

    async fn revoke(&self, digest: &TokenDigest) -> Result<bool, AuthTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(auth_tokens::table.find(digest.as_str()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }
}
