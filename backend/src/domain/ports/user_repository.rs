//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{PasswordHash, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique column already holds the submitted value.
        DuplicateField { field: String } => "a user with that {field} already exists",
    }
}

/// Columns written when a user registers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: PasswordHash,
}

/// User together with the stored password hash, for credential checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: PasswordHash,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return it with its assigned identifier.
    ///
    /// A taken email or username yields
    /// [`UserPersistenceError::DuplicateField`] naming the column.
    async fn create(&self, user: &NewUserRecord) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user and password hash by login email.
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Fetch the password hash of a user.
    async fn find_password_hash(
        &self,
        id: UserId,
    ) -> Result<Option<PasswordHash>, UserPersistenceError>;

    /// Replace the password hash of a user.
    async fn update_password_hash(
        &self,
        id: UserId,
        hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError>;

    /// One page of users ordered by username, plus the total user count.
    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), UserPersistenceError>;
}
