//! Driving port for account mutations: registration and password changes.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{Actor, Error, NewUser, User};

/// Password change request.
#[derive(Debug, Clone)]
pub struct PasswordChange {
    pub current_password: Zeroizing<String>,
    pub new_password: Zeroizing<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Store a new account. A taken email or username is a field error.
    async fn register(&self, user: NewUser) -> Result<User, Error>;

    /// Replace the actor's password after checking the current one.
    async fn set_password(&self, actor: &Actor, change: PasswordChange) -> Result<(), Error>;
}
