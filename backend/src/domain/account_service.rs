//! Account domain services.
//!
//! [`AccountService`] implements registration, token login and logout,
//! request authentication, password changes and the public user listing.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::PageRequest;
use tracing::info;

use crate::domain::ports::{
    AccountCommand, AuthTokenRepository, LoginService, NewUserRecord, PasswordChange,
    PasswordHasher, RelationshipRepository, UserRepository, UsersQuery,
};
use crate::domain::relationship_service::profile_for;
use crate::domain::repository_errors::{
    map_hasher_error, map_relationship_error, map_token_error, map_user_error,
};
use crate::domain::{
    Actor, AuthToken, Error, Listing, LoginCredentials, NewUser, Password, User, UserId,
    UserProfile,
};

const INVALID_CREDENTIALS: &str = "unable to log in with provided credentials";

/// Account service implementing the login, account and user-listing ports.
#[derive(Clone)]
pub struct AccountService<U, T, H, R> {
    users: Arc<U>,
    tokens: Arc<T>,
    hasher: Arc<H>,
    relationships: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<U, T, H, R> AccountService<U, T, H, R> {
    /// Create a new service with the given collaborators.
    pub fn new(
        users: Arc<U>,
        tokens: Arc<T>,
        hasher: Arc<H>,
        relationships: Arc<R>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            tokens,
            hasher,
            relationships,
            clock,
        }
    }
}

fn invalid_credentials() -> Error {
    Error::field("non_field_errors", "invalid_credentials", INVALID_CREDENTIALS)
}

impl<U, T, H, R> AccountService<U, T, H, R>
where
    U: UserRepository,
    T: AuthTokenRepository,
    H: PasswordHasher,
    R: RelationshipRepository,
{
    async fn decorate(&self, viewer: Option<UserId>, user: User) -> Result<UserProfile, Error> {
        profile_for(self.relationships.as_ref(), viewer, user)
            .await
            .map_err(map_relationship_error)
    }
}

#[async_trait]
impl<U, T, H, R> LoginService for AccountService<U, T, H, R>
where
    U: UserRepository,
    T: AuthTokenRepository,
    H: PasswordHasher,
    R: RelationshipRepository,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthToken, Error> {
        let Some(stored) = self
            .users
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            return Err(invalid_credentials());
        };

        let verified = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .map_err(map_hasher_error)?;
        if !verified {
            return Err(invalid_credentials());
        }

        let token = AuthToken::generate(&mut rand::thread_rng());
        self.tokens
            .store(stored.user.id, &token.digest(), self.clock.utc())
            .await
            .map_err(map_token_error)?;
        info!(user_id = %stored.user.id, "issued api token");
        Ok(token)
    }

    async fn logout(&self, token: &AuthToken) -> Result<(), Error> {
        let revoked = self
            .tokens
            .revoke(&token.digest())
            .await
            .map_err(map_token_error)?;
        if revoked {
            Ok(())
        } else {
            Err(Error::unauthorized("invalid token"))
        }
    }

    async fn authenticate(&self, token: &AuthToken) -> Result<Actor, Error> {
        self.tokens
            .find_actor(&token.digest())
            .await
            .map_err(map_token_error)?
            .ok_or_else(|| Error::unauthorized("invalid token"))
    }
}

#[async_trait]
impl<U, T, H, R> AccountCommand for AccountService<U, T, H, R>
where
    U: UserRepository,
    T: AuthTokenRepository,
    H: PasswordHasher,
    R: RelationshipRepository,
{
    async fn register(&self, user: NewUser) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(user.password())
            .map_err(map_hasher_error)?;
        let record = NewUserRecord {
            email: user.email().as_str().to_owned(),
            username: user.username().as_str().to_owned(),
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().to_owned(),
            password_hash,
        };
        let created = self.users.create(&record).await.map_err(map_user_error)?;
        info!(user_id = %created.id, "registered user");
        Ok(created)
    }

    async fn set_password(&self, actor: &Actor, change: PasswordChange) -> Result<(), Error> {
        let stored = self
            .users
            .find_password_hash(actor.user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("account no longer exists"))?;

        let verified = self
            .hasher
            .verify(change.current_password.as_str(), &stored)
            .map_err(map_hasher_error)?;
        if !verified {
            return Err(Error::field(
                "current_password",
                "invalid_password",
                "current password is incorrect",
            ));
        }

        let new_password = Password::new(change.new_password.as_str())
            .map_err(|err| Error::field("new_password", err.code(), err.to_string()))?;
        let hash = self
            .hasher
            .hash(&new_password)
            .map_err(map_hasher_error)?;
        self.users
            .update_password_hash(actor.user_id, &hash)
            .await
            .map_err(map_user_error)?;
        info!(user_id = %actor.user_id, "password changed");
        Ok(())
    }
}

#[async_trait]
impl<U, T, H, R> UsersQuery for AccountService<U, T, H, R>
where
    U: UserRepository,
    T: AuthTokenRepository,
    H: PasswordHasher,
    R: RelationshipRepository,
{
    async fn list_users(
        &self,
        viewer: Option<UserId>,
        page: PageRequest,
    ) -> Result<Listing<UserProfile>, Error> {
        let (users, count) = self.users.list(page).await.map_err(map_user_error)?;
        let listing = Listing::new(users, count).within(&page)?;

        let mut profiles = Vec::with_capacity(listing.items.len());
        for user in listing.items {
            profiles.push(self.decorate(viewer, user).await?);
        }
        Ok(Listing::new(profiles, listing.count))
    }

    async fn profile(&self, viewer: Option<UserId>, id: UserId) -> Result<UserProfile, Error> {
        let user = self
            .users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))?;
        self.decorate(viewer, user).await
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
