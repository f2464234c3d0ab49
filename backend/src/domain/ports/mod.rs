//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`]) are implemented by
//! outbound adapters. Driving ports (`*Command`, `*Query`, [`LoginService`])
//! are implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod auth_token_repository;
mod catalogue_query;
mod catalogue_repository;
mod login_service;
mod password_hasher;
mod readiness_probe;
mod recipe_command;
mod recipe_query;
mod recipe_repository;
mod relationship_command;
mod relationship_repository;
mod shopping_list_query;
mod subscriptions_query;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{AccountCommand, PasswordChange};
#[cfg(test)]
pub use auth_token_repository::MockAuthTokenRepository;
pub use auth_token_repository::{AuthTokenRepository, AuthTokenRepositoryError};
pub use catalogue_query::CatalogueQuery;
#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{CatalogueRepository, CatalogueRepositoryError};
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use readiness_probe::MockReadinessProbe;
pub use readiness_probe::{ReadinessProbe, ReadinessProbeError};
#[cfg(test)]
pub use recipe_command::MockRecipeCommand;
pub use recipe_command::RecipeCommand;
#[cfg(test)]
pub use recipe_query::MockRecipeQuery;
pub use recipe_query::RecipeQuery;
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{RecipeRepository, RecipeRepositoryError};
#[cfg(test)]
pub use relationship_command::MockRelationshipCommand;
pub use relationship_command::RelationshipCommand;
#[cfg(test)]
pub use relationship_repository::MockRelationshipRepository;
pub use relationship_repository::{RelationshipRepository, RelationshipRepositoryError};
#[cfg(test)]
pub use shopping_list_query::MockShoppingListQuery;
pub use shopping_list_query::ShoppingListQuery;
#[cfg(test)]
pub use subscriptions_query::MockSubscriptionsQuery;
pub use subscriptions_query::SubscriptionsQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{
    NewUserRecord, StoredCredentials, UserPersistenceError, UserRepository,
};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
