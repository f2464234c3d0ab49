//! PostgreSQL persistence adapters built on Diesel.
//!
//! Repositories are thin translators between Diesel rows (`models.rs`,
//! `schema.rs`, both private) and domain views. They hold a [`DbPool`] and
//! map every pool or Diesel failure into their port's error enum.
//!
//! ```ignore
//! use foodgram::outbound::persistence::{DbPool, DieselRecipeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/foodgram")).await?;
//! let recipes = DieselRecipeRepository::new(pool.clone());
//! ```

mod diesel_auth_token_repository;
mod diesel_catalogue_repository;
mod diesel_error_mapping;
mod diesel_helpers;
mod diesel_recipe_repository;
mod diesel_relationship_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_auth_token_repository::DieselAuthTokenRepository;
pub use diesel_catalogue_repository::DieselCatalogueRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_relationship_repository::DieselRelationshipRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::run_pending_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
