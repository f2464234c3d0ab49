//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, the ports that separate them, and the services that
//! implement the use-cases. Keep types immutable and document invariants in
//! each type's Rustdoc.
//!
//! Public surface:
//! - `Error` and `ErrorCode`: the API error payload and its stable code.
//! - `User`, `Tag`, `Ingredient`, `RecipeDetail` and friends: domain views.
//! - `ShoppingList`: aggregated cart ingredients.
//! - `AccountService`, `CatalogueService`, `RecipeService` and
//!   `RelationshipService`: driving-port implementations.

pub mod account_service;
pub mod auth;
pub mod catalogue;
pub mod catalogue_service;
pub mod error;
pub mod listing;
pub mod ports;
pub mod recipe;
pub mod recipe_service;
pub mod relationship;
pub mod relationship_service;
mod repository_errors;
pub mod shopping_list;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    Actor, AuthToken, LoginCredentials, LoginValidationError, Password, PasswordHash,
    PasswordValidationError, TokenDigest,
};
pub use self::catalogue::{Ingredient, IngredientId, Tag, TagId};
pub use self::catalogue_service::CatalogueService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::listing::{Listing, page_error};
pub use self::recipe::{
    IngredientAmount, RecipeDetail, RecipeDraft, RecipeFilter, RecipeId, RecipeIngredientLine,
    RecipeInput, RecipeListQuery, RecipeRecord, RecipeSummary, RecipeValidationError,
};
pub use self::recipe_service::RecipeService;
pub use self::relationship::{FollowedAuthor, RecipeListKind};
pub use self::relationship_service::{DEFAULT_RECIPES_LIMIT, RelationshipService};
pub use self::shopping_list::{CartIngredientRow, ShoppingList, ShoppingListLine};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, NewUser, RegistrationDraft, User, UserId, UserProfile, UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use foodgram::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
