//! HTTP inbound adapter exposing the REST API.
//!
//! Handlers translate requests into driving-port calls and domain views into
//! response DTOs. They never touch persistence directly.

pub mod auth;
pub mod catalogue;
pub mod context;
pub mod error;
pub mod health;
mod pagination;
pub mod recipes;
pub mod responses;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
mod validation;

pub use error::ApiResult;

use actix_web::{Scope, web};

/// Every REST endpoint under `/api`.
///
/// Literal segments such as `/users/me/` and
/// `/recipes/download_shopping_cart/` are registered ahead of the `{id}`
/// routes they would otherwise collide with.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .service(auth::login)
        .service(auth::logout)
        .service(users::register)
        .service(users::list_users)
        .service(users::me)
        .service(users::set_password)
        .service(users::subscriptions)
        .service(users::profile)
        .service(users::subscribe)
        .service(users::unsubscribe)
        .service(catalogue::list_tags)
        .service(catalogue::get_tag)
        .service(catalogue::list_ingredients)
        .service(catalogue::get_ingredient)
        .service(recipes::list_recipes)
        .service(recipes::create_recipe)
        .service(recipes::download_shopping_cart)
        .service(recipes::get_recipe)
        .service(recipes::update_recipe)
        .service(recipes::delete_recipe)
        .service(recipes::add_favorite)
        .service(recipes::remove_favorite)
        .service(recipes::add_to_shopping_cart)
        .service(recipes::remove_from_shopping_cart)
}
