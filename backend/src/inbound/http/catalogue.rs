//! Tag and ingredient read endpoints.
//!
//! ```text
//! GET /api/tags/
//! GET /api/tags/{id}/
//! GET /api/ingredients/?name=<prefix>
//! GET /api/ingredients/{id}/
//! ```
//!
//! Reference data is small, so neither list is paginated.

use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{IngredientId, TagId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::responses::{IngredientResponse, TagResponse};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Query accepted by the ingredient list.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct IngredientSearch {
    /// Case-insensitive name prefix.
    #[param(example = "sal")]
    pub name: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/tags/",
    responses(
        (status = 200, description = "All tags", body = [TagResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "listTags"
)]
#[get("/tags/")]
pub async fn list_tags(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let tags = state.catalogue.tags().await?;
    let body: Vec<TagResponse> = tags.into_iter().map(TagResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[utoipa::path(
    get,
    path = "/api/tags/{id}/",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag", body = TagResponse),
        (status = 404, description = "Unknown tag", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "getTag"
)]
#[get("/tags/{id}/")]
pub async fn get_tag(state: web::Data<HttpState>, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let tag = state.catalogue.tag(TagId::new(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(TagResponse::from(tag)))
}

#[utoipa::path(
    get,
    path = "/api/ingredients/",
    params(IngredientSearch),
    responses(
        (status = 200, description = "Matching ingredients", body = [IngredientResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "listIngredients"
)]
#[get("/ingredients/")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    query: web::Query<IngredientSearch>,
) -> ApiResult<HttpResponse> {
    let prefix = query.into_inner().name.filter(|name| !name.is_empty());
    let ingredients = state.catalogue.ingredients(prefix).await?;
    let body: Vec<IngredientResponse> = ingredients
        .into_iter()
        .map(IngredientResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

#[utoipa::path(
    get,
    path = "/api/ingredients/{id}/",
    params(("id" = i64, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient", body = IngredientResponse),
        (status = 404, description = "Unknown ingredient", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "getIngredient"
)]
#[get("/ingredients/{id}/")]
pub async fn get_ingredient(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let ingredient = state
        .catalogue
        .ingredient(IngredientId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(IngredientResponse::from(ingredient)))
}
