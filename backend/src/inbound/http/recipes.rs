//! Recipe endpoints, including the favourite and shopping cart toggles.
//!
//! ```text
//! GET    /api/recipes/?tags=lunch&tags=dinner&author=2&is_favorited=1
//! POST   /api/recipes/
//! GET    /api/recipes/download_shopping_cart/
//! GET    /api/recipes/{id}/
//! PUT    /api/recipes/{id}/                  (PATCH behaves the same)
//! DELETE /api/recipes/{id}/
//! GET    /api/recipes/{id}/favorite/         (POST is accepted too)
//! DELETE /api/recipes/{id}/favorite/
//! GET    /api/recipes/{id}/shopping_cart/    (POST is accepted too)
//! DELETE /api/recipes/{id}/shopping_cart/
//! ```

use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, delete, get, post, route, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, RecipeId, RecipeInput, RecipeListKind, RecipeListQuery, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::context::RequestContext;
use crate::inbound::http::pagination::{page_request, paginate};
use crate::inbound::http::responses::{PageSchema, RecipeResponse, RecipeSummaryResponse};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, all_values, last_value, parse_flag, parse_id, query_pairs,
};

const TAGS: FieldName = FieldName::new("tags");
const AUTHOR: FieldName = FieldName::new("author");
const IS_FAVORITED: FieldName = FieldName::new("is_favorited");
const IS_IN_SHOPPING_CART: FieldName = FieldName::new("is_in_shopping_cart");

/// File name offered for the shopping list download.
pub const SHOPPING_LIST_FILENAME: &str = "wishlist.txt";

/// `{id, amount}` entry of a recipe write body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IngredientAmountRequest {
    #[schema(example = 3)]
    pub id: i64,
    #[schema(example = 2)]
    pub amount: i64,
}

/// Body of recipe create and update requests.
///
/// `image` may be omitted on update to keep the current one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RecipeRequest {
    pub ingredients: Vec<IngredientAmountRequest>,
    #[schema(example = json!([1, 2]))]
    pub tags: Vec<i64>,
    #[schema(example = "recipes/images/omelette.png")]
    pub image: Option<String>,
    #[schema(example = "Omelette")]
    pub name: String,
    #[schema(example = "Whisk the eggs and fry.")]
    pub text: String,
    #[schema(example = 10)]
    pub cooking_time: i64,
}

impl From<RecipeRequest> for RecipeInput {
    fn from(value: RecipeRequest) -> Self {
        Self {
            name: value.name,
            text: value.text,
            image: value.image,
            cooking_time: value.cooking_time,
            ingredients: value
                .ingredients
                .into_iter()
                .map(|line| (line.id, line.amount))
                .collect(),
            tags: value.tags,
        }
    }
}

/// Parse the recipe list filters from a raw query string.
///
/// Unknown keys, including `page` and `limit`, are ignored here.
pub(crate) fn recipe_list_query(query: &str) -> Result<RecipeListQuery, Error> {
    let pairs = query_pairs(query);
    let tags = all_values(&pairs, TAGS)
        .into_iter()
        .filter(|slug| !slug.is_empty())
        .collect();
    let author = last_value(&pairs, AUTHOR)
        .map(|raw| parse_id(raw, AUTHOR).map(UserId::new))
        .transpose()?;
    let flag = |field| {
        last_value(&pairs, field)
            .map(|raw| parse_flag(raw, field))
            .transpose()
            .map(Option::unwrap_or_default)
    };
    Ok(RecipeListQuery {
        tags,
        author,
        is_favorited: flag(IS_FAVORITED)?,
        is_in_shopping_cart: flag(IS_IN_SHOPPING_CART)?,
    })
}

#[utoipa::path(
    get,
    path = "/api/recipes/",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size, at most 100"),
        ("tags" = Option<Vec<String>>, Query, description = "Tag slugs, repeatable; any match"),
        ("author" = Option<i64>, Query, description = "Author id"),
        ("is_favorited" = Option<u8>, Query, description = "1 to list the caller's favourites"),
        ("is_in_shopping_cart" = Option<u8>, Query, description = "1 to list the caller's cart")
    ),
    responses(
        (status = 200, description = "Recipes ordered by name, then publication date", body = PageSchema<RecipeResponse>),
        (status = 400, description = "Malformed filter", body = ErrorSchema),
        (status = 404, description = "Page past the end", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes"
)]
#[get("/recipes/")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    context: RequestContext,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let page = page_request(&req, state.page_size)?;
    let query = recipe_list_query(req.query_string())?;
    let listing = state
        .recipes_query
        .list_recipes(context.viewer(), query, page)
        .await?;
    let body = paginate(&req, &page, listing, RecipeResponse::from)?;
    Ok(HttpResponse::Ok().json(body))
}

#[utoipa::path(
    post,
    path = "/api/recipes/",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe",
    security(("Token" = []))
)]
#[post("/recipes/")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    context: RequestContext,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let actor = context.require_actor()?;
    let detail = state
        .recipes
        .create(actor, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(RecipeResponse::from(detail)))
}

#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart/",
    responses(
        (status = 200, description = "One `name - total unit` line per ingredient", content_type = "text/plain", body = String),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["shopping_cart"],
    operation_id = "downloadShoppingCart",
    security(("Token" = []))
)]
#[get("/recipes/download_shopping_cart/")]
pub async fn download_shopping_cart(
    state: web::Data<HttpState>,
    context: RequestContext,
) -> ApiResult<HttpResponse> {
    let actor = context.require_actor()?;
    let list = state.shopping_list.shopping_list(actor).await?;
    Ok(HttpResponse::Ok()
        .content_type(header::ContentType::plaintext())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(SHOPPING_LIST_FILENAME.to_owned())],
        })
        .body(list.render()))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = RecipeResponse),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe"
)]
#[get("/recipes/{id}/")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    context: RequestContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = RecipeId::new(path.into_inner());
    let detail = state.recipes_query.recipe(context.viewer(), id).await?;
    Ok(HttpResponse::Ok().json(RecipeResponse::from(detail)))
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe replaced", body = RecipeResponse),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe",
    security(("Token" = []))
)]
#[route("/recipes/{id}/", method = "PUT", method = "PATCH")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    context: RequestContext,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let actor = context.require_actor()?;
    let id = RecipeId::new(path.into_inner());
    let detail = state
        .recipes
        .update(actor, id, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(RecipeResponse::from(detail)))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe",
    security(("Token" = []))
)]
#[delete("/recipes/{id}/")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    context: RequestContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let actor = context.require_actor()?;
    state
        .recipes
        .delete(actor, RecipeId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn add_to_list(
    state: &HttpState,
    context: &RequestContext,
    kind: RecipeListKind,
    id: i64,
) -> ApiResult<HttpResponse> {
    let actor = context.require_actor()?;
    let summary = state
        .relationships
        .add_recipe(actor, kind, RecipeId::new(id))
        .await?;
    Ok(HttpResponse::Created().json(RecipeSummaryResponse::from(summary)))
}

async fn remove_from_list(
    state: &HttpState,
    context: &RequestContext,
    kind: RecipeListKind,
    id: i64,
) -> ApiResult<HttpResponse> {
    let actor = context.require_actor()?;
    state
        .relationships
        .remove_recipe(actor, kind, RecipeId::new(id))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added to favourites", body = RecipeSummaryResponse),
        (status = 400, description = "Already a favourite", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["favorites"],
    operation_id = "addFavorite",
    security(("Token" = []))
)]
#[route("/recipes/{id}/favorite/", method = "GET", method = "POST")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    context: RequestContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    add_to_list(&state, &context, RecipeListKind::Favorites, path.into_inner()).await
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed from favourites"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not a favourite", body = ErrorSchema)
    ),
    tags = ["favorites"],
    operation_id = "removeFavorite",
    security(("Token" = []))
)]
#[delete("/recipes/{id}/favorite/")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    context: RequestContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    remove_from_list(&state, &context, RecipeListKind::Favorites, path.into_inner()).await
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping_cart/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added to the shopping cart", body = RecipeSummaryResponse),
        (status = 400, description = "Already in the cart", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["shopping_cart"],
    operation_id = "addToShoppingCart",
    security(("Token" = []))
)]
#[route("/recipes/{id}/shopping_cart/", method = "GET", method = "POST")]
pub async fn add_to_shopping_cart(
    state: web::Data<HttpState>,
    context: RequestContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    add_to_list(
        &state,
        &context,
        RecipeListKind::ShoppingCart,
        path.into_inner(),
    )
    .await
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping_cart/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed from the shopping cart"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not in the cart", body = ErrorSchema)
    ),
    tags = ["shopping_cart"],
    operation_id = "removeFromShoppingCart",
    security(("Token" = []))
)]
#[delete("/recipes/{id}/shopping_cart/")]
pub async fn remove_from_shopping_cart(
    state: web::Data<HttpState>,
    context: RequestContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    remove_from_list(
        &state,
        &context,
        RecipeListKind::ShoppingCart,
        path.into_inner(),
    )
    .await
}

#[cfg(test)]
#[path = "recipes_tests.rs"]
mod tests;
