//! User, account and subscription endpoints.
//!
//! ```text
//! POST   /api/users/                      register
//! GET    /api/users/                      paginated profiles
//! GET    /api/users/me/
//! GET    /api/users/{id}/
//! POST   /api/users/set_password/
//! GET    /api/users/subscriptions/?recipes_limit=3
//! GET    /api/users/{id}/subscribe/       (POST is accepted too)
//! DELETE /api/users/{id}/subscribe/
//! ```
//!
//! `me`, `set_password` and `subscriptions` are registered ahead of the
//! `{id}` routes so they are not mistaken for ids.

use actix_web::{HttpRequest, HttpResponse, delete, get, post, route, web};
use serde::Deserialize;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::ports::PasswordChange;
use crate::domain::{Error, NewUser, RegistrationDraft, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::context::RequestContext;
use crate::inbound::http::pagination::{page_request, paginate};
use crate::inbound::http::responses::{
    FollowedAuthorResponse, PageSchema, RegisteredUserResponse, UserResponse,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, last_value, parse_limit, query_pairs};

const RECIPES_LIMIT: FieldName = FieldName::new("recipes_limit");

/// Registration body for `POST /api/users/`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    #[schema(example = "vpupkin@yandex.ru")]
    pub email: String,
    #[schema(example = "vasya.pupkin")]
    pub username: String,
    #[schema(example = "Vasya")]
    pub first_name: String,
    #[schema(example = "Pupkin")]
    pub last_name: String,
    #[schema(example = "Qwerty123")]
    pub password: String,
}

impl From<RegisterRequest> for RegistrationDraft {
    fn from(value: RegisterRequest) -> Self {
        Self {
            email: value.email,
            username: value.username,
            first_name: value.first_name,
            last_name: value.last_name,
            password: value.password,
        }
    }
}

/// Body for `POST /api/users/set_password/`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct SetPasswordRequest {
    pub new_password: String,
    pub current_password: String,
}

/// `recipes_limit` from the query string, if present.
fn recipes_limit(req: &HttpRequest) -> Result<Option<u32>, Error> {
    let pairs = query_pairs(req.query_string());
    last_value(&pairs, RECIPES_LIMIT)
        .map(|raw| parse_limit(raw, RECIPES_LIMIT))
        .transpose()
}

#[utoipa::path(
    post,
    path = "/api/users/",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisteredUserResponse),
        (status = 400, description = "Validation failed or email/username taken", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/users/")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let draft = RegistrationDraft::from(payload.into_inner());
    let new_user = NewUser::try_from_draft(draft)?;
    let user = state.accounts.register(new_user).await?;
    Ok(HttpResponse::Created().json(RegisteredUserResponse::from(user)))
}

#[utoipa::path(
    get,
    path = "/api/users/",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size, at most 100")
    ),
    responses(
        (status = 200, description = "Users ordered by username", body = PageSchema<UserResponse>),
        (status = 404, description = "Page past the end", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users/")]
pub async fn list_users(
    state: web::Data<HttpState>,
    context: RequestContext,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let page = page_request(&req, state.page_size)?;
    let listing = state.users.list_users(context.viewer(), page).await?;
    let body = paginate(&req, &page, listing, UserResponse::from)?;
    Ok(HttpResponse::Ok().json(body))
}

#[utoipa::path(
    get,
    path = "/api/users/me/",
    responses(
        (status = 200, description = "Caller's profile", body = UserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("Token" = []))
)]
#[get("/users/me/")]
pub async fn me(state: web::Data<HttpState>, context: RequestContext) -> ApiResult<HttpResponse> {
    let actor = context.require_actor()?;
    let current = state
        .users
        .profile(Some(actor.user_id), actor.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(current)))
}

#[utoipa::path(
    post,
    path = "/api/users/set_password/",
    request_body = SetPasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Wrong current password or weak new one", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "setPassword",
    security(("Token" = []))
)]
#[post("/users/set_password/")]
pub async fn set_password(
    state: web::Data<HttpState>,
    context: RequestContext,
    payload: web::Json<SetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let actor = context.require_actor()?;
    let SetPasswordRequest {
        new_password,
        current_password,
    } = payload.into_inner();
    let change = PasswordChange {
        current_password: Zeroizing::new(current_password),
        new_password: Zeroizing::new(new_password),
    };
    state.accounts.set_password(actor, change).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    get,
    path = "/api/users/subscriptions/",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size, at most 100"),
        ("recipes_limit" = Option<u32>, Query, description = "Recipes nested per author")
    ),
    responses(
        (status = 200, description = "Followed authors, newest follow first", body = PageSchema<FollowedAuthorResponse>),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "listSubscriptions",
    security(("Token" = []))
)]
#[get("/users/subscriptions/")]
pub async fn subscriptions(
    state: web::Data<HttpState>,
    context: RequestContext,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let actor = context.require_actor()?;
    let page = page_request(&req, state.page_size)?;
    let limit = recipes_limit(&req)?;
    let listing = state.subscriptions.subscriptions(actor, page, limit).await?;
    let body = paginate(&req, &page, listing, FollowedAuthorResponse::from)?;
    Ok(HttpResponse::Ok().json(body))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}/",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Profile", body = UserResponse),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}/")]
pub async fn profile(
    state: web::Data<HttpState>,
    context: RequestContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = UserId::new(path.into_inner());
    let found = state.users.profile(context.viewer(), id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(found)))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe/",
    params(
        ("id" = i64, Path, description = "Author id"),
        ("recipes_limit" = Option<u32>, Query, description = "Recipes nested in the response")
    ),
    responses(
        (status = 201, description = "Now following", body = FollowedAuthorResponse),
        (status = 400, description = "Already following or following yourself", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown author", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "subscribe",
    security(("Token" = []))
)]
#[route("/users/{id}/subscribe/", method = "GET", method = "POST")]
pub async fn subscribe(
    state: web::Data<HttpState>,
    context: RequestContext,
    path: web::Path<i64>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let actor = context.require_actor()?;
    let limit = recipes_limit(&req)?;
    let author = state
        .relationships
        .follow(actor, UserId::new(path.into_inner()), limit)
        .await?;
    Ok(HttpResponse::Created().json(FollowedAuthorResponse::from(author)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe/",
    params(("id" = i64, Path, description = "Author id")),
    responses(
        (status = 204, description = "Unfollowed"),
        (status = 404, description = "Not following this author", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "unsubscribe",
    security(("Token" = []))
)]
#[delete("/users/{id}/subscribe/")]
pub async fn unsubscribe(
    state: web::Data<HttpState>,
    context: RequestContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let actor = context.require_actor()?;
    state
        .relationships
        .unfollow(actor, UserId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
