//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint of the inbound layer, the wire
//! DTOs, the error envelope schemas and the `Token` security scheme. The
//! document backs Swagger UI in debug builds and is printed by
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::recipes::{IngredientAmountRequest, RecipeRequest};
use crate::inbound::http::responses::{
    FollowedAuthorResponse, IngredientResponse, RecipeIngredientResponse, RecipeResponse,
    RecipeSummaryResponse, RegisteredUserResponse, TagResponse, TokenResponse, UserResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{RegisterRequest, SetPasswordRequest};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the token header security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "Token",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "`Token <key>` as issued by POST /api/auth/token/login/.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Foodgram API",
        description = "Recipes, favourites, shopping carts and author subscriptions."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::users::register,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::me,
        crate::inbound::http::users::set_password,
        crate::inbound::http::users::subscriptions,
        crate::inbound::http::users::profile,
        crate::inbound::http::users::subscribe,
        crate::inbound::http::users::unsubscribe,
        crate::inbound::http::catalogue::list_tags,
        crate::inbound::http::catalogue::get_tag,
        crate::inbound::http::catalogue::list_ingredients,
        crate::inbound::http::catalogue::get_ingredient,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::download_shopping_cart,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::recipes::add_favorite,
        crate::inbound::http::recipes::remove_favorite,
        crate::inbound::http::recipes::add_to_shopping_cart,
        crate::inbound::http::recipes::remove_from_shopping_cart,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        TokenResponse,
        RegisterRequest,
        RegisteredUserResponse,
        SetPasswordRequest,
        UserResponse,
        FollowedAuthorResponse,
        TagResponse,
        IngredientResponse,
        RecipeIngredientResponse,
        RecipeSummaryResponse,
        RecipeResponse,
        RecipeRequest,
        IngredientAmountRequest,
    )),
    tags(
        (name = "auth", description = "Token login and logout"),
        (name = "users", description = "Accounts and profiles"),
        (name = "subscriptions", description = "Following authors"),
        (name = "tags", description = "Recipe tags"),
        (name = "ingredients", description = "Ingredient catalogue"),
        (name = "recipes", description = "Recipe publishing and browsing"),
        (name = "favorites", description = "Favourite recipes"),
        (name = "shopping_cart", description = "Shopping cart and its download"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated OpenAPI document.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn schema<'a>(doc: &'a utoipa::openapi::OpenApi, name: &str) -> &'a RefOr<Schema> {
        doc.components
            .as_ref()
            .expect("components")
            .schemas
            .get(name)
            .unwrap_or_else(|| panic!("{name} schema"))
    }

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Error", "traceId")]
    #[case("RecipeResponse", "is_in_shopping_cart")]
    #[case("UserResponse", "is_subscribed")]
    #[case("RecipeSummaryResponse", "cooking_time")]
    #[case("RecipeRequest", "ingredients")]
    fn schemas_expose_wire_fields(#[case] name: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        assert_object_schema_has_field(schema(&doc, name), field);
    }

    #[rstest]
    #[case("/api/users/me/")]
    #[case("/api/recipes/download_shopping_cart/")]
    #[case("/api/recipes/{id}/favorite/")]
    #[case("/health/ready")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn token_security_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("Token"));
    }
}
