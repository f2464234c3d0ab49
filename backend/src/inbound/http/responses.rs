//! Response bodies for the JSON API.
//!
//! Domain views do not derive `Serialize`; each is mapped here into the
//! client-facing shape with an explicit `From` impl.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    FollowedAuthor, Ingredient, RecipeDetail, RecipeIngredientLine, RecipeSummary, Tag, User,
    UserProfile,
};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TagResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Breakfast")]
    pub name: String,
    #[schema(example = "#E26C2D")]
    pub color: String,
    #[schema(example = "breakfast")]
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id.get(),
            name: tag.name,
            color: tag.color,
            slug: tag.slug,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngredientResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Cabbage")]
    pub name: String,
    #[schema(example = "kg")]
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id.get(),
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

/// Ingredient line of a recipe, with the recipe-specific amount.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeIngredientResponse {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    #[schema(example = 10)]
    pub amount: i16,
}

impl From<RecipeIngredientLine> for RecipeIngredientResponse {
    fn from(line: RecipeIngredientLine) -> Self {
        Self {
            id: line.ingredient.id.get(),
            name: line.ingredient.name,
            measurement_unit: line.ingredient.measurement_unit,
            amount: line.amount,
        }
    }
}

/// Public profile as seen by the caller.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "vpupkin@yandex.ru")]
    pub email: String,
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "vasya.pupkin")]
    pub username: String,
    #[schema(example = "Vasya")]
    pub first_name: String,
    #[schema(example = "Pupkin")]
    pub last_name: String,
    pub is_subscribed: bool,
}

impl From<UserProfile> for UserResponse {
    fn from(profile: UserProfile) -> Self {
        let UserProfile {
            user,
            is_subscribed,
        } = profile;
        Self {
            email: user.email,
            id: user.id.get(),
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

/// Body returned by registration; it carries no subscription flag.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegisteredUserResponse {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for RegisteredUserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            id: user.id.get(),
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeSummaryResponse {
    pub id: i64,
    #[schema(example = "Omelette")]
    pub name: String,
    #[schema(example = "recipes/images/omelette.png")]
    pub image: String,
    #[schema(example = 10)]
    pub cooking_time: i16,
}

impl From<RecipeSummary> for RecipeSummaryResponse {
    fn from(summary: RecipeSummary) -> Self {
        Self {
            id: summary.id.get(),
            name: summary.name,
            image: summary.image,
            cooking_time: summary.cooking_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: i64,
    pub tags: Vec<TagResponse>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i16,
}

impl From<RecipeDetail> for RecipeResponse {
    fn from(detail: RecipeDetail) -> Self {
        let RecipeDetail {
            recipe,
            author,
            tags,
            ingredients,
            is_favorited,
            is_in_shopping_cart,
        } = detail;
        Self {
            id: recipe.id.get(),
            tags: tags.into_iter().map(TagResponse::from).collect(),
            author: author.into(),
            ingredients: ingredients
                .into_iter()
                .map(RecipeIngredientResponse::from)
                .collect(),
            is_favorited,
            is_in_shopping_cart,
            name: recipe.name,
            image: recipe.image,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Followed author with a capped list of their recipes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FollowedAuthorResponse {
    #[serde(flatten)]
    pub profile: UserResponse,
    pub recipes: Vec<RecipeSummaryResponse>,
    pub recipes_count: u64,
}

impl From<FollowedAuthor> for FollowedAuthorResponse {
    fn from(author: FollowedAuthor) -> Self {
        Self {
            profile: author.profile.into(),
            recipes: author
                .recipes
                .into_iter()
                .map(RecipeSummaryResponse::from)
                .collect(),
            recipes_count: author.recipes_count,
        }
    }
}

/// `{"auth_token": "..."}` returned by login.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenResponse {
    #[schema(example = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b")]
    pub auth_token: String,
}

/// OpenAPI shape of [`pagination::Page`], the envelope of every list endpoint.
#[derive(Debug, Clone, ToSchema)]
pub struct PageSchema<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}
