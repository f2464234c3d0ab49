//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use mockall::predicate::function;

use crate::domain::ports::{
    MockAccountCommand, MockCatalogueQuery, MockLoginService, MockRecipeCommand, MockRecipeQuery,
    MockRelationshipCommand, MockShoppingListQuery, MockSubscriptionsQuery, MockUsersQuery,
};
use crate::domain::{
    Actor, Ingredient, IngredientId, RecipeDetail, RecipeId, RecipeIngredientLine, RecipeRecord,
    Tag, TagId, User, UserId, UserProfile,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Token key every authenticated test request presents.
pub const TEST_TOKEN: &str = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b";

/// One mock per driving port; set expectations, then call [`Self::into_state`].
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub accounts: MockAccountCommand,
    pub users: MockUsersQuery,
    pub catalogue: MockCatalogueQuery,
    pub recipes: MockRecipeCommand,
    pub recipes_query: MockRecipeQuery,
    pub relationships: MockRelationshipCommand,
    pub subscriptions: MockSubscriptionsQuery,
    pub shopping_list: MockShoppingListQuery,
}

impl MockPorts {
    /// Accept [`TEST_TOKEN`] as `actor` on every request.
    pub fn authenticate_as(&mut self, actor: Actor) -> &mut Self {
        self.login
            .expect_authenticate()
            .with(function(|token: &crate::domain::AuthToken| {
                token.as_str() == TEST_TOKEN
            }))
            .returning(move |_| Ok(actor));
        self
    }

    pub fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            login: Arc::new(self.login),
            accounts: Arc::new(self.accounts),
            users: Arc::new(self.users),
            catalogue: Arc::new(self.catalogue),
            recipes: Arc::new(self.recipes),
            recipes_query: Arc::new(self.recipes_query),
            relationships: Arc::new(self.relationships),
            subscriptions: Arc::new(self.subscriptions),
            shopping_list: Arc::new(self.shopping_list),
        })
    }
}

/// `Authorization` header carrying [`TEST_TOKEN`].
pub fn auth_header() -> (&'static str, String) {
    ("Authorization", format!("Token {TEST_TOKEN}"))
}

pub fn actor(id: i64) -> Actor {
    Actor {
        user_id: UserId::new(id),
        is_admin: false,
    }
}

pub fn user(id: i64, username: &str) -> User {
    User {
        id: UserId::new(id),
        email: format!("{username}@foodgram.test"),
        username: username.to_owned(),
        first_name: "Vasya".to_owned(),
        last_name: "Pupkin".to_owned(),
        is_admin: false,
    }
}

pub fn profile(id: i64, username: &str, is_subscribed: bool) -> UserProfile {
    UserProfile {
        user: user(id, username),
        is_subscribed,
    }
}

pub fn recipe_record(id: i64, author: i64, name: &str) -> RecipeRecord {
    RecipeRecord {
        id: RecipeId::new(id),
        author_id: UserId::new(author),
        name: name.to_owned(),
        image: format!("recipes/images/{id}.png"),
        text: "Whisk and fry.".to_owned(),
        cooking_time: 10,
        pub_date: Utc.with_ymd_and_hms(2024, 1, 2, 8, 30, 0).single().unwrap_or_default(),
    }
}

/// Omelette by user 1 with one tag and two ingredient lines.
pub fn recipe_detail(id: i64) -> RecipeDetail {
    RecipeDetail {
        recipe: recipe_record(id, 1, "Omelette"),
        author: profile(1, "chef", false),
        tags: vec![Tag {
            id: TagId::new(1),
            name: "Breakfast".to_owned(),
            color: "#E26C2D".to_owned(),
            slug: "breakfast".to_owned(),
        }],
        ingredients: vec![
            RecipeIngredientLine {
                ingredient: Ingredient {
                    id: IngredientId::new(3),
                    name: "Egg".to_owned(),
                    measurement_unit: "pcs".to_owned(),
                },
                amount: 2,
            },
            RecipeIngredientLine {
                ingredient: Ingredient {
                    id: IngredientId::new(7),
                    name: "Salt".to_owned(),
                    measurement_unit: "g".to_owned(),
                },
                amount: 5,
            },
        ],
        is_favorited: false,
        is_in_shopping_cart: false,
    }
}
