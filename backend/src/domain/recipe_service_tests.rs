//! Tests for recipe composition and read-side assembly.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{
    MockCatalogueRepository, MockRecipeRepository, MockRelationshipRepository, MockUserRepository,
};
use crate::domain::{ErrorCode, Ingredient, RecipeIngredientLine, Tag, User};
use chrono::{DateTime, TimeZone, Utc};
use mockable::MockClock;
use mockall::predicate::eq;
use rstest::{fixture, rstest};

type Service = RecipeService<
    MockRecipeRepository,
    MockCatalogueRepository,
    MockUserRepository,
    MockRelationshipRepository,
>;

struct Mocks {
    recipes: MockRecipeRepository,
    catalogue: MockCatalogueRepository,
    users: MockUserRepository,
    relationships: MockRelationshipRepository,
}

impl Mocks {
    fn into_service(self) -> Service {
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(now());
        RecipeService::new(
            Arc::new(self.recipes),
            Arc::new(self.catalogue),
            Arc::new(self.users),
            Arc::new(self.relationships),
            Arc::new(clock),
        )
    }

    /// Expectations for assembling a detail view.
    fn expect_detail(&mut self) {
        self.users
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id.get()))));
        self.relationships
            .expect_is_following()
            .returning(|_, _| Ok(false));
        self.recipes.expect_tags().returning(|_| {
            Ok(vec![Tag {
                id: TagId::new(1),
                name: "Breakfast".to_owned(),
                color: "#E26C2D".to_owned(),
                slug: "breakfast".to_owned(),
            }])
        });
        self.recipes.expect_ingredient_lines().returning(|_| {
            Ok(vec![RecipeIngredientLine {
                ingredient: Ingredient {
                    id: IngredientId::new(1),
                    name: "Eggs".to_owned(),
                    measurement_unit: "pcs".to_owned(),
                },
                amount: 2,
            }])
        });
    }
}

#[fixture]
fn mocks() -> Mocks {
    Mocks {
        recipes: MockRecipeRepository::new(),
        catalogue: MockCatalogueRepository::new(),
        users: MockUserRepository::new(),
        relationships: MockRelationshipRepository::new(),
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 14, 8, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn user(id: i64) -> User {
    User {
        id: UserId::new(id),
        email: format!("cook{id}@example.org"),
        username: format!("cook{id}"),
        first_name: "Pavel".to_owned(),
        last_name: "Smirnov".to_owned(),
        is_admin: false,
    }
}

fn actor(id: i64) -> Actor {
    Actor {
        user_id: UserId::new(id),
        is_admin: false,
    }
}

fn record(id: i64, author: i64) -> RecipeRecord {
    RecipeRecord {
        id: RecipeId::new(id),
        author_id: UserId::new(author),
        name: "Omelette".to_owned(),
        image: "recipes/images/omelette.png".to_owned(),
        text: "Whisk and fry.".to_owned(),
        cooking_time: 10,
        pub_date: now(),
    }
}

fn input() -> RecipeInput {
    RecipeInput {
        name: "Omelette".to_owned(),
        text: "Whisk and fry.".to_owned(),
        image: Some("data:image/png;base64,AAAA".to_owned()),
        cooking_time: 10,
        ingredients: vec![(1, 2)],
        tags: vec![1],
    }
}

#[rstest]
#[tokio::test]
async fn create_persists_draft_with_clock_time(mut mocks: Mocks) {
    mocks
        .catalogue
        .expect_missing_ingredients()
        .return_once(|_| Ok(Vec::new()));
    mocks
        .catalogue
        .expect_missing_tags()
        .return_once(|_| Ok(Vec::new()));
    mocks
        .recipes
        .expect_create()
        .withf(|author, draft, pub_date| {
            *author == UserId::new(3) && draft.name() == "Omelette" && *pub_date == now()
        })
        .times(1)
        .return_once(|_, _, _| Ok(record(10, 3)));
    mocks
        .relationships
        .expect_has_recipe()
        .returning(|_, _, _| Ok(false));
    mocks.expect_detail();

    let detail = mocks
        .into_service()
        .create(&actor(3), input())
        .await
        .expect("created");

    assert_eq!(detail.recipe.id, RecipeId::new(10));
    assert_eq!(detail.author.user.id, UserId::new(3));
    assert_eq!(detail.ingredients.len(), 1);
    assert!(!detail.is_favorited);
}

#[rstest]
#[tokio::test]
async fn duplicate_ingredient_persists_nothing(mut mocks: Mocks) {
    mocks.recipes.expect_create().never();
    mocks.catalogue.expect_missing_ingredients().never();

    let mut payload = input();
    payload.ingredients = vec![(1, 2), (1, 5)];
    let err = mocks
        .into_service()
        .create(&actor(3), payload)
        .await
        .expect_err("duplicate");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details().expect("details")["code"], "duplicate_ingredient");
}

#[rstest]
#[case(0)]
#[case(-1)]
#[tokio::test]
async fn non_positive_cooking_time_is_rejected(mut mocks: Mocks, #[case] minutes: i64) {
    mocks.recipes.expect_create().never();

    let mut payload = input();
    payload.cooking_time = minutes;
    let err = mocks
        .into_service()
        .create(&actor(3), payload)
        .await
        .expect_err("bad cooking time");
    assert_eq!(err.details().expect("details")["field"], "cooking_time");
}

#[rstest]
#[tokio::test]
async fn unknown_ingredient_is_a_validation_error(mut mocks: Mocks) {
    mocks
        .catalogue
        .expect_missing_ingredients()
        .return_once(|_| Ok(vec![IngredientId::new(1)]));
    mocks.recipes.expect_create().never();

    let err = mocks
        .into_service()
        .create(&actor(3), input())
        .await
        .expect_err("unknown ingredient");
    let details = err.details().expect("details");
    assert_eq!(details["field"], "ingredients");
    assert_eq!(details["code"], "unknown_ingredient");
}

#[rstest]
#[tokio::test]
async fn update_by_stranger_is_forbidden(mut mocks: Mocks) {
    mocks
        .recipes
        .expect_find()
        .return_once(|_| Ok(Some(record(10, 3))));
    mocks.recipes.expect_update().never();

    let err = mocks
        .into_service()
        .update(&actor(4), RecipeId::new(10), input())
        .await
        .expect_err("not the author");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn update_of_missing_recipe_is_not_found_before_permission(mut mocks: Mocks) {
    mocks.recipes.expect_find().return_once(|_| Ok(None));

    let err = mocks
        .into_service()
        .update(&actor(4), RecipeId::new(10), input())
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn admin_may_update_any_recipe(mut mocks: Mocks) {
    mocks
        .recipes
        .expect_find()
        .return_once(|_| Ok(Some(record(10, 3))));
    mocks
        .catalogue
        .expect_missing_ingredients()
        .return_once(|_| Ok(Vec::new()));
    mocks
        .catalogue
        .expect_missing_tags()
        .return_once(|_| Ok(Vec::new()));
    mocks
        .recipes
        .expect_update()
        .withf(|id, draft| *id == RecipeId::new(10) && draft.image().is_none())
        .times(1)
        .return_once(|_, _| Ok(record(10, 3)));
    mocks
        .relationships
        .expect_has_recipe()
        .returning(|_, _, _| Ok(false));
    mocks.expect_detail();

    let admin = Actor {
        user_id: UserId::new(1),
        is_admin: true,
    };
    let mut payload = input();
    payload.image = None;
    mocks
        .into_service()
        .update(&admin, RecipeId::new(10), payload)
        .await
        .expect("admin update");
}

#[rstest]
#[tokio::test]
async fn delete_by_author_removes_recipe(mut mocks: Mocks) {
    mocks
        .recipes
        .expect_find()
        .return_once(|_| Ok(Some(record(10, 3))));
    mocks
        .recipes
        .expect_delete()
        .with(eq(RecipeId::new(10)))
        .times(1)
        .return_once(|_| Ok(true));

    mocks
        .into_service()
        .delete(&actor(3), RecipeId::new(10))
        .await
        .expect("deleted");
}

#[rstest]
#[tokio::test]
async fn anonymous_viewer_sees_false_flags(mut mocks: Mocks) {
    mocks
        .recipes
        .expect_find()
        .return_once(|_| Ok(Some(record(10, 3))));
    mocks.relationships.expect_has_recipe().never();
    mocks.expect_detail();

    let detail = mocks
        .into_service()
        .recipe(None, RecipeId::new(10))
        .await
        .expect("detail");
    assert!(!detail.is_favorited);
    assert!(!detail.is_in_shopping_cart);
    assert!(!detail.author.is_subscribed);
}

#[rstest]
#[tokio::test]
async fn viewer_flags_reflect_relationships(mut mocks: Mocks) {
    mocks
        .recipes
        .expect_find()
        .return_once(|_| Ok(Some(record(10, 3))));
    mocks
        .relationships
        .expect_has_recipe()
        .returning(|kind, _, _| Ok(kind == RecipeListKind::ShoppingCart));
    mocks.expect_detail();

    let detail = mocks
        .into_service()
        .recipe(Some(UserId::new(5)), RecipeId::new(10))
        .await
        .expect("detail");
    assert!(!detail.is_favorited);
    assert!(detail.is_in_shopping_cart);
}

#[rstest]
#[case(1, true)]
#[case(2, false)]
#[tokio::test]
async fn anonymous_favourites_filter_yields_empty_first_page(
    mut mocks: Mocks,
    #[case] page: u32,
    #[case] ok: bool,
) {
    mocks.recipes.expect_list().never();
    let query = RecipeListQuery {
        is_favorited: true,
        ..RecipeListQuery::default()
    };

    let result = mocks
        .into_service()
        .list_recipes(None, query, PageRequest::new(page, 6).expect("page"))
        .await;
    match result {
        Ok(listing) => {
            assert!(ok);
            assert_eq!(listing.count, 0);
        }
        Err(err) => {
            assert!(!ok);
            assert_eq!(err.code(), ErrorCode::NotFound);
        }
    }
}

#[rstest]
#[tokio::test]
async fn list_binds_favourites_filter_to_viewer(mut mocks: Mocks) {
    mocks
        .recipes
        .expect_list()
        .withf(|filter, _| {
            filter.favorited_by == Some(UserId::new(5)) && filter.tags == vec!["dinner".to_owned()]
        })
        .return_once(|_, _| Ok((vec![record(10, 3)], 1)));
    mocks
        .relationships
        .expect_has_recipe()
        .returning(|_, _, _| Ok(true));
    mocks.expect_detail();

    let query = RecipeListQuery {
        tags: vec!["dinner".to_owned()],
        is_favorited: true,
        ..RecipeListQuery::default()
    };
    let listing = mocks
        .into_service()
        .list_recipes(
            Some(UserId::new(5)),
            query,
            PageRequest::new(1, 6).expect("page"),
        )
        .await
        .expect("listing");
    assert_eq!(listing.items.len(), 1);
    assert!(listing.items[0].is_favorited);
}
