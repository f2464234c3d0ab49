//! Tests for recipe HTTP handlers.

use super::*;
use crate::domain::{CartIngredientRow, Listing, RecipeSummary, ShoppingList};
use crate::inbound::http::error::{json_config, path_config};
use crate::inbound::http::test_utils::{
    MockPorts, actor, auth_header, recipe_detail, recipe_record,
};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use insta::assert_json_snapshot;
use rstest::rstest;
use serde_json::{Value, json};

fn test_app(
    ports: MockPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .app_data(json_config())
        .app_data(path_config())
        .service(
            web::scope("/api")
                .service(list_recipes)
                .service(create_recipe)
                .service(download_shopping_cart)
                .service(get_recipe)
                .service(update_recipe)
                .service(delete_recipe)
                .service(add_favorite)
                .service(remove_favorite)
                .service(add_to_shopping_cart)
                .service(remove_from_shopping_cart),
        )
}

async fn send_raw(ports: MockPorts, req: actix_test::TestRequest) -> actix_web::dev::ServiceResponse {
    let app = actix_test::init_service(test_app(ports)).await;
    actix_test::call_service(&app, req.to_request()).await
}

async fn send(ports: MockPorts, req: actix_test::TestRequest) -> (StatusCode, Value) {
    let res = send_raw(ports, req).await;
    let status = res.status();
    let body = actix_test::read_body(res).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

fn omelette_payload() -> Value {
    json!({
        "ingredients": [{"id": 3, "amount": 2}, {"id": 7, "amount": 5}],
        "tags": [1],
        "image": "recipes/images/omelette.png",
        "name": "Omelette",
        "text": "Whisk and fry.",
        "cooking_time": 10,
    })
}

#[rstest]
fn list_filters_are_parsed_from_repeated_keys() {
    let query =
        recipe_list_query("tags=lunch&tags=dinner&author=2&is_favorited=1&is_in_shopping_cart=0&page=2")
            .expect("valid filters");

    assert_eq!(query.tags, vec!["lunch".to_owned(), "dinner".to_owned()]);
    assert_eq!(query.author, Some(UserId::new(2)));
    assert!(query.is_favorited);
    assert!(!query.is_in_shopping_cart);
}

#[rstest]
#[case("author=abc", "author")]
#[case("is_favorited=maybe", "is_favorited")]
#[case("is_in_shopping_cart=2", "is_in_shopping_cart")]
fn malformed_filters_name_their_field(#[case] query: &str, #[case] field: &str) {
    let err = recipe_list_query(query).expect_err("malformed filter");
    assert_eq!(err.details().expect("details")["field"], field);
}

#[rstest]
fn recipe_detail_response_shape() {
    let response = RecipeResponse::from(recipe_detail(11));
    assert_json_snapshot!(response, @r##"
    {
      "id": 11,
      "tags": [
        {
          "id": 1,
          "name": "Breakfast",
          "color": "#E26C2D",
          "slug": "breakfast"
        }
      ],
      "author": {
        "email": "chef@foodgram.test",
        "id": 1,
        "username": "chef",
        "first_name": "Vasya",
        "last_name": "Pupkin",
        "is_subscribed": false
      },
      "ingredients": [
        {
          "id": 3,
          "name": "Egg",
          "measurement_unit": "pcs",
          "amount": 2
        },
        {
          "id": 7,
          "name": "Salt",
          "measurement_unit": "g",
          "amount": 5
        }
      ],
      "is_favorited": false,
      "is_in_shopping_cart": false,
      "name": "Omelette",
      "image": "recipes/images/11.png",
      "text": "Whisk and fry.",
      "cooking_time": 10
    }
    "##);
}

#[actix_web::test]
async fn anonymous_list_passes_no_viewer() {
    let mut ports = MockPorts::default();
    ports
        .recipes_query
        .expect_list_recipes()
        .withf(|viewer, query, page| {
            viewer.is_none() && query.tags == vec!["breakfast".to_owned()] && page.limit() == 6
        })
        .times(1)
        .return_once(|_, _, _| Ok(Listing::new(vec![recipe_detail(11)], 1)));

    let (status, body) = send(
        ports,
        actix_test::TestRequest::get().uri("/api/recipes/?tags=breakfast"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["next"], Value::Null);
    assert_eq!(body["results"][0]["is_favorited"], false);
}

#[actix_web::test]
async fn page_past_the_end_is_not_found() {
    let mut ports = MockPorts::default();
    ports
        .recipes_query
        .expect_list_recipes()
        .return_once(|_, _, _| Err(Error::not_found("invalid page")));

    let (status, body) = send(
        ports,
        actix_test::TestRequest::get().uri("/api/recipes/?page=9"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "invalid page");
}

#[actix_web::test]
async fn create_requires_a_token() {
    let req = actix_test::TestRequest::post()
        .uri("/api/recipes/")
        .set_json(omelette_payload());
    let (status, body) = send(MockPorts::default(), req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[actix_web::test]
async fn create_maps_the_body_into_recipe_input() {
    let mut ports = MockPorts::default();
    ports.authenticate_as(actor(1));
    ports
        .recipes
        .expect_create()
        .withf(|actor, input| {
            actor.user_id == UserId::new(1)
                && input.ingredients == vec![(3, 2), (7, 5)]
                && input.tags == vec![1]
                && input.cooking_time == 10
        })
        .times(1)
        .return_once(|_, _| Ok(recipe_detail(11)));

    let req = actix_test::TestRequest::post()
        .uri("/api/recipes/")
        .insert_header(auth_header())
        .set_json(omelette_payload());
    let (status, body) = send(ports, req).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 11);
    assert_eq!(body["ingredients"][1]["amount"], 5);
}

#[actix_web::test]
async fn duplicate_ingredient_is_a_field_error() {
    let mut ports = MockPorts::default();
    ports.authenticate_as(actor(1));
    ports.recipes.expect_create().return_once(|_, _| {
        Err(crate::domain::RecipeValidationError::DuplicateIngredient { id: 3 }.into())
    });

    let req = actix_test::TestRequest::post()
        .uri("/api/recipes/")
        .insert_header(auth_header())
        .set_json(omelette_payload());
    let (status, body) = send(ports, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "ingredients");
    assert_eq!(body["details"]["code"], "duplicate_ingredient");
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let mut ports = MockPorts::default();
    ports.authenticate_as(actor(1));

    let req = actix_test::TestRequest::post()
        .uri("/api/recipes/")
        .insert_header(auth_header())
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"name\": ");
    let (status, body) = send(ports, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[case(actix_test::TestRequest::put())]
#[case(actix_test::TestRequest::patch())]
#[actix_rt::test]
async fn non_author_update_is_forbidden(#[case] req: actix_test::TestRequest) {
    let mut ports = MockPorts::default();
    ports.authenticate_as(actor(2));
    ports
        .recipes
        .expect_update()
        .withf(|actor, id, _| actor.user_id == UserId::new(2) && *id == RecipeId::new(11))
        .return_once(|_, _, _| Err(Error::forbidden("only the author may change this recipe")));

    let req = req
        .uri("/api/recipes/11/")
        .insert_header(auth_header())
        .set_json(omelette_payload());
    let (status, body) = send(ports, req).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");
}

#[actix_web::test]
async fn delete_answers_no_content() {
    let mut ports = MockPorts::default();
    ports.authenticate_as(actor(1));
    ports
        .recipes
        .expect_delete()
        .withf(|_, id| *id == RecipeId::new(11))
        .times(1)
        .return_once(|_, _| Ok(()));

    let req = actix_test::TestRequest::delete()
        .uri("/api/recipes/11/")
        .insert_header(auth_header());
    let res = send_raw(ports, req).await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[rstest]
#[case("/api/recipes/11/favorite/", RecipeListKind::Favorites)]
#[case("/api/recipes/11/shopping_cart/", RecipeListKind::ShoppingCart)]
#[actix_rt::test]
async fn adding_to_a_list_returns_the_summary(#[case] uri: &str, #[case] kind: RecipeListKind) {
    let mut ports = MockPorts::default();
    ports.authenticate_as(actor(1));
    ports
        .relationships
        .expect_add_recipe()
        .withf(move |_, list, id| *list == kind && *id == RecipeId::new(11))
        .times(1)
        .return_once(|_, _, _| Ok(RecipeSummary::from(recipe_record(11, 1, "Omelette"))));

    let req = actix_test::TestRequest::post()
        .uri(uri)
        .insert_header(auth_header());
    let (status, body) = send(ports, req).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({"id": 11, "name": "Omelette", "image": "recipes/images/11.png", "cooking_time": 10})
    );
}

#[actix_web::test]
async fn favorite_twice_is_a_bad_request() {
    let mut ports = MockPorts::default();
    ports.authenticate_as(actor(1));
    ports
        .relationships
        .expect_add_recipe()
        .return_once(|_, _, _| Err(Error::already_exists("recipe 11 is already in favorites")));

    let req = actix_test::TestRequest::get()
        .uri("/api/recipes/11/favorite/")
        .insert_header(auth_header());
    let (status, body) = send(ports, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "already_exists");
}

#[actix_web::test]
async fn removing_a_missing_cart_entry_is_not_found() {
    let mut ports = MockPorts::default();
    ports.authenticate_as(actor(1));
    ports
        .relationships
        .expect_remove_recipe()
        .withf(|_, list, _| *list == RecipeListKind::ShoppingCart)
        .return_once(|_, _, _| Err(Error::not_found("recipe 11 is not in shopping cart")));

    let req = actix_test::TestRequest::delete()
        .uri("/api/recipes/11/shopping_cart/")
        .insert_header(auth_header());
    let (status, _) = send(ports, req).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn shopping_list_downloads_as_a_text_attachment() {
    let mut ports = MockPorts::default();
    ports.authenticate_as(actor(1));
    ports.shopping_list.expect_shopping_list().return_once(|_| {
        Ok(ShoppingList::aggregate(vec![
            CartIngredientRow {
                name: "Salt".into(),
                measurement_unit: "g".into(),
                amount: 5,
            },
            CartIngredientRow {
                name: "Salt".into(),
                measurement_unit: "g".into(),
                amount: 3,
            },
        ]))
    });

    let req = actix_test::TestRequest::get()
        .uri("/api/recipes/download_shopping_cart/")
        .insert_header(auth_header());
    let res = send_raw(ports, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let headers = res.headers();
    assert_eq!(
        headers.get("content-type").and_then(|v| v.to_str().ok()),
        Some("text/plain; charset=utf-8")
    );
    assert_eq!(
        headers
            .get("content-disposition")
            .and_then(|v| v.to_str().ok()),
        Some("attachment; filename=\"wishlist.txt\"")
    );
    let body = actix_test::read_body(res).await;
    assert_eq!(body.as_ref(), b"Salt - 8 g\n");
}
