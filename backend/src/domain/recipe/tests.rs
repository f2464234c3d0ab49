//! Tests for recipe write validation and list filters.

use super::*;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};

#[fixture]
fn input() -> RecipeInput {
    RecipeInput {
        name: "Shakshuka".to_owned(),
        text: "Simmer tomatoes, crack eggs on top.".to_owned(),
        image: Some("data:image/png;base64,iVBORw0KGgo=".to_owned()),
        cooking_time: 25,
        ingredients: vec![(1, 4), (2, 300)],
        tags: vec![1, 3],
    }
}

#[rstest]
fn valid_input_keeps_order(input: RecipeInput) {
    let draft = RecipeDraft::for_create(input).expect("valid draft");

    let ids: Vec<i64> = draft
        .ingredients()
        .iter()
        .map(|line| line.ingredient_id.get())
        .collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(draft.tags(), &[TagId::new(1), TagId::new(3)]);
    assert_eq!(draft.cooking_time(), 25);
}

#[rstest]
#[case(0)]
#[case(-5)]
#[case(SMALL_INT_MAX + 1)]
fn cooking_time_must_be_positive_small_int(mut input: RecipeInput, #[case] value: i64) {
    input.cooking_time = value;
    let err = RecipeDraft::for_create(input).expect_err("bad cooking time");
    assert_eq!(err, RecipeValidationError::CookingTimeOutOfRange { value });
    assert_eq!(err.field(), "cooking_time");
}

#[rstest]
#[case(vec![], RecipeValidationError::EmptyIngredients)]
#[case(vec![(7, 1), (7, 2)], RecipeValidationError::DuplicateIngredient { id: 7 })]
#[case(vec![(7, -1)], RecipeValidationError::NegativeAmount { id: 7, amount: -1 })]
#[case(vec![(7, 40_000)], RecipeValidationError::AmountTooLarge { id: 7, amount: 40_000 })]
fn ingredient_lines_are_checked(
    mut input: RecipeInput,
    #[case] lines: Vec<(i64, i64)>,
    #[case] expected: RecipeValidationError,
) {
    input.ingredients = lines;
    let err = RecipeDraft::for_create(input).expect_err("bad ingredients");
    assert_eq!(err, expected);
    assert_eq!(err.field(), "ingredients");
}

#[rstest]
fn zero_amount_is_accepted(mut input: RecipeInput) {
    input.ingredients = vec![(5, 0)];
    let draft = RecipeDraft::for_create(input).expect("zero is allowed");
    assert_eq!(draft.ingredients()[0].amount, 0);
}

#[rstest]
fn duplicate_tag_is_rejected(mut input: RecipeInput) {
    input.tags = vec![2, 2];
    let err = RecipeDraft::for_create(input).expect_err("duplicate tag");
    assert_eq!(err, RecipeValidationError::DuplicateTag { id: 2 });
}

#[rstest]
#[case("", RecipeValidationError::EmptyName)]
#[case("   ", RecipeValidationError::EmptyName)]
#[case("a name that is much too long for it", RecipeValidationError::NameTooLong { max: RECIPE_NAME_MAX })]
fn name_limits(mut input: RecipeInput, #[case] name: &str, #[case] expected: RecipeValidationError) {
    input.name = name.to_owned();
    assert_eq!(RecipeDraft::for_create(input).expect_err("bad name"), expected);
}

#[rstest]
fn text_limit(mut input: RecipeInput) {
    input.text = "x".repeat(RECIPE_TEXT_MAX + 1);
    assert_eq!(
        RecipeDraft::for_create(input).expect_err("long text"),
        RecipeValidationError::TextTooLong {
            max: RECIPE_TEXT_MAX
        }
    );
}

#[rstest]
#[case(None)]
#[case(Some("  ".to_owned()))]
fn create_requires_image(mut input: RecipeInput, #[case] image: Option<String>) {
    input.image = image;
    assert_eq!(
        RecipeDraft::for_create(input).expect_err("missing image"),
        RecipeValidationError::MissingImage
    );
}

#[rstest]
fn update_may_keep_stored_image(mut input: RecipeInput) {
    input.image = None;
    let draft = RecipeDraft::for_update(input).expect("image optional on update");
    assert_eq!(draft.image(), None);
}

#[rstest]
fn validation_error_carries_field_details(mut input: RecipeInput) {
    input.ingredients = vec![(3, 1), (3, 1)];
    let err: Error = RecipeDraft::for_create(input).expect_err("duplicate").into();

    let details = err.details().expect("details");
    assert_eq!(details["code"], "duplicate_ingredient");
    assert_eq!(
        details["fieldErrors"]["ingredients"][0],
        "duplicate ingredient: 3 is listed more than once"
    );
}

#[rstest]
#[case(None, false, false, Some((None, None)))]
#[case(None, true, false, None)]
#[case(None, false, true, None)]
#[case(Some(4), true, false, Some((Some(4), None)))]
#[case(Some(4), false, true, Some((None, Some(4))))]
#[case(Some(4), false, false, Some((None, None)))]
fn filter_binds_flags_to_viewer(
    #[case] viewer: Option<i64>,
    #[case] is_favorited: bool,
    #[case] is_in_shopping_cart: bool,
    #[case] expected: Option<(Option<i64>, Option<i64>)>,
) {
    let query = RecipeListQuery {
        tags: vec!["lunch".to_owned()],
        author: None,
        is_favorited,
        is_in_shopping_cart,
    };
    let filter = RecipeFilter::for_viewer(query, viewer.map(UserId::new));

    let bound = filter.map(|f| {
        assert_eq!(f.tags, vec!["lunch".to_owned()]);
        (
            f.favorited_by.map(UserId::get),
            f.in_cart_of.map(UserId::get),
        )
    });
    assert_eq!(bound, expected);
}

#[given("a recipe that lists salt twice")]
fn a_recipe_listing_salt_twice() -> RecipeInput {
    RecipeInput {
        ingredients: vec![(11, 5), (12, 1), (11, 3)],
        ..input()
    }
}

#[when("the recipe is submitted")]
fn the_recipe_is_submitted(input: RecipeInput) -> Result<RecipeDraft, RecipeValidationError> {
    RecipeDraft::for_create(input)
}

#[then("the submission is rejected as a duplicate ingredient")]
fn rejected_as_duplicate(result: Result<RecipeDraft, RecipeValidationError>) {
    assert_eq!(
        result.expect_err("duplicate"),
        RecipeValidationError::DuplicateIngredient { id: 11 }
    );
}

#[rstest]
fn submitting_a_recipe_with_a_repeated_ingredient() {
    let input = a_recipe_listing_salt_twice();
    let result = the_recipe_is_submitted(input);
    rejected_as_duplicate(result);
}
