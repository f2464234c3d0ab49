//! Recipe aggregate: validated write input and the read-side views.
//!
//! A recipe owns its ingredient lines and tag links. Writes always replace
//! both sets wholesale, so [`RecipeDraft`] carries the complete composition.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Error;
use super::catalogue::{Ingredient, IngredientId, Tag, TagId};
use super::user::{UserId, UserProfile};

/// Maximum length of a recipe name.
pub const RECIPE_NAME_MAX: usize = 30;
/// Maximum length of a recipe description.
pub const RECIPE_TEXT_MAX: usize = 128;
/// Upper bound shared by cooking times and ingredient amounts.
pub const SMALL_INT_MAX: i64 = i16::MAX as i64;

/// Database identifier of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(i64);

impl RecipeId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reasons a recipe write is refused before touching storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeValidationError {
    EmptyName,
    NameTooLong { max: usize },
    EmptyText,
    TextTooLong { max: usize },
    MissingImage,
    CookingTimeOutOfRange { value: i64 },
    EmptyIngredients,
    DuplicateIngredient { id: i64 },
    NegativeAmount { id: i64, amount: i64 },
    AmountTooLarge { id: i64, amount: i64 },
    DuplicateTag { id: i64 },
    UnknownIngredient { id: i64 },
    UnknownTag { id: i64 },
}

impl RecipeValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::EmptyText | Self::TextTooLong { .. } => "text",
            Self::MissingImage => "image",
            Self::CookingTimeOutOfRange { .. } => "cooking_time",
            Self::EmptyIngredients
            | Self::DuplicateIngredient { .. }
            | Self::NegativeAmount { .. }
            | Self::AmountTooLarge { .. }
            | Self::UnknownIngredient { .. } => "ingredients",
            Self::DuplicateTag { .. } | Self::UnknownTag { .. } => "tags",
        }
    }

    /// Machine-readable validation code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::EmptyText | Self::MissingImage | Self::EmptyIngredients => {
                "required"
            }
            Self::NameTooLong { .. } | Self::TextTooLong { .. } => "too_long",
            Self::CookingTimeOutOfRange { .. } => "cooking_time_out_of_range",
            Self::DuplicateIngredient { .. } => "duplicate_ingredient",
            Self::NegativeAmount { .. } => "negative_amount",
            Self::AmountTooLarge { .. } => "amount_too_large",
            Self::DuplicateTag { .. } => "duplicate_tag",
            Self::UnknownIngredient { .. } => "unknown_ingredient",
            Self::UnknownTag { .. } => "unknown_tag",
        }
    }
}

impl fmt::Display for RecipeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "recipe name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "recipe name must be at most {max} characters")
            }
            Self::EmptyText => write!(f, "recipe text must not be empty"),
            Self::TextTooLong { max } => {
                write!(f, "recipe text must be at most {max} characters")
            }
            Self::MissingImage => write!(f, "recipe image is required"),
            Self::CookingTimeOutOfRange { value } => write!(
                f,
                "cooking time must be between 1 and {SMALL_INT_MAX} minutes, got {value}",
            ),
            Self::EmptyIngredients => write!(f, "a recipe needs at least one ingredient"),
            Self::DuplicateIngredient { id } => {
                write!(f, "duplicate ingredient: {id} is listed more than once")
            }
            Self::NegativeAmount { id, amount } => {
                write!(f, "amount of ingredient {id} must not be negative, got {amount}")
            }
            Self::AmountTooLarge { id, amount } => write!(
                f,
                "amount of ingredient {id} must be at most {SMALL_INT_MAX}, got {amount}",
            ),
            Self::DuplicateTag { id } => write!(f, "tag {id} is listed more than once"),
            Self::UnknownIngredient { id } => write!(f, "ingredient {id} does not exist"),
            Self::UnknownTag { id } => write!(f, "tag {id} does not exist"),
        }
    }
}

impl std::error::Error for RecipeValidationError {}

impl From<RecipeValidationError> for Error {
    fn from(value: RecipeValidationError) -> Self {
        Error::field(value.field(), value.code(), value.to_string())
    }
}

/// Unvalidated recipe write payload as received from an adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeInput {
    pub name: String,
    pub text: String,
    pub image: Option<String>,
    pub cooking_time: i64,
    /// `(ingredient_id, amount)` pairs in the order the client sent them.
    pub ingredients: Vec<(i64, i64)>,
    pub tags: Vec<i64>,
}

/// One ingredient line of a recipe write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub ingredient_id: IngredientId,
    pub amount: i16,
}

/// Validated recipe write.
///
/// ## Invariants
/// - `name` and `text` are non-empty and within their length limits;
/// - `cooking_time` is at least one minute;
/// - `ingredients` is non-empty, holds no ingredient twice, and every amount
///   lies in `0..=32767`;
/// - `tags` holds no tag twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    name: String,
    text: String,
    image: Option<String>,
    cooking_time: i16,
    ingredients: Vec<IngredientAmount>,
    tags: Vec<TagId>,
}

impl RecipeDraft {
    /// Validate a payload for recipe creation, where the image is required.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::{RecipeDraft, RecipeInput, RecipeValidationError};
    ///
    /// let input = RecipeInput {
    ///     name: "Omelette".into(),
    ///     text: "Whisk and fry.".into(),
    ///     image: Some("data:image/png;base64,AAAA".into()),
    ///     cooking_time: 10,
    ///     ingredients: vec![(1, 3), (1, 2)],
    ///     tags: vec![1],
    /// };
    /// let err = RecipeDraft::for_create(input).expect_err("duplicate ingredient");
    /// assert_eq!(err, RecipeValidationError::DuplicateIngredient { id: 1 });
    /// ```
    pub fn for_create(input: RecipeInput) -> Result<Self, RecipeValidationError> {
        let draft = Self::validate(input)?;
        if draft.image.is_none() {
            return Err(RecipeValidationError::MissingImage);
        }
        Ok(draft)
    }

    /// Validate a payload for recipe update, where the image may be omitted
    /// to keep the stored one.
    pub fn for_update(input: RecipeInput) -> Result<Self, RecipeValidationError> {
        Self::validate(input)
    }

    fn validate(input: RecipeInput) -> Result<Self, RecipeValidationError> {
        let RecipeInput {
            name,
            text,
            image,
            cooking_time,
            ingredients,
            tags,
        } = input;

        let name = bounded_text(
            name,
            RECIPE_NAME_MAX,
            RecipeValidationError::EmptyName,
            RecipeValidationError::NameTooLong {
                max: RECIPE_NAME_MAX,
            },
        )?;
        let text = bounded_text(
            text,
            RECIPE_TEXT_MAX,
            RecipeValidationError::EmptyText,
            RecipeValidationError::TextTooLong {
                max: RECIPE_TEXT_MAX,
            },
        )?;
        let image = image.filter(|value| !value.trim().is_empty());

        let cooking_time = i16::try_from(cooking_time)
            .ok()
            .filter(|minutes| *minutes >= 1)
            .ok_or(RecipeValidationError::CookingTimeOutOfRange {
                value: cooking_time,
            })?;

        let ingredients = validate_ingredients(ingredients)?;
        let tags = validate_tags(tags)?;

        Ok(Self {
            name,
            text,
            image,
            cooking_time,
            ingredients,
            tags,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// New image reference; `None` keeps the stored image on update.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn cooking_time(&self) -> i16 {
        self.cooking_time
    }

    pub fn ingredients(&self) -> &[IngredientAmount] {
        &self.ingredients
    }

    pub fn tags(&self) -> &[TagId] {
        &self.tags
    }
}

fn bounded_text(
    raw: String,
    max: usize,
    empty: RecipeValidationError,
    too_long: RecipeValidationError,
) -> Result<String, RecipeValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    if trimmed.chars().count() > max {
        return Err(too_long);
    }
    Ok(trimmed.to_owned())
}

fn validate_ingredients(
    raw: Vec<(i64, i64)>,
) -> Result<Vec<IngredientAmount>, RecipeValidationError> {
    if raw.is_empty() {
        return Err(RecipeValidationError::EmptyIngredients);
    }
    let mut seen = HashSet::with_capacity(raw.len());
    raw.into_iter()
        .map(|(id, amount)| {
            if !seen.insert(id) {
                return Err(RecipeValidationError::DuplicateIngredient { id });
            }
            if amount < 0 {
                return Err(RecipeValidationError::NegativeAmount { id, amount });
            }
            let amount = i16::try_from(amount)
                .map_err(|_| RecipeValidationError::AmountTooLarge { id, amount })?;
            Ok(IngredientAmount {
                ingredient_id: IngredientId::new(id),
                amount,
            })
        })
        .collect()
}

fn validate_tags(raw: Vec<i64>) -> Result<Vec<TagId>, RecipeValidationError> {
    let mut seen = HashSet::with_capacity(raw.len());
    raw.into_iter()
        .map(|id| {
            if seen.insert(id) {
                Ok(TagId::new(id))
            } else {
                Err(RecipeValidationError::DuplicateTag { id })
            }
        })
        .collect()
}

/// Stored recipe columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRecord {
    pub id: RecipeId,
    pub author_id: UserId,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i16,
    /// Set once on creation and never changed.
    pub pub_date: DateTime<Utc>,
}

/// Ingredient joined with the amount one recipe uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredientLine {
    pub ingredient: Ingredient,
    pub amount: i16,
}

/// Short recipe representation used in lists nested under other resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub name: String,
    pub image: String,
    pub cooking_time: i16,
}

impl From<&RecipeRecord> for RecipeSummary {
    fn from(value: &RecipeRecord) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            image: value.image.clone(),
            cooking_time: value.cooking_time,
        }
    }
}

impl From<RecipeRecord> for RecipeSummary {
    fn from(value: RecipeRecord) -> Self {
        Self {
            id: value.id,
            name: value.name,
            image: value.image,
            cooking_time: value.cooking_time,
        }
    }
}

/// Fully assembled recipe as seen by one actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDetail {
    pub recipe: RecipeRecord,
    pub author: UserProfile,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<RecipeIngredientLine>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Filters a client may put on the recipe list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeListQuery {
    /// Tag slugs; a recipe matches when it carries any of them.
    pub tags: Vec<String>,
    pub author: Option<UserId>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Storage-level recipe filter with relationship flags bound to a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub tags: Vec<String>,
    pub author: Option<UserId>,
    pub favorited_by: Option<UserId>,
    pub in_cart_of: Option<UserId>,
}

impl RecipeFilter {
    /// Bind relationship flags to `viewer`.
    ///
    /// Returns `None` when an anonymous viewer asks for favourites or cart
    /// contents: the result is known to be empty without a query.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::{RecipeFilter, RecipeListQuery};
    ///
    /// let query = RecipeListQuery { is_favorited: true, ..RecipeListQuery::default() };
    /// assert!(RecipeFilter::for_viewer(query, None).is_none());
    /// ```
    pub fn for_viewer(query: RecipeListQuery, viewer: Option<UserId>) -> Option<Self> {
        let RecipeListQuery {
            tags,
            author,
            is_favorited,
            is_in_shopping_cart,
        } = query;
        if viewer.is_none() && (is_favorited || is_in_shopping_cart) {
            return None;
        }
        Some(Self {
            tags,
            author,
            favorited_by: viewer.filter(|_| is_favorited),
            in_cart_of: viewer.filter(|_| is_in_shopping_cart),
        })
    }
}

#[cfg(test)]
mod tests;
