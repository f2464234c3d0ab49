//! Reference data recipes are composed from: tags and ingredients.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! catalogue_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

catalogue_id!(
    /// Database identifier of a tag.
    TagId
);
catalogue_id!(
    /// Database identifier of an ingredient.
    IngredientId
);

/// Label attached to recipes, e.g. "Breakfast".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    /// Hex colour code such as `#E26C2D`.
    pub color: String,
    pub slug: String,
}

/// Ingredient with the unit its amounts are measured in.
///
/// Two ingredients may share a name with different units; nothing enforces
/// `(name, measurement_unit)` uniqueness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}
