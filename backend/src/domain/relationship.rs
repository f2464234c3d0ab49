//! User-to-recipe and user-to-user relationships.

use std::fmt;

use super::recipe::RecipeSummary;
use super::user::UserProfile;

/// Per-user recipe collection toggled through add/remove endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeListKind {
    Favorites,
    ShoppingCart,
}

impl RecipeListKind {
    /// Human-readable collection name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::ShoppingCart => "shopping cart",
        }
    }
}

impl fmt::Display for RecipeListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An author as listed on the follower's subscriptions page.
///
/// `recipes` is capped by the configured limit; `recipes_count` is the
/// author's true total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowedAuthor {
    pub profile: UserProfile,
    pub recipes: Vec<RecipeSummary>,
    pub recipes_count: u64,
}
