//! Diesel table definitions for the foodgram schema.
//!
//! These must match `backend/migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `email` and `username` are unique.
    users (id) {
        id -> Int8,
        email -> Varchar,
        username -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        password_hash -> Varchar,
        is_admin -> Bool,
        date_joined -> Timestamptz,
    }
}

diesel::table! {
    /// Issued API tokens, keyed by the SHA-256 digest of the token key.
    auth_tokens (digest) {
        digest -> Varchar,
        user_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    tags (id) {
        id -> Int8,
        name -> Varchar,
        color -> Varchar,
        slug -> Varchar,
    }
}

diesel::table! {
    ingredients (id) {
        id -> Int8,
        name -> Varchar,
        measurement_unit -> Varchar,
    }
}

diesel::table! {
    recipes (id) {
        id -> Int8,
        author_id -> Int8,
        name -> Varchar,
        image -> Varchar,
        text -> Varchar,
        cooking_time -> Int2,
        pub_date -> Timestamptz,
    }
}

diesel::table! {
    /// Per-recipe ingredient amounts; unique on `(recipe_id, ingredient_id)`.
    recipe_ingredients (id) {
        id -> Int8,
        recipe_id -> Int8,
        ingredient_id -> Int8,
        amount -> Int2,
    }
}

diesel::table! {
    recipe_tags (recipe_id, tag_id) {
        recipe_id -> Int8,
        tag_id -> Int8,
    }
}

diesel::table! {
    /// Subscriptions; `user_id` follows `author_id`.
    follows (user_id, author_id) {
        user_id -> Int8,
        author_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    favorites (user_id, recipe_id) {
        user_id -> Int8,
        recipe_id -> Int8,
        added_at -> Timestamptz,
    }
}

diesel::table! {
    shopping_cart (user_id, recipe_id) {
        user_id -> Int8,
        recipe_id -> Int8,
        added_at -> Timestamptz,
    }
}

diesel::joinable!(auth_tokens -> users (user_id));
diesel::joinable!(recipes -> users (author_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> ingredients (ingredient_id));
diesel::joinable!(recipe_tags -> recipes (recipe_id));
diesel::joinable!(recipe_tags -> tags (tag_id));
diesel::joinable!(favorites -> recipes (recipe_id));
diesel::joinable!(shopping_cart -> recipes (recipe_id));

diesel::allow_tables_to_appear_in_same_query!(
    auth_tokens,
    favorites,
    follows,
    ingredients,
    recipe_ingredients,
    recipe_tags,
    recipes,
    shopping_cart,
    tags,
    users,
);
