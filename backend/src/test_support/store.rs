//! One mutex-guarded store implementing every repository port.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::PageRequest;

use crate::domain::ports::{
    AuthTokenRepository, AuthTokenRepositoryError, CatalogueRepository, CatalogueRepositoryError,
    NewUserRecord, PasswordHasher, PasswordHasherError, RecipeRepository, RecipeRepositoryError,
    RelationshipRepository, RelationshipRepositoryError, StoredCredentials, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    Actor, CartIngredientRow, Ingredient, IngredientAmount, IngredientId, Password, PasswordHash,
    RecipeDraft, RecipeFilter, RecipeId, RecipeIngredientLine, RecipeListKind, RecipeRecord, Tag,
    TagId, TokenDigest, User, UserId,
};

const PLAIN_PREFIX: &str = "plain$";

/// Hasher that stores passwords behind a marker prefix. Tests only.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextHasher;

impl PasswordHasher for PlainTextHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError> {
        Ok(PasswordHash::new(format!("{PLAIN_PREFIX}{}", password.expose())))
    }

    fn verify(&self, candidate: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        hash.as_str()
            .strip_prefix(PLAIN_PREFIX)
            .map(|stored| stored == candidate)
            .ok_or_else(|| PasswordHasherError::hash("not a plain-text hash"))
    }
}

struct StoredRecipe {
    record: RecipeRecord,
    ingredients: Vec<IngredientAmount>,
    tags: Vec<TagId>,
}

struct Membership {
    user_id: UserId,
    target: i64,
    at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    users: Vec<(User, PasswordHash)>,
    tokens: HashMap<String, UserId>,
    tags: Vec<Tag>,
    ingredients: Vec<Ingredient>,
    recipes: Vec<StoredRecipe>,
    lists: HashMap<RecipeListKind, Vec<Membership>>,
    follows: Vec<Membership>,
    next_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user(&self, id: UserId) -> Option<&User> {
        self.users
            .iter()
            .map(|(user, _)| user)
            .find(|user| user.id == id)
    }

    fn recipe(&self, id: RecipeId) -> Option<&StoredRecipe> {
        self.recipes.iter().find(|stored| stored.record.id == id)
    }

    fn ingredient(&self, id: IngredientId) -> Option<&Ingredient> {
        self.ingredients.iter().find(|ingredient| ingredient.id == id)
    }

    fn list(&self, kind: RecipeListKind) -> &[Membership] {
        self.lists.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    fn in_list(&self, kind: RecipeListKind, user_id: UserId, recipe_id: RecipeId) -> bool {
        self.list(kind)
            .iter()
            .any(|entry| entry.user_id == user_id && entry.target == recipe_id.get())
    }

    fn matches(&self, stored: &StoredRecipe, filter: &RecipeFilter) -> bool {
        let record = &stored.record;
        if filter.author.is_some_and(|author| author != record.author_id) {
            return false;
        }
        if !filter.tags.is_empty() {
            let tagged = stored.tags.iter().any(|tag_id| {
                self.tags
                    .iter()
                    .any(|tag| tag.id == *tag_id && filter.tags.contains(&tag.slug))
            });
            if !tagged {
                return false;
            }
        }
        let listed = |kind, user| self.in_list(kind, user, record.id);
        if filter
            .favorited_by
            .is_some_and(|user| !listed(RecipeListKind::Favorites, user))
        {
            return false;
        }
        !filter
            .in_cart_of
            .is_some_and(|user| !listed(RecipeListKind::ShoppingCart, user))
    }
}

/// Recipe default ordering: name, then publication time, then id.
fn recipe_order(a: &RecipeRecord, b: &RecipeRecord) -> Ordering {
    a.name
        .cmp(&b.name)
        .then(a.pub_date.cmp(&b.pub_date))
        .then(a.id.cmp(&b.id))
}

fn page_slice<T: Clone>(items: &[T], page: PageRequest) -> Vec<T> {
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    items.iter().skip(offset).take(limit).cloned().collect()
}

fn missing<Id: Copy + PartialEq>(requested: &[Id], present: impl Fn(Id) -> bool) -> Vec<Id> {
    let mut absent: Vec<Id> = Vec::new();
    for id in requested {
        if !present(*id) && !absent.contains(id) {
            absent.push(*id);
        }
    }
    absent
}

/// In-memory stand-in for the PostgreSQL schema.
///
/// Ids come from one shared sequence, so a user and a recipe never share an
/// id. That keeps test assertions unambiguous.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a tag.
    pub fn add_tag(&self, name: &str, color: &str, slug: &str) -> Tag {
        let mut state = self.state();
        let tag = Tag {
            id: TagId::new(state.next_id()),
            name: name.to_owned(),
            color: color.to_owned(),
            slug: slug.to_owned(),
        };
        state.tags.push(tag.clone());
        tag
    }

    /// Seed an ingredient. Names may repeat with different units.
    pub fn add_ingredient(&self, name: &str, measurement_unit: &str) -> Ingredient {
        let mut state = self.state();
        let ingredient = Ingredient {
            id: IngredientId::new(state.next_id()),
            name: name.to_owned(),
            measurement_unit: measurement_unit.to_owned(),
        };
        state.ingredients.push(ingredient.clone());
        ingredient
    }

    /// Grant administrator rights to an existing user.
    pub fn promote(&self, id: UserId) {
        let mut state = self.state();
        if let Some((user, _)) = state.users.iter_mut().find(|(user, _)| user.id == id) {
            user.is_admin = true;
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &NewUserRecord) -> Result<User, UserPersistenceError> {
        let mut state = self.state();
        for (existing, _) in &state.users {
            if existing.email == user.email {
                return Err(UserPersistenceError::duplicate_field("email"));
            }
            if existing.username == user.username {
                return Err(UserPersistenceError::duplicate_field("username"));
            }
        }
        let created = User {
            id: UserId::new(state.next_id()),
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_admin: false,
        };
        state
            .users
            .push((created.clone(), user.password_hash.clone()));
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.state().user(id).cloned())
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        Ok(self
            .state()
            .users
            .iter()
            .find(|(user, _)| user.email == email)
            .map(|(user, hash)| StoredCredentials {
                user: user.clone(),
                password_hash: hash.clone(),
            }))
    }

    async fn find_password_hash(
        &self,
        id: UserId,
    ) -> Result<Option<PasswordHash>, UserPersistenceError> {
        Ok(self
            .state()
            .users
            .iter()
            .find(|(user, _)| user.id == id)
            .map(|(_, hash)| hash.clone()))
    }

    async fn update_password_hash(
        &self,
        id: UserId,
        hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut state = self.state();
        if let Some((_, stored)) = state.users.iter_mut().find(|(user, _)| user.id == id) {
            *stored = hash.clone();
        }
        Ok(())
    }

    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), UserPersistenceError> {
        let state = self.state();
        let mut users: Vec<User> = state.users.iter().map(|(user, _)| user.clone()).collect();
        users.sort_by(|a, b| a.username.cmp(&b.username).then(a.id.cmp(&b.id)));
        Ok((page_slice(&users, page), users.len() as u64))
    }
}

#[async_trait]
impl AuthTokenRepository for InMemoryStore {
    async fn store(
        &self,
        user_id: UserId,
        digest: &TokenDigest,
        _issued_at: DateTime<Utc>,
    ) -> Result<(), AuthTokenRepositoryError> {
        self.state()
            .tokens
            .insert(digest.as_str().to_owned(), user_id);
        Ok(())
    }

    async fn find_actor(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<Actor>, AuthTokenRepositoryError> {
        let state = self.state();
        Ok(state
            .tokens
            .get(digest.as_str())
            .and_then(|id| state.user(*id))
            .map(|user| Actor {
                user_id: user.id,
                is_admin: user.is_admin,
            }))
    }

    async fn revoke(&self, digest: &TokenDigest) -> Result<bool, AuthTokenRepositoryError> {
        Ok(self.state().tokens.remove(digest.as_str()).is_some())
    }
}

#[async_trait]
impl CatalogueRepository for InMemoryStore {
    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError> {
        Ok(self.state().tags.clone())
    }

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, CatalogueRepositoryError> {
        Ok(self.state().tags.iter().find(|tag| tag.id == id).cloned())
    }

    async fn list_ingredients(
        &self,
        name_prefix: Option<String>,
    ) -> Result<Vec<Ingredient>, CatalogueRepositoryError> {
        let prefix = name_prefix.map(|prefix| prefix.to_lowercase());
        let mut found: Vec<Ingredient> = self
            .state()
            .ingredients
            .iter()
            .filter(|ingredient| {
                prefix
                    .as_deref()
                    .is_none_or(|prefix| ingredient.name.to_lowercase().starts_with(prefix))
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError> {
        Ok(self.state().ingredient(id).cloned())
    }

    async fn missing_ingredients(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, CatalogueRepositoryError> {
        let state = self.state();
        Ok(missing(ids, |id| state.ingredient(id).is_some()))
    }

    async fn missing_tags(&self, ids: &[TagId]) -> Result<Vec<TagId>, CatalogueRepositoryError> {
        let state = self.state();
        Ok(missing(ids, |id| state.tags.iter().any(|tag| tag.id == id)))
    }
}

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn create(
        &self,
        author_id: UserId,
        draft: &RecipeDraft,
        pub_date: DateTime<Utc>,
    ) -> Result<RecipeRecord, RecipeRepositoryError> {
        let mut state = self.state();
        let record = RecipeRecord {
            id: RecipeId::new(state.next_id()),
            author_id,
            name: draft.name().to_owned(),
            image: draft.image().map(str::to_owned).unwrap_or_default(),
            text: draft.text().to_owned(),
            cooking_time: draft.cooking_time(),
            pub_date,
        };
        state.recipes.push(StoredRecipe {
            record: record.clone(),
            ingredients: draft.ingredients().to_vec(),
            tags: draft.tags().to_vec(),
        });
        Ok(record)
    }

    async fn update(
        &self,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<RecipeRecord, RecipeRepositoryError> {
        let mut state = self.state();
        let stored = state
            .recipes
            .iter_mut()
            .find(|stored| stored.record.id == id)
            .ok_or_else(|| RecipeRepositoryError::not_found(id.get()))?;
        stored.record.name = draft.name().to_owned();
        stored.record.text = draft.text().to_owned();
        stored.record.cooking_time = draft.cooking_time();
        if let Some(image) = draft.image() {
            stored.record.image = image.to_owned();
        }
        stored.ingredients = draft.ingredients().to_vec();
        stored.tags = draft.tags().to_vec();
        Ok(stored.record.clone())
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut state = self.state();
        let before = state.recipes.len();
        state.recipes.retain(|stored| stored.record.id != id);
        for entries in state.lists.values_mut() {
            entries.retain(|entry| entry.target != id.get());
        }
        Ok(state.recipes.len() != before)
    }

    async fn find(&self, id: RecipeId) -> Result<Option<RecipeRecord>, RecipeRepositoryError> {
        Ok(self.state().recipe(id).map(|stored| stored.record.clone()))
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<(Vec<RecipeRecord>, u64), RecipeRepositoryError> {
        let state = self.state();
        let mut matched: Vec<RecipeRecord> = state
            .recipes
            .iter()
            .filter(|stored| state.matches(stored, filter))
            .map(|stored| stored.record.clone())
            .collect();
        matched.sort_by(recipe_order);
        Ok((page_slice(&matched, page), matched.len() as u64))
    }

    async fn ingredient_lines(
        &self,
        id: RecipeId,
    ) -> Result<Vec<RecipeIngredientLine>, RecipeRepositoryError> {
        let state = self.state();
        let Some(stored) = state.recipe(id) else {
            return Ok(Vec::new());
        };
        Ok(stored
            .ingredients
            .iter()
            .filter_map(|line| {
                state.ingredient(line.ingredient_id).map(|ingredient| RecipeIngredientLine {
                    ingredient: ingredient.clone(),
                    amount: line.amount,
                })
            })
            .collect())
    }

    async fn tags(&self, id: RecipeId) -> Result<Vec<Tag>, RecipeRepositoryError> {
        let state = self.state();
        let Some(stored) = state.recipe(id) else {
            return Ok(Vec::new());
        };
        let mut tags: Vec<Tag> = state
            .tags
            .iter()
            .filter(|tag| stored.tags.contains(&tag.id))
            .cloned()
            .collect();
        tags.sort_by_key(|tag| tag.id);
        Ok(tags)
    }

    async fn by_author(
        &self,
        author_id: UserId,
        limit: u32,
    ) -> Result<Vec<RecipeRecord>, RecipeRepositoryError> {
        let mut records: Vec<RecipeRecord> = self
            .state()
            .recipes
            .iter()
            .filter(|stored| stored.record.author_id == author_id)
            .map(|stored| stored.record.clone())
            .collect();
        records.sort_by(recipe_order);
        records.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(records)
    }

    async fn count_by_author(&self, author_id: UserId) -> Result<u64, RecipeRepositoryError> {
        Ok(self
            .state()
            .recipes
            .iter()
            .filter(|stored| stored.record.author_id == author_id)
            .count() as u64)
    }
}

#[async_trait]
impl RelationshipRepository for InMemoryStore {
    async fn add_recipe(
        &self,
        kind: RecipeListKind,
        user_id: UserId,
        recipe_id: RecipeId,
        added_at: DateTime<Utc>,
    ) -> Result<(), RelationshipRepositoryError> {
        let mut state = self.state();
        if state.in_list(kind, user_id, recipe_id) {
            return Err(RelationshipRepositoryError::already_exists());
        }
        state.lists.entry(kind).or_default().push(Membership {
            user_id,
            target: recipe_id.get(),
            at: added_at,
        });
        Ok(())
    }

    async fn remove_recipe(
        &self,
        kind: RecipeListKind,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<bool, RelationshipRepositoryError> {
        let mut state = self.state();
        let Some(entries) = state.lists.get_mut(&kind) else {
            return Ok(false);
        };
        let before = entries.len();
        entries.retain(|entry| !(entry.user_id == user_id && entry.target == recipe_id.get()));
        Ok(entries.len() != before)
    }

    async fn has_recipe(
        &self,
        kind: RecipeListKind,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<bool, RelationshipRepositoryError> {
        Ok(self.state().in_list(kind, user_id, recipe_id))
    }

    async fn follow(
        &self,
        user_id: UserId,
        author_id: UserId,
        followed_at: DateTime<Utc>,
    ) -> Result<(), RelationshipRepositoryError> {
        if user_id == author_id {
            return Err(RelationshipRepositoryError::query(
                "violates check constraint follows_no_self_follow",
            ));
        }
        let mut state = self.state();
        let exists = state
            .follows
            .iter()
            .any(|entry| entry.user_id == user_id && entry.target == author_id.get());
        if exists {
            return Err(RelationshipRepositoryError::already_exists());
        }
        state.follows.push(Membership {
            user_id,
            target: author_id.get(),
            at: followed_at,
        });
        Ok(())
    }

    async fn unfollow(
        &self,
        user_id: UserId,
        author_id: UserId,
    ) -> Result<bool, RelationshipRepositoryError> {
        let mut state = self.state();
        let before = state.follows.len();
        state
            .follows
            .retain(|entry| !(entry.user_id == user_id && entry.target == author_id.get()));
        Ok(state.follows.len() != before)
    }

    async fn is_following(
        &self,
        user_id: UserId,
        author_id: UserId,
    ) -> Result<bool, RelationshipRepositoryError> {
        Ok(self
            .state()
            .follows
            .iter()
            .any(|entry| entry.user_id == user_id && entry.target == author_id.get()))
    }

    async fn followed_authors(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), RelationshipRepositoryError> {
        let state = self.state();
        let mut follows: Vec<&Membership> = state
            .follows
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .collect();
        follows.sort_by(|a, b| b.at.cmp(&a.at).then(a.target.cmp(&b.target)));
        let authors: Vec<User> = follows
            .iter()
            .filter_map(|entry| state.user(UserId::new(entry.target)).cloned())
            .collect();
        Ok((page_slice(&authors, page), authors.len() as u64))
    }

    async fn cart_ingredients(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CartIngredientRow>, RelationshipRepositoryError> {
        let state = self.state();
        let mut cart: Vec<&Membership> = state
            .list(RecipeListKind::ShoppingCart)
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .collect();
        cart.sort_by(|a, b| a.at.cmp(&b.at).then(a.target.cmp(&b.target)));
        Ok(cart
            .iter()
            .filter_map(|entry| state.recipe(RecipeId::new(entry.target)))
            .flat_map(|stored| stored.ingredients.iter())
            .filter_map(|line| {
                state.ingredient(line.ingredient_id).map(|ingredient| CartIngredientRow {
                    name: ingredient.name.clone(),
                    measurement_unit: ingredient.measurement_unit.clone(),
                    amount: line.amount,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn page(page: u32, limit: u32) -> PageRequest {
        PageRequest::new(page, limit).expect("valid page")
    }

    #[rstest]
    #[case(page(1, 2), vec![1, 2])]
    #[case(page(2, 2), vec![3])]
    #[case(page(3, 2), vec![])]
    fn page_slice_windows_the_items(#[case] request: PageRequest, #[case] expected: Vec<i32>) {
        assert_eq!(page_slice(&[1, 2, 3], request), expected);
    }

    #[rstest]
    fn missing_keeps_request_order_without_repeats() {
        let absent = missing(&[4, 1, 4, 9], |id| id == 1);
        assert_eq!(absent, vec![4, 9]);
    }

    #[rstest]
    fn plain_text_hasher_verifies_its_own_hashes() {
        let hasher = PlainTextHasher;
        let password = Password::new("Qwerty123").expect("valid password");
        let hash = hasher.hash(&password).expect("hash");
        assert_eq!(hasher.verify("Qwerty123", &hash), Ok(true));
        assert_eq!(hasher.verify("qwerty123", &hash), Ok(false));
    }
}
