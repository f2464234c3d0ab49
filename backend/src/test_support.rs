//! In-memory port implementations for integration and behaviour tests.
//!
//! Compiled with the `test-support` feature. The store behaves like the
//! Diesel repositories (ordering, uniqueness, cascading deletes) so tests can
//! drive the real domain services without PostgreSQL.

mod clock;
mod store;

use std::sync::Arc;

use mockable::Clock;

pub use clock::MutableClock;
pub use store::{InMemoryStore, PlainTextHasher};

use crate::domain::{AccountService, CatalogueService, RecipeService, RelationshipService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Wire every driving port to services backed by `store`.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use foodgram::test_support::{InMemoryStore, MutableClock, http_state};
///
/// let store = Arc::new(InMemoryStore::new());
/// let clock = Arc::new(MutableClock::default());
/// let state = http_state(store, clock, 6);
/// assert_eq!(state.page_size, 6);
/// ```
pub fn http_state(store: Arc<InMemoryStore>, clock: Arc<dyn Clock>, page_size: u32) -> HttpState {
    let hasher = Arc::new(PlainTextHasher);
    let accounts = Arc::new(AccountService::new(
        store.clone(),
        store.clone(),
        hasher,
        store.clone(),
        clock.clone(),
    ));
    let catalogue = Arc::new(CatalogueService::new(store.clone()));
    let recipes = Arc::new(RecipeService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        clock.clone(),
    ));
    let relationships = Arc::new(RelationshipService::new(
        store.clone(),
        store.clone(),
        store,
        clock,
    ));
    HttpState::new(HttpStatePorts {
        login: accounts.clone(),
        accounts: accounts.clone(),
        users: accounts,
        catalogue,
        recipes: recipes.clone(),
        recipes_query: recipes,
        relationships: relationships.clone(),
        subscriptions: relationships.clone(),
        shopping_list: relationships,
    })
    .with_page_size(page_size)
}
