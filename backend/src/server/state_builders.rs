//! Wiring of Diesel repositories into the services behind each driving port.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use foodgram::domain::{AccountService, CatalogueService, RecipeService, RelationshipService};
use foodgram::inbound::http::state::{HttpState, HttpStatePorts};
use foodgram::outbound::persistence::{
    DbPool, DieselAuthTokenRepository, DieselCatalogueRepository, DieselRecipeRepository,
    DieselRelationshipRepository, DieselUserRepository,
};
use foodgram::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Repository adapters sharing one pool.
struct Repositories {
    users: Arc<DieselUserRepository>,
    tokens: Arc<DieselAuthTokenRepository>,
    catalogue: Arc<DieselCatalogueRepository>,
    recipes: Arc<DieselRecipeRepository>,
    relationships: Arc<DieselRelationshipRepository>,
}

impl Repositories {
    fn new(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            tokens: Arc::new(DieselAuthTokenRepository::new(pool.clone())),
            catalogue: Arc::new(DieselCatalogueRepository::new(pool.clone())),
            recipes: Arc::new(DieselRecipeRepository::new(pool.clone())),
            relationships: Arc::new(DieselRelationshipRepository::new(pool.clone())),
        }
    }
}

/// Build the shared handler state from the server configuration.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let repos = Repositories::new(&config.db_pool);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let accounts = Arc::new(AccountService::new(
        repos.users.clone(),
        repos.tokens,
        Arc::new(Argon2PasswordHasher::new()),
        repos.relationships.clone(),
        clock.clone(),
    ));
    let catalogue = Arc::new(CatalogueService::new(repos.catalogue.clone()));
    let recipes = Arc::new(RecipeService::new(
        repos.recipes.clone(),
        repos.catalogue,
        repos.users.clone(),
        repos.relationships.clone(),
        clock.clone(),
    ));
    let relationships = Arc::new(
        RelationshipService::new(repos.recipes, repos.users, repos.relationships, clock)
            .with_recipes_limit(config.recipes_limit),
    );

    let state = HttpState::new(HttpStatePorts {
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
    .with_page_size(config.page_size);
    web::Data::new(state)
}
