//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only ever talk to driving
//! ports, so they can be exercised with mocks and no database.

use std::sync::Arc;

use pagination::DEFAULT_PAGE_SIZE;

use crate::domain::ports::{
    AccountCommand, CatalogueQuery, LoginService, RecipeCommand, RecipeQuery, RelationshipCommand,
    ShoppingListQuery, SubscriptionsQuery, UsersQuery,
};

/// Parameter object bundling every driving port the handlers call.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub recipes: Arc<dyn RecipeCommand>,
    pub recipes_query: Arc<dyn RecipeQuery>,
    pub relationships: Arc<dyn RelationshipCommand>,
    pub subscriptions: Arc<dyn SubscriptionsQuery>,
    pub shopping_list: Arc<dyn ShoppingListQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub recipes: Arc<dyn RecipeCommand>,
    pub recipes_query: Arc<dyn RecipeQuery>,
    pub relationships: Arc<dyn RelationshipCommand>,
    pub subscriptions: Arc<dyn SubscriptionsQuery>,
    pub shopping_list: Arc<dyn ShoppingListQuery>,
    /// Page size used when a list request carries no `limit`.
    pub page_size: u32,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state with the default page size.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            accounts,
            users,
            catalogue,
            recipes,
            recipes_query,
            relationships,
            subscriptions,
            shopping_list,
        } = ports;
        Self {
            login,
            accounts,
            users,
            catalogue,
            recipes,
            recipes_query,
            relationships,
            subscriptions,
            shopping_list,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the default page size for list endpoints.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}
