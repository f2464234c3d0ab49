//! Driving port for the aggregated shopping list download.

use async_trait::async_trait;

use crate::domain::{Actor, Error, ShoppingList};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShoppingListQuery: Send + Sync {
    async fn shopping_list(&self, actor: &Actor) -> Result<ShoppingList, Error>;
}
