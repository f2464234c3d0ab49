//! HTTP server configuration object.

use foodgram::domain::DEFAULT_RECIPES_LIMIT;
use foodgram::outbound::persistence::DbPool;
use pagination::DEFAULT_PAGE_SIZE;
use std::net::SocketAddr;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) page_size: u32,
    pub(crate) recipes_limit: u32,
}

impl ServerConfig {
    /// Serve on `bind_addr` with repositories backed by `db_pool`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self {
            bind_addr,
            db_pool,
            page_size: DEFAULT_PAGE_SIZE,
            recipes_limit: DEFAULT_RECIPES_LIMIT,
        }
    }

    /// Page size for list endpoints called without `limit`.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Recipes nested per followed author when the request sets no limit.
    #[must_use]
    pub fn with_recipes_limit(mut self, recipes_limit: u32) -> Self {
        self.recipes_limit = recipes_limit;
        self
    }
}
