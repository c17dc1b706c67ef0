use std::sync::Arc;

use chrono::Duration;

use crate::application::auth_service::AuthService;
use crate::application::cart_service::CartService;
use crate::application::catalog_service::CatalogService;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::domain::cart::StockCheck;
use crate::domain::ports::{CartRepository, CatalogStore, IdentityStore, PasswordHasher};
use crate::infrastructure::cart_repo::DieselCartRepository;
use crate::infrastructure::memory::{
    InMemoryCartRepository, InMemoryCatalogStore, InMemoryIdentityStore,
};
use crate::infrastructure::password::Argon2PasswordHasher;
use crate::infrastructure::product_repo::DieselCatalogStore;
use crate::infrastructure::token::HmacTokenService;
use crate::infrastructure::user_repo::DieselIdentityStore;

/// Services shared by every worker. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub catalog: Arc<CatalogService>,
    pub carts: Arc<CartService>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn IdentityStore>,
        products: Arc<dyn CatalogStore>,
        carts: Arc<dyn CartRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: HmacTokenService,
        stock_check: StockCheck,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::new(users, hasher, Arc::new(tokens))),
            catalog: Arc::new(CatalogService::new(products.clone())),
            carts: Arc::new(CartService::new(carts, products, stock_check)),
        }
    }

    /// Postgres-backed state for the running service.
    pub fn from_pool(pool: DbPool, config: &AppConfig) -> Self {
        Self::new(
            Arc::new(DieselIdentityStore::new(pool.clone())),
            Arc::new(DieselCatalogStore::new(pool.clone())),
            Arc::new(DieselCartRepository::new(pool)),
            Arc::new(Argon2PasswordHasher),
            HmacTokenService::new(
                config.token_secret.as_bytes(),
                Duration::seconds(config.token_ttl_secs),
            ),
            config.stock_check,
        )
    }

    /// State backed by the in-memory adapters.
    pub fn in_memory(
        token_secret: &str,
        hasher: Arc<dyn PasswordHasher>,
        stock_check: StockCheck,
    ) -> Self {
        Self::new(
            Arc::new(InMemoryIdentityStore::new()),
            Arc::new(InMemoryCatalogStore::new()),
            Arc::new(InMemoryCartRepository::new()),
            hasher,
            HmacTokenService::new(token_secret.as_bytes(), Duration::hours(1)),
            stock_check,
        )
    }
}
