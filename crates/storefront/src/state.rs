//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use crate::cart::{CartSnapshot, CartStore};
use crate::config::StorefrontConfig;
use crate::shopify::StorefrontClient;

/// How long an idle in-memory cart store is kept before it is dropped.
/// A dropped store is rehydrated from its session snapshot on next access.
const CART_STORE_IDLE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// The per-session cart store registry.
pub type CartRegistry = Cache<String, Arc<CartStore<StorefrontClient>>>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and the Storefront API client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    storefront: StorefrontClient,
    carts: CartRegistry,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let storefront = StorefrontClient::new(&config.shopify);
        let carts = Cache::builder()
            .max_capacity(10_000)
            .time_to_idle(CART_STORE_IDLE_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                storefront,
                carts,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the Storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }

    /// Get or create the cart store for a cart key, rehydrating from the
    /// given persisted snapshot when the store is not already in memory.
    pub async fn cart_store(
        &self,
        cart_key: String,
        snapshot: CartSnapshot,
    ) -> Arc<CartStore<StorefrontClient>> {
        let storefront = self.inner.storefront.clone();
        self.inner
            .carts
            .get_with(cart_key, async move {
                Arc::new(CartStore::rehydrate(storefront, snapshot))
            })
            .await
    }

    /// Drop a cart store from the registry (explicit cart teardown).
    pub async fn evict_cart_store(&self, cart_key: &str) {
        self.inner.carts.invalidate(cart_key).await;
    }
}
