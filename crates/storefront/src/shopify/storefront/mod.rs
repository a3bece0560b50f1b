//! Shopify Storefront API client implementation.
//!
//! Posts constant GraphQL documents with `reqwest` and caches catalog
//! responses using `moka` (5-minute TTL). Cart operations are never cached.

mod cache;
mod conversions;
pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use nfluential_core::RemoteCartId;

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::ShopifyError;
use crate::shopify::types::{
    CartLineInput, CartLineUpdateInput, Product, ProductPage, RemoteCart,
};

use cache::CacheValue;
use conversions::{convert_cart, convert_product, convert_product_page};
use queries::{
    CART_CREATE, CART_LINES_ADD, CART_LINES_REMOVE, CART_LINES_UPDATE, CartCreateData, CartData,
    CartLinesAddData, CartLinesRemoveData, CartLinesUpdateData, CartMutationPayload,
    CollectionProductsData, GET_CART, GET_COLLECTION_PRODUCTS, GET_PRODUCT_BY_HANDLE,
    GET_PRODUCTS, GraphQLResponse, ProductByHandleData, ProductsData,
};

/// Catalog cache TTL.
const CATALOG_CACHE_TTL: Duration = Duration::from_secs(300);

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Provides access to the product catalog and remote cart operations.
/// Catalog reads are cached for 5 minutes.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
    cache: Cache<String, CacheValue>,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CATALOG_CACHE_TTL)
            .build();

        let endpoint = format!(
            "https://{}/api/{}/graphql.json",
            config.store, config.api_version
        );

        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint,
                access_token: config.storefront_private_token.expose_secret().to_string(),
                cache,
            }),
        }
    }

    /// Execute a GraphQL document.
    async fn execute<T: DeserializeOwned>(
        &self,
        document: &str,
        variables: serde_json::Value,
    ) -> Result<T, ShopifyError> {
        let request_body = serde_json::json!({
            "query": document,
            "variables": variables,
        });

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            // Private access tokens use a different header than public tokens
            .header(
                "Shopify-Storefront-Private-Token",
                &self.inner.access_token,
            )
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Storefront API returned non-success status"
            );
            return Err(ShopifyError::GraphQL(vec![super::GraphQLError {
                message: format!(
                    "HTTP {status}: {}",
                    response_text.chars().take(200).collect::<String>()
                ),
            }]));
        }

        let response: GraphQLResponse<T> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse Storefront API response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            tracing::debug!(errors = ?errors, "GraphQL errors in response");
            return Err(ShopifyError::GraphQL(errors));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                body = %response_text.chars().take(500).collect::<String>(),
                "Storefront API response has no data and no errors"
            );
            ShopifyError::GraphQL(vec![super::GraphQLError {
                message: "No data in response".to_string(),
            }])
        })
    }

    /// Unwrap a cart mutation payload, surfacing user errors.
    fn cart_from_payload(
        payload: Option<CartMutationPayload>,
        operation: &str,
    ) -> Result<RemoteCart, ShopifyError> {
        if let Some(result) = payload {
            if !result.user_errors.is_empty() {
                return Err(ShopifyError::UserError(
                    result
                        .user_errors
                        .into_iter()
                        .map(|e| e.message)
                        .collect::<Vec<_>>()
                        .join("; "),
                ));
            }

            if let Some(cart) = result.cart {
                return Ok(convert_cart(cart));
            }
        }

        Err(ShopifyError::GraphQL(vec![super::GraphQLError {
            message: format!("Failed to {operation}"),
        }]))
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get a product by its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product_by_handle(&self, handle: &str) -> Result<Product, ShopifyError> {
        let cache_key = format!("product:{handle}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let data: ProductByHandleData = self
            .execute(
                &GET_PRODUCT_BY_HANDLE,
                serde_json::json!({ "handle": handle }),
            )
            .await?;

        let product_raw = data
            .product
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {handle}")))?;

        let product = convert_product(product_raw);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get a paginated list of products, optionally scoped to a collection
    /// or filtered by a search query.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails, or `NotFound` when a
    /// collection handle does not exist.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        first: u32,
        collection_handle: Option<&str>,
        query: Option<&str>,
    ) -> Result<ProductPage, ShopifyError> {
        let cache_key = format!(
            "products:{first}:{}",
            collection_handle.unwrap_or_default()
        );

        // Check cache (only for default listings without a search query)
        if query.is_none()
            && let Some(CacheValue::Page(page)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(page);
        }

        let connection = match collection_handle {
            Some(handle) => {
                let data: CollectionProductsData = self
                    .execute(
                        &GET_COLLECTION_PRODUCTS,
                        serde_json::json!({ "handle": handle, "first": first }),
                    )
                    .await?;
                data.collection
                    .ok_or_else(|| {
                        ShopifyError::NotFound(format!("Collection not found: {handle}"))
                    })?
                    .products
            }
            None => {
                let data: ProductsData = self
                    .execute(
                        &GET_PRODUCTS,
                        serde_json::json!({ "first": first, "query": query }),
                    )
                    .await?;
                data.products
            }
        };

        let page = convert_product_page(connection);

        if query.is_none() {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Page(page.clone()))
                .await;
        }

        Ok(page)
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Create a new remote cart with the given lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart creation fails or user errors are returned.
    #[instrument(skip(self, lines))]
    pub async fn create_cart(
        &self,
        lines: Vec<CartLineInput>,
    ) -> Result<RemoteCart, ShopifyError> {
        let lines: Vec<serde_json::Value> = lines
            .into_iter()
            .map(|line| {
                serde_json::json!({
                    "merchandiseId": line.merchandise_id.as_str(),
                    "quantity": line.quantity,
                })
            })
            .collect();

        let data: CartCreateData = self
            .execute(
                &CART_CREATE,
                serde_json::json!({ "input": { "lines": lines } }),
            )
            .await?;

        Self::cart_from_payload(data.cart_create, "create cart")
    }

    /// Fetch an existing remote cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is not found or the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn fetch_cart(&self, cart_id: &RemoteCartId) -> Result<RemoteCart, ShopifyError> {
        let data: CartData = self
            .execute(&GET_CART, serde_json::json!({ "cartId": cart_id.as_str() }))
            .await?;

        data.cart
            .map(convert_cart)
            .ok_or_else(|| ShopifyError::NotFound(format!("Cart not found: {cart_id}")))
    }

    /// Add lines to a remote cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn add_lines(
        &self,
        cart_id: &RemoteCartId,
        lines: Vec<CartLineInput>,
    ) -> Result<RemoteCart, ShopifyError> {
        let lines: Vec<serde_json::Value> = lines
            .into_iter()
            .map(|line| {
                serde_json::json!({
                    "merchandiseId": line.merchandise_id.as_str(),
                    "quantity": line.quantity,
                })
            })
            .collect();

        let data: CartLinesAddData = self
            .execute(
                &CART_LINES_ADD,
                serde_json::json!({ "cartId": cart_id.as_str(), "lines": lines }),
            )
            .await?;

        Self::cart_from_payload(data.cart_lines_add, "add to cart")
    }

    /// Set quantities on existing remote cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn update_lines(
        &self,
        cart_id: &RemoteCartId,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<RemoteCart, ShopifyError> {
        let lines: Vec<serde_json::Value> = lines
            .into_iter()
            .map(|line| {
                serde_json::json!({
                    "id": line.line_id,
                    "quantity": line.quantity,
                })
            })
            .collect();

        let data: CartLinesUpdateData = self
            .execute(
                &CART_LINES_UPDATE,
                serde_json::json!({ "cartId": cart_id.as_str(), "lines": lines }),
            )
            .await?;

        Self::cart_from_payload(data.cart_lines_update, "update cart")
    }

    /// Remove lines from a remote cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id))]
    pub async fn remove_lines(
        &self,
        cart_id: &RemoteCartId,
        line_ids: Vec<String>,
    ) -> Result<RemoteCart, ShopifyError> {
        let data: CartLinesRemoveData = self
            .execute(
                &CART_LINES_REMOVE,
                serde_json::json!({ "cartId": cart_id.as_str(), "lineIds": line_ids }),
            )
            .await?;

        Self::cart_from_payload(data.cart_lines_remove, "remove from cart")
    }
}
