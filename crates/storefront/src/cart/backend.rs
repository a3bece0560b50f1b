//! Seam between the cart store and the commerce backend.

use std::future::Future;

use nfluential_core::RemoteCartId;

use crate::shopify::types::{CartLineInput, CartLineUpdateInput, RemoteCart};
use crate::shopify::{ShopifyError, StorefrontClient};

/// Remote cart operations the store depends on.
///
/// The Storefront API client is the production implementation; tests inject
/// a scripted mock. Futures are declared `Send` so the store can be shared
/// across tasks.
pub trait CartBackend: Send + Sync {
    /// Create a remote cart holding the given lines.
    fn create_cart(
        &self,
        lines: Vec<CartLineInput>,
    ) -> impl Future<Output = Result<RemoteCart, ShopifyError>> + Send;

    /// Fetch the current remote cart snapshot.
    fn fetch_cart(
        &self,
        cart_id: &RemoteCartId,
    ) -> impl Future<Output = Result<RemoteCart, ShopifyError>> + Send;

    /// Add lines to the remote cart. The backend merges lines that share a
    /// merchandise ID rather than duplicating them.
    fn add_lines(
        &self,
        cart_id: &RemoteCartId,
        lines: Vec<CartLineInput>,
    ) -> impl Future<Output = Result<RemoteCart, ShopifyError>> + Send;

    /// Set absolute quantities on existing remote lines.
    fn update_lines(
        &self,
        cart_id: &RemoteCartId,
        lines: Vec<CartLineUpdateInput>,
    ) -> impl Future<Output = Result<RemoteCart, ShopifyError>> + Send;

    /// Remove remote lines.
    fn remove_lines(
        &self,
        cart_id: &RemoteCartId,
        line_ids: Vec<String>,
    ) -> impl Future<Output = Result<RemoteCart, ShopifyError>> + Send;
}

impl CartBackend for StorefrontClient {
    async fn create_cart(&self, lines: Vec<CartLineInput>) -> Result<RemoteCart, ShopifyError> {
        Self::create_cart(self, lines).await
    }

    async fn fetch_cart(&self, cart_id: &RemoteCartId) -> Result<RemoteCart, ShopifyError> {
        Self::fetch_cart(self, cart_id).await
    }

    async fn add_lines(
        &self,
        cart_id: &RemoteCartId,
        lines: Vec<CartLineInput>,
    ) -> Result<RemoteCart, ShopifyError> {
        Self::add_lines(self, cart_id, lines).await
    }

    async fn update_lines(
        &self,
        cart_id: &RemoteCartId,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<RemoteCart, ShopifyError> {
        Self::update_lines(self, cart_id, lines).await
    }

    async fn remove_lines(
        &self,
        cart_id: &RemoteCartId,
        line_ids: Vec<String>,
    ) -> Result<RemoteCart, ShopifyError> {
        Self::remove_lines(self, cart_id, line_ids).await
    }
}
