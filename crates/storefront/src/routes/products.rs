//! Catalog route handlers.
//!
//! Read-only, stateless per call; all data comes from the Storefront API
//! (cached for 5 minutes by the client).

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::shopify::types::{Product, ProductPage};
use crate::state::AppState;

/// Default and maximum page sizes for listings.
const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Page size (defaults to 10).
    pub first: Option<u32>,
    /// Restrict the listing to a collection.
    pub collection: Option<String>,
    /// Search filter passed through to the backend.
    pub query: Option<String>,
}

/// List products.
///
/// GET /api/products?first=N&collection=H&query=Q
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductPage>> {
    let first = query
        .first
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let page = state
        .storefront()
        .list_products(first, query.collection.as_deref(), query.query.as_deref())
        .await?;

    Ok(Json(page))
}

/// Get a single product by handle.
///
/// GET /api/products/{handle}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Product>> {
    let product = state.storefront().get_product_by_handle(&handle).await?;
    Ok(Json(product))
}
