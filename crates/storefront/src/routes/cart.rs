//! Cart route handlers.
//!
//! Each session owns one cart store, looked up (or rehydrated from the
//! session's persisted snapshot) through the registry in [`AppState`]. The
//! snapshot is written back to the session after every mutation, so an
//! abandoned cart survives a process restart.

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use nfluential_core::{Money, VariantId};

use crate::cart::{CartBackend, CartLineItem, CartSnapshot, CartStore, ProductRef};
use crate::models::session_keys;
use crate::shopify::StorefrontClient;
use crate::shopify::types::SelectedOption;
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub variant_id: String,
    pub title: String,
    pub handle: String,
    pub image_url: Option<String>,
    pub selected_options: Vec<SelectedOption>,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
}

impl From<&CartLineItem> for CartLineView {
    fn from(item: &CartLineItem) -> Self {
        Self {
            variant_id: item.variant_id.as_str().to_string(),
            title: item.product.title.clone(),
            handle: item.product.handle.clone(),
            image_url: item.product.image_url.clone(),
            selected_options: item.selected_options.clone(),
            quantity: item.quantity,
            unit_price: item.price.clone(),
            line_total: item.price.times(item.quantity),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub item_count: u32,
    pub subtotal: Option<Money>,
    pub checkout_url: Option<String>,
    pub is_syncing: bool,
}

impl CartView {
    fn from_store<B: CartBackend>(store: &CartStore<B>) -> Self {
        let items = store.items();
        Self {
            items: items.iter().map(CartLineView::from).collect(),
            item_count: store.item_count(),
            subtotal: store.subtotal(),
            checkout_url: store.checkout_url(),
            is_syncing: store.is_syncing(),
        }
    }
}

// =============================================================================
// Request payloads
// =============================================================================

/// Product snapshot sent along with an add so the line renders without a
/// catalog refetch.
#[derive(Debug, Deserialize)]
pub struct ProductRefPayload {
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub variant_id: String,
    #[serde(default)]
    pub quantity: Option<u32>,
    pub price: Money,
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
    pub product: ProductRefPayload,
}

/// Update-quantity request body. A quantity of 0 removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub variant_id: String,
    pub quantity: u32,
}

/// Remove-line request body.
#[derive(Debug, Deserialize)]
pub struct RemoveCartRequest {
    pub variant_id: String,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Look up this session's cart store, creating (or rehydrating) it on first
/// access.
async fn store_for(state: &AppState, session: &Session) -> Arc<CartStore<StorefrontClient>> {
    let cart_key = match session.get::<String>(session_keys::CART_KEY).await {
        Ok(Some(key)) => key,
        _ => {
            let key = Uuid::new_v4().to_string();
            if let Err(e) = session.insert(session_keys::CART_KEY, key.clone()).await {
                tracing::error!("Failed to save cart key to session: {e}");
            }
            key
        }
    };

    let snapshot = session
        .get::<CartSnapshot>(session_keys::CART_SNAPSHOT)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();

    state.cart_store(cart_key, snapshot).await
}

/// Write the store's snapshot back into the session.
async fn persist_snapshot(session: &Session, store: &CartStore<StorefrontClient>) {
    if let Err(e) = session
        .insert(session_keys::CART_SNAPSHOT, store.snapshot())
        .await
    {
        tracing::error!("Failed to persist cart snapshot to session: {e}");
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Return the cart, syncing with the remote cart first (drawer-open
/// semantics).
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Json<CartView> {
    let store = store_for(&state, &session).await;
    store.sync().await;
    persist_snapshot(&session, &store).await;
    Json(CartView::from_store(&store))
}

/// Add an item to the cart.
#[instrument(skip(state, session, request))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Json<CartView> {
    let store = store_for(&state, &session).await;

    store
        .add_item(CartLineItem {
            variant_id: VariantId::new(request.variant_id),
            product: ProductRef {
                handle: request.product.handle,
                title: request.product.title,
                image_url: request.product.image_url,
            },
            selected_options: request.selected_options,
            quantity: request.quantity.unwrap_or(1),
            price: request.price,
        })
        .await;

    persist_snapshot(&session, &store).await;
    Json(CartView::from_store(&store))
}

/// Set a line's quantity (0 removes).
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<UpdateCartRequest>,
) -> Json<CartView> {
    let store = store_for(&state, &session).await;
    store
        .update_quantity(&VariantId::new(request.variant_id), request.quantity)
        .await;

    persist_snapshot(&session, &store).await;
    Json(CartView::from_store(&store))
}

/// Remove a line.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RemoveCartRequest>,
) -> Json<CartView> {
    let store = store_for(&state, &session).await;
    store.remove_item(&VariantId::new(request.variant_id)).await;

    persist_snapshot(&session, &store).await;
    Json(CartView::from_store(&store))
}

/// Explicitly clear the cart, ending its lifecycle.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Json<CartView> {
    let store = store_for(&state, &session).await;
    store.clear();
    persist_snapshot(&session, &store).await;

    // Drop the in-memory instance too; the next access starts fresh from
    // the (now empty) session snapshot.
    if let Ok(Some(key)) = session.get::<String>(session_keys::CART_KEY).await {
        state.evict_cart_store(&key).await;
    }

    Json(CartView::from_store(&store))
}

/// Last-known checkout URL; `null` until a remote cart exists, which
/// callers must treat as "checkout unavailable".
#[instrument(skip(state, session))]
pub async fn checkout_url(
    State(state): State<AppState>,
    session: Session,
) -> impl IntoResponse {
    let store = store_for(&state, &session).await;
    Json(json!({ "checkout_url": store.checkout_url() }))
}
