//! HTTP route handlers for the storefront service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Forms
//! POST    /contact-submit?action={contact|newsletter} - Form submission
//! OPTIONS /contact-submit      - CORS preflight (204, empty)
//!
//! # Catalog (JSON)
//! GET  /api/products           - Product listing (?first, ?collection, ?query)
//! GET  /api/products/{handle}  - Product detail
//!
//! # Cart (JSON)
//! GET  /api/cart               - Cart view (syncs with the remote cart)
//! POST /api/cart/add           - Add line
//! POST /api/cart/update        - Set line quantity (0 removes)
//! POST /api/cart/remove        - Remove line
//! POST /api/cart/clear         - Explicit cart teardown
//! GET  /api/cart/checkout-url  - Checkout hand-off URL (null until remote cart exists)
//! ```

pub mod cart;
pub mod contact;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{api_cors_layer, contact_cors};
use crate::state::AppState;

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{handle}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/checkout-url", get(cart::checkout_url))
}

/// Assemble the service routes.
///
/// The form endpoint carries the allow-list-echo CORS middleware on every
/// response; the `/api` routes use a standard `CorsLayer`.
pub fn router(state: &AppState) -> Router<AppState> {
    let form_routes = Router::new()
        .route(
            "/contact-submit",
            post(contact::submit).options(contact::preflight),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            contact_cors,
        ));

    let api_routes = Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .layer(api_cors_layer(&state.config().allowed_origins));

    Router::new().merge(form_routes).nest("/api", api_routes)
}
