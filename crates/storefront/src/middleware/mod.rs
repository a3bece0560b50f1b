//! HTTP middleware for the storefront service.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//! 4. CORS (allow-list echo for the form endpoint, `CorsLayer` for `/api`)

pub mod client_ip;
pub mod cors;
pub mod session;

pub use client_ip::client_ip;
pub use cors::{api_cors_layer, contact_cors, resolve_allowed_origin};
pub use session::create_session_layer;
