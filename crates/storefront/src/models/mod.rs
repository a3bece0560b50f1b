//! Domain models for the storefront service.

pub mod forms;

pub use forms::{ContactSubject, ContactSubmission, NewContactSubmission, NewsletterSubscriber};

/// Keys under which cart state lives in the session.
pub mod session_keys {
    /// Stable key identifying this session's cart store in the registry.
    pub const CART_KEY: &str = "cart.key";
    /// Persisted cart snapshot for rehydration after process restart.
    pub const CART_SNAPSHOT: &str = "cart.snapshot";
}
