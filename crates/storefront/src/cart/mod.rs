//! The shopper's in-progress order.
//!
//! `CartStore` is the single source of truth for the cart and mediates
//! between its consumers and the remote commerce cart. Two states exist per
//! cart: the local one (authoritative for display) and the remote one
//! (authoritative for checkout); [`CartStore::sync`] reconciles them.
//!
//! Local mutations are applied synchronously, so the local state is always
//! at least as fresh as the last user action. The matching remote call is
//! issued afterwards; when it fails the local state is kept and the change
//! is retried at the next sync point rather than rolled back.

mod backend;

pub use backend::CartBackend;

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use nfluential_core::{Money, RemoteCartId, VariantId};

use crate::shopify::ShopifyError;
use crate::shopify::types::{CartLineInput, CartLineUpdateInput, RemoteCart, SelectedOption};

/// Denormalized product snapshot carried on a cart line so the line can be
/// displayed without refetching the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    /// Product URL handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Product image URL, if any.
    pub image_url: Option<String>,
}

/// A line in the cart, keyed uniquely by `variant_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Variant this line holds (unique within the cart).
    pub variant_id: VariantId,
    /// Product snapshot for display.
    pub product: ProductRef,
    /// Selected options (size, color, ...) in option order.
    pub selected_options: Vec<SelectedOption>,
    /// Quantity, always >= 1 (a line at 0 is deleted instead).
    pub quantity: u32,
    /// Per-unit price at time of add; refreshed from the remote cart on sync.
    pub price: Money,
}

/// The persisted form of the cart. Transient flags are never serialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Lines in insertion order.
    pub items: Vec<CartLineItem>,
    /// Remote cart, if one has been created.
    pub remote_cart_id: Option<RemoteCartId>,
    /// Last-known checkout hand-off URL.
    pub checkout_url: Option<String>,
}

#[derive(Default)]
struct CartInner {
    items: Vec<CartLineItem>,
    remote_cart_id: Option<RemoteCartId>,
    checkout_url: Option<String>,
    /// Remote line IDs by variant, learned from remote responses.
    remote_line_ids: HashMap<VariantId, String>,
}

/// Explicitly owned cart state container.
///
/// Created empty at startup ([`CartStore::init`]) or rehydrated from a
/// persisted snapshot ([`CartStore::rehydrate`]); destroyed only by an
/// explicit [`CartStore::clear`]. Consumers read through the accessors and
/// never mutate lines directly.
pub struct CartStore<B> {
    backend: B,
    inner: Mutex<CartInner>,
    is_loading: AtomicBool,
    is_syncing: AtomicBool,
    /// Coalesces concurrent syncs: at most one in flight, later calls return.
    sync_gate: tokio::sync::Mutex<()>,
}

impl<B: CartBackend> CartStore<B> {
    /// Create an empty store.
    pub fn init(backend: B) -> Self {
        Self::rehydrate(backend, CartSnapshot::default())
    }

    /// Restore a store from a persisted snapshot.
    ///
    /// Remote line IDs are not part of the snapshot; they are relearned from
    /// the first remote response.
    pub fn rehydrate(backend: B, snapshot: CartSnapshot) -> Self {
        Self {
            backend,
            inner: Mutex::new(CartInner {
                items: snapshot.items,
                remote_cart_id: snapshot.remote_cart_id,
                checkout_url: snapshot.checkout_url,
                remote_line_ids: HashMap::new(),
            }),
            is_loading: AtomicBool::new(false),
            is_syncing: AtomicBool::new(false),
            sync_gate: tokio::sync::Mutex::new(()),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Lines in insertion order.
    pub fn items(&self) -> Vec<CartLineItem> {
        self.lock().items.clone()
    }

    /// Total quantity across all lines.
    pub fn item_count(&self) -> u32 {
        self.lock()
            .items
            .iter()
            .fold(0_u32, |sum, item| sum.saturating_add(item.quantity))
    }

    /// Sum of unit price x quantity; `None` for an empty cart.
    pub fn subtotal(&self) -> Option<Money> {
        let inner = self.lock();
        Money::subtotal(inner.items.iter().map(|i| (&i.price, i.quantity)))
    }

    /// Last-known checkout URL, or `None` while no remote cart exists.
    /// Callers must treat `None` as "checkout unavailable".
    pub fn checkout_url(&self) -> Option<String> {
        self.lock().checkout_url.clone()
    }

    /// Whether a mutation's remote call is in flight.
    pub fn is_loading(&self) -> bool {
        self.is_loading.load(Ordering::Acquire)
    }

    /// Whether a sync is in flight.
    pub fn is_syncing(&self) -> bool {
        self.is_syncing.load(Ordering::Acquire)
    }

    /// Persistable snapshot of the current state.
    pub fn snapshot(&self) -> CartSnapshot {
        let inner = self.lock();
        CartSnapshot {
            items: inner.items.clone(),
            remote_cart_id: inner.remote_cart_id.clone(),
            checkout_url: inner.checkout_url.clone(),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a line, merging into an existing line for the same variant.
    ///
    /// The local cart is updated immediately; the remote upsert follows. On
    /// remote failure the optimistic local state is kept and the line is
    /// pushed again by the next [`CartStore::sync`].
    pub async fn add_item(&self, item: CartLineItem) {
        let quantity = item.quantity.max(1);

        let (cart_id, create_lines) = {
            let mut inner = self.lock();
            match inner
                .items
                .iter_mut()
                .find(|line| line.variant_id == item.variant_id)
            {
                Some(line) => line.quantity = line.quantity.saturating_add(quantity),
                None => inner.items.push(CartLineItem { quantity, ..item.clone() }),
            }
            (inner.remote_cart_id.clone(), line_inputs(&inner.items))
        };

        self.is_loading.store(true, Ordering::Release);
        let result = match &cart_id {
            // Remote cart is created lazily on first mutation, carrying every
            // local line (rehydrated lines included).
            None => self.backend.create_cart(create_lines).await,
            Some(id) => {
                self.backend
                    .add_lines(
                        id,
                        vec![CartLineInput {
                            merchandise_id: item.variant_id.clone(),
                            quantity,
                        }],
                    )
                    .await
            }
        };

        match result {
            Ok(remote) => self.absorb_remote_identity(&remote),
            Err(e) => warn!(variant_id = %item.variant_id, error = %e, "cart add not confirmed remotely; keeping local state"),
        }
        self.is_loading.store(false, Ordering::Release);
    }

    /// Set a line's quantity to an absolute value; `0` removes the line.
    ///
    /// Silently does nothing when the variant is not in the cart.
    pub async fn update_quantity(&self, variant_id: &VariantId, quantity: u32) {
        if quantity == 0 {
            self.remove_item(variant_id).await;
            return;
        }

        let cart_id = {
            let mut inner = self.lock();
            let Some(line) = inner
                .items
                .iter_mut()
                .find(|line| &line.variant_id == variant_id)
            else {
                debug!(variant_id = %variant_id, "update for variant not in cart; ignoring");
                return;
            };
            line.quantity = quantity;
            inner.remote_cart_id.clone()
        };

        let Some(cart_id) = cart_id else {
            return;
        };

        self.is_loading.store(true, Ordering::Release);
        if let Some(line_id) = self.remote_line_id(variant_id, &cart_id).await {
            let result = self
                .backend
                .update_lines(&cart_id, vec![CartLineUpdateInput { line_id, quantity }])
                .await;
            match result {
                Ok(remote) => self.absorb_remote_identity(&remote),
                Err(e) => warn!(variant_id = %variant_id, error = %e, "cart update not confirmed remotely; keeping local state"),
            }
        }
        self.is_loading.store(false, Ordering::Release);
    }

    /// Delete a line if present; no-op otherwise.
    pub async fn remove_item(&self, variant_id: &VariantId) {
        let cart_id = {
            let mut inner = self.lock();
            let before = inner.items.len();
            inner.items.retain(|line| &line.variant_id != variant_id);
            if inner.items.len() == before {
                return;
            }
            inner.remote_cart_id.clone()
        };

        let Some(cart_id) = cart_id else {
            return;
        };

        self.is_loading.store(true, Ordering::Release);
        if let Some(line_id) = self.remote_line_id(variant_id, &cart_id).await {
            match self.backend.remove_lines(&cart_id, vec![line_id]).await {
                Ok(remote) => self.absorb_remote_identity(&remote),
                Err(e) => warn!(variant_id = %variant_id, error = %e, "cart removal not confirmed remotely; keeping local state"),
            }
        }
        self.is_loading.store(false, Ordering::Release);
    }

    /// Reset the cart to empty, dropping the remote linkage.
    pub fn clear(&self) {
        let mut inner = self.lock();
        *inner = CartInner::default();
    }

    // =========================================================================
    // Synchronization
    // =========================================================================

    /// Reconcile local state with the remote cart.
    ///
    /// Invoked on drawer-open and after mutations. Lines present locally but
    /// missing remotely (failed adds) are pushed first; the resulting remote
    /// snapshot is then authoritative for membership, price, and quantity,
    /// while local ordering is preserved where variant sets match.
    ///
    /// At most one sync runs at a time; a call made while another is in
    /// flight returns immediately.
    pub async fn sync(&self) {
        let Ok(_gate) = self.sync_gate.try_lock() else {
            debug!("cart sync already in flight; coalescing");
            return;
        };

        self.is_syncing.store(true, Ordering::Release);
        if let Err(e) = self.sync_inner().await {
            warn!(error = %e, "cart sync failed; keeping last-known-good state");
        }
        self.is_syncing.store(false, Ordering::Release);
    }

    async fn sync_inner(&self) -> Result<(), ShopifyError> {
        let (cart_id, items) = {
            let inner = self.lock();
            (inner.remote_cart_id.clone(), inner.items.clone())
        };

        let Some(cart_id) = cart_id else {
            // No remote cart yet: a failed create is retried here.
            if !items.is_empty() {
                let remote = self.backend.create_cart(line_inputs(&items)).await?;
                self.reconcile(&remote);
            }
            return Ok(());
        };

        let mut remote = match self.backend.fetch_cart(&cart_id).await {
            Ok(remote) => remote,
            Err(ShopifyError::NotFound(_)) => {
                // The backend no longer knows the cart: checkout completed
                // (or the cart expired). Lifecycle ends here.
                debug!(cart_id = %cart_id, "remote cart gone; clearing local cart");
                self.clear();
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let missing: Vec<CartLineInput> = items
            .iter()
            .filter(|item| remote.line_for_variant(&item.variant_id).is_none())
            .map(|item| CartLineInput {
                merchandise_id: item.variant_id.clone(),
                quantity: item.quantity,
            })
            .collect();

        if !missing.is_empty() {
            remote = self.backend.add_lines(&cart_id, missing).await?;
        }

        self.reconcile(&remote);
        Ok(())
    }

    /// Adopt the remote snapshot, keeping local line ordering where the
    /// variant sets match.
    fn reconcile(&self, remote: &RemoteCart) {
        let mut inner = self.lock();

        let mut items = Vec::with_capacity(remote.lines.len());
        for local in &inner.items {
            if let Some(line) = remote.line_for_variant(&local.variant_id) {
                items.push(line_item_from_remote(line));
            }
        }
        for line in &remote.lines {
            if !items.iter().any(|i| i.variant_id == line.variant_id) {
                items.push(line_item_from_remote(line));
            }
        }

        inner.items = items;
        inner.remote_cart_id = Some(remote.id.clone());
        inner.checkout_url = Some(remote.checkout_url.clone());
        inner.remote_line_ids = remote
            .lines
            .iter()
            .map(|line| (line.variant_id.clone(), line.id.clone()))
            .collect();
    }

    /// Record the remote cart's identity (ID, checkout URL, line IDs) from a
    /// mutation response without touching local lines.
    fn absorb_remote_identity(&self, remote: &RemoteCart) {
        let mut inner = self.lock();
        inner.remote_cart_id = Some(remote.id.clone());
        inner.checkout_url = Some(remote.checkout_url.clone());
        inner.remote_line_ids = remote
            .lines
            .iter()
            .map(|line| (line.variant_id.clone(), line.id.clone()))
            .collect();
    }

    /// Look up the remote line ID for a variant, refreshing the mapping from
    /// the backend once when it is stale.
    async fn remote_line_id(
        &self,
        variant_id: &VariantId,
        cart_id: &RemoteCartId,
    ) -> Option<String> {
        if let Some(id) = self.lock().remote_line_ids.get(variant_id).cloned() {
            return Some(id);
        }

        match self.backend.fetch_cart(cart_id).await {
            Ok(remote) => {
                self.absorb_remote_identity(&remote);
                self.lock().remote_line_ids.get(variant_id).cloned()
            }
            Err(e) => {
                warn!(variant_id = %variant_id, error = %e, "could not resolve remote line ID");
                None
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CartInner> {
        // A poisoned lock only means another thread panicked mid-mutation;
        // the inner data is still structurally valid.
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn line_inputs(items: &[CartLineItem]) -> Vec<CartLineInput> {
    items
        .iter()
        .map(|item| CartLineInput {
            merchandise_id: item.variant_id.clone(),
            quantity: item.quantity,
        })
        .collect()
}

fn line_item_from_remote(line: &crate::shopify::types::RemoteCartLine) -> CartLineItem {
    CartLineItem {
        variant_id: line.variant_id.clone(),
        product: ProductRef {
            handle: line.product_handle.clone(),
            title: line.product_title.clone(),
            image_url: line.image_url.clone(),
        },
        selected_options: line.selected_options.clone(),
        quantity: line.quantity,
        price: line.unit_price.clone(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize};
    use std::time::Duration;

    use crate::shopify::types::RemoteCartLine;

    fn usd(amount: &str) -> Money {
        Money::new(amount, "USD")
    }

    fn line(variant: &str, price: &str, quantity: u32) -> CartLineItem {
        CartLineItem {
            variant_id: VariantId::new(variant),
            product: ProductRef {
                handle: format!("{variant}-handle"),
                title: format!("{variant} title"),
                image_url: None,
            },
            selected_options: vec![SelectedOption {
                name: "Size".to_string(),
                value: "M".to_string(),
            }],
            quantity,
            price: usd(price),
        }
    }

    /// In-memory stand-in for the commerce backend. Merges added lines by
    /// variant the way the real backend does.
    #[derive(Default)]
    struct MockBackend {
        remote: Mutex<Vec<RemoteCartLine>>,
        created: AtomicBool,
        fail: AtomicBool,
        cart_gone: AtomicBool,
        fetch_calls: AtomicUsize,
        fetch_delay_ms: AtomicU64,
        next_line_id: AtomicU64,
    }

    impl MockBackend {
        fn fail(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        fn set_remote_price(&self, variant: &str, price: &str) {
            let mut remote = self.remote.lock().unwrap();
            for l in remote.iter_mut() {
                if l.variant_id.as_str() == variant {
                    l.unit_price = usd(price);
                }
            }
        }

        fn remote_quantity(&self, variant: &str) -> Option<u32> {
            self.remote
                .lock()
                .unwrap()
                .iter()
                .find(|l| l.variant_id.as_str() == variant)
                .map(|l| l.quantity)
        }

        fn current_cart(&self) -> RemoteCart {
            let lines = self.remote.lock().unwrap().clone();
            let subtotal = Money::subtotal(lines.iter().map(|l| (&l.unit_price, l.quantity)))
                .unwrap_or_else(|| usd("0"));
            RemoteCart {
                id: RemoteCartId::new("gid://shopify/Cart/mock"),
                checkout_url: "https://checkout.example/c/mock".to_string(),
                lines,
                subtotal,
            }
        }

        fn check_available(&self) -> Result<(), ShopifyError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(ShopifyError::UserError("backend unavailable".to_string()));
            }
            Ok(())
        }

        fn merge_lines(&self, lines: Vec<CartLineInput>) {
            let mut remote = self.remote.lock().unwrap();
            for input in lines {
                match remote
                    .iter_mut()
                    .find(|l| l.variant_id == input.merchandise_id)
                {
                    Some(l) => l.quantity += input.quantity,
                    None => {
                        let id = self.next_line_id.fetch_add(1, Ordering::SeqCst);
                        remote.push(RemoteCartLine {
                            id: format!("line-{id}"),
                            variant_id: input.merchandise_id,
                            quantity: input.quantity,
                            unit_price: usd("10.00"),
                            product_title: "title".to_string(),
                            product_handle: "handle".to_string(),
                            image_url: None,
                            selected_options: vec![],
                        });
                    }
                }
            }
        }
    }

    impl CartBackend for &MockBackend {
        async fn create_cart(
            &self,
            lines: Vec<CartLineInput>,
        ) -> Result<RemoteCart, ShopifyError> {
            self.check_available()?;
            self.created.store(true, Ordering::SeqCst);
            self.merge_lines(lines);
            Ok(self.current_cart())
        }

        async fn fetch_cart(&self, _cart_id: &RemoteCartId) -> Result<RemoteCart, ShopifyError> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            let delay = self.fetch_delay_ms.load(Ordering::SeqCst);
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            self.check_available()?;
            if self.cart_gone.load(Ordering::SeqCst) {
                return Err(ShopifyError::NotFound("cart gone".to_string()));
            }
            Ok(self.current_cart())
        }

        async fn add_lines(
            &self,
            _cart_id: &RemoteCartId,
            lines: Vec<CartLineInput>,
        ) -> Result<RemoteCart, ShopifyError> {
            self.check_available()?;
            self.merge_lines(lines);
            Ok(self.current_cart())
        }

        async fn update_lines(
            &self,
            _cart_id: &RemoteCartId,
            lines: Vec<CartLineUpdateInput>,
        ) -> Result<RemoteCart, ShopifyError> {
            self.check_available()?;
            let mut remote = self.remote.lock().unwrap();
            for update in lines {
                if let Some(l) = remote.iter_mut().find(|l| l.id == update.line_id) {
                    l.quantity = update.quantity;
                }
            }
            drop(remote);
            Ok(self.current_cart())
        }

        async fn remove_lines(
            &self,
            _cart_id: &RemoteCartId,
            line_ids: Vec<String>,
        ) -> Result<RemoteCart, ShopifyError> {
            self.check_available()?;
            self.remote
                .lock()
                .unwrap()
                .retain(|l| !line_ids.contains(&l.id));
            Ok(self.current_cart())
        }
    }

    #[tokio::test]
    async fn add_same_variant_merges_quantities() {
        let backend = MockBackend::default();
        let store = CartStore::init(&backend);

        store.add_item(line("A", "10.00", 1)).await;
        store.add_item(line("A", "10.00", 2)).await;

        let items = store.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].variant_id.as_str(), "A");
        assert_eq!(items[0].quantity, 3);
        assert_eq!(backend.remote_quantity("A"), Some(3));
    }

    #[tokio::test]
    async fn add_preserves_insertion_order() {
        let backend = MockBackend::default();
        let store = CartStore::init(&backend);

        store.add_item(line("A", "10.00", 1)).await;
        store.add_item(line("B", "5.00", 1)).await;
        store.add_item(line("A", "10.00", 1)).await;

        let items = store.items();
        let order: Vec<&str> = items.iter().map(|i| i.variant_id.as_str()).collect();
        assert_eq!(order, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn update_quantity_zero_equals_remove() {
        let backend = MockBackend::default();
        let store = CartStore::init(&backend);
        store.add_item(line("A", "10.00", 2)).await;

        store.update_quantity(&VariantId::new("A"), 0).await;

        assert!(store.items().is_empty());
        assert_eq!(backend.remote_quantity("A"), None);
    }

    #[tokio::test]
    async fn update_quantity_sets_absolute_value() {
        let backend = MockBackend::default();
        let store = CartStore::init(&backend);
        store.add_item(line("A", "10.00", 2)).await;

        store.update_quantity(&VariantId::new("A"), 5).await;

        assert_eq!(store.items()[0].quantity, 5);
        assert_eq!(backend.remote_quantity("A"), Some(5));
    }

    #[tokio::test]
    async fn update_quantity_unknown_variant_is_silent() {
        let backend = MockBackend::default();
        let store = CartStore::init(&backend);
        store.add_item(line("A", "10.00", 2)).await;

        store.update_quantity(&VariantId::new("ghost"), 4).await;

        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].quantity, 2);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn remove_unknown_variant_is_noop() {
        let backend = MockBackend::default();
        let store = CartStore::init(&backend);
        store.add_item(line("A", "10.00", 1)).await;

        store.remove_item(&VariantId::new("ghost")).await;

        assert_eq!(store.items().len(), 1);
    }

    #[tokio::test]
    async fn checkout_url_null_until_remote_cart_exists() {
        let backend = MockBackend::default();
        let store = CartStore::init(&backend);
        assert_eq!(store.checkout_url(), None);

        store.add_item(line("A", "10.00", 1)).await;
        assert_eq!(
            store.checkout_url().as_deref(),
            Some("https://checkout.example/c/mock")
        );
    }

    #[tokio::test]
    async fn backend_failure_keeps_optimistic_local_state() {
        let backend = MockBackend::default();
        backend.fail(true);
        let store = CartStore::init(&backend);

        store.add_item(line("A", "10.00", 2)).await;

        let items = store.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(store.checkout_url(), None);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn sync_retries_lines_the_backend_never_saw() {
        let backend = MockBackend::default();
        backend.fail(true);
        let store = CartStore::init(&backend);
        store.add_item(line("A", "10.00", 2)).await;
        assert_eq!(backend.remote_quantity("A"), None);

        backend.fail(false);
        store.sync().await;

        assert_eq!(backend.remote_quantity("A"), Some(2));
        assert!(store.checkout_url().is_some());
        assert_eq!(store.items()[0].quantity, 2);
    }

    #[tokio::test]
    async fn sync_adopts_remote_price_and_preserves_local_order() {
        let backend = MockBackend::default();
        let store = CartStore::init(&backend);
        store.add_item(line("A", "10.00", 1)).await;
        store.add_item(line("B", "10.00", 1)).await;

        backend.set_remote_price("A", "12.50");
        store.sync().await;

        let items = store.items();
        assert_eq!(items[0].variant_id.as_str(), "A");
        assert_eq!(items[0].price, usd("12.50"));
        assert_eq!(items[1].variant_id.as_str(), "B");
    }

    #[tokio::test]
    async fn sync_coalesces_concurrent_calls() {
        let backend = MockBackend::default();
        let store = CartStore::init(&backend);
        store.add_item(line("A", "10.00", 1)).await;

        backend.fetch_delay_ms.store(30, Ordering::SeqCst);
        backend.fetch_calls.store(0, Ordering::SeqCst);

        tokio::join!(store.sync(), store.sync(), store.sync());

        assert_eq!(backend.fetch_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn sync_failure_keeps_last_known_good_state() {
        let backend = MockBackend::default();
        let store = CartStore::init(&backend);
        store.add_item(line("A", "10.00", 2)).await;

        backend.fail(true);
        store.sync().await;

        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].quantity, 2);
        assert!(store.checkout_url().is_some());
        assert!(!store.is_syncing());
    }

    #[tokio::test]
    async fn sync_clears_cart_when_remote_cart_is_gone() {
        let backend = MockBackend::default();
        let store = CartStore::init(&backend);
        store.add_item(line("A", "10.00", 1)).await;

        backend.cart_gone.store(true, Ordering::SeqCst);
        store.sync().await;

        assert!(store.items().is_empty());
        assert_eq!(store.checkout_url(), None);
    }

    #[tokio::test]
    async fn snapshot_rehydrate_roundtrip() {
        let backend = MockBackend::default();
        let store = CartStore::init(&backend);
        store.add_item(line("A", "10.00", 2)).await;
        store.add_item(line("B", "4.00", 1)).await;

        let snapshot = store.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: CartSnapshot = serde_json::from_str(&json).unwrap();

        let rehydrated = CartStore::rehydrate(&backend, restored);
        assert_eq!(rehydrated.items(), store.items());
        assert_eq!(rehydrated.checkout_url(), store.checkout_url());
        assert!(!rehydrated.is_loading());
        assert!(!rehydrated.is_syncing());
    }

    #[tokio::test]
    async fn clear_resets_everything() {
        let backend = MockBackend::default();
        let store = CartStore::init(&backend);
        store.add_item(line("A", "10.00", 2)).await;

        store.clear();

        assert!(store.items().is_empty());
        assert_eq!(store.item_count(), 0);
        assert_eq!(store.subtotal(), None);
        assert_eq!(store.checkout_url(), None);
    }

    #[tokio::test]
    async fn item_count_and_subtotal() {
        let backend = MockBackend::default();
        let store = CartStore::init(&backend);
        store.add_item(line("A", "10.00", 2)).await;
        store.add_item(line("B", "2.50", 4)).await;

        assert_eq!(store.item_count(), 6);
        let subtotal = store.subtotal().unwrap();
        assert_eq!(subtotal.decimal().unwrap().to_string(), "30.00");
        assert_eq!(subtotal.currency_code, "USD");
    }
}
