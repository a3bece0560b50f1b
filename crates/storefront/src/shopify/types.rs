//! Domain types for the Shopify Storefront API.
//!
//! These types provide a clean, ergonomic API separate from the raw
//! response shapes in the client's `queries` module.

use serde::{Deserialize, Serialize};

use nfluential_core::{Money, RemoteCartId, VariantId};

// =============================================================================
// Catalog Types
// =============================================================================

/// Product or variant image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
}

/// A selected option on a variant (e.g., Size / M).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size").
    pub name: String,
    /// Option value (e.g., "M").
    pub value: String,
}

/// A purchasable configuration of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant ID (pass to cart operations).
    pub id: VariantId,
    /// Variant title (e.g., "M / Black").
    pub title: String,
    /// Whether the variant can currently be purchased.
    pub available_for_sale: bool,
    /// Current unit price.
    pub price: Money,
    /// Selected options defining this variant.
    pub selected_options: Vec<SelectedOption>,
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: String,
    /// URL handle.
    pub handle: String,
    /// Display title.
    pub title: String,
    /// Plain-text description.
    pub description: String,
    /// Featured image, if any.
    pub image: Option<Image>,
    /// Purchasable variants.
    pub variants: Vec<ProductVariant>,
    /// Minimum variant price (for listing cards).
    pub min_price: Money,
}

/// A page of products with cursor information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPage {
    /// Products in display order.
    pub products: Vec<Product>,
    /// Whether another page exists.
    pub has_next_page: bool,
    /// Cursor for the next page, if any.
    pub end_cursor: Option<String>,
}

// =============================================================================
// Cart Types
// =============================================================================

/// Input for adding a line to a remote cart.
#[derive(Debug, Clone)]
pub struct CartLineInput {
    /// Variant to add.
    pub merchandise_id: VariantId,
    /// Quantity to add.
    pub quantity: u32,
}

/// Input for setting a remote cart line's quantity.
#[derive(Debug, Clone)]
pub struct CartLineUpdateInput {
    /// Remote line ID (not the variant ID).
    pub line_id: String,
    /// Absolute quantity to set.
    pub quantity: u32,
}

/// A line in the remote cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteCartLine {
    /// Remote line ID.
    pub id: String,
    /// Variant this line holds.
    pub variant_id: VariantId,
    /// Quantity.
    pub quantity: u32,
    /// Unit price at the backend.
    pub unit_price: Money,
    /// Parent product title.
    pub product_title: String,
    /// Parent product handle.
    pub product_handle: String,
    /// Parent product image URL, if any.
    pub image_url: Option<String>,
    /// Selected options for display.
    pub selected_options: Vec<SelectedOption>,
}

/// The server-side cart object maintained by the commerce backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteCart {
    /// Cart ID.
    pub id: RemoteCartId,
    /// Backend-issued checkout hand-off URL.
    pub checkout_url: String,
    /// Lines in backend order.
    pub lines: Vec<RemoteCartLine>,
    /// Subtotal as computed by the backend.
    pub subtotal: Money,
}

impl RemoteCart {
    /// Find a line by variant ID.
    #[must_use]
    pub fn line_for_variant(&self, variant_id: &VariantId) -> Option<&RemoteCartLine> {
        self.lines.iter().find(|l| &l.variant_id == variant_id)
    }
}
