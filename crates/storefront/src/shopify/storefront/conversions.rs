//! Conversions from raw wire shapes to domain types.

use nfluential_core::{Money, RemoteCartId, VariantId};

use crate::shopify::types::{
    Image, Product, ProductPage, ProductVariant, RemoteCart, RemoteCartLine, SelectedOption,
};

use super::queries::{
    CartRaw, Connection, ImageRaw, MoneyRaw, ProductRaw, SelectedOptionRaw, VariantRaw,
};

pub fn convert_money(raw: MoneyRaw) -> Money {
    Money::new(raw.amount, raw.currency_code)
}

fn convert_image(raw: ImageRaw) -> Image {
    Image {
        url: raw.url,
        alt_text: raw.alt_text,
    }
}

fn convert_selected_option(raw: SelectedOptionRaw) -> SelectedOption {
    SelectedOption {
        name: raw.name,
        value: raw.value,
    }
}

fn convert_variant(raw: VariantRaw) -> ProductVariant {
    ProductVariant {
        id: VariantId::new(raw.id),
        title: raw.title,
        available_for_sale: raw.available_for_sale,
        price: convert_money(raw.price),
        selected_options: raw
            .selected_options
            .into_iter()
            .map(convert_selected_option)
            .collect(),
    }
}

pub fn convert_product(raw: ProductRaw) -> Product {
    Product {
        id: raw.id,
        handle: raw.handle,
        title: raw.title,
        description: raw.description,
        image: raw
            .images
            .edges
            .into_iter()
            .next()
            .map(|e| convert_image(e.node)),
        variants: raw
            .variants
            .edges
            .into_iter()
            .map(|e| convert_variant(e.node))
            .collect(),
        min_price: convert_money(raw.price_range.min_variant_price),
    }
}

pub fn convert_product_page(raw: Connection<ProductRaw>) -> ProductPage {
    ProductPage {
        products: raw
            .edges
            .into_iter()
            .map(|e| convert_product(e.node))
            .collect(),
        has_next_page: raw.page_info.has_next_page,
        end_cursor: raw.page_info.end_cursor,
    }
}

pub fn convert_cart(raw: CartRaw) -> RemoteCart {
    RemoteCart {
        id: RemoteCartId::new(raw.id),
        checkout_url: raw.checkout_url,
        lines: raw
            .lines
            .edges
            .into_iter()
            .map(|e| {
                let line = e.node;
                RemoteCartLine {
                    id: line.id,
                    variant_id: VariantId::new(line.merchandise.id),
                    quantity: u32::try_from(line.quantity).unwrap_or(1),
                    unit_price: convert_money(line.merchandise.price),
                    product_title: line.merchandise.product.title,
                    product_handle: line.merchandise.product.handle,
                    image_url: line.merchandise.product.featured_image.map(|i| i.url),
                    selected_options: line
                        .merchandise
                        .selected_options
                        .into_iter()
                        .map(convert_selected_option)
                        .collect(),
                }
            })
            .collect(),
        subtotal: convert_money(raw.cost.subtotal_amount),
    }
}
