//! GraphQL documents and raw response shapes for the Storefront API.
//!
//! Documents are constant strings posted as `{query, variables}` JSON; the
//! structs here mirror the wire shape (camelCase, edges/node connections)
//! and are converted to the domain types in [`crate::shopify::types`] by
//! [`super::conversions`].

use serde::Deserialize;

// =============================================================================
// Documents
// =============================================================================

/// Product fields shared by every catalog document.
const PRODUCT_FRAGMENT: &str = r"
fragment ProductFields on Product {
  id
  handle
  title
  description
  images(first: 1) {
    edges {
      node {
        url
        altText
      }
    }
  }
  variants(first: 50) {
    edges {
      node {
        id
        title
        availableForSale
        selectedOptions {
          name
          value
        }
        price {
          amount
          currencyCode
        }
      }
    }
  }
  priceRange {
    minVariantPrice {
      amount
      currencyCode
    }
  }
}
";

/// Cart fields shared by the cart query and every cart mutation.
const CART_FRAGMENT: &str = r"
fragment CartFields on Cart {
  id
  checkoutUrl
  lines(first: 100) {
    edges {
      node {
        id
        quantity
        merchandise {
          ... on ProductVariant {
            id
            title
            price {
              amount
              currencyCode
            }
            selectedOptions {
              name
              value
            }
            product {
              title
              handle
              featuredImage {
                url
                altText
              }
            }
          }
        }
      }
    }
  }
  cost {
    subtotalAmount {
      amount
      currencyCode
    }
  }
}
";

/// Concatenate a document body with the fragments it references.
macro_rules! document {
    ($name:ident, $body:expr, $($fragment:expr),+) => {
        pub static $name: std::sync::LazyLock<String> =
            std::sync::LazyLock::new(|| [$body, $($fragment),+].concat());
    };
}

document!(
    GET_PRODUCTS,
    r"
query GetProducts($first: Int!, $after: String, $query: String) {
  products(first: $first, after: $after, query: $query) {
    edges {
      node {
        ...ProductFields
      }
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
",
    PRODUCT_FRAGMENT
);

document!(
    GET_COLLECTION_PRODUCTS,
    r"
query GetCollectionProducts($handle: String!, $first: Int!, $after: String) {
  collection(handle: $handle) {
    products(first: $first, after: $after) {
      edges {
        node {
          ...ProductFields
        }
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
}
",
    PRODUCT_FRAGMENT
);

document!(
    GET_PRODUCT_BY_HANDLE,
    r"
query GetProductByHandle($handle: String!) {
  product(handle: $handle) {
    ...ProductFields
  }
}
",
    PRODUCT_FRAGMENT
);

document!(
    CART_CREATE,
    r"
mutation CartCreate($input: CartInput!) {
  cartCreate(input: $input) {
    cart {
      ...CartFields
    }
    userErrors {
      message
    }
  }
}
",
    CART_FRAGMENT
);

document!(
    GET_CART,
    r"
query GetCart($cartId: ID!) {
  cart(id: $cartId) {
    ...CartFields
  }
}
",
    CART_FRAGMENT
);

document!(
    CART_LINES_ADD,
    r"
mutation CartLinesAdd($cartId: ID!, $lines: [CartLineInput!]!) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {
    cart {
      ...CartFields
    }
    userErrors {
      message
    }
  }
}
",
    CART_FRAGMENT
);

document!(
    CART_LINES_UPDATE,
    r"
mutation CartLinesUpdate($cartId: ID!, $lines: [CartLineUpdateInput!]!) {
  cartLinesUpdate(cartId: $cartId, lines: $lines) {
    cart {
      ...CartFields
    }
    userErrors {
      message
    }
  }
}
",
    CART_FRAGMENT
);

document!(
    CART_LINES_REMOVE,
    r"
mutation CartLinesRemove($cartId: ID!, $lineIds: [ID!]!) {
  cartLinesRemove(cartId: $cartId, lineIds: $lineIds) {
    cart {
      ...CartFields
    }
    userErrors {
      message
    }
  }
}
",
    CART_FRAGMENT
);

// =============================================================================
// Raw response shapes
// =============================================================================

/// Top-level GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<crate::shopify::GraphQLError>>,
}

#[derive(Debug, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Deserialize)]
pub struct Edges<T> {
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfoRaw {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfoRaw,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyRaw {
    pub amount: String,
    pub currency_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRaw {
    pub url: String,
    pub alt_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectedOptionRaw {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRaw {
    pub id: String,
    pub title: String,
    pub available_for_sale: bool,
    pub selected_options: Vec<SelectedOptionRaw>,
    pub price: MoneyRaw,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeRaw {
    pub min_variant_price: MoneyRaw,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRaw {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub images: Edges<ImageRaw>,
    pub variants: Edges<VariantRaw>,
    pub price_range: PriceRangeRaw,
}

#[derive(Debug, Deserialize)]
pub struct ProductsData {
    pub products: Connection<ProductRaw>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionRaw {
    pub products: Connection<ProductRaw>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionProductsData {
    pub collection: Option<CollectionRaw>,
}

#[derive(Debug, Deserialize)]
pub struct ProductByHandleData {
    pub product: Option<ProductRaw>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchandiseProductRaw {
    pub title: String,
    pub handle: String,
    pub featured_image: Option<ImageRaw>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchandiseRaw {
    pub id: String,
    pub title: String,
    pub price: MoneyRaw,
    pub selected_options: Vec<SelectedOptionRaw>,
    pub product: MerchandiseProductRaw,
}

#[derive(Debug, Deserialize)]
pub struct CartLineRaw {
    pub id: String,
    pub quantity: i64,
    pub merchandise: MerchandiseRaw,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCostRaw {
    pub subtotal_amount: MoneyRaw,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRaw {
    pub id: String,
    pub checkout_url: String,
    pub lines: Edges<CartLineRaw>,
    pub cost: CartCostRaw,
}

#[derive(Debug, Deserialize)]
pub struct UserErrorRaw {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutationPayload {
    pub cart: Option<CartRaw>,
    pub user_errors: Vec<UserErrorRaw>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCreateData {
    pub cart_create: Option<CartMutationPayload>,
}

#[derive(Debug, Deserialize)]
pub struct CartData {
    pub cart: Option<CartRaw>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesAddData {
    pub cart_lines_add: Option<CartMutationPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesUpdateData {
    pub cart_lines_update: Option<CartMutationPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesRemoveData {
    pub cart_lines_remove: Option<CartMutationPayload>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_include_fragments() {
        assert!(GET_PRODUCTS.contains("fragment ProductFields"));
        assert!(GET_PRODUCT_BY_HANDLE.contains("fragment ProductFields"));
        assert!(CART_CREATE.contains("fragment CartFields"));
        assert!(CART_LINES_REMOVE.contains("fragment CartFields"));
    }

    #[test]
    fn test_cart_response_parses() {
        let body = r#"{
          "data": {
            "cart": {
              "id": "gid://shopify/Cart/1",
              "checkoutUrl": "https://shop.example/checkout/1",
              "lines": {
                "edges": [{
                  "node": {
                    "id": "gid://shopify/CartLine/1",
                    "quantity": 2,
                    "merchandise": {
                      "id": "gid://shopify/ProductVariant/7",
                      "title": "M",
                      "price": {"amount": "25.00", "currencyCode": "USD"},
                      "selectedOptions": [{"name": "Size", "value": "M"}],
                      "product": {
                        "title": "Logo Tee",
                        "handle": "logo-tee",
                        "featuredImage": {"url": "https://cdn.example/t.jpg", "altText": null}
                      }
                    }
                  }
                }]
              },
              "cost": {"subtotalAmount": {"amount": "50.00", "currencyCode": "USD"}}
            }
          }
        }"#;

        let parsed: GraphQLResponse<CartData> =
            serde_json::from_str(body).expect("cart response should parse");
        let cart = parsed.data.and_then(|d| d.cart).expect("cart present");
        assert_eq!(cart.id, "gid://shopify/Cart/1");
        assert_eq!(cart.lines.edges.len(), 1);
    }

    #[test]
    fn test_error_response_parses() {
        let body = r#"{"data": null, "errors": [{"message": "boom", "locations": []}]}"#;
        let parsed: GraphQLResponse<CartData> =
            serde_json::from_str(body).expect("error response should parse");
        assert!(parsed.data.is_none());
        assert_eq!(parsed.errors.map(|e| e.len()), Some(1));
    }
}
