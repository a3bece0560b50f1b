//! Opaque newtype IDs for commerce entities.
//!
//! The commerce backend identifies variants and carts with opaque global IDs
//! (e.g. `gid://shopify/ProductVariant/123`). Use the `define_opaque_id!`
//! macro to create type-safe wrappers that prevent accidentally passing a
//! cart ID where a variant ID is expected.

/// Macro to define a type-safe opaque string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>` and `From<&str>` implementations
///
/// # Example
///
/// ```rust
/// # use nfluential_core::define_opaque_id;
/// define_opaque_id!(VariantId);
/// define_opaque_id!(RemoteCartId);
///
/// let variant = VariantId::new("gid://shopify/ProductVariant/1");
/// let cart = RemoteCartId::new("gid://shopify/Cart/1");
///
/// // These are different types, so this won't compile:
/// // let _: VariantId = cart;
/// ```
#[macro_export]
macro_rules! define_opaque_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::convert::From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl ::core::convert::From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl ::core::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_opaque_id!(VariantId);
define_opaque_id!(RemoteCartId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_id_roundtrip() {
        let id = VariantId::new("gid://shopify/ProductVariant/42");
        assert_eq!(id.as_str(), "gid://shopify/ProductVariant/42");
        assert_eq!(format!("{id}"), "gid://shopify/ProductVariant/42");
    }

    #[test]
    fn test_serde_transparent() {
        let id = RemoteCartId::new("gid://shopify/Cart/abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"gid://shopify/Cart/abc\"");

        let parsed: RemoteCartId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_from_str_and_string() {
        let a: VariantId = "v1".into();
        let b: VariantId = String::from("v1").into();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ids_usable_as_map_keys() {
        let mut map = std::collections::HashMap::new();
        map.insert(VariantId::new("v1"), 2_u32);
        assert_eq!(map.get(&VariantId::new("v1")), Some(&2));
    }
}
