//! Newtype IDs for type-safe entity references.
//!
//! Catalog and order identifiers are human-readable slugs (`eco-mailer-1`,
//! `ORD-12345`), so every ID wraps a `String`. Use the `define_id!` macro to
//! create wrappers that prevent accidentally mixing IDs from different
//! entity types.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<&str>`, `From<String>` and `AsRef<str>` implementations
///
/// # Example
///
/// ```rust
/// # use grooveo_core::define_id;
/// define_id!(SkuId);
/// define_id!(BatchId);
///
/// let sku = SkuId::new("eco-box-1");
/// let batch = BatchId::new("eco-box-1");
///
/// // These are different types, so this won't compile:
/// // let _: SkuId = batch;
/// assert_eq!(sku.as_str(), batch.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
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

            /// Get the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(OrderId);
define_id!(NotificationId);
define_id!(TransactionId);

impl NotificationId {
    /// Generate a fresh notification ID (`notif-<uuid>`).
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("notif-{}", uuid::Uuid::new_v4().simple()))
    }
}

impl TransactionId {
    /// Generate a fresh ledger transaction ID with the given prefix
    /// (`earn-<uuid>`, `redeem-<uuid>`).
    #[must_use]
    pub fn generate(prefix: &str) -> Self {
        Self(format!("{prefix}-{}", uuid::Uuid::new_v4().simple()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_as_str() {
        let id = ProductId::new("eco-mailer-1");
        assert_eq!(id.as_str(), "eco-mailer-1");
        assert_eq!(id.to_string(), "eco-mailer-1");
    }

    #[test]
    fn test_serde_transparent() {
        let id = OrderId::from("ORD-12345");
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"ORD-12345\"");
    }

    #[test]
    fn test_generated_ids_are_prefixed_and_unique() {
        let a = NotificationId::generate();
        let b = NotificationId::generate();
        assert!(a.as_str().starts_with("notif-"));
        assert_ne!(a, b);

        let earn = TransactionId::generate("earn");
        assert!(earn.as_str().starts_with("earn-"));
    }
}
