//! Typed IDs for type-safe entity references.
//!
//! Every table uses a store-assigned integer key. Wrapping it prevents passing an
//! `InventoryId` where a `ProductId` is expected.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            /// Creates an ID from a raw key.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Returns the raw key.
            #[must_use]
            pub const fn into_inner(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

typed_id!(MovementId, "Identifier of a movement (shared by its buy, sell or expense).");
typed_id!(InventoryId, "Identifier of an inventory line.");
typed_id!(ProductId, "Identifier of a product.");
typed_id!(ClientId, "Identifier of a client account.");
typed_id!(WarehouseId, "Identifier of a warehouse (the owning client's id).");
typed_id!(UserId, "Identifier of a user account.");

impl From<ClientId> for WarehouseId {
    fn from(id: ClientId) -> Self {
        Self(id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let id = MovementId::new(7);
        assert_eq!(id.to_string(), "7");
        assert_eq!("7".parse::<MovementId>().unwrap(), id);
        assert!("seven".parse::<MovementId>().is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&ProductId::new(42)).unwrap();
        assert_eq!(json, "42");
        let back: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(back.into_inner(), 42);
    }

    #[test]
    fn test_warehouse_is_keyed_by_client() {
        let warehouse: WarehouseId = ClientId::new(3).into();
        assert_eq!(warehouse, WarehouseId::new(3));
    }
}
