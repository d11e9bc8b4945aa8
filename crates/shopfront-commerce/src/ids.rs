//! Newtype IDs for type-safe identifiers.
//!
//! The catalog hands out numeric ids; wrapping them prevents passing a
//! `ProductId` where a `VariantId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Macro to generate numeric newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A catalog identifier.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Create an ID from its numeric value.
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the numeric value.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

define_id!(ProductId);
define_id!(VariantId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new(123);
        assert_eq!(id.get(), 123);
    }

    #[test]
    fn test_id_from_str() {
        let id: VariantId = " 456 ".parse().unwrap();
        assert_eq!(id, VariantId::new(456));
        assert!("abc".parse::<VariantId>().is_err());
    }

    #[test]
    fn test_id_display() {
        assert_eq!(ProductId::new(789).to_string(), "789");
    }

    #[test]
    fn test_id_serializes_as_number() {
        let json = serde_json::to_string(&ProductId::new(42)).unwrap();
        assert_eq!(json, "42");
        let back: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ProductId::new(42));
    }
}
