//! Strongly-typed ID wrappers for all entity types
//!
//! Using newtype wrappers prevents accidentally mixing up IDs from different
//! entity types at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }


            /// Parse an ID from a full UUID string
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }

            /// Check whether a short display form (`prefix-xxxxxxxx`) refers to this ID
            pub fn matches_short(&self, s: &str) -> bool {
                let short = s.strip_prefix($display_prefix).unwrap_or(s);
                short.len() >= 8 && self.0.to_string().starts_with(short)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(BillId, "bil-");
define_id!(BillLineId, "lin-");
define_id!(ServiceId, "svc-");
define_id!(UserId, "usr-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = BillId::new();
        let display = id.to_string();
        assert!(display.starts_with("bil-"));
        assert_eq!(display.len(), 12);
    }

    #[test]
    fn test_matches_short() {
        let id = ServiceId::new();
        let short = id.to_string();
        assert!(id.matches_short(&short));
        assert!(id.matches_short(&short["svc-".len()..]));
        assert!(!id.matches_short("svc-"));
        assert!(!ServiceId::new().matches_short(&short));
    }

    #[test]
    fn test_from_str_accepts_prefix() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let plain: UserId = uuid_str.parse().unwrap();
        let prefixed: UserId = format!("usr-{}", uuid_str).parse().unwrap();
        assert_eq!(plain, prefixed);
        assert!(plain.to_string().starts_with("usr-550e8400"));
    }

    #[test]
    fn test_id_serialization() {
        let id = BillLineId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: BillLineId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
