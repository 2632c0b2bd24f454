//! Account identity type for the token ledger
//!
//! Identities are opaque 128-bit values. Fresh identities use UUID v7 so
//! they sort by creation time; the nil UUID is reserved as the null
//! identity (mint source, burn sink, "no address").

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque account identity, the universal mapping key of the ledger.
///
/// `Ord` is derived so snapshots can iterate holders deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(Uuid);

impl Address {
    /// The null identity.
    pub const NULL: Address = Address(Uuid::nil());

    /// Create a fresh, unique identity.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// True for the null identity.
    pub fn is_null(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Address {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_creation() {
        let a = Address::new();
        let b = Address::new();
        assert_ne!(a, b, "Addresses should be unique");
        assert!(!a.is_null());
    }

    #[test]
    fn test_null_address() {
        assert!(Address::NULL.is_null());
        assert_eq!(Address::NULL.to_string(), "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn test_address_serialization() {
        let addr = Address::new();
        let json = serde_json::to_string(&addr).unwrap();
        let deserialized: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, deserialized);
    }

    #[test]
    fn test_address_parse() {
        let addr = Address::new();
        let parsed: Address = addr.to_string().parse().unwrap();
        assert_eq!(addr, parsed);
        assert!("not-an-address".parse::<Address>().is_err());
    }

    #[test]
    fn test_address_ordering_is_total() {
        let mut addrs = vec![Address::new(), Address::NULL, Address::new()];
        addrs.sort();
        assert_eq!(addrs[0], Address::NULL);
    }
}
