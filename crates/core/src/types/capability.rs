//! Capability set derived from an identity's role strings.
//!
//! Role-gated behavior is checked once per operation against a
//! [`Capabilities`] set rather than through scattered boolean flags.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Something a viewer is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Signed-in shopper: may check out.
    Customer,
    /// Store administrator: may create and edit products.
    Admin,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// Error returned when a role string names no known capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid capability: {0}")]
pub struct CapabilityError(pub String);

impl std::str::FromStr for Capability {
    type Err = CapabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            _ => Err(CapabilityError(s.to_owned())),
        }
    }
}

/// Error returned when an operation needs a capability the viewer lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("missing capability: {0}")]
pub struct MissingCapability(pub Capability);

/// The set of capabilities held by the current viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities(BTreeSet<Capability>);

impl Capabilities {
    /// Capabilities of an anonymous viewer (none).
    #[must_use]
    pub const fn anonymous() -> Self {
        Self(BTreeSet::new())
    }

    /// Capabilities of a signed-in identity with the given role strings.
    ///
    /// Every signed-in identity is a customer; unknown roles are ignored.
    #[must_use]
    pub fn signed_in<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set: BTreeSet<Capability> = roles
            .into_iter()
            .filter_map(|role| role.as_ref().trim().parse().ok())
            .collect();
        set.insert(Capability::Customer);
        Self(set)
    }

    /// Whether the set contains a capability.
    #[must_use]
    pub fn has(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    /// Require a capability.
    ///
    /// # Errors
    ///
    /// Returns [`MissingCapability`] if the set does not contain it.
    pub fn require(&self, capability: Capability) -> Result<(), MissingCapability> {
        if self.has(capability) {
            Ok(())
        } else {
            Err(MissingCapability(capability))
        }
    }

    /// Whether this is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has(Capability::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_has_nothing() {
        let caps = Capabilities::anonymous();
        assert!(!caps.has(Capability::Customer));
        assert_eq!(
            caps.require(Capability::Customer),
            Err(MissingCapability(Capability::Customer))
        );
    }

    #[test]
    fn test_signed_in_is_customer() {
        let caps = Capabilities::signed_in(Vec::<String>::new());
        assert!(caps.has(Capability::Customer));
        assert!(!caps.is_admin());
    }

    #[test]
    fn test_admin_role_grants_admin() {
        let caps = Capabilities::signed_in(["editor", "admin"]);
        assert!(caps.is_admin());
        assert!(caps.has(Capability::Customer));
        assert!(caps.require(Capability::Admin).is_ok());
    }

    #[test]
    fn test_capability_round_trips_through_str() {
        assert_eq!("admin".parse::<Capability>(), Ok(Capability::Admin));
        assert_eq!(Capability::Customer.to_string(), "customer");
        assert!("owner".parse::<Capability>().is_err());
    }
}
