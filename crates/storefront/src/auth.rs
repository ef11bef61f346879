//! Viewer identity and capability checks.
//!
//! The authentication provider hands over an access token and a list of role
//! strings. Everything downstream asks a [`Viewer`] for its [`Capabilities`]
//! once per operation rather than inspecting roles.

use secrecy::SecretString;
use shopfront_core::{Capabilities, Capability, Cart, MissingCapability};

use crate::config::IdentityConfig;

/// A signed-in identity.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct Identity {
    access_token: SecretString,
    capabilities: Capabilities,
}

impl Identity {
    /// Build an identity from a token and raw role strings.
    ///
    /// Unknown roles are ignored.
    #[must_use]
    pub fn new<I, S>(access_token: SecretString, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            access_token,
            capabilities: Capabilities::signed_in(roles),
        }
    }

    /// Token for privileged backend writes.
    #[must_use]
    pub const fn access_token(&self) -> &SecretString {
        &self.access_token
    }
}

impl From<&IdentityConfig> for Identity {
    fn from(config: &IdentityConfig) -> Self {
        Self::new(config.access_token.clone(), &config.roles)
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("access_token", &"[REDACTED]")
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

/// Whoever is using the storefront: anonymous or signed in.
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    identity: Option<Identity>,
}

impl Viewer {
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { identity: None }
    }

    #[must_use]
    pub const fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Viewer for an optional configured identity.
    #[must_use]
    pub fn from_config(identity: Option<&IdentityConfig>) -> Self {
        identity.map_or_else(Self::anonymous, |config| Self::signed_in(config.into()))
    }

    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    /// The viewer's capability set; empty when anonymous.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.identity
            .as_ref()
            .map_or_else(Capabilities::anonymous, |id| id.capabilities.clone())
    }

    /// Whether checkout may start: signed in with something in the cart.
    #[must_use]
    pub fn can_checkout(&self, cart: &Cart) -> bool {
        self.capabilities().has(Capability::Customer) && !cart.is_empty()
    }

    /// Require the admin capability and return the token to act with.
    ///
    /// # Errors
    ///
    /// Returns [`MissingCapability`] if the viewer is not an admin.
    pub fn require_admin(&self) -> Result<&SecretString, MissingCapability> {
        let identity = self
            .identity
            .as_ref()
            .ok_or(MissingCapability(Capability::Admin))?;
        identity.capabilities.require(Capability::Admin)?;
        Ok(&identity.access_token)
    }
}
