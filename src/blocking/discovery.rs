//! Discovery capability for the blocking client variant
//!
//! The blocking counterpart of [`crate::discovery`]: the same composition
//! (one [`Discovery`] per protocol-client instance, strictly per-instance
//! caching) with a plain trait instead of an async one.

use std::sync::{Mutex, PoisonError};

use crate::blocking::realm::KeycloakRealm;
use crate::blocking::well_known::WellKnown;
use crate::error::Result;
use crate::paths::realm_path;

/// Per-client-instance discovery state.
pub struct Discovery {
    realm: KeycloakRealm,
    path: String,
    document: Mutex<Option<WellKnown>>,
}

impl Discovery {
    /// Binds the `{realm}` placeholder in `template` to the realm's name.
    pub fn new(realm: KeycloakRealm, template: &str) -> Self {
        let path = realm_path(template, realm.realm_name());
        Self {
            realm,
            path,
            document: Mutex::new(None),
        }
    }

    /// The formatted well-known path this client discovers from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The realm this discovery is bound to.
    pub fn realm(&self) -> &KeycloakRealm {
        &self.realm
    }

    /// The discovery document, built on first access and cached for the
    /// client's lifetime.
    pub fn document(&self) -> Result<WellKnown> {
        let mut document = self
            .document
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(document) = &*document {
            return Ok(document.clone());
        }

        let transport = self.realm.client();
        let url = transport.full_url(&self.path)?;
        let built = WellKnown::new(transport, url);
        *document = Some(built.clone());
        Ok(built)
    }

    /// Resolves one endpoint name through the document.
    pub fn endpoint(&self, name: &str) -> Result<String> {
        self.document()?.endpoint(name)
    }
}

impl std::fmt::Debug for Discovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Discovery")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Capability trait for clients that resolve their operation URLs from a
/// well-known document.
pub trait DiscoverySource {
    /// The discovery capability composed into this client.
    fn discovery(&self) -> &Discovery;

    /// The client's discovery document, resolved. The first call triggers
    /// the at-most-once fetch; pre-seeded documents resolve without I/O.
    fn well_known(&self) -> Result<WellKnown> {
        let document = self.discovery().document()?;
        document.contents()?;
        Ok(document)
    }

    /// Resolves one endpoint name from the discovery document.
    fn endpoint(&self, name: &str) -> Result<String> {
        self.discovery().endpoint(name)
    }
}
