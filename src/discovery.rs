//! Discovery capability composed into every protocol client (async variant)
//!
//! Each protocol client declares a well-known path template and composes a
//! [`Discovery`] value; the [`DiscoverySource`] trait exposes the shared
//! behaviour. The document cache is strictly per-client-instance: two
//! clients, even for the same realm, each run their own discovery and can
//! never observe each other's endpoints.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::paths::realm_path;
use crate::realm::KeycloakRealm;
use crate::well_known::WellKnown;

/// Per-client-instance discovery state: the formatted well-known path and
/// the lazily-built document.
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
    /// client's lifetime. Building binds the document to the realm's
    /// current transport; the fetch itself happens on first lookup.
    pub async fn document(&self) -> Result<WellKnown> {
        let mut document = self.document.lock().await;
        if let Some(document) = &*document {
            return Ok(document.clone());
        }

        let transport = self.realm.client().await;
        let url = transport.full_url(&self.path)?;
        let built = WellKnown::new(transport, url);
        *document = Some(built.clone());
        Ok(built)
    }

    /// Resolves one endpoint name through the document.
    pub async fn endpoint(&self, name: &str) -> Result<String> {
        self.document().await?.endpoint(name).await
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
#[async_trait]
pub trait DiscoverySource {
    /// The discovery capability composed into this client.
    fn discovery(&self) -> &Discovery;

    /// The client's discovery document, resolved.
    ///
    /// The first call triggers the at-most-once network fetch; pre-seeded
    /// documents resolve without touching the network.
    async fn well_known(&self) -> Result<WellKnown> {
        let document = self.discovery().document().await?;
        document.contents().await?;
        Ok(document)
    }

    /// Resolves one endpoint name from the discovery document.
    async fn endpoint(&self, name: &str) -> Result<String> {
        self.discovery().endpoint(name).await
    }
}
