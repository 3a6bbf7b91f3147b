//! Realm context for the blocking client variant
//!
//! Same contract as [`crate::realm::KeycloakRealm`]: a cheap-clone handle
//! owning one lazily-created [`Transport`], reset by [`close`] for
//! idempotent re-creation.
//!
//! [`close`]: KeycloakRealm::close

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use url::Url;

use crate::blocking::admin::KeycloakAdmin;
use crate::blocking::authz::KeycloakAuthz;
use crate::blocking::openid_connect::KeycloakOpenidConnect;
use crate::blocking::transport::Transport;
use crate::blocking::uma::KeycloakUma;
use crate::blocking::uma1::KeycloakUma1;

/// Blocking handle to one realm on one Keycloak server.
///
/// # Examples
///
/// ```no_run
/// use keyrealm::blocking::KeycloakRealm;
/// use url::Url;
///
/// # fn example() -> keyrealm::Result<()> {
/// let realm = KeycloakRealm::new(
///     Url::parse("https://keycloak.example.com")?,
///     "my-realm",
/// );
///
/// let oidc = realm.open_id_connect("my-client", "my-secret");
/// let tokens = oidc.client_credentials(None)?;
///
/// realm.close();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct KeycloakRealm {
    inner: Arc<RealmInner>,
}

struct RealmInner {
    server_url: Url,
    realm_name: String,
    headers: HashMap<String, String>,
    transport: Mutex<Option<Arc<Transport>>>,
}

impl KeycloakRealm {
    /// Creates a realm handle; no network I/O until the first operation.
    pub fn new(server_url: Url, realm_name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RealmInner {
                server_url,
                realm_name: realm_name.into(),
                headers: HashMap::new(),
                transport: Mutex::new(None),
            }),
        }
    }

    /// Sets extra headers sent with every request. Call before the first
    /// operation; the headers are fixed once the transport exists.
    pub fn with_headers(self, headers: HashMap<String, String>) -> Self {
        Self {
            inner: Arc::new(RealmInner {
                server_url: self.inner.server_url.clone(),
                realm_name: self.inner.realm_name.clone(),
                headers,
                transport: Mutex::new(None),
            }),
        }
    }

    /// The server base URL.
    pub fn server_url(&self) -> &Url {
        &self.inner.server_url
    }

    /// The realm name.
    pub fn realm_name(&self) -> &str {
        &self.inner.realm_name
    }

    /// The shared transport, created on first access and reused until
    /// [`close`](Self::close).
    pub fn client(&self) -> Arc<Transport> {
        let mut transport = self
            .inner
            .transport
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match &*transport {
            Some(transport) => transport.clone(),
            None => {
                let created = Arc::new(Transport::new(
                    self.inner.server_url.clone(),
                    self.inner.headers.clone(),
                ));
                *transport = Some(created.clone());
                created
            }
        }
    }

    /// Closes the current transport (if any) and resets the slot to
    /// uninitialized. Idempotent.
    pub fn close(&self) {
        let taken = self
            .inner
            .transport
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(transport) = taken {
            transport.close();
        }
    }

    /// OpenID Connect client for this realm.
    pub fn open_id_connect(
        &self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> KeycloakOpenidConnect {
        KeycloakOpenidConnect::new(self, client_id, client_secret)
    }

    /// Legacy Authz client for this realm.
    pub fn authz(&self, client_id: impl Into<String>) -> KeycloakAuthz {
        KeycloakAuthz::new(self, client_id)
    }

    /// UMA 2 client for this realm.
    pub fn uma(&self) -> KeycloakUma {
        KeycloakUma::new(self)
    }

    /// Legacy UMA 1 client for this realm.
    pub fn uma1(&self) -> KeycloakUma1 {
        KeycloakUma1::new(self)
    }

    /// Admin API entry point for this realm's server.
    pub fn admin(&self) -> KeycloakAdmin {
        KeycloakAdmin::new(self)
    }
}

impl std::fmt::Debug for KeycloakRealm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeycloakRealm")
            .field("server_url", &self.inner.server_url.as_str())
            .field("realm_name", &self.inner.realm_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn realm() -> KeycloakRealm {
        KeycloakRealm::new(Url::parse("https://example.com").unwrap(), "example")
    }

    #[test]
    fn test_client_is_created_once_and_shared() {
        let realm = realm();
        let first = realm.client();
        let second = realm.client();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_close_resets_to_uninitialized() {
        let realm = realm();
        let first = realm.client();
        realm.close();
        assert!(first.is_closed());

        let second = realm.client();
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(!second.is_closed());
    }

    #[test]
    fn test_close_is_idempotent() {
        let realm = realm();
        realm.client();
        realm.close();
        realm.close();
    }
}
