//! Realm context: the top-level handle for the async client variant
//!
//! A [`KeycloakRealm`] names a server and realm, owns the lifetime of the
//! shared [`Transport`], and is the factory for every protocol client. The
//! transport is created lazily behind a lock on first
//! [`client()`](KeycloakRealm::client) access; [`close()`](KeycloakRealm::close)
//! tears it down and resets the slot, so a later access transparently builds
//! a fresh one.
//!
//! The handle is cheap to clone (`Arc` inner) and every clone shares the
//! same transport slot.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use url::Url;

use crate::admin::KeycloakAdmin;
use crate::authz::KeycloakAuthz;
use crate::openid_connect::KeycloakOpenidConnect;
use crate::transport::Transport;
use crate::uma::KeycloakUma;
use crate::uma1::KeycloakUma1;

/// Handle to one realm on one Keycloak server.
///
/// # Examples
///
/// ```no_run
/// use keyrealm::KeycloakRealm;
/// use url::Url;
///
/// # async fn example() -> keyrealm::Result<()> {
/// let realm = KeycloakRealm::new(
///     Url::parse("https://keycloak.example.com")?,
///     "my-realm",
/// );
///
/// let oidc = realm.open_id_connect("my-client", "my-secret");
/// let tokens = oidc.client_credentials(None).await?;
///
/// realm.close().await;
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
    /// Creates a realm handle. No network I/O happens until the first
    /// operation.
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

    /// Sets extra headers sent with every request (merged into the pooled
    /// client's defaults). Call before the first operation; the headers are
    /// fixed once the transport exists.
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
    ///
    /// Concurrent first accesses serialize on the slot lock, so exactly one
    /// transport is ever live per realm handle.
    pub async fn client(&self) -> Arc<Transport> {
        let mut transport = self.inner.transport.lock().await;
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
    /// uninitialized. Idempotent; a later [`client`](Self::client) access
    /// builds a fresh transport.
    pub async fn close(&self) {
        let taken = self.inner.transport.lock().await.take();
        if let Some(transport) = taken {
            transport.close().await;
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
