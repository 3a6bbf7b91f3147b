//! Keycloak Admin REST API (async variant)
//!
//! The admin surface is a tree of path-template resources over the realm's
//! transport. [`KeycloakAdmin`] is the entry point: it holds the Bearer
//! token and stamps every request with `Authorization` and
//! `Content-Type: application/json`. Representations are
//! `serde_json` values with the camelCase keys the Admin API expects; the
//! endpoints are schemaless maps and are treated as such.
//!
//! # Module Layout
//!
//! - [`realms`]  -- realm collection and per-realm resources
//! - [`clients`] -- clients and client roles
//! - [`users`]   -- users, group membership, realm-role mappings
//! - [`groups`]  -- groups
//! - [`roles`]   -- realm roles

pub mod clients;
pub mod groups;
pub(crate) mod paths;
pub mod realms;
pub mod roles;
pub mod users;

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::{Map, Value};

use crate::body::{Payload, ResponseBody};
use crate::error::{KeyrealmError, Result};
use crate::payload::bearer_json_headers;
use crate::realm::KeycloakRealm;

pub use realms::{RealmAdmin, Realms};

/// Admin API entry point.
///
/// Obtained from [`KeycloakRealm::admin`]; authenticate it with a token from
/// an OpenID Connect grant before use.
///
/// # Examples
///
/// ```no_run
/// use url::Url;
/// use keyrealm::KeycloakRealm;
///
/// # async fn example() -> keyrealm::Result<()> {
/// let realm = KeycloakRealm::new(Url::parse("https://kc.example.com")?, "master");
/// let admin = realm.admin().with_token("access-token");
///
/// let realms = admin.realms().all().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct KeycloakAdmin {
    realm: KeycloakRealm,
    token: Option<String>,
}

impl KeycloakAdmin {
    pub(crate) fn new(realm: &KeycloakRealm) -> Self {
        Self {
            realm: realm.clone(),
            token: None,
        }
    }

    /// Sets the Bearer token used to authenticate every admin call.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Builder-style variant of [`set_token`](Self::set_token).
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.set_token(token);
        self
    }

    /// The realm collection resource.
    pub fn realms(&self) -> Realms {
        Realms::new(self.clone())
    }

    /// GET the server root.
    pub async fn root(&self) -> Result<ResponseBody> {
        self.get("/", &[]).await
    }

    fn auth_headers(&self) -> Result<HeaderMap> {
        let token = self.token.as_deref().ok_or_else(|| {
            KeyrealmError::IllegalState("admin token is not set".to_string())
        })?;
        bearer_json_headers(token)
    }

    pub(crate) async fn get(&self, path: &str, query: &[(String, String)]) -> Result<ResponseBody> {
        let transport = self.realm.client().await;
        let url = transport.full_url(path)?;
        transport.get(&url, self.auth_headers()?, query).await
    }

    pub(crate) async fn post(&self, path: &str, body: Value) -> Result<ResponseBody> {
        let transport = self.realm.client().await;
        let url = transport.full_url(path)?;
        transport
            .post(&url, Payload::Json(body), self.auth_headers()?, &[])
            .await
    }

    pub(crate) async fn put(&self, path: &str, body: Value) -> Result<ResponseBody> {
        let transport = self.realm.client().await;
        let url = transport.full_url(path)?;
        transport
            .put(&url, Payload::Json(body), self.auth_headers()?, &[])
            .await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<ResponseBody> {
        let transport = self.realm.client().await;
        let url = transport.full_url(path)?;
        transport.delete(&url, self.auth_headers()?, &[]).await
    }

    /// DELETE with a JSON body; role-mapping removal requires one.
    pub(crate) async fn delete_json(&self, path: &str, body: Value) -> Result<ResponseBody> {
        let transport = self.realm.client().await;
        let url = transport.full_url(path)?;
        transport
            .request(
                Method::DELETE,
                &url,
                Payload::Json(body),
                self.auth_headers()?,
                &[],
            )
            .await
    }
}

impl std::fmt::Debug for KeycloakAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeycloakAdmin")
            .field("realm", &self.realm)
            .field("token", &self.token.as_deref().map(|_| "***"))
            .finish()
    }
}

/// Builds a representation: one required `key: value` field merged with the
/// caller's extra (camelCase) fields.
pub(crate) fn representation(key: &str, value: &str, extra: Map<String, Value>) -> Value {
    let mut payload = Map::new();
    payload.insert(key.to_string(), Value::String(value.to_string()));
    for (extra_key, extra_value) in extra {
        payload.insert(extra_key, extra_value);
    }
    Value::Object(payload)
}
