//! UMA 2 client (async variant)
//!
//! Resource-set registration, permission tickets, and policy management
//! against the `uma2-configuration` document. Four endpoint names are
//! consumed: `resource_registration_endpoint`, `permission_endpoint`,
//! `policy_endpoint`, and (via the Authz client) `token_endpoint`.
//!
//! <https://docs.kantarainitiative.org/uma/wg/rec-oauth-uma-federated-authz-2.0.html>

use serde_json::{json, Map, Value};

use crate::body::{Payload, ResponseBody};
use crate::discovery::{Discovery, DiscoverySource};
use crate::error::Result;
use crate::paths::PATH_WELL_KNOWN_UMA2;
use crate::payload;
use crate::realm::KeycloakRealm;

/// UMA 2 protection API client for one realm.
#[derive(Debug)]
pub struct KeycloakUma {
    realm: KeycloakRealm,
    discovery: Discovery,
}

impl DiscoverySource for KeycloakUma {
    fn discovery(&self) -> &Discovery {
        &self.discovery
    }
}

impl KeycloakUma {
    pub(crate) fn new(realm: &KeycloakRealm) -> Self {
        Self {
            realm: realm.clone(),
            discovery: Discovery::new(realm.clone(), PATH_WELL_KNOWN_UMA2),
        }
    }

    /// Registers a resource set. `extra` carries the optional descriptor
    /// fields (`uri`, `type`, `icon_uri`, `owner`, ...).
    pub async fn resource_set_create(
        &self,
        token: &str,
        name: &str,
        scopes: &[&str],
        extra: Map<String, Value>,
    ) -> Result<Value> {
        let endpoint = self.endpoint("resource_registration_endpoint").await?;
        let transport = self.realm.client().await;
        transport
            .post(
                &endpoint,
                Payload::Json(payload::uma_resource(name, scopes, extra)),
                payload::bearer_json_headers(token)?,
                &[],
            )
            .await?
            .into_json()
    }

    /// Updates the resource set `id` with a full descriptor.
    pub async fn resource_set_update(
        &self,
        token: &str,
        id: &str,
        name: &str,
        scopes: &[&str],
        extra: Map<String, Value>,
    ) -> Result<ResponseBody> {
        let endpoint = self.endpoint("resource_registration_endpoint").await?;
        let transport = self.realm.client().await;
        transport
            .put(
                &format!("{endpoint}/{id}"),
                Payload::Json(payload::uma_resource(name, scopes, extra)),
                payload::bearer_json_headers(token)?,
                &[],
            )
            .await
    }

    /// Reads the resource set `id`.
    pub async fn resource_set_read(&self, token: &str, id: &str) -> Result<Value> {
        let endpoint = self.endpoint("resource_registration_endpoint").await?;
        let transport = self.realm.client().await;
        transport
            .get(
                &format!("{endpoint}/{id}"),
                payload::bearer_json_headers(token)?,
                &[],
            )
            .await?
            .into_json()
    }

    /// Deletes the resource set `id`.
    pub async fn resource_set_delete(&self, token: &str, id: &str) -> Result<ResponseBody> {
        let endpoint = self.endpoint("resource_registration_endpoint").await?;
        let transport = self.realm.client().await;
        transport
            .delete(
                &format!("{endpoint}/{id}"),
                payload::bearer_json_headers(token)?,
                &[],
            )
            .await
    }

    /// Lists resource set ids. `query` filters (`name`, `uri`, `owner`,
    /// `type`, `scope`) pass straight through to the transport's query
    /// encoding.
    pub async fn resource_set_list(
        &self,
        token: &str,
        query: &[(String, String)],
    ) -> Result<Value> {
        let endpoint = self.endpoint("resource_registration_endpoint").await?;
        let transport = self.realm.client().await;
        transport
            .get(&endpoint, payload::bearer_json_headers(token)?, query)
            .await?
            .into_json()
    }

    /// Requests a permission ticket for resource `id`.
    ///
    /// The permission endpoint takes a list of requested permissions; a
    /// single request is still wrapped in a one-element array.
    pub async fn resource_create_ticket(
        &self,
        token: &str,
        id: &str,
        scopes: &[&str],
        extra: Map<String, Value>,
    ) -> Result<Value> {
        let mut request = Map::new();
        request.insert("resource_id".to_string(), json!(id));
        request.insert("resource_scopes".to_string(), json!(scopes));
        for (key, value) in extra {
            request.insert(key, value);
        }

        let endpoint = self.endpoint("permission_endpoint").await?;
        let transport = self.realm.client().await;
        transport
            .post(
                &endpoint,
                Payload::Json(Value::Array(vec![Value::Object(request)])),
                payload::bearer_json_headers(token)?,
                &[],
            )
            .await?
            .into_json()
    }

    /// Associates a permission (policy) with resource `id`.
    pub async fn resource_associate_permission(
        &self,
        token: &str,
        id: &str,
        name: &str,
        scopes: &[&str],
        extra: Map<String, Value>,
    ) -> Result<Value> {
        let endpoint = self.endpoint("policy_endpoint").await?;
        let transport = self.realm.client().await;
        transport
            .post(
                &format!("{endpoint}/{id}"),
                Payload::Json(payload::uma_resource(name, scopes, extra)),
                payload::bearer_json_headers(token)?,
                &[],
            )
            .await?
            .into_json()
    }

    /// Updates the permission policy `id` with the given representation.
    pub async fn permission_update(
        &self,
        token: &str,
        id: &str,
        representation: Map<String, Value>,
    ) -> Result<ResponseBody> {
        let endpoint = self.endpoint("policy_endpoint").await?;
        let transport = self.realm.client().await;
        transport
            .put(
                &format!("{endpoint}/{id}"),
                Payload::Json(Value::Object(representation)),
                payload::bearer_json_headers(token)?,
                &[],
            )
            .await
    }

    /// Deletes the permission policy `id`.
    pub async fn permission_delete(&self, token: &str, id: &str) -> Result<ResponseBody> {
        let endpoint = self.endpoint("policy_endpoint").await?;
        let transport = self.realm.client().await;
        transport
            .delete(
                &format!("{endpoint}/{id}"),
                payload::bearer_json_headers(token)?,
                &[],
            )
            .await
    }

    /// Lists permission policies; `query` filters (`name`, `resource`,
    /// `scope`, ...) pass through to the transport's query encoding.
    pub async fn permission_list(
        &self,
        token: &str,
        query: &[(String, String)],
    ) -> Result<Value> {
        let endpoint = self.endpoint("policy_endpoint").await?;
        let transport = self.realm.client().await;
        transport
            .get(&endpoint, payload::bearer_json_headers(token)?, query)
            .await?
            .into_json()
    }
}
