//! Legacy UMA 1 client (async variant)
//!
//! Resource-set registration against the v1 `uma-configuration` document,
//! which publishes the registration URL under
//! `resource_set_registration_endpoint` (the v2 document renamed it). Kept
//! for servers that still speak the Kantara 1.0 protection API.

use serde_json::{Map, Value};

use crate::body::{Payload, ResponseBody};
use crate::discovery::{Discovery, DiscoverySource};
use crate::error::Result;
use crate::paths::PATH_WELL_KNOWN_UMA1;
use crate::payload;
use crate::realm::KeycloakRealm;

/// UMA 1 resource-set registration client for one realm.
#[derive(Debug)]
pub struct KeycloakUma1 {
    realm: KeycloakRealm,
    discovery: Discovery,
}

impl DiscoverySource for KeycloakUma1 {
    fn discovery(&self) -> &Discovery {
        &self.discovery
    }
}

impl KeycloakUma1 {
    pub(crate) fn new(realm: &KeycloakRealm) -> Self {
        Self {
            realm: realm.clone(),
            discovery: Discovery::new(realm.clone(), PATH_WELL_KNOWN_UMA1),
        }
    }

    /// Registers a resource set.
    pub async fn resource_set_create(
        &self,
        token: &str,
        name: &str,
        scopes: &[&str],
        extra: Map<String, Value>,
    ) -> Result<Value> {
        let endpoint = self.endpoint("resource_set_registration_endpoint").await?;
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

    /// Updates the resource set `id`.
    pub async fn resource_set_update(
        &self,
        token: &str,
        id: &str,
        name: &str,
        scopes: &[&str],
        extra: Map<String, Value>,
    ) -> Result<ResponseBody> {
        let endpoint = self.endpoint("resource_set_registration_endpoint").await?;
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
        let endpoint = self.endpoint("resource_set_registration_endpoint").await?;
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
        let endpoint = self.endpoint("resource_set_registration_endpoint").await?;
        let transport = self.realm.client().await;
        transport
            .delete(
                &format!("{endpoint}/{id}"),
                payload::bearer_json_headers(token)?,
                &[],
            )
            .await
    }

    /// Lists resource sets; `query` filters pass through to the transport's
    /// query encoding.
    pub async fn resource_set_list(
        &self,
        token: &str,
        query: &[(String, String)],
    ) -> Result<Value> {
        let endpoint = self.endpoint("resource_set_registration_endpoint").await?;
        let transport = self.realm.client().await;
        transport
            .get(&endpoint, payload::bearer_json_headers(token)?, query)
            .await?
            .into_json()
    }
}
