//! Legacy UMA 1 client (blocking variant)
//!
//! Blocking counterpart of [`crate::uma1::KeycloakUma1`].

use serde_json::{Map, Value};

use crate::blocking::discovery::{Discovery, DiscoverySource};
use crate::blocking::realm::KeycloakRealm;
use crate::body::{Payload, ResponseBody};
use crate::error::Result;
use crate::paths::PATH_WELL_KNOWN_UMA1;
use crate::payload;

/// Blocking UMA 1 resource-set registration client for one realm.
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
    pub fn resource_set_create(
        &self,
        token: &str,
        name: &str,
        scopes: &[&str],
        extra: Map<String, Value>,
    ) -> Result<Value> {
        let endpoint = self.endpoint("resource_set_registration_endpoint")?;
        self.realm
            .client()
            .post(
                &endpoint,
                Payload::Json(payload::uma_resource(name, scopes, extra)),
                payload::bearer_json_headers(token)?,
                &[],
            )?
            .into_json()
    }

    /// Updates the resource set `id`.
    pub fn resource_set_update(
        &self,
        token: &str,
        id: &str,
        name: &str,
        scopes: &[&str],
        extra: Map<String, Value>,
    ) -> Result<ResponseBody> {
        let endpoint = self.endpoint("resource_set_registration_endpoint")?;
        self.realm.client().put(
            &format!("{endpoint}/{id}"),
            Payload::Json(payload::uma_resource(name, scopes, extra)),
            payload::bearer_json_headers(token)?,
            &[],
        )
    }

    /// Reads the resource set `id`.
    pub fn resource_set_read(&self, token: &str, id: &str) -> Result<Value> {
        let endpoint = self.endpoint("resource_set_registration_endpoint")?;
        self.realm
            .client()
            .get(
                &format!("{endpoint}/{id}"),
                payload::bearer_json_headers(token)?,
                &[],
            )?
            .into_json()
    }

    /// Deletes the resource set `id`.
    pub fn resource_set_delete(&self, token: &str, id: &str) -> Result<ResponseBody> {
        let endpoint = self.endpoint("resource_set_registration_endpoint")?;
        self.realm.client().delete(
            &format!("{endpoint}/{id}"),
            payload::bearer_json_headers(token)?,
            &[],
        )
    }

    /// Lists resource sets; `query` filters pass through to the transport's
    /// query encoding.
    pub fn resource_set_list(&self, token: &str, query: &[(String, String)]) -> Result<Value> {
        let endpoint = self.endpoint("resource_set_registration_endpoint")?;
        self.realm
            .client()
            .get(&endpoint, payload::bearer_json_headers(token)?, query)?
            .into_json()
    }
}
