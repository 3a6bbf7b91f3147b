//! UMA 2 client (blocking variant)
//!
//! Blocking counterpart of [`crate::uma::KeycloakUma`].

use serde_json::{json, Map, Value};

use crate::blocking::discovery::{Discovery, DiscoverySource};
use crate::blocking::realm::KeycloakRealm;
use crate::body::{Payload, ResponseBody};
use crate::error::Result;
use crate::paths::PATH_WELL_KNOWN_UMA2;
use crate::payload;

/// Blocking UMA 2 protection API client for one realm.
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

    /// Registers a resource set.
    pub fn resource_set_create(
        &self,
        token: &str,
        name: &str,
        scopes: &[&str],
        extra: Map<String, Value>,
    ) -> Result<Value> {
        let endpoint = self.endpoint("resource_registration_endpoint")?;
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
        let endpoint = self.endpoint("resource_registration_endpoint")?;
        self.realm.client().put(
            &format!("{endpoint}/{id}"),
            Payload::Json(payload::uma_resource(name, scopes, extra)),
            payload::bearer_json_headers(token)?,
            &[],
        )
    }

    /// Reads the resource set `id`.
    pub fn resource_set_read(&self, token: &str, id: &str) -> Result<Value> {
        let endpoint = self.endpoint("resource_registration_endpoint")?;
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
        let endpoint = self.endpoint("resource_registration_endpoint")?;
        self.realm.client().delete(
            &format!("{endpoint}/{id}"),
            payload::bearer_json_headers(token)?,
            &[],
        )
    }

    /// Lists resource set ids; `query` filters pass through to the
    /// transport's query encoding.
    pub fn resource_set_list(&self, token: &str, query: &[(String, String)]) -> Result<Value> {
        let endpoint = self.endpoint("resource_registration_endpoint")?;
        self.realm
            .client()
            .get(&endpoint, payload::bearer_json_headers(token)?, query)?
            .into_json()
    }

    /// Requests a permission ticket for resource `id`; a single request is
    /// still wrapped in a one-element array.
    pub fn resource_create_ticket(
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

        let endpoint = self.endpoint("permission_endpoint")?;
        self.realm
            .client()
            .post(
                &endpoint,
                Payload::Json(Value::Array(vec![Value::Object(request)])),
                payload::bearer_json_headers(token)?,
                &[],
            )?
            .into_json()
    }

    /// Associates a permission (policy) with resource `id`.
    pub fn resource_associate_permission(
        &self,
        token: &str,
        id: &str,
        name: &str,
        scopes: &[&str],
        extra: Map<String, Value>,
    ) -> Result<Value> {
        let endpoint = self.endpoint("policy_endpoint")?;
        self.realm
            .client()
            .post(
                &format!("{endpoint}/{id}"),
                Payload::Json(payload::uma_resource(name, scopes, extra)),
                payload::bearer_json_headers(token)?,
                &[],
            )?
            .into_json()
    }

    /// Updates the permission policy `id`.
    pub fn permission_update(
        &self,
        token: &str,
        id: &str,
        representation: Map<String, Value>,
    ) -> Result<ResponseBody> {
        let endpoint = self.endpoint("policy_endpoint")?;
        self.realm.client().put(
            &format!("{endpoint}/{id}"),
            Payload::Json(Value::Object(representation)),
            payload::bearer_json_headers(token)?,
            &[],
        )
    }

    /// Deletes the permission policy `id`.
    pub fn permission_delete(&self, token: &str, id: &str) -> Result<ResponseBody> {
        let endpoint = self.endpoint("policy_endpoint")?;
        self.realm.client().delete(
            &format!("{endpoint}/{id}"),
            payload::bearer_json_headers(token)?,
            &[],
        )
    }

    /// Lists permission policies; `query` filters pass through to the
    /// transport's query encoding.
    pub fn permission_list(&self, token: &str, query: &[(String, String)]) -> Result<Value> {
        let endpoint = self.endpoint("policy_endpoint")?;
        self.realm
            .client()
            .get(&endpoint, payload::bearer_json_headers(token)?, query)?
            .into_json()
    }
}
