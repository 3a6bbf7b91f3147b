//! Legacy Authz client (blocking variant)
//!
//! Blocking counterpart of [`crate::authz::KeycloakAuthz`], including the
//! degrade-to-empty contract on denied or failed permission requests.

use serde_json::{Map, Value};

use crate::blocking::discovery::{Discovery, DiscoverySource};
use crate::blocking::realm::KeycloakRealm;
use crate::body::Payload;
use crate::error::{KeyrealmError, Result};
use crate::paths::{realm_path, PATH_ENTITLEMENT, PATH_WELL_KNOWN_UMA2};
use crate::payload;

/// Blocking legacy Authz client bound to one realm and one registered
/// client.
#[derive(Debug)]
pub struct KeycloakAuthz {
    realm: KeycloakRealm,
    client_id: String,
    discovery: Discovery,
}

impl DiscoverySource for KeycloakAuthz {
    fn discovery(&self) -> &Discovery {
        &self.discovery
    }
}

impl KeycloakAuthz {
    pub(crate) fn new(realm: &KeycloakRealm, client_id: impl Into<String>) -> Self {
        Self {
            realm: realm.clone(),
            client_id: client_id.into(),
            discovery: Discovery::new(realm.clone(), PATH_WELL_KNOWN_UMA2),
        }
    }

    /// Requests the user's evaluated permissions; see the async counterpart
    /// for the degradation contract.
    pub fn get_permissions(
        &self,
        token: &str,
        resource_scopes: &[(String, String)],
        submit_request: bool,
        ticket: Option<&str>,
    ) -> Result<Map<String, Value>> {
        let form =
            payload::permission_request(&self.client_id, resource_scopes, submit_request, ticket);

        let response = self.endpoint("token_endpoint").and_then(|endpoint| {
            self.realm.client().post(
                &endpoint,
                Payload::Form(form),
                payload::bearer_headers(token)?,
                &[],
            )
        });

        let body = match response {
            Ok(body) => body,
            Err(err) => {
                let transport_failure = err
                    .downcast_ref::<KeyrealmError>()
                    .is_some_and(|e| matches!(e, KeyrealmError::Transport { .. }));
                if transport_failure {
                    tracing::warn!(error = %err, "permission request failed");
                    return Ok(Map::new());
                }
                return Err(err);
            }
        };

        let response = body.into_json()?;

        if let Some(error) = response.get("error") {
            tracing::warn!(
                error = %error,
                description = ?response.get("error_description"),
                "permission request denied"
            );
            return Ok(Map::new());
        }

        let Some(rpt) = response.get("refresh_token").and_then(Value::as_str) else {
            tracing::warn!("permission response carried no refresh_token");
            return Ok(Map::new());
        };
        let Some(segment) = rpt.split('.').nth(1) else {
            tracing::warn!("permission response token is not a JWT");
            return Ok(Map::new());
        };

        match payload::decode_jwt_segment(segment) {
            Ok(decoded) => Ok(decoded
                .get("authorization")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default()),
            Err(err) => {
                tracing::warn!(error = %err, "failed to decode permission token");
                Ok(Map::new())
            }
        }
    }

    /// Evaluates whether the user holds permission for every requested
    /// `(resource, scope)` pair; see the async counterpart for the
    /// order-sensitive comparison contract.
    pub fn eval_permissions(
        &self,
        token: &str,
        resource_scopes: &[(String, String)],
        submit_request: bool,
    ) -> Result<bool> {
        let permissions = self.get_permissions(token, resource_scopes, submit_request, None)?;

        let mut granted = Vec::new();
        if let Some(entries) = permissions.get("permissions").and_then(Value::as_array) {
            for permission in entries {
                let Some(rsname) = permission.get("rsname").and_then(Value::as_str) else {
                    continue;
                };
                let Some(scopes) = permission.get("scopes").and_then(Value::as_array) else {
                    continue;
                };
                for scope in scopes.iter().filter_map(Value::as_str) {
                    let pair = (rsname.to_string(), scope.to_string());
                    if resource_scopes.contains(&pair) {
                        granted.push(pair);
                    }
                }
            }
        }

        Ok(granted.as_slice() == resource_scopes)
    }

    /// Requests a requesting-party token from the legacy entitlement
    /// endpoint.
    pub fn entitlement(&self, token: &str) -> Result<Value> {
        let transport = self.realm.client();
        let path = format!(
            "{}/{}",
            realm_path(PATH_ENTITLEMENT, self.realm.realm_name()),
            self.client_id
        );
        let url = transport.full_url(&path)?;
        transport
            .get(&url, payload::bearer_headers(token)?, &[])?
            .into_json()
    }
}
