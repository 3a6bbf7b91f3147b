//! Legacy Authz client (async variant)
//!
//! Entitlement evaluation through the uma-ticket grant. This is the one
//! place in the crate where a failure is deliberately swallowed: a denied
//! or failed permission request degrades to "no permissions granted" with a
//! warning, matching the legacy permission-evaluation contract that callers
//! of this API depend on.

use serde_json::{Map, Value};

use crate::body::Payload;
use crate::discovery::{Discovery, DiscoverySource};
use crate::error::{KeyrealmError, Result};
use crate::paths::{realm_path, PATH_ENTITLEMENT, PATH_WELL_KNOWN_UMA2};
use crate::payload;
use crate::realm::KeycloakRealm;

/// Legacy Authz client bound to one realm and one registered client.
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

    /// Requests the user's evaluated permissions from the token endpoint
    /// with the uma-ticket grant.
    ///
    /// Requested `(resource, scope)` pairs are sent as `resource#scope`
    /// permission entries; alternatively a permission `ticket` is forwarded.
    /// The `authorization` claim is extracted from the returned token by a
    /// pure base64 decode -- no signature verification -- and must not be
    /// treated as validated.
    ///
    /// A denied response, transport failure, or undecodable token degrades
    /// to an empty map with a logged warning instead of an error.
    ///
    /// <https://www.keycloak.org/docs/latest/authorization_services/index.html#_service_protection_permission_api_papi>
    pub async fn get_permissions(
        &self,
        token: &str,
        resource_scopes: &[(String, String)],
        submit_request: bool,
        ticket: Option<&str>,
    ) -> Result<Map<String, Value>> {
        let form =
            payload::permission_request(&self.client_id, resource_scopes, submit_request, ticket);

        let response = async {
            let endpoint = self.endpoint("token_endpoint").await?;
            let transport = self.realm.client().await;
            transport
                .post(
                    &endpoint,
                    Payload::Form(form),
                    payload::bearer_headers(token)?,
                    &[],
                )
                .await
        }
        .await;

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
    /// `(resource, scope)` pair.
    ///
    /// The granted pairs found in the response are collected in response
    /// order and compared against the requested list by plain equality, so
    /// duplicates or reordering on the server side change the verdict.
    pub async fn eval_permissions(
        &self,
        token: &str,
        resource_scopes: &[(String, String)],
        submit_request: bool,
    ) -> Result<bool> {
        let permissions = self
            .get_permissions(token, resource_scopes, submit_request, None)
            .await?;

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

    /// Requests a requesting-party token holding all of the user's
    /// entitlements from the legacy entitlement endpoint.
    ///
    /// <http://www.keycloak.org/docs/latest/authorization_services/index.html#_service_entitlement_api>
    pub async fn entitlement(&self, token: &str) -> Result<Value> {
        let transport = self.realm.client().await;
        let path = format!(
            "{}/{}",
            realm_path(PATH_ENTITLEMENT, self.realm.realm_name()),
            self.client_id
        );
        let url = transport.full_url(&path)?;
        transport
            .get(&url, payload::bearer_headers(token)?, &[])
            .await?
            .into_json()
    }
}
