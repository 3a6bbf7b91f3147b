//! OpenID Connect client (blocking variant)
//!
//! Blocking counterpart of [`crate::openid_connect::KeycloakOpenidConnect`];
//! the grant payloads, URL construction, and decode passthrough come from
//! the same pure builders the async variant uses.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::blocking::discovery::{Discovery, DiscoverySource};
use crate::blocking::realm::KeycloakRealm;
use crate::body::{Payload, ResponseBody};
use crate::error::{KeyrealmError, Result};
use crate::paths::{GRANT_TOKEN_EXCHANGE, PATH_WELL_KNOWN_OPENID};
use crate::payload;

/// Blocking OpenID Connect client bound to one realm and one registered
/// client.
pub struct KeycloakOpenidConnect {
    realm: KeycloakRealm,
    client_id: String,
    client_secret: String,
    discovery: Discovery,
}

impl std::fmt::Debug for KeycloakOpenidConnect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeycloakOpenidConnect")
            .field("realm", &self.realm)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish_non_exhaustive()
    }
}

impl DiscoverySource for KeycloakOpenidConnect {
    fn discovery(&self) -> &Discovery {
        &self.discovery
    }
}

impl KeycloakOpenidConnect {
    pub(crate) fn new(
        realm: &KeycloakRealm,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            realm: realm.clone(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            discovery: Discovery::new(realm.clone(), PATH_WELL_KNOWN_OPENID),
        }
    }

    /// The registered client id this client authenticates as.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Builds the authorization-redirect URL; see the async counterpart for
    /// the parameter-ordering contract.
    pub fn authorization_url(&self, response_type: &str, params: &[(&str, &str)]) -> Result<String> {
        let endpoint = self.endpoint("authorization_endpoint")?;
        let query = payload::authorization_query(response_type, &self.client_id, params);
        Ok(format!("{endpoint}?{query}"))
    }

    /// Retrieves tokens with the `authorization_code` grant.
    pub fn authorization_code(&self, code: &str, redirect_uri: &str) -> Result<Value> {
        self.token_request(
            "authorization_code",
            &[("code", code), ("redirect_uri", redirect_uri)],
        )
    }

    /// Retrieves tokens with the `client_credentials` grant.
    pub fn client_credentials(&self, scope: Option<&str>) -> Result<Value> {
        let mut extra = Vec::new();
        if let Some(scope) = scope {
            extra.push(("scope", scope));
        }
        self.token_request("client_credentials", &extra)
    }

    /// Refreshes an access token.
    pub fn refresh_token(&self, refresh_token: &str, scope: Option<&str>) -> Result<Value> {
        let mut extra = vec![("refresh_token", refresh_token)];
        if let Some(scope) = scope {
            extra.push(("scope", scope));
        }
        self.token_request("refresh_token", &extra)
    }

    /// Exchanges a token with the RFC 8693 token-exchange grant.
    pub fn token_exchange(&self, params: &[(&str, &str)]) -> Result<Value> {
        self.token_request(GRANT_TOKEN_EXCHANGE, params)
    }

    /// Logs out the session behind `refresh_token`.
    pub fn logout(&self, refresh_token: &str) -> Result<ResponseBody> {
        let endpoint = self.endpoint("end_session_endpoint")?;
        let form = vec![
            ("refresh_token".to_string(), refresh_token.to_string()),
            ("client_id".to_string(), self.client_id.clone()),
            ("client_secret".to_string(), self.client_secret.clone()),
        ];
        self.realm
            .client()
            .post(&endpoint, Payload::Form(form), HeaderMap::new(), &[])
    }

    /// The realm's enabled public keys as a JWK set.
    pub fn certs(&self) -> Result<Value> {
        let endpoint = self.endpoint("jwks_uri")?;
        self.realm
            .client()
            .get(&endpoint, HeaderMap::new(), &[])?
            .into_json()
    }

    /// Claims about the authenticated end-user, authorized by `token`.
    pub fn userinfo(&self, token: &str) -> Result<Value> {
        let endpoint = self.endpoint("userinfo_endpoint")?;
        self.realm
            .client()
            .get(&endpoint, payload::bearer_headers(token)?, &[])?
            .into_json()
    }

    /// Decodes and verifies a JWT against `key`; see the async counterpart.
    pub fn decode_token(
        &self,
        token: &str,
        key: &DecodingKey,
        algorithms: Option<Vec<Algorithm>>,
    ) -> Result<Value> {
        let mut validation = Validation::new(Algorithm::RS256);
        if let Some(algorithms) = algorithms {
            validation.algorithms = algorithms;
        }
        validation.set_audience(&[&self.client_id]);

        let data = jsonwebtoken::decode::<Value>(token, key, &validation)
            .map_err(KeyrealmError::from)?;
        Ok(data.claims)
    }

    fn token_request(&self, grant_type: &str, extra: &[(&str, &str)]) -> Result<Value> {
        let endpoint = self.endpoint("token_endpoint")?;
        let form = payload::token_request(grant_type, &self.client_id, &self.client_secret, extra);
        self.realm
            .client()
            .post(&endpoint, Payload::Form(form), HeaderMap::new(), &[])?
            .into_json()
    }
}
