//! OpenID Connect client (async variant)
//!
//! Token-endpoint grants, logout, certs, userinfo, authorization-URL
//! construction, and a verified-decode passthrough. Every operation resolves
//! its URL from the realm's `openid-configuration` well-known document; the
//! document is fetched at most once per client instance.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::body::{Payload, ResponseBody};
use crate::discovery::{Discovery, DiscoverySource};
use crate::error::{KeyrealmError, Result};
use crate::paths::{GRANT_TOKEN_EXCHANGE, PATH_WELL_KNOWN_OPENID};
use crate::payload;
use crate::realm::KeycloakRealm;

/// OpenID Connect client bound to one realm and one registered client.
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

    /// Builds the authorization-redirect URL for the resource owner.
    ///
    /// The query is serialized deterministically -- `response_type`,
    /// `client_id`, then the caller's parameters in sorted key order -- so
    /// the produced URL is reproducible.
    ///
    /// <https://tools.ietf.org/html/rfc6749#section-4.1.1>
    pub async fn authorization_url(
        &self,
        response_type: &str,
        params: &[(&str, &str)],
    ) -> Result<String> {
        let endpoint = self.endpoint("authorization_endpoint").await?;
        let query = payload::authorization_query(response_type, &self.client_id, params);
        Ok(format!("{endpoint}?{query}"))
    }

    /// Retrieves tokens with the `authorization_code` grant.
    ///
    /// <https://tools.ietf.org/html/rfc6749#section-4.1.3>
    pub async fn authorization_code(&self, code: &str, redirect_uri: &str) -> Result<Value> {
        self.token_request(
            "authorization_code",
            &[("code", code), ("redirect_uri", redirect_uri)],
        )
        .await
    }

    /// Retrieves tokens with the `client_credentials` grant.
    pub async fn client_credentials(&self, scope: Option<&str>) -> Result<Value> {
        let mut extra = Vec::new();
        if let Some(scope) = scope {
            extra.push(("scope", scope));
        }
        self.token_request("client_credentials", &extra).await
    }

    /// Refreshes an access token.
    ///
    /// <https://tools.ietf.org/html/rfc6749#section-6>
    pub async fn refresh_token(&self, refresh_token: &str, scope: Option<&str>) -> Result<Value> {
        let mut extra = vec![("refresh_token", refresh_token)];
        if let Some(scope) = scope {
            extra.push(("scope", scope));
        }
        self.token_request("refresh_token", &extra).await
    }

    /// Exchanges a token with the RFC 8693 token-exchange grant; `params`
    /// are the exchange-specific fields (`subject_token`, `audience`,
    /// `requested_token_type`, ...).
    pub async fn token_exchange(&self, params: &[(&str, &str)]) -> Result<Value> {
        self.token_request(GRANT_TOKEN_EXCHANGE, params).await
    }

    /// Logs out the session behind `refresh_token`.
    pub async fn logout(&self, refresh_token: &str) -> Result<ResponseBody> {
        let endpoint = self.endpoint("end_session_endpoint").await?;
        let form = vec![
            ("refresh_token".to_string(), refresh_token.to_string()),
            ("client_id".to_string(), self.client_id.clone()),
            ("client_secret".to_string(), self.client_secret.clone()),
        ];
        let transport = self.realm.client().await;
        transport
            .post(&endpoint, Payload::Form(form), HeaderMap::new(), &[])
            .await
    }

    /// The realm's enabled public keys as a JWK set.
    ///
    /// <https://tools.ietf.org/html/rfc7517>
    pub async fn certs(&self) -> Result<Value> {
        let endpoint = self.endpoint("jwks_uri").await?;
        let transport = self.realm.client().await;
        transport
            .get(&endpoint, HeaderMap::new(), &[])
            .await?
            .into_json()
    }

    /// Claims about the authenticated end-user, authorized by `token`.
    ///
    /// <http://openid.net/specs/openid-connect-core-1_0.html#UserInfo>
    pub async fn userinfo(&self, token: &str) -> Result<Value> {
        let endpoint = self.endpoint("userinfo_endpoint").await?;
        let transport = self.realm.client().await;
        transport
            .get(&endpoint, payload::bearer_headers(token)?, &[])
            .await?
            .into_json()
    }

    /// Decodes and verifies a JWT against `key`, expecting this client's id
    /// as audience. RS256 is assumed unless `algorithms` says otherwise.
    ///
    /// Verification is delegated entirely to `jsonwebtoken`; this is a thin
    /// passthrough returning the claims as a JSON value.
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

    /// POSTs a grant to the token endpoint: the base
    /// `{grant_type, client_id, client_secret}` payload merged with
    /// `extra`, form-encoded.
    async fn token_request(&self, grant_type: &str, extra: &[(&str, &str)]) -> Result<Value> {
        let endpoint = self.endpoint("token_endpoint").await?;
        let form = payload::token_request(grant_type, &self.client_id, &self.client_secret, extra);
        let transport = self.realm.client().await;
        transport
            .post(&endpoint, Payload::Form(form), HeaderMap::new(), &[])
            .await?
            .into_json()
    }
}
