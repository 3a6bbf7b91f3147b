//! OpenID Connect integration tests using wiremock
//!
//! Verifies the behaviour of `src/openid_connect.rs`:
//!
//! - Token grants merge the base payload with call-specific parameters and
//!   form-encode the result.
//! - The authorization URL is byte-for-byte deterministic.
//! - Bearer headers are attached where the operation requires a token.

use serde_json::{json, Map, Value};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use keyrealm::{DiscoverySource, KeycloakRealm};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn realm_for(server: &MockServer) -> KeycloakRealm {
    KeycloakRealm::new(url::Url::parse(&server.uri()).unwrap(), "example")
}

fn seeded_contents(server: &MockServer) -> Map<String, Value> {
    let base = server.uri();
    let mut contents = Map::new();
    contents.insert("authorization_endpoint".to_string(), json!("https://authorization"));
    contents.insert("token_endpoint".to_string(), json!(format!("{base}/token")));
    contents.insert("end_session_endpoint".to_string(), json!(format!("{base}/logout")));
    contents.insert("jwks_uri".to_string(), json!(format!("{base}/certs")));
    contents.insert("userinfo_endpoint".to_string(), json!(format!("{base}/userinfo")));
    contents
}

async fn seeded_oidc(
    server: &MockServer,
    realm: &KeycloakRealm,
) -> keyrealm::openid_connect::KeycloakOpenidConnect {
    let oidc = realm.open_id_connect("client-id", "client-secret");
    let document = oidc.discovery().document().await.unwrap();
    document.set_contents(seeded_contents(server)).await;
    oidc
}

fn token_response() -> Value {
    json!({
        "access_token": "access-token",
        "refresh_token": "refresh-token",
        "token_type": "Bearer",
        "expires_in": 300
    })
}

// ---------------------------------------------------------------------------
// authorization_url
// ---------------------------------------------------------------------------

/// The authorization URL must serialize `response_type` first, `client_id`
/// second, and the remaining parameters in sorted key order, with
/// form-urlencoded escaping (space as `+`).
#[tokio::test]
async fn test_authorization_url_is_deterministic() {
    let server = MockServer::start().await;
    let realm = realm_for(&server);
    let oidc = seeded_oidc(&server, &realm).await;

    let result = oidc
        .authorization_url(
            "code",
            &[
                ("redirect_uri", "https://redirect-url"),
                ("scope", "scope other-scope"),
                ("state", "some-state"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(
        result,
        "https://authorization?response_type=code&client_id=client-id&\
         redirect_uri=https%3A%2F%2Fredirect-url&scope=scope+other-scope&state=some-state"
    );
}

/// Caller parameters given out of order must still serialize sorted.
#[tokio::test]
async fn test_authorization_url_sorts_caller_parameters() {
    let server = MockServer::start().await;
    let realm = realm_for(&server);
    let oidc = seeded_oidc(&server, &realm).await;

    let result = oidc
        .authorization_url(
            "code",
            &[("state", "s"), ("redirect_uri", "https://r"), ("scope", "x")],
        )
        .await
        .unwrap();

    assert_eq!(
        result,
        "https://authorization?response_type=code&client_id=client-id&\
         redirect_uri=https%3A%2F%2Fr&scope=x&state=s"
    );
}

// ---------------------------------------------------------------------------
// Token grants
// ---------------------------------------------------------------------------

/// The authorization_code grant posts the merged form payload.
#[tokio::test]
async fn test_authorization_code_posts_merged_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string(
            "grant_type=authorization_code&client_id=client-id&client_secret=client-secret\
             &code=some-code&redirect_uri=https%3A%2F%2Fredirect-uri",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()))
        .expect(1)
        .mount(&server)
        .await;

    let realm = realm_for(&server);
    let oidc = seeded_oidc(&server, &realm).await;

    let response = oidc
        .authorization_code("some-code", "https://redirect-uri")
        .await
        .expect("grant must succeed");
    assert_eq!(response["access_token"], "access-token");
}

/// The client_credentials grant includes scope only when given.
#[tokio::test]
async fn test_client_credentials_with_scope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string(
            "grant_type=client_credentials&client_id=client-id&client_secret=client-secret\
             &scope=scope+another-scope",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()))
        .expect(1)
        .mount(&server)
        .await;

    let realm = realm_for(&server);
    let oidc = seeded_oidc(&server, &realm).await;

    oidc.client_credentials(Some("scope another-scope"))
        .await
        .expect("grant must succeed");
}

/// The client_credentials grant omits scope when none is given.
#[tokio::test]
async fn test_client_credentials_without_scope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string(
            "grant_type=client_credentials&client_id=client-id&client_secret=client-secret",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()))
        .expect(1)
        .mount(&server)
        .await;

    let realm = realm_for(&server);
    let oidc = seeded_oidc(&server, &realm).await;

    oidc.client_credentials(None).await.expect("grant must succeed");
}

/// The refresh_token grant carries the refresh token and optional scope.
#[tokio::test]
async fn test_refresh_token_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string(
            "grant_type=refresh_token&client_id=client-id&client_secret=client-secret\
             &refresh_token=refresh-token&scope=scope+another-scope",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()))
        .expect(1)
        .mount(&server)
        .await;

    let realm = realm_for(&server);
    let oidc = seeded_oidc(&server, &realm).await;

    oidc.refresh_token("refresh-token", Some("scope another-scope"))
        .await
        .expect("grant must succeed");
}

/// The token-exchange grant uses the RFC 8693 URN and forwards the exchange
/// parameters.
#[tokio::test]
async fn test_token_exchange_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Atoken-exchange\
             &client_id=client-id&client_secret=client-secret\
             &subject_token=some-token&audience=some-audience",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()))
        .expect(1)
        .mount(&server)
        .await;

    let realm = realm_for(&server);
    let oidc = seeded_oidc(&server, &realm).await;

    oidc.token_exchange(&[("subject_token", "some-token"), ("audience", "some-audience")])
        .await
        .expect("grant must succeed");
}

// ---------------------------------------------------------------------------
// Other operations
// ---------------------------------------------------------------------------

/// Logout posts the refresh token and client credentials to the
/// end-session endpoint; an empty response body is fine.
#[tokio::test]
async fn test_logout_posts_to_end_session_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .and(body_string(
            "refresh_token=refresh-token&client_id=client-id&client_secret=client-secret",
        ))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let realm = realm_for(&server);
    let oidc = seeded_oidc(&server, &realm).await;

    let body = oidc.logout("refresh-token").await.expect("logout must succeed");
    assert!(body.is_empty());
}

/// certs fetches the JWK set from jwks_uri.
#[tokio::test]
async fn test_certs_fetches_jwks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/certs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"keys": []})))
        .expect(1)
        .mount(&server)
        .await;

    let realm = realm_for(&server);
    let oidc = seeded_oidc(&server, &realm).await;

    let certs = oidc.certs().await.unwrap();
    assert_eq!(certs, json!({"keys": []}));
}

/// userinfo sends the access token as a Bearer header.
#[tokio::test]
async fn test_userinfo_sends_bearer_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .and(header("authorization", "Bearer the-access-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sub": "user-id"})))
        .expect(1)
        .mount(&server)
        .await;

    let realm = realm_for(&server);
    let oidc = seeded_oidc(&server, &realm).await;

    let info = oidc.userinfo("the-access-token").await.unwrap();
    assert_eq!(info["sub"], "user-id");
}

/// A token-endpoint error status propagates as a transport error; grants
/// are never silently retried.
#[tokio::test]
async fn test_token_error_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let realm = realm_for(&server);
    let oidc = seeded_oidc(&server, &realm).await;

    let err = oidc
        .client_credentials(None)
        .await
        .expect_err("401 must propagate");
    let err = err
        .downcast_ref::<keyrealm::KeyrealmError>()
        .expect("typed error");
    assert_eq!(err.status(), Some(401));
}
