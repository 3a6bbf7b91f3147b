//! Legacy Authz integration tests using wiremock
//!
//! Verifies the behaviour of `src/authz.rs`:
//!
//! - The uma-ticket grant form is built correctly.
//! - The `authorization` claim is extracted from the returned token by pure
//!   base64 decoding.
//! - Denied responses, transport failures, and undecodable tokens degrade
//!   to an empty permission map instead of erroring.
//! - `eval_permissions` compares order-sensitively.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::{json, Map, Value};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use keyrealm::authz::KeycloakAuthz;
use keyrealm::{DiscoverySource, KeycloakRealm};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seeded_authz(server: &MockServer) -> (KeycloakRealm, KeycloakAuthz) {
    let realm = KeycloakRealm::new(url::Url::parse(&server.uri()).unwrap(), "example");
    let authz = realm.authz("client-id");

    let mut contents = Map::new();
    contents.insert(
        "token_endpoint".to_string(),
        json!(format!("{}/token", server.uri())),
    );
    authz
        .discovery()
        .document()
        .await
        .unwrap()
        .set_contents(contents)
        .await;

    (realm, authz)
}

/// Builds a structurally-valid JWT whose payload segment carries the given
/// `authorization` claim. Header and signature are opaque filler; only the
/// middle segment is decoded.
fn fake_rpt(authorization: Value) -> String {
    let payload = URL_SAFE_NO_PAD.encode(json!({ "authorization": authorization }).to_string());
    format!("header.{payload}.signature")
}

fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
    entries
        .iter()
        .map(|(resource, scope)| ((*resource).to_string(), (*scope).to_string()))
        .collect()
}

// ---------------------------------------------------------------------------
// get_permissions
// ---------------------------------------------------------------------------

/// The grant form carries the uma-ticket URN, the audience, and each
/// requested pair as `permission=resource#scope`.
#[tokio::test]
async fn test_get_permissions_posts_uma_ticket_form() {
    let server = MockServer::start().await;
    let rpt = fake_rpt(json!({"permissions": [{"rsname": "res", "scopes": ["view"]}]}));
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(header("authorization", "Bearer access-token"))
        .and(body_string(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Auma-ticket\
             &audience=client-id&response_include_resource_name=true\
             &permission=res%23view&submit_request=false",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "refresh_token": rpt
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_realm, authz) = seeded_authz(&server).await;

    let permissions = authz
        .get_permissions("access-token", &pairs(&[("res", "view")]), false, None)
        .await
        .expect("request must succeed");

    assert_eq!(
        permissions.get("permissions"),
        Some(&json!([{"rsname": "res", "scopes": ["view"]}]))
    );
}

/// With no resource pairs, a permission ticket is forwarded instead.
#[tokio::test]
async fn test_get_permissions_forwards_ticket() {
    let server = MockServer::start().await;
    let rpt = fake_rpt(json!({"permissions": []}));
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Auma-ticket\
             &audience=client-id&response_include_resource_name=true&ticket=a-ticket",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "refresh_token": rpt
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_realm, authz) = seeded_authz(&server).await;

    authz
        .get_permissions("access-token", &[], false, Some("a-ticket"))
        .await
        .expect("request must succeed");
}

/// An `error` field in the token response degrades to an empty map without
/// raising.
#[tokio::test]
async fn test_denied_response_degrades_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "access_denied",
            "error_description": "x"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_realm, authz) = seeded_authz(&server).await;

    let permissions = authz
        .get_permissions("access-token", &pairs(&[("res", "view")]), false, None)
        .await
        .expect("denial must not raise");
    assert!(permissions.is_empty(), "denial must yield an empty map");
}

/// A transport failure (the endpoint 404s) also degrades to an empty map.
#[tokio::test]
async fn test_transport_failure_degrades_to_empty() {
    let server = MockServer::start().await;
    // Nothing mounted at /token: wiremock answers 404.

    let (_realm, authz) = seeded_authz(&server).await;

    let permissions = authz
        .get_permissions("access-token", &pairs(&[("res", "view")]), false, None)
        .await
        .expect("transport failure must not raise");
    assert!(permissions.is_empty());
}

/// A response whose token is not decodable degrades to an empty map.
#[tokio::test]
async fn test_undecodable_token_degrades_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "refresh_token": "header.!!!not-base64!!!.signature"
        })))
        .mount(&server)
        .await;

    let (_realm, authz) = seeded_authz(&server).await;

    let permissions = authz
        .get_permissions("access-token", &pairs(&[("res", "view")]), false, None)
        .await
        .expect("decode failure must not raise");
    assert!(permissions.is_empty());
}

// ---------------------------------------------------------------------------
// eval_permissions
// ---------------------------------------------------------------------------

/// All requested pairs granted, in order: evaluation passes.
#[tokio::test]
async fn test_eval_permissions_grants_in_order() {
    let server = MockServer::start().await;
    let rpt = fake_rpt(json!({"permissions": [
        {"rsname": "res1", "scopes": ["view"]},
        {"rsname": "res2", "scopes": ["edit"]}
    ]}));
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"refresh_token": rpt})))
        .mount(&server)
        .await;

    let (_realm, authz) = seeded_authz(&server).await;

    let granted = authz
        .eval_permissions(
            "access-token",
            &pairs(&[("res1", "view"), ("res2", "edit")]),
            false,
        )
        .await
        .unwrap();
    assert!(granted);
}

/// A missing grant fails the evaluation.
#[tokio::test]
async fn test_eval_permissions_missing_grant_fails() {
    let server = MockServer::start().await;
    let rpt = fake_rpt(json!({"permissions": [
        {"rsname": "res1", "scopes": ["view"]}
    ]}));
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"refresh_token": rpt})))
        .mount(&server)
        .await;

    let (_realm, authz) = seeded_authz(&server).await;

    let granted = authz
        .eval_permissions(
            "access-token",
            &pairs(&[("res1", "view"), ("res2", "edit")]),
            false,
        )
        .await
        .unwrap();
    assert!(!granted);
}

/// The comparison is order-sensitive: the same grants in a different order
/// fail the evaluation. This mirrors the legacy list comparison exactly.
#[tokio::test]
async fn test_eval_permissions_is_order_sensitive() {
    let server = MockServer::start().await;
    let rpt = fake_rpt(json!({"permissions": [
        {"rsname": "res2", "scopes": ["edit"]},
        {"rsname": "res1", "scopes": ["view"]}
    ]}));
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"refresh_token": rpt})))
        .mount(&server)
        .await;

    let (_realm, authz) = seeded_authz(&server).await;

    let granted = authz
        .eval_permissions(
            "access-token",
            &pairs(&[("res1", "view"), ("res2", "edit")]),
            false,
        )
        .await
        .unwrap();
    assert!(
        !granted,
        "reordered grants must fail the order-sensitive comparison"
    );
}

// ---------------------------------------------------------------------------
// entitlement
// ---------------------------------------------------------------------------

/// The legacy entitlement endpoint is addressed by realm and client id with
/// a Bearer header.
#[tokio::test]
async fn test_entitlement_addresses_realm_and_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/realms/example/authz/entitlement/client-id"))
        .and(header("authorization", "Bearer access-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rpt": "the-rpt"})))
        .expect(1)
        .mount(&server)
        .await;

    let (_realm, authz) = seeded_authz(&server).await;

    let entitlement = authz.entitlement("access-token").await.unwrap();
    assert_eq!(entitlement["rpt"], "the-rpt");
}
