//! UMA 2 integration tests using wiremock
//!
//! Verifies the behaviour of `src/uma.rs`:
//!
//! - Resource-set CRUD hits the registration endpoint with Bearer + JSON
//!   headers and the `{name, scopes, ...}` descriptor.
//! - Ticket creation wraps its payload in a single-element array.
//! - Policy operations address `{policy_endpoint}/{id}`.
//! - Optional list filters travel as query parameters.

use serde_json::{json, Map, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use keyrealm::uma::KeycloakUma;
use keyrealm::{DiscoverySource, KeycloakRealm};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seeded_uma(server: &MockServer) -> (KeycloakRealm, KeycloakUma) {
    let realm = KeycloakRealm::new(url::Url::parse(&server.uri()).unwrap(), "example");
    let uma = realm.uma();

    let base = server.uri();
    let mut contents = Map::new();
    contents.insert(
        "resource_registration_endpoint".to_string(),
        json!(format!("{base}/authz/protection/resource_set")),
    );
    contents.insert(
        "permission_endpoint".to_string(),
        json!(format!("{base}/authz/protection/permission")),
    );
    contents.insert(
        "policy_endpoint".to_string(),
        json!(format!("{base}/authz/protection/uma-policy")),
    );
    uma.discovery().document().await.unwrap().set_contents(contents).await;

    (realm, uma)
}

fn extra(entries: &[(&str, Value)]) -> Map<String, Value> {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_string(), value.clone()))
        .collect()
}

// ---------------------------------------------------------------------------
// Resource sets
// ---------------------------------------------------------------------------

/// Creation posts the descriptor with Bearer and JSON content-type headers.
#[tokio::test]
async fn test_resource_set_create() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authz/protection/resource_set"))
        .and(header("authorization", "Bearer pat-token"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "name": "test-resource",
            "scopes": ["read", "write"],
            "icon_uri": "https://icon"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "rs-id"})))
        .expect(1)
        .mount(&server)
        .await;

    let (_realm, uma) = seeded_uma(&server).await;

    let created = uma
        .resource_set_create(
            "pat-token",
            "test-resource",
            &["read", "write"],
            extra(&[("icon_uri", json!("https://icon"))]),
        )
        .await
        .expect("creation must succeed");
    assert_eq!(created["_id"], "rs-id");
}

/// Update and delete address `{registration_endpoint}/{id}`.
#[tokio::test]
async fn test_resource_set_update_and_delete_address_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/authz/protection/resource_set/rs-id"))
        .and(body_json(json!({"name": "renamed", "scopes": []})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/authz/protection/resource_set/rs-id"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (_realm, uma) = seeded_uma(&server).await;

    uma.resource_set_update("pat-token", "rs-id", "renamed", &[], Map::new())
        .await
        .expect("update must succeed");
    uma.resource_set_delete("pat-token", "rs-id")
        .await
        .expect("delete must succeed");
}

/// Reads return the descriptor JSON.
#[tokio::test]
async fn test_resource_set_read() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/authz/protection/resource_set/rs-id"))
        .and(header("authorization", "Bearer pat-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"_id": "rs-id", "name": "res"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (_realm, uma) = seeded_uma(&server).await;

    let descriptor = uma.resource_set_read("pat-token", "rs-id").await.unwrap();
    assert_eq!(descriptor["name"], "res");
}

/// List filters are passed through as query parameters, not hand-encoded
/// into the URL.
#[tokio::test]
async fn test_resource_set_list_forwards_query_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/authz/protection/resource_set"))
        .and(query_param("name", "test-name"))
        .and(query_param("owner", "test-owner"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["rs-1", "rs-2"])))
        .expect(1)
        .mount(&server)
        .await;

    let (_realm, uma) = seeded_uma(&server).await;

    let ids = uma
        .resource_set_list(
            "pat-token",
            &[
                ("name".to_string(), "test-name".to_string()),
                ("owner".to_string(), "test-owner".to_string()),
            ],
        )
        .await
        .unwrap();
    assert_eq!(ids, json!(["rs-1", "rs-2"]));
}

// ---------------------------------------------------------------------------
// Tickets and policies
// ---------------------------------------------------------------------------

/// Ticket creation wraps the single permission request in a one-element
/// array.
#[tokio::test]
async fn test_resource_create_ticket_wraps_payload_in_array() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authz/protection/permission"))
        .and(body_json(json!([{
            "resource_id": "rs-id",
            "resource_scopes": ["read"]
        }])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ticket": "a-ticket"})))
        .expect(1)
        .mount(&server)
        .await;

    let (_realm, uma) = seeded_uma(&server).await;

    let ticket = uma
        .resource_create_ticket("pat-token", "rs-id", &["read"], Map::new())
        .await
        .expect("ticket creation must succeed");
    assert_eq!(ticket["ticket"], "a-ticket");
}

/// Policy association posts to `{policy_endpoint}/{resource_id}`.
#[tokio::test]
async fn test_resource_associate_permission() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authz/protection/uma-policy/rs-id"))
        .and(body_json(json!({
            "name": "only-owner",
            "scopes": ["read"],
            "condition": "$evaluation.grant()"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "policy-id"})))
        .expect(1)
        .mount(&server)
        .await;

    let (_realm, uma) = seeded_uma(&server).await;

    let policy = uma
        .resource_associate_permission(
            "pat-token",
            "rs-id",
            "only-owner",
            &["read"],
            extra(&[("condition", json!("$evaluation.grant()"))]),
        )
        .await
        .unwrap();
    assert_eq!(policy["id"], "policy-id");
}

/// Policy update, delete, and list address the policy endpoint.
#[tokio::test]
async fn test_permission_update_delete_and_list() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/authz/protection/uma-policy/policy-id"))
        .and(body_json(json!({"name": "renamed"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/authz/protection/uma-policy/policy-id"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/authz/protection/uma-policy"))
        .and(query_param("resource", "rs-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let (_realm, uma) = seeded_uma(&server).await;

    uma.permission_update(
        "pat-token",
        "policy-id",
        extra(&[("name", json!("renamed"))]),
    )
    .await
    .expect("update must succeed");
    uma.permission_delete("pat-token", "policy-id")
        .await
        .expect("delete must succeed");
    uma.permission_list(
        "pat-token",
        &[("resource".to_string(), "rs-id".to_string())],
    )
    .await
    .expect("list must succeed");
}

// ---------------------------------------------------------------------------
// UMA 1 (legacy)
// ---------------------------------------------------------------------------

/// The legacy client resolves the v1 endpoint name from the v1 document.
#[tokio::test]
async fn test_uma1_uses_v1_endpoint_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/realms/example/.well-known/uma-configuration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resource_set_registration_endpoint":
                format!("{}/authz/uma1/resource_set", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/authz/uma1/resource_set"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let realm = KeycloakRealm::new(url::Url::parse(&server.uri()).unwrap(), "example");
    let uma1 = realm.uma1();

    let listed = uma1.resource_set_list("pat-token", &[]).await.unwrap();
    assert_eq!(listed, json!([]));
}
