//! Protocol payload and header builders
//!
//! Pure construction logic shared by the async and blocking client variants:
//! token-grant form payloads, bearer headers, UMA resource descriptions, the
//! uma-ticket permission form, deterministic authorization-URL queries, and
//! unverified JWT-segment decoding. Nothing in this module performs I/O.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::error::{KeyrealmError, Result};
use crate::paths::GRANT_UMA_TICKET;

/// Builds the token-endpoint form payload for a grant: the base
/// `{grant_type, client_id, client_secret}` triple merged with
/// call-specific parameters.
pub fn token_request(
    grant_type: &str,
    client_id: &str,
    client_secret: &str,
    extra: &[(&str, &str)],
) -> Vec<(String, String)> {
    let mut payload = vec![
        ("grant_type".to_string(), grant_type.to_string()),
        ("client_id".to_string(), client_id.to_string()),
        ("client_secret".to_string(), client_secret.to_string()),
    ];
    for (key, value) in extra {
        payload.push(((*key).to_string(), (*value).to_string()));
    }
    payload
}

/// Converts a string/string header mapping into a [`HeaderMap`], rejecting
/// names or values HTTP cannot carry.
pub(crate) fn header_map(headers: &std::collections::HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = reqwest::header::HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| KeyrealmError::Decode(format!("invalid header name {name:?}: {e}")))?;
        map.insert(name, HeaderValue::from_str(value).map_err(KeyrealmError::from)?);
    }
    Ok(map)
}

/// `Authorization: Bearer <token>` header map.
pub fn bearer_headers(token: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).map_err(KeyrealmError::from)?,
    );
    Ok(headers)
}

/// Bearer header plus `Content-Type: application/json`, the pair every UMA
/// and admin call sends.
pub fn bearer_json_headers(token: &str) -> Result<HeaderMap> {
    let mut headers = bearer_headers(token)?;
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// A UMA resource description: `{name, scopes, ...extra}`. Absent scopes
/// serialize as an empty list.
pub fn uma_resource(name: &str, scopes: &[&str], extra: Map<String, Value>) -> Value {
    let mut payload = Map::new();
    payload.insert("name".to_string(), Value::String(name.to_string()));
    payload.insert(
        "scopes".to_string(),
        Value::Array(scopes.iter().map(|s| Value::String((*s).to_string())).collect()),
    );
    for (key, value) in extra {
        payload.insert(key, value);
    }
    Value::Object(payload)
}

/// Form data for the uma-ticket grant used by the permission API.
///
/// Requested `(resource, scope)` pairs are serialized as
/// `permission=resource#scope` entries together with `submit_request`; when
/// no pairs are given, a permission `ticket` is forwarded instead.
pub fn permission_request(
    client_id: &str,
    resource_scopes: &[(String, String)],
    submit_request: bool,
    ticket: Option<&str>,
) -> Vec<(String, String)> {
    let mut data = vec![
        ("grant_type".to_string(), GRANT_UMA_TICKET.to_string()),
        ("audience".to_string(), client_id.to_string()),
        (
            "response_include_resource_name".to_string(),
            "true".to_string(),
        ),
    ];

    if !resource_scopes.is_empty() {
        for (resource, scope) in resource_scopes {
            data.push(("permission".to_string(), format!("{resource}#{scope}")));
        }
        data.push(("submit_request".to_string(), submit_request.to_string()));
    } else if let Some(ticket) = ticket {
        data.push(("ticket".to_string(), ticket.to_string()));
    }

    data
}

/// Serializes the authorization-redirect query string deterministically:
/// `response_type` first, then `client_id`, then the caller's parameters in
/// sorted key order, using `application/x-www-form-urlencoded` rules
/// (space encodes as `+`).
pub fn authorization_query(
    response_type: &str,
    client_id: &str,
    params: &[(&str, &str)],
) -> String {
    let mut rest: Vec<(&str, &str)> = params.to_vec();
    rest.sort_by_key(|(key, _)| *key);

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.append_pair("response_type", response_type);
    serializer.append_pair("client_id", client_id);
    for (key, value) in rest {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Decodes one base64url JWT segment into its JSON value.
///
/// This is a structural extraction only: no signature is checked, and the
/// result must not be treated as validated.
pub fn decode_jwt_segment(segment: &str) -> Result<Value> {
    let trimmed = segment.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(trimmed)
        .map_err(|e| KeyrealmError::Decode(format!("invalid base64url segment: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| KeyrealmError::Decode(format!("segment is not JSON: {e}")).into())
}
