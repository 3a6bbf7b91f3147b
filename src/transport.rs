//! Pooled HTTP transport for the async client variant
//!
//! [`Transport`] owns the single connection-pooling `reqwest` client a
//! [`KeycloakRealm`](crate::realm::KeycloakRealm) works through. The pooled
//! client is created lazily on the first request, scoped to the default
//! headers supplied at construction, and reused for every call thereafter.
//!
//! # Lifecycle
//!
//! The pool slot moves `Idle -> Ready -> Closed` and never backwards. Once
//! [`Transport::close`] has run, any later request fails fast with
//! [`KeyrealmError::IllegalState`] rather than silently re-creating the
//! pool; re-creation is the realm's job, which builds a fresh `Transport`
//! on the next [`client()`](crate::realm::KeycloakRealm::client) access.
//!
//! # Response contract
//!
//! Any non-2xx status becomes [`KeyrealmError::Transport`] carrying the
//! status and the (debug-logged) response body. Successful bodies are parsed
//! as JSON when possible and handed back raw otherwise -- see
//! [`ResponseBody`].

use std::collections::HashMap;

use reqwest::header::HeaderMap;
use reqwest::Method;
use tokio::sync::Mutex;
use url::Url;

use crate::body::{Payload, ResponseBody};
use crate::error::{KeyrealmError, Result};
use crate::payload::header_map;
use crate::urls::full_url;

/// Lifecycle of the pooled client.
enum PoolState {
    /// No pooled client yet; the first request creates one.
    Idle,
    /// The shared pooled client, reused by every request.
    Ready(reqwest::Client),
    /// Torn down; requests fail fast from here on.
    Closed,
}

/// Connection-pooling HTTP transport bound to one server base URL.
///
/// Cloning the inner `reqwest::Client` out of the pool slot is cheap (it is
/// an `Arc` handle), so the pool lock is held only for the lookup, never
/// across a request.
pub struct Transport {
    server_url: Url,
    headers: HashMap<String, String>,
    pool: Mutex<PoolState>,
}

impl Transport {
    /// Creates a transport for `server_url`. `headers` become the pooled
    /// client's default headers, fixed for the transport's lifetime.
    ///
    /// No network I/O is performed at construction time.
    pub fn new(server_url: Url, headers: HashMap<String, String>) -> Self {
        Self {
            server_url,
            headers,
            pool: Mutex::new(PoolState::Idle),
        }
    }

    /// The server base URL this transport resolves paths against.
    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    /// Resolves `path` against the transport's base URL.
    pub fn full_url(&self, path: &str) -> Result<String> {
        self.full_url_with(path, None)
    }

    /// Resolves `path` against `server_url` when given, else against the
    /// transport's own base URL.
    pub fn full_url_with(&self, path: &str, server_url: Option<&Url>) -> Result<String> {
        Ok(full_url(server_url.unwrap_or(&self.server_url), path)?.into())
    }

    /// The pooled client, created on first access and reused afterwards.
    ///
    /// # Errors
    ///
    /// [`KeyrealmError::IllegalState`] once the transport has been closed;
    /// the pool is never re-created behind a caller's back.
    pub async fn session(&self) -> Result<reqwest::Client> {
        let mut pool = self.pool.lock().await;
        match &*pool {
            PoolState::Ready(client) => Ok(client.clone()),
            PoolState::Closed => {
                Err(KeyrealmError::IllegalState("transport is closed".to_string()).into())
            }
            PoolState::Idle => {
                let client = reqwest::Client::builder()
                    .default_headers(header_map(&self.headers)?)
                    .build()
                    .map_err(KeyrealmError::request)?;
                *pool = PoolState::Ready(client.clone());
                Ok(client)
            }
        }
    }

    /// Releases the pooled client. Idempotent; later requests fail with
    /// [`KeyrealmError::IllegalState`].
    pub async fn close(&self) {
        let mut pool = self.pool.lock().await;
        *pool = PoolState::Closed;
    }

    /// Whether [`close`](Self::close) has run.
    pub async fn is_closed(&self) -> bool {
        matches!(&*self.pool.lock().await, PoolState::Closed)
    }

    /// Issues a GET request.
    pub async fn get(
        &self,
        url: &str,
        headers: HeaderMap,
        query: &[(String, String)],
    ) -> Result<ResponseBody> {
        self.request(Method::GET, url, Payload::Empty, headers, query)
            .await
    }

    /// Issues a POST request with the given payload.
    pub async fn post(
        &self,
        url: &str,
        payload: Payload,
        headers: HeaderMap,
        query: &[(String, String)],
    ) -> Result<ResponseBody> {
        self.request(Method::POST, url, payload, headers, query)
            .await
    }

    /// Issues a PUT request with the given payload.
    pub async fn put(
        &self,
        url: &str,
        payload: Payload,
        headers: HeaderMap,
        query: &[(String, String)],
    ) -> Result<ResponseBody> {
        self.request(Method::PUT, url, payload, headers, query).await
    }

    /// Issues a DELETE request.
    pub async fn delete(
        &self,
        url: &str,
        headers: HeaderMap,
        query: &[(String, String)],
    ) -> Result<ResponseBody> {
        self.request(Method::DELETE, url, Payload::Empty, headers, query)
            .await
    }

    pub(crate) async fn request(
        &self,
        method: Method,
        url: &str,
        payload: Payload,
        headers: HeaderMap,
        query: &[(String, String)],
    ) -> Result<ResponseBody> {
        let client = self.session().await?;

        let mut request = client.request(method, url).headers(headers);
        if !query.is_empty() {
            request = request.query(query);
        }
        request = match payload {
            Payload::Empty => request,
            Payload::Form(pairs) => request.form(&pairs),
            Payload::Json(value) => request.json(&value),
        };

        let response = request.send().await.map_err(KeyrealmError::request)?;
        handle_response(response).await
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("server_url", &self.server_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Maps a received response onto the body/error contract: non-2xx statuses
/// become [`KeyrealmError::Transport`], everything else is classified by
/// [`ResponseBody::from_bytes`].
async fn handle_response(response: reqwest::Response) -> Result<ResponseBody> {
    let status = response.status();
    let url = response.url().to_string();

    if !status.is_success() {
        let source = response.error_for_status_ref().err();
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(
            status = status.as_u16(),
            url = %url,
            body = %body,
            "request failed"
        );
        return Err(KeyrealmError::http(status.as_u16(), &url, &body, source).into());
    }

    let bytes = response.bytes().await.map_err(KeyrealmError::request)?;
    Ok(ResponseBody::from_bytes(bytes))
}
