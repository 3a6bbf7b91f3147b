//! Pooled HTTP transport for the blocking client variant
//!
//! Same contract as [`crate::transport::Transport`], built on
//! `reqwest::blocking::Client`: the pool is created lazily behind a lock,
//! shared across threads (the blocking client is internally thread-safe),
//! and fails fast once closed.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use reqwest::header::HeaderMap;
use reqwest::Method;
use url::Url;

use crate::body::{Payload, ResponseBody};
use crate::error::{KeyrealmError, Result};
use crate::payload::header_map;
use crate::urls::full_url;

enum PoolState {
    Idle,
    Ready(reqwest::blocking::Client),
    Closed,
}

/// Blocking connection-pooling HTTP transport bound to one server base URL.
pub struct Transport {
    server_url: Url,
    headers: HashMap<String, String>,
    pool: Mutex<PoolState>,
}

impl Transport {
    /// Creates a transport for `server_url`; no I/O happens until the first
    /// request.
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
    /// Fails fast with [`KeyrealmError::IllegalState`] once closed.
    pub fn session(&self) -> Result<reqwest::blocking::Client> {
        let mut pool = self.pool.lock().unwrap_or_else(PoisonError::into_inner);
        match &*pool {
            PoolState::Ready(client) => Ok(client.clone()),
            PoolState::Closed => {
                Err(KeyrealmError::IllegalState("transport is closed".to_string()).into())
            }
            PoolState::Idle => {
                let client = reqwest::blocking::Client::builder()
                    .default_headers(header_map(&self.headers)?)
                    .build()
                    .map_err(KeyrealmError::request)?;
                *pool = PoolState::Ready(client.clone());
                Ok(client)
            }
        }
    }

    /// Releases the pooled client. Idempotent.
    pub fn close(&self) {
        let mut pool = self.pool.lock().unwrap_or_else(PoisonError::into_inner);
        *pool = PoolState::Closed;
    }

    /// Whether [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        matches!(
            &*self.pool.lock().unwrap_or_else(PoisonError::into_inner),
            PoolState::Closed
        )
    }

    /// Issues a GET request.
    pub fn get(
        &self,
        url: &str,
        headers: HeaderMap,
        query: &[(String, String)],
    ) -> Result<ResponseBody> {
        self.request(Method::GET, url, Payload::Empty, headers, query)
    }

    /// Issues a POST request with the given payload.
    pub fn post(
        &self,
        url: &str,
        payload: Payload,
        headers: HeaderMap,
        query: &[(String, String)],
    ) -> Result<ResponseBody> {
        self.request(Method::POST, url, payload, headers, query)
    }

    /// Issues a PUT request with the given payload.
    pub fn put(
        &self,
        url: &str,
        payload: Payload,
        headers: HeaderMap,
        query: &[(String, String)],
    ) -> Result<ResponseBody> {
        self.request(Method::PUT, url, payload, headers, query)
    }

    /// Issues a DELETE request.
    pub fn delete(
        &self,
        url: &str,
        headers: HeaderMap,
        query: &[(String, String)],
    ) -> Result<ResponseBody> {
        self.request(Method::DELETE, url, Payload::Empty, headers, query)
    }

    pub(crate) fn request(
        &self,
        method: Method,
        url: &str,
        payload: Payload,
        headers: HeaderMap,
        query: &[(String, String)],
    ) -> Result<ResponseBody> {
        let client = self.session()?;

        let mut request = client.request(method, url).headers(headers);
        if !query.is_empty() {
            request = request.query(query);
        }
        request = match payload {
            Payload::Empty => request,
            Payload::Form(pairs) => request.form(&pairs),
            Payload::Json(value) => request.json(&value),
        };

        let response = request.send().map_err(KeyrealmError::request)?;
        handle_response(response)
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("server_url", &self.server_url.as_str())
            .finish_non_exhaustive()
    }
}

fn handle_response(response: reqwest::blocking::Response) -> Result<ResponseBody> {
    let status = response.status();
    let url = response.url().to_string();

    if !status.is_success() {
        let source = response.error_for_status_ref().err();
        let body = response.text().unwrap_or_default();
        tracing::debug!(
            status = status.as_u16(),
            url = %url,
            body = %body,
            "request failed"
        );
        return Err(KeyrealmError::http(status.as_u16(), &url, &body, source).into());
    }

    let bytes = response.bytes().map_err(KeyrealmError::request)?;
    Ok(ResponseBody::from_bytes(bytes))
}
