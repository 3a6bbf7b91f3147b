//! Lazily-resolved `.well-known` discovery documents (async variant)
//!
//! A [`WellKnown`] behaves as a read-only mapping of endpoint names to URLs
//! once populated. Population happens exactly once: the first
//! [`contents`](WellKnown::contents) (or [`endpoint`](WellKnown::endpoint))
//! call performs a single GET through the owning [`Transport`] while holding
//! the content lock, so concurrent first-time accesses collapse into one
//! network fetch and all callers observe the same result.
//!
//! Population is all-or-nothing: a failed or cancelled fetch leaves the
//! content slot unset and a later call retries cleanly. Content can also be
//! injected directly ([`set_contents`](WellKnown::set_contents) /
//! [`with_contents`](WellKnown::with_contents)), after which resolution is a
//! no-op -- the test and pre-seeding path.

use std::sync::Arc;

use reqwest::header::HeaderMap;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::error::{KeyrealmError, Result};
use crate::transport::Transport;

/// A cacheable discovery document bound to one transport and URL.
///
/// Cheap to clone; clones share the same content slot.
#[derive(Clone)]
pub struct WellKnown {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Arc<Transport>,
    url: String,
    contents: Mutex<Option<Map<String, Value>>>,
}

impl WellKnown {
    /// Creates an unresolved document fetched from `url` on first access.
    pub fn new(transport: Arc<Transport>, url: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                url: url.into(),
                contents: Mutex::new(None),
            }),
        }
    }

    /// Creates a pre-seeded document; no network fetch will occur.
    pub fn with_contents(
        transport: Arc<Transport>,
        url: impl Into<String>,
        contents: Map<String, Value>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                url: url.into(),
                contents: Mutex::new(Some(contents)),
            }),
        }
    }

    /// The URL this document resolves from.
    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// The document's full contents, fetching them on first access.
    ///
    /// Exactly one GET occurs per document regardless of concurrency; the
    /// content lock is held across the fetch, so late arrivals read the
    /// cached result. A failed fetch stores nothing.
    pub async fn contents(&self) -> Result<Map<String, Value>> {
        let mut contents = self.inner.contents.lock().await;
        if let Some(contents) = &*contents {
            return Ok(contents.clone());
        }

        let body = self
            .inner
            .transport
            .get(&self.inner.url, HeaderMap::new(), &[])
            .await?;
        let value = body.into_json()?;
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(KeyrealmError::Decode(format!(
                    "discovery document at {} is not a JSON object: {other}",
                    self.inner.url
                ))
                .into())
            }
        };

        *contents = Some(map.clone());
        Ok(map)
    }

    /// Replaces the document contents, bypassing any network fetch.
    pub async fn set_contents(&self, new_contents: Map<String, Value>) {
        let mut contents = self.inner.contents.lock().await;
        *contents = Some(new_contents);
    }

    /// Looks up a string-valued entry (an endpoint URL) by name.
    ///
    /// # Errors
    ///
    /// [`KeyrealmError::KeyNotFound`] when the entry is absent -- usually a
    /// protocol-version mismatch between client and server.
    pub async fn endpoint(&self, name: &str) -> Result<String> {
        let contents = self.contents().await?;
        match contents.get(name) {
            Some(Value::String(url)) => Ok(url.clone()),
            Some(other) => Err(KeyrealmError::Decode(format!(
                "discovery entry {name:?} is not a string: {other}"
            ))
            .into()),
            None => Err(KeyrealmError::KeyNotFound(name.to_string()).into()),
        }
    }
}

impl std::fmt::Debug for WellKnown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WellKnown")
            .field("url", &self.inner.url)
            .finish_non_exhaustive()
    }
}
