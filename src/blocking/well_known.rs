//! Lazily-resolved `.well-known` discovery documents (blocking variant)
//!
//! Same contract as [`crate::well_known::WellKnown`]: populated by exactly
//! one GET, guarded by a lock held across the fetch so concurrent
//! first-time accesses from different threads collapse into one network
//! call; population is all-or-nothing; injected content suppresses the
//! fetch entirely.

use std::sync::{Arc, Mutex, PoisonError};

use reqwest::header::HeaderMap;
use serde_json::{Map, Value};

use crate::blocking::transport::Transport;
use crate::error::{KeyrealmError, Result};

/// A cacheable discovery document bound to one blocking transport and URL.
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
    pub fn contents(&self) -> Result<Map<String, Value>> {
        let mut contents = self
            .inner
            .contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(contents) = &*contents {
            return Ok(contents.clone());
        }

        let body = self
            .inner
            .transport
            .get(&self.inner.url, HeaderMap::new(), &[])?;
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
    pub fn set_contents(&self, new_contents: Map<String, Value>) {
        let mut contents = self
            .inner
            .contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *contents = Some(new_contents);
    }

    /// Looks up a string-valued entry (an endpoint URL) by name.
    pub fn endpoint(&self, name: &str) -> Result<String> {
        let contents = self.contents()?;
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
