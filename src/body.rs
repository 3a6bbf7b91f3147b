//! Request and response body shapes shared by both transport variants
//!
//! Keycloak endpoints answer with JSON for almost everything, but a handful
//! of operations (logout, deletes, admin PUTs) return empty or non-JSON
//! bodies. [`ResponseBody`] preserves that distinction instead of guessing:
//! a body that parses as JSON is [`ResponseBody::Json`], anything else is
//! returned as raw bytes. Callers that require JSON use
//! [`ResponseBody::into_json`].

use bytes::Bytes;
use serde_json::Value;

use crate::error::{KeyrealmError, Result};

/// An outbound request body.
#[derive(Debug, Clone)]
pub enum Payload {
    /// No body (GET-like POSTs, deletes).
    Empty,
    /// `application/x-www-form-urlencoded` key/value pairs.
    Form(Vec<(String, String)>),
    /// An `application/json` body.
    Json(Value),
}

/// A fully-received response body: parsed JSON when the content allows it,
/// raw bytes otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// The body parsed as a JSON value.
    Json(Value),
    /// The body as received; includes the empty body.
    Raw(Bytes),
}

impl ResponseBody {
    /// Classifies received bytes: JSON when parseable, raw otherwise.
    pub fn from_bytes(bytes: Bytes) -> Self {
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Raw(bytes),
        }
    }

    /// The parsed JSON value, if this body was JSON.
    pub fn json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Raw(_) => None,
        }
    }

    /// Consumes the body, returning the JSON value or a
    /// [`KeyrealmError::Decode`] if the body was not JSON.
    pub fn into_json(self) -> Result<Value> {
        match self {
            ResponseBody::Json(value) => Ok(value),
            ResponseBody::Raw(bytes) => Err(KeyrealmError::Decode(format!(
                "expected a JSON body, got {} raw bytes",
                bytes.len()
            ))
            .into()),
        }
    }

    /// The raw bytes, if this body did not parse as JSON.
    pub fn raw(&self) -> Option<&Bytes> {
        match self {
            ResponseBody::Raw(bytes) => Some(bytes),
            ResponseBody::Json(_) => None,
        }
    }

    /// True for an empty non-JSON body (204-style responses).
    pub fn is_empty(&self) -> bool {
        matches!(self, ResponseBody::Raw(bytes) if bytes.is_empty())
    }
}
