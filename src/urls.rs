//! URL resolution helpers shared by both transport variants

use url::Url;

use crate::error::Result;

/// Resolves `path` against `base` with RFC 3986 reference resolution.
///
/// An absolute `path` replaces the base entirely; a rooted path (`/x`)
/// replaces the base path; a relative path resolves against the base's
/// final segment.
pub fn full_url(base: &Url, path: &str) -> Result<Url> {
    Ok(base.join(path)?)
}
