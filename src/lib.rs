//! keyrealm - Keycloak realm client library
//!
//! This library provides a client for a remote Keycloak identity server:
//! well-known endpoint discovery, OpenID Connect token operations, UMA
//! resource and permission management, legacy Authz entitlement calls, and
//! the Admin REST API.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `realm`: The top-level [`KeycloakRealm`] handle owning the transport
//!   lifetime and producing protocol clients
//! - `transport`: Lazily-pooled HTTP transport with a fail-fast close
//!   contract
//! - `well_known` / `discovery`: Cached `.well-known` documents and the
//!   capability composed into every protocol client
//! - `openid_connect`, `uma`, `uma1`, `authz`: Protocol clients
//! - `admin`: Value-based Admin REST resources
//! - `blocking`: Thread-blocking implementations of all of the above
//! - `error`: Error types and result alias
//!
//! All operation URLs are resolved from the realm's discovery documents;
//! each client instance fetches its document at most once, concurrent first
//! uses included.
//!
//! # Example
//!
//! ```no_run
//! use keyrealm::KeycloakRealm;
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let realm = KeycloakRealm::new(
//!         Url::parse("https://keycloak.example.com")?,
//!         "my-realm",
//!     );
//!
//!     let oidc = realm.open_id_connect("my-client", "my-secret");
//!     let tokens = oidc.client_credentials(None).await?;
//!     println!("{}", tokens["access_token"]);
//!
//!     realm.close().await;
//!     Ok(())
//! }
//! ```

pub mod admin;
pub mod authz;
pub mod blocking;
pub mod body;
pub mod discovery;
pub mod error;
pub mod openid_connect;
pub mod paths;
pub mod realm;
pub mod transport;
pub mod uma;
pub mod uma1;
pub mod urls;
pub mod well_known;

pub(crate) mod payload;

// Re-export commonly used types
pub use body::{Payload, ResponseBody};
pub use discovery::{Discovery, DiscoverySource};
pub use error::{KeyrealmError, Result};
pub use realm::KeycloakRealm;
pub use transport::Transport;
pub use well_known::WellKnown;
