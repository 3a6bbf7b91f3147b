//! Blocking client variant
//!
//! A thread-blocking implementation of the same contract as the crate root:
//! every operation runs to completion on the calling thread over a shared
//! `reqwest::blocking::Client` pool, and lazy initialization (transport
//! creation, discovery resolution) is guarded with `std::sync::Mutex` in the
//! same places the async variant uses an async mutex. The two variants are
//! independent implementations -- neither wraps the other -- mirroring how
//! `reqwest` ships its own `blocking` module.
//!
//! Do not use this module from inside an async runtime; that is what the
//! crate root is for.

pub mod admin;
pub mod authz;
pub mod discovery;
pub mod openid_connect;
pub mod realm;
pub mod transport;
pub mod uma;
pub mod uma1;
pub mod well_known;

pub use admin::KeycloakAdmin;
pub use authz::KeycloakAuthz;
pub use discovery::{Discovery, DiscoverySource};
pub use openid_connect::KeycloakOpenidConnect;
pub use realm::KeycloakRealm;
pub use transport::Transport;
pub use uma::KeycloakUma;
pub use uma1::KeycloakUma1;
pub use well_known::WellKnown;
