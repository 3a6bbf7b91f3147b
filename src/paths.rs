//! Well-known path templates and grant-type URNs
//!
//! Shared by the async and blocking client variants. Templates carry a
//! `{realm}` placeholder that [`realm_path`] interpolates; they are relative
//! paths resolved against the server base URL at request time.

/// OpenID Connect discovery document path template.
pub const PATH_WELL_KNOWN_OPENID: &str = "realms/{realm}/.well-known/openid-configuration";

/// UMA 2 discovery document path template.
pub const PATH_WELL_KNOWN_UMA2: &str = "realms/{realm}/.well-known/uma2-configuration";

/// UMA 1 (legacy) discovery document path template.
pub const PATH_WELL_KNOWN_UMA1: &str = "realms/{realm}/.well-known/uma-configuration";

/// Legacy entitlement endpoint path template (`{client_id}` appended by the
/// Authz client).
pub const PATH_ENTITLEMENT: &str = "realms/{realm}/authz/entitlement";

/// Token-exchange grant type URN (RFC 8693).
pub const GRANT_TOKEN_EXCHANGE: &str = "urn:ietf:params:oauth:grant-type:token-exchange";

/// UMA ticket grant type URN, used by the Authz permission API.
pub const GRANT_UMA_TICKET: &str = "urn:ietf:params:oauth:grant-type:uma-ticket";

/// Interpolates the realm name into a `{realm}` path template.
pub fn realm_path(template: &str, realm_name: &str) -> String {
    template.replace("{realm}", realm_name)
}
