//! Keycloak Admin REST API (blocking variant)
//!
//! Blocking counterpart of [`crate::admin`]; shares the path templates and
//! representation builders and differs only in scheduling. All resources
//! live in this one module.

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::{json, Map, Value};

use crate::admin::paths;
use crate::admin::representation;
use crate::blocking::realm::KeycloakRealm;
use crate::body::{Payload, ResponseBody};
use crate::error::{KeyrealmError, Result};
use crate::payload::bearer_json_headers;

/// Blocking admin API entry point.
#[derive(Clone)]
pub struct KeycloakAdmin {
    realm: KeycloakRealm,
    token: Option<String>,
}

impl KeycloakAdmin {
    pub(crate) fn new(realm: &KeycloakRealm) -> Self {
        Self {
            realm: realm.clone(),
            token: None,
        }
    }

    /// Sets the Bearer token used to authenticate every admin call.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Builder-style variant of [`set_token`](Self::set_token).
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.set_token(token);
        self
    }

    /// The realm collection resource.
    pub fn realms(&self) -> Realms {
        Realms {
            admin: self.clone(),
        }
    }

    /// GET the server root.
    pub fn root(&self) -> Result<ResponseBody> {
        self.get("/", &[])
    }

    fn auth_headers(&self) -> Result<HeaderMap> {
        let token = self.token.as_deref().ok_or_else(|| {
            KeyrealmError::IllegalState("admin token is not set".to_string())
        })?;
        bearer_json_headers(token)
    }

    fn get(&self, path: &str, query: &[(String, String)]) -> Result<ResponseBody> {
        let transport = self.realm.client();
        let url = transport.full_url(path)?;
        transport.get(&url, self.auth_headers()?, query)
    }

    fn post(&self, path: &str, body: Value) -> Result<ResponseBody> {
        let transport = self.realm.client();
        let url = transport.full_url(path)?;
        transport.post(&url, Payload::Json(body), self.auth_headers()?, &[])
    }

    fn put(&self, path: &str, body: Value) -> Result<ResponseBody> {
        let transport = self.realm.client();
        let url = transport.full_url(path)?;
        transport.put(&url, Payload::Json(body), self.auth_headers()?, &[])
    }

    fn delete(&self, path: &str) -> Result<ResponseBody> {
        let transport = self.realm.client();
        let url = transport.full_url(path)?;
        transport.delete(&url, self.auth_headers()?, &[])
    }

    fn delete_json(&self, path: &str, body: Value) -> Result<ResponseBody> {
        let transport = self.realm.client();
        let url = transport.full_url(path)?;
        transport.request(
            Method::DELETE,
            &url,
            Payload::Json(body),
            self.auth_headers()?,
            &[],
        )
    }
}

impl std::fmt::Debug for KeycloakAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeycloakAdmin")
            .field("realm", &self.realm)
            .field("token", &self.token.as_deref().map(|_| "***"))
            .finish()
    }
}

/// The realm collection.
#[derive(Debug, Clone)]
pub struct Realms {
    admin: KeycloakAdmin,
}

impl Realms {
    /// Creates a realm.
    pub fn create(&self, name: &str, extra: Map<String, Value>) -> Result<ResponseBody> {
        self.admin
            .post(paths::REALMS, representation("realm", name, extra))
    }

    /// Lists all realms visible to the token.
    pub fn all(&self) -> Result<Value> {
        self.admin.get(paths::REALMS, &[])?.into_json()
    }

    /// The per-realm resource for `name`.
    pub fn by_name(&self, name: impl Into<String>) -> RealmAdmin {
        RealmAdmin {
            admin: self.admin.clone(),
            realm_name: name.into(),
        }
    }
}

/// One realm's admin resource and the collections nested under it.
#[derive(Debug, Clone)]
pub struct RealmAdmin {
    admin: KeycloakAdmin,
    realm_name: String,
}

impl RealmAdmin {
    /// The realm representation.
    pub fn get(&self) -> Result<Value> {
        self.admin
            .get(&paths::realm(&self.realm_name), &[])?
            .into_json()
    }

    /// Updates the realm representation.
    pub fn update(&self, representation: Map<String, Value>) -> Result<ResponseBody> {
        self.admin
            .put(&paths::realm(&self.realm_name), Value::Object(representation))
    }

    /// Deletes the realm.
    pub fn delete(&self) -> Result<ResponseBody> {
        self.admin.delete(&paths::realm(&self.realm_name))
    }

    /// Clients registered in this realm.
    pub fn clients(&self) -> Clients {
        Clients {
            admin: self.admin.clone(),
            realm_name: self.realm_name.clone(),
        }
    }

    /// Users of this realm.
    pub fn users(&self) -> Users {
        Users {
            admin: self.admin.clone(),
            realm_name: self.realm_name.clone(),
        }
    }

    /// Groups of this realm.
    pub fn groups(&self) -> Groups {
        Groups {
            admin: self.admin.clone(),
            realm_name: self.realm_name.clone(),
        }
    }

    /// Realm-level roles.
    pub fn roles(&self) -> Roles {
        Roles {
            admin: self.admin.clone(),
            realm_name: self.realm_name.clone(),
        }
    }
}

/// The client collection of one realm.
#[derive(Debug, Clone)]
pub struct Clients {
    admin: KeycloakAdmin,
    realm_name: String,
}

impl Clients {
    /// Registers a client.
    pub fn create(&self, client_id: &str, extra: Map<String, Value>) -> Result<ResponseBody> {
        self.admin.post(
            &paths::clients(&self.realm_name),
            representation("clientId", client_id, extra),
        )
    }

    /// Lists the realm's clients.
    pub fn all(&self) -> Result<Value> {
        self.admin
            .get(&paths::clients(&self.realm_name), &[])?
            .into_json()
    }

    /// The per-client resource for internal id `id`.
    pub fn by_id(&self, id: impl Into<String>) -> ClientAdmin {
        ClientAdmin {
            admin: self.admin.clone(),
            realm_name: self.realm_name.clone(),
            id: id.into(),
        }
    }
}

/// One client's admin resource.
#[derive(Debug, Clone)]
pub struct ClientAdmin {
    admin: KeycloakAdmin,
    realm_name: String,
    id: String,
}

impl ClientAdmin {
    /// The client representation.
    pub fn get(&self) -> Result<Value> {
        self.admin
            .get(&paths::client(&self.realm_name, &self.id), &[])?
            .into_json()
    }

    /// Updates the client representation.
    pub fn update(&self, representation: Map<String, Value>) -> Result<ResponseBody> {
        self.admin.put(
            &paths::client(&self.realm_name, &self.id),
            Value::Object(representation),
        )
    }

    /// Deletes the client.
    pub fn delete(&self) -> Result<ResponseBody> {
        self.admin.delete(&paths::client(&self.realm_name, &self.id))
    }

    /// Roles defined on this client.
    pub fn roles(&self) -> ClientRoles {
        ClientRoles {
            admin: self.admin.clone(),
            realm_name: self.realm_name.clone(),
            client_id: self.id.clone(),
        }
    }
}

/// The role collection of one client.
#[derive(Debug, Clone)]
pub struct ClientRoles {
    admin: KeycloakAdmin,
    realm_name: String,
    client_id: String,
}

impl ClientRoles {
    /// Creates a role on the client.
    pub fn create(&self, name: &str, extra: Map<String, Value>) -> Result<ResponseBody> {
        self.admin.post(
            &paths::client_roles(&self.realm_name, &self.client_id),
            representation("name", name, extra),
        )
    }

    /// Lists the client's roles.
    pub fn all(&self) -> Result<Value> {
        self.admin
            .get(&paths::client_roles(&self.realm_name, &self.client_id), &[])?
            .into_json()
    }

    /// The per-role resource for `role_name`.
    pub fn by_name(&self, role_name: impl Into<String>) -> ClientRoleAdmin {
        ClientRoleAdmin {
            admin: self.admin.clone(),
            realm_name: self.realm_name.clone(),
            client_id: self.client_id.clone(),
            role_name: role_name.into(),
        }
    }
}

/// One client role's admin resource.
#[derive(Debug, Clone)]
pub struct ClientRoleAdmin {
    admin: KeycloakAdmin,
    realm_name: String,
    client_id: String,
    role_name: String,
}

impl ClientRoleAdmin {
    /// The role representation.
    pub fn get(&self) -> Result<Value> {
        self.admin
            .get(
                &paths::client_role(&self.realm_name, &self.client_id, &self.role_name),
                &[],
            )?
            .into_json()
    }

    /// Updates the role representation.
    pub fn update(&self, representation: Map<String, Value>) -> Result<ResponseBody> {
        self.admin.put(
            &paths::client_role(&self.realm_name, &self.client_id, &self.role_name),
            Value::Object(representation),
        )
    }

    /// Deletes the role.
    pub fn delete(&self) -> Result<ResponseBody> {
        self.admin
            .delete(&paths::client_role(&self.realm_name, &self.client_id, &self.role_name))
    }
}

/// The user collection of one realm.
#[derive(Debug, Clone)]
pub struct Users {
    admin: KeycloakAdmin,
    realm_name: String,
}

impl Users {
    /// Creates a user.
    pub fn create(&self, username: &str, extra: Map<String, Value>) -> Result<ResponseBody> {
        self.admin.post(
            &paths::users(&self.realm_name),
            representation("username", username, extra),
        )
    }

    /// Lists users; `query` filters pass through to the transport's query
    /// encoding.
    pub fn all(&self, query: &[(String, String)]) -> Result<Value> {
        self.admin
            .get(&paths::users(&self.realm_name), query)?
            .into_json()
    }

    /// The per-user resource for `id`.
    pub fn by_id(&self, id: impl Into<String>) -> UserAdmin {
        UserAdmin {
            admin: self.admin.clone(),
            realm_name: self.realm_name.clone(),
            id: id.into(),
        }
    }
}

/// One user's admin resource.
#[derive(Debug, Clone)]
pub struct UserAdmin {
    admin: KeycloakAdmin,
    realm_name: String,
    id: String,
}

impl UserAdmin {
    /// The user representation.
    pub fn get(&self) -> Result<Value> {
        self.admin
            .get(&paths::user(&self.realm_name, &self.id), &[])?
            .into_json()
    }

    /// Updates the user representation.
    pub fn update(&self, representation: Map<String, Value>) -> Result<ResponseBody> {
        self.admin.put(
            &paths::user(&self.realm_name, &self.id),
            Value::Object(representation),
        )
    }

    /// Deletes the user.
    pub fn delete(&self) -> Result<ResponseBody> {
        self.admin.delete(&paths::user(&self.realm_name, &self.id))
    }

    /// Sets a new password credential.
    pub fn reset_password(&self, password: &str, temporary: bool) -> Result<ResponseBody> {
        self.admin.put(
            &paths::user_reset_password(&self.realm_name, &self.id),
            json!({
                "type": "password",
                "value": password,
                "temporary": temporary,
            }),
        )
    }

    /// This user's group memberships.
    pub fn groups(&self) -> UserGroups {
        UserGroups {
            admin: self.admin.clone(),
            realm_name: self.realm_name.clone(),
            user_id: self.id.clone(),
        }
    }

    /// This user's realm-level role mappings.
    pub fn role_mappings(&self) -> UserRoleMappingsRealm {
        UserRoleMappingsRealm {
            admin: self.admin.clone(),
            realm_name: self.realm_name.clone(),
            user_id: self.id.clone(),
        }
    }
}

/// Group membership of one user.
#[derive(Debug, Clone)]
pub struct UserGroups {
    admin: KeycloakAdmin,
    realm_name: String,
    user_id: String,
}

impl UserGroups {
    /// Lists the groups the user belongs to.
    pub fn all(&self) -> Result<Value> {
        self.admin
            .get(&paths::user_groups(&self.realm_name, &self.user_id), &[])?
            .into_json()
    }

    /// Adds the user to `group_id`.
    pub fn add(&self, group_id: &str) -> Result<ResponseBody> {
        self.admin.put(
            &paths::user_group(&self.realm_name, &self.user_id, group_id),
            json!({
                "realm": self.realm_name,
                "userId": self.user_id,
                "groupId": group_id,
            }),
        )
    }

    /// Removes the user from `group_id`.
    pub fn delete(&self, group_id: &str) -> Result<ResponseBody> {
        self.admin
            .delete(&paths::user_group(&self.realm_name, &self.user_id, group_id))
    }
}

/// Realm-level role mappings of one user.
#[derive(Debug, Clone)]
pub struct UserRoleMappingsRealm {
    admin: KeycloakAdmin,
    realm_name: String,
    user_id: String,
}

impl UserRoleMappingsRealm {
    /// Realm roles that can still be mapped onto the user.
    pub fn available(&self) -> Result<Value> {
        self.admin
            .get(
                &paths::user_role_mappings_realm_available(&self.realm_name, &self.user_id),
                &[],
            )?
            .into_json()
    }

    /// The user's current realm-role mappings.
    pub fn get(&self) -> Result<Value> {
        self.admin
            .get(
                &paths::user_role_mappings_realm(&self.realm_name, &self.user_id),
                &[],
            )?
            .into_json()
    }

    /// Maps the given role representations onto the user.
    pub fn add(&self, roles: Vec<Value>) -> Result<ResponseBody> {
        self.admin.post(
            &paths::user_role_mappings_realm(&self.realm_name, &self.user_id),
            Value::Array(roles),
        )
    }

    /// Removes the given role representations from the user.
    pub fn delete(&self, roles: Vec<Value>) -> Result<ResponseBody> {
        self.admin.delete_json(
            &paths::user_role_mappings_realm(&self.realm_name, &self.user_id),
            Value::Array(roles),
        )
    }
}

/// The group collection of one realm.
#[derive(Debug, Clone)]
pub struct Groups {
    admin: KeycloakAdmin,
    realm_name: String,
}

impl Groups {
    /// Creates a top-level group.
    pub fn create(&self, name: &str, extra: Map<String, Value>) -> Result<ResponseBody> {
        self.admin.post(
            &paths::groups(&self.realm_name),
            representation("name", name, extra),
        )
    }

    /// Lists the realm's group hierarchy.
    pub fn all(&self) -> Result<Value> {
        self.admin
            .get(&paths::groups(&self.realm_name), &[])?
            .into_json()
    }

    /// The per-group resource for `id`.
    pub fn by_id(&self, id: impl Into<String>) -> GroupAdmin {
        GroupAdmin {
            admin: self.admin.clone(),
            realm_name: self.realm_name.clone(),
            id: id.into(),
        }
    }
}

/// One group's admin resource.
#[derive(Debug, Clone)]
pub struct GroupAdmin {
    admin: KeycloakAdmin,
    realm_name: String,
    id: String,
}

impl GroupAdmin {
    /// The group representation.
    pub fn get(&self) -> Result<Value> {
        self.admin
            .get(&paths::group(&self.realm_name, &self.id), &[])?
            .into_json()
    }

    /// Updates the group representation.
    pub fn update(&self, representation: Map<String, Value>) -> Result<ResponseBody> {
        self.admin.put(
            &paths::group(&self.realm_name, &self.id),
            Value::Object(representation),
        )
    }

    /// Deletes the group.
    pub fn delete(&self) -> Result<ResponseBody> {
        self.admin.delete(&paths::group(&self.realm_name, &self.id))
    }
}

/// The realm-role collection of one realm.
#[derive(Debug, Clone)]
pub struct Roles {
    admin: KeycloakAdmin,
    realm_name: String,
}

impl Roles {
    /// Creates a realm role.
    pub fn create(&self, name: &str, extra: Map<String, Value>) -> Result<ResponseBody> {
        self.admin.post(
            &paths::roles(&self.realm_name),
            representation("name", name, extra),
        )
    }

    /// Lists the realm's roles.
    pub fn all(&self) -> Result<Value> {
        self.admin
            .get(&paths::roles(&self.realm_name), &[])?
            .into_json()
    }

    /// The per-role resource for `role_name`.
    pub fn by_name(&self, role_name: impl Into<String>) -> RoleAdmin {
        RoleAdmin {
            admin: self.admin.clone(),
            realm_name: self.realm_name.clone(),
            role_name: role_name.into(),
        }
    }
}

/// One realm role's admin resource.
#[derive(Debug, Clone)]
pub struct RoleAdmin {
    admin: KeycloakAdmin,
    realm_name: String,
    role_name: String,
}

impl RoleAdmin {
    /// The role representation.
    pub fn get(&self) -> Result<Value> {
        self.admin
            .get(&paths::role(&self.realm_name, &self.role_name), &[])?
            .into_json()
    }

    /// Updates the role representation.
    pub fn update(&self, representation: Map<String, Value>) -> Result<ResponseBody> {
        self.admin.put(
            &paths::role(&self.realm_name, &self.role_name),
            Value::Object(representation),
        )
    }

    /// Deletes the role.
    pub fn delete(&self) -> Result<ResponseBody> {
        self.admin
            .delete(&paths::role(&self.realm_name, &self.role_name))
    }
}
