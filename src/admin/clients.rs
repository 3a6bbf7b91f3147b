//! Client and client-role admin resources

use serde_json::{Map, Value};

use crate::admin::{paths, representation, KeycloakAdmin};
use crate::body::ResponseBody;
use crate::error::Result;

/// The client collection of one realm.
#[derive(Debug, Clone)]
pub struct Clients {
    admin: KeycloakAdmin,
    realm_name: String,
}

impl Clients {
    pub(crate) fn new(admin: KeycloakAdmin, realm_name: String) -> Self {
        Self { admin, realm_name }
    }

    /// Registers a client. `extra` carries optional representation fields
    /// (`secret`, `redirectUris`, `publicClient`, ...).
    pub async fn create(&self, client_id: &str, extra: Map<String, Value>) -> Result<ResponseBody> {
        self.admin
            .post(
                &paths::clients(&self.realm_name),
                representation("clientId", client_id, extra),
            )
            .await
    }

    /// Lists the realm's clients.
    pub async fn all(&self) -> Result<Value> {
        self.admin
            .get(&paths::clients(&self.realm_name), &[])
            .await?
            .into_json()
    }

    /// The per-client resource for internal id `id` (the UUID, not the
    /// `clientId`).
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
    pub async fn get(&self) -> Result<Value> {
        self.admin
            .get(&paths::client(&self.realm_name, &self.id), &[])
            .await?
            .into_json()
    }

    /// Updates the client representation.
    pub async fn update(&self, representation: Map<String, Value>) -> Result<ResponseBody> {
        self.admin
            .put(
                &paths::client(&self.realm_name, &self.id),
                Value::Object(representation),
            )
            .await
    }

    /// Deletes the client.
    pub async fn delete(&self) -> Result<ResponseBody> {
        self.admin.delete(&paths::client(&self.realm_name, &self.id)).await
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
    /// Creates a role on the client. `extra` carries optional fields
    /// (`description`, `composite`, ...).
    pub async fn create(&self, name: &str, extra: Map<String, Value>) -> Result<ResponseBody> {
        self.admin
            .post(
                &paths::client_roles(&self.realm_name, &self.client_id),
                representation("name", name, extra),
            )
            .await
    }

    /// Lists the client's roles.
    pub async fn all(&self) -> Result<Value> {
        self.admin
            .get(&paths::client_roles(&self.realm_name, &self.client_id), &[])
            .await?
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
    pub async fn get(&self) -> Result<Value> {
        self.admin
            .get(
                &paths::client_role(&self.realm_name, &self.client_id, &self.role_name),
                &[],
            )
            .await?
            .into_json()
    }

    /// Updates the role representation.
    pub async fn update(&self, representation: Map<String, Value>) -> Result<ResponseBody> {
        self.admin
            .put(
                &paths::client_role(&self.realm_name, &self.client_id, &self.role_name),
                Value::Object(representation),
            )
            .await
    }

    /// Deletes the role.
    pub async fn delete(&self) -> Result<ResponseBody> {
        self.admin
            .delete(&paths::client_role(&self.realm_name, &self.client_id, &self.role_name))
            .await
    }
}
