//! Realm-role admin resources

use serde_json::{Map, Value};

use crate::admin::{paths, representation, KeycloakAdmin};
use crate::body::ResponseBody;
use crate::error::Result;

/// The realm-role collection of one realm.
#[derive(Debug, Clone)]
pub struct Roles {
    admin: KeycloakAdmin,
    realm_name: String,
}

impl Roles {
    pub(crate) fn new(admin: KeycloakAdmin, realm_name: String) -> Self {
        Self { admin, realm_name }
    }

    /// Creates a realm role. `extra` carries optional fields
    /// (`description`, `composite`, ...).
    pub async fn create(&self, name: &str, extra: Map<String, Value>) -> Result<ResponseBody> {
        self.admin
            .post(
                &paths::roles(&self.realm_name),
                representation("name", name, extra),
            )
            .await
    }

    /// Lists the realm's roles.
    pub async fn all(&self) -> Result<Value> {
        self.admin
            .get(&paths::roles(&self.realm_name), &[])
            .await?
            .into_json()
    }

    /// The per-role resource for `role_name` (roles address by name, not
    /// id, on this collection).
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
    pub async fn get(&self) -> Result<Value> {
        self.admin
            .get(&paths::role(&self.realm_name, &self.role_name), &[])
            .await?
            .into_json()
    }

    /// Updates the role representation.
    pub async fn update(&self, representation: Map<String, Value>) -> Result<ResponseBody> {
        self.admin
            .put(
                &paths::role(&self.realm_name, &self.role_name),
                Value::Object(representation),
            )
            .await
    }

    /// Deletes the role.
    pub async fn delete(&self) -> Result<ResponseBody> {
        self.admin
            .delete(&paths::role(&self.realm_name, &self.role_name))
            .await
    }
}
