//! User admin resources: accounts, group membership, role mappings

use serde_json::{json, Map, Value};

use crate::admin::{paths, representation, KeycloakAdmin};
use crate::body::ResponseBody;
use crate::error::Result;

/// The user collection of one realm.
#[derive(Debug, Clone)]
pub struct Users {
    admin: KeycloakAdmin,
    realm_name: String,
}

impl Users {
    pub(crate) fn new(admin: KeycloakAdmin, realm_name: String) -> Self {
        Self { admin, realm_name }
    }

    /// Creates a user. `extra` carries optional representation fields
    /// (`email`, `firstName`, `enabled`, `credentials`, ...).
    pub async fn create(&self, username: &str, extra: Map<String, Value>) -> Result<ResponseBody> {
        self.admin
            .post(
                &paths::users(&self.realm_name),
                representation("username", username, extra),
            )
            .await
    }

    /// Lists users; `query` filters (`search`, `username`, `max`, ...) pass
    /// through to the transport's query encoding.
    pub async fn all(&self, query: &[(String, String)]) -> Result<Value> {
        self.admin
            .get(&paths::users(&self.realm_name), query)
            .await?
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
    pub async fn get(&self) -> Result<Value> {
        self.admin
            .get(&paths::user(&self.realm_name, &self.id), &[])
            .await?
            .into_json()
    }

    /// Updates the user representation.
    pub async fn update(&self, representation: Map<String, Value>) -> Result<ResponseBody> {
        self.admin
            .put(
                &paths::user(&self.realm_name, &self.id),
                Value::Object(representation),
            )
            .await
    }

    /// Deletes the user.
    pub async fn delete(&self) -> Result<ResponseBody> {
        self.admin.delete(&paths::user(&self.realm_name, &self.id)).await
    }

    /// Sets a new password credential.
    pub async fn reset_password(&self, password: &str, temporary: bool) -> Result<ResponseBody> {
        self.admin
            .put(
                &paths::user_reset_password(&self.realm_name, &self.id),
                json!({
                    "type": "password",
                    "value": password,
                    "temporary": temporary,
                }),
            )
            .await
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
    pub async fn all(&self) -> Result<Value> {
        self.admin
            .get(&paths::user_groups(&self.realm_name, &self.user_id), &[])
            .await?
            .into_json()
    }

    /// Adds the user to `group_id`.
    pub async fn add(&self, group_id: &str) -> Result<ResponseBody> {
        self.admin
            .put(
                &paths::user_group(&self.realm_name, &self.user_id, group_id),
                json!({
                    "realm": self.realm_name,
                    "userId": self.user_id,
                    "groupId": group_id,
                }),
            )
            .await
    }

    /// Removes the user from `group_id`.
    pub async fn delete(&self, group_id: &str) -> Result<ResponseBody> {
        self.admin
            .delete(&paths::user_group(&self.realm_name, &self.user_id, group_id))
            .await
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
    fn base(&self) -> String {
        paths::user_role_mappings_realm(&self.realm_name, &self.user_id)
    }

    /// Realm roles that can still be mapped onto the user.
    pub async fn available(&self) -> Result<Value> {
        self.admin
            .get(
                &paths::user_role_mappings_realm_available(&self.realm_name, &self.user_id),
                &[],
            )
            .await?
            .into_json()
    }

    /// The user's current realm-role mappings.
    pub async fn get(&self) -> Result<Value> {
        self.admin.get(&self.base(), &[]).await?.into_json()
    }

    /// Maps the given role representations onto the user.
    pub async fn add(&self, roles: Vec<Value>) -> Result<ResponseBody> {
        self.admin.post(&self.base(), Value::Array(roles)).await
    }

    /// Removes the given role representations from the user.
    pub async fn delete(&self, roles: Vec<Value>) -> Result<ResponseBody> {
        self.admin
            .delete_json(&self.base(), Value::Array(roles))
            .await
    }
}
