//! Group admin resources

use serde_json::{Map, Value};

use crate::admin::{paths, representation, KeycloakAdmin};
use crate::body::ResponseBody;
use crate::error::Result;

/// The group collection of one realm.
#[derive(Debug, Clone)]
pub struct Groups {
    admin: KeycloakAdmin,
    realm_name: String,
}

impl Groups {
    pub(crate) fn new(admin: KeycloakAdmin, realm_name: String) -> Self {
        Self { admin, realm_name }
    }

    /// Creates a top-level group.
    pub async fn create(&self, name: &str, extra: Map<String, Value>) -> Result<ResponseBody> {
        self.admin
            .post(
                &paths::groups(&self.realm_name),
                representation("name", name, extra),
            )
            .await
    }

    /// Lists the realm's group hierarchy.
    pub async fn all(&self) -> Result<Value> {
        self.admin
            .get(&paths::groups(&self.realm_name), &[])
            .await?
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
    pub async fn get(&self) -> Result<Value> {
        self.admin
            .get(&paths::group(&self.realm_name, &self.id), &[])
            .await?
            .into_json()
    }

    /// Updates the group representation.
    pub async fn update(&self, representation: Map<String, Value>) -> Result<ResponseBody> {
        self.admin
            .put(
                &paths::group(&self.realm_name, &self.id),
                Value::Object(representation),
            )
            .await
    }

    /// Deletes the group.
    pub async fn delete(&self) -> Result<ResponseBody> {
        self.admin.delete(&paths::group(&self.realm_name, &self.id)).await
    }
}
