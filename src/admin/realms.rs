//! Realm collection and per-realm admin resources

use serde_json::{Map, Value};

use crate::admin::clients::Clients;
use crate::admin::groups::Groups;
use crate::admin::roles::Roles;
use crate::admin::users::Users;
use crate::admin::{paths, representation, KeycloakAdmin};
use crate::body::ResponseBody;
use crate::error::Result;

/// The realm collection.
#[derive(Debug, Clone)]
pub struct Realms {
    admin: KeycloakAdmin,
}

impl Realms {
    pub(crate) fn new(admin: KeycloakAdmin) -> Self {
        Self { admin }
    }

    /// Creates a realm. `extra` carries optional representation fields
    /// (`enabled`, `displayName`, ...).
    pub async fn create(&self, name: &str, extra: Map<String, Value>) -> Result<ResponseBody> {
        self.admin
            .post(paths::REALMS, representation("realm", name, extra))
            .await
    }

    /// Lists all realms visible to the token.
    pub async fn all(&self) -> Result<Value> {
        self.admin.get(paths::REALMS, &[]).await?.into_json()
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
    pub async fn get(&self) -> Result<Value> {
        self.admin.get(&paths::realm(&self.realm_name), &[]).await?.into_json()
    }

    /// Updates the realm representation.
    pub async fn update(&self, representation: Map<String, Value>) -> Result<ResponseBody> {
        self.admin
            .put(&paths::realm(&self.realm_name), Value::Object(representation))
            .await
    }

    /// Deletes the realm.
    pub async fn delete(&self) -> Result<ResponseBody> {
        self.admin.delete(&paths::realm(&self.realm_name)).await
    }

    /// Clients registered in this realm.
    pub fn clients(&self) -> Clients {
        Clients::new(self.admin.clone(), self.realm_name.clone())
    }

    /// Users of this realm.
    pub fn users(&self) -> Users {
        Users::new(self.admin.clone(), self.realm_name.clone())
    }

    /// Groups of this realm.
    pub fn groups(&self) -> Groups {
        Groups::new(self.admin.clone(), self.realm_name.clone())
    }

    /// Realm-level roles.
    pub fn roles(&self) -> Roles {
        Roles::new(self.admin.clone(), self.realm_name.clone())
    }
}
