//! Admin REST path templates, shared by the async and blocking variants

pub(crate) const REALMS: &str = "admin/realms";

pub(crate) fn realm(realm_name: &str) -> String {
    format!("{REALMS}/{realm_name}")
}

pub(crate) fn clients(realm_name: &str) -> String {
    format!("{REALMS}/{realm_name}/clients")
}

pub(crate) fn client(realm_name: &str, id: &str) -> String {
    format!("{REALMS}/{realm_name}/clients/{id}")
}

pub(crate) fn client_roles(realm_name: &str, id: &str) -> String {
    format!("{REALMS}/{realm_name}/clients/{id}/roles")
}

pub(crate) fn client_role(realm_name: &str, id: &str, role_name: &str) -> String {
    format!("{REALMS}/{realm_name}/clients/{id}/roles/{role_name}")
}

pub(crate) fn users(realm_name: &str) -> String {
    format!("{REALMS}/{realm_name}/users")
}

pub(crate) fn user(realm_name: &str, id: &str) -> String {
    format!("{REALMS}/{realm_name}/users/{id}")
}

pub(crate) fn user_reset_password(realm_name: &str, id: &str) -> String {
    format!("{REALMS}/{realm_name}/users/{id}/reset-password")
}

pub(crate) fn user_groups(realm_name: &str, id: &str) -> String {
    format!("{REALMS}/{realm_name}/users/{id}/groups")
}

pub(crate) fn user_group(realm_name: &str, id: &str, group_id: &str) -> String {
    format!("{REALMS}/{realm_name}/users/{id}/groups/{group_id}")
}

pub(crate) fn user_role_mappings_realm(realm_name: &str, id: &str) -> String {
    format!("{REALMS}/{realm_name}/users/{id}/role-mappings/realm")
}

pub(crate) fn user_role_mappings_realm_available(realm_name: &str, id: &str) -> String {
    format!("{REALMS}/{realm_name}/users/{id}/role-mappings/realm/available")
}

pub(crate) fn groups(realm_name: &str) -> String {
    format!("{REALMS}/{realm_name}/groups")
}

pub(crate) fn group(realm_name: &str, id: &str) -> String {
    format!("{REALMS}/{realm_name}/groups/{id}")
}

pub(crate) fn roles(realm_name: &str) -> String {
    format!("{REALMS}/{realm_name}/roles")
}

pub(crate) fn role(realm_name: &str, role_name: &str) -> String {
    format!("{REALMS}/{realm_name}/roles/{role_name}")
}
