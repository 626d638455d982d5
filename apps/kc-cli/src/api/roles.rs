//! Realm role API client methods

use crate::api::ApiClient;
use crate::error::CliResult;
use crate::models::RoleRepresentation;

impl ApiClient {
    /// Get a realm role by name
    pub async fn get_realm_role(&self, realm: &str, name: &str) -> CliResult<RoleRepresentation> {
        let url = self.admin_url(&[realm, "roles", name])?;
        self.get_json(url, &format!("role {name:?}")).await
    }

    /// List realm roles
    pub async fn list_realm_roles(&self, realm: &str) -> CliResult<Vec<RoleRepresentation>> {
        let url = self.admin_url(&[realm, "roles"])?;
        self.get_json(url, "role list").await
    }

    /// Create a realm role
    pub async fn create_realm_role(&self, realm: &str, role: &RoleRepresentation) -> CliResult<()> {
        let url = self.admin_url(&[realm, "roles"])?;
        self.post_json(url, role, &format!("role {:?}", role.name))
            .await
            .map(|_| ())
    }

    /// Update a realm role addressed by its current name
    pub async fn update_realm_role(
        &self,
        realm: &str,
        name: &str,
        role: &RoleRepresentation,
    ) -> CliResult<()> {
        let url = self.admin_url(&[realm, "roles", name])?;
        self.put_json(url, role, &format!("role {name:?}")).await
    }

    /// Delete a realm role
    pub async fn delete_realm_role(&self, realm: &str, name: &str) -> CliResult<()> {
        let url = self.admin_url(&[realm, "roles", name])?;
        self.delete(url, &format!("role {name:?}")).await
    }
}
