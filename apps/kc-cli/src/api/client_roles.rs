//! Client role API client methods
//!
//! `client_uuid` is the internal id of the client, not its clientId.

use crate::api::ApiClient;
use crate::error::CliResult;
use crate::models::RoleRepresentation;

impl ApiClient {
    /// Get a client role by name
    pub async fn get_client_role(
        &self,
        realm: &str,
        client_uuid: &str,
        name: &str,
    ) -> CliResult<RoleRepresentation> {
        let url = self.admin_url(&[realm, "clients", client_uuid, "roles", name])?;
        self.get_json(url, &format!("client role {name:?}")).await
    }

    /// List roles of a client
    pub async fn list_client_roles(
        &self,
        realm: &str,
        client_uuid: &str,
    ) -> CliResult<Vec<RoleRepresentation>> {
        let url = self.admin_url(&[realm, "clients", client_uuid, "roles"])?;
        self.get_json(url, "client role list").await
    }

    /// Create a client role
    pub async fn create_client_role(
        &self,
        realm: &str,
        client_uuid: &str,
        role: &RoleRepresentation,
    ) -> CliResult<()> {
        let url = self.admin_url(&[realm, "clients", client_uuid, "roles"])?;
        self.post_json(url, role, &format!("client role {:?}", role.name))
            .await
            .map(|_| ())
    }

    /// Update a client role addressed by its current name
    pub async fn update_client_role(
        &self,
        realm: &str,
        client_uuid: &str,
        name: &str,
        role: &RoleRepresentation,
    ) -> CliResult<()> {
        let url = self.admin_url(&[realm, "clients", client_uuid, "roles", name])?;
        self.put_json(url, role, &format!("client role {name:?}"))
            .await
    }

    /// Delete a client role
    pub async fn delete_client_role(
        &self,
        realm: &str,
        client_uuid: &str,
        name: &str,
    ) -> CliResult<()> {
        let url = self.admin_url(&[realm, "clients", client_uuid, "roles", name])?;
        self.delete(url, &format!("client role {name:?}")).await
    }
}
