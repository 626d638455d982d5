//! Client API client methods

use crate::api::{ApiClient, ScopeAssignment};
use crate::error::{CliError, CliResult};
use crate::models::{ClientRepresentation, ClientScopeRepresentation};

impl ApiClient {
    /// Find a client by its clientId
    pub async fn find_client(&self, realm: &str, client_id: &str) -> CliResult<ClientRepresentation> {
        let mut url = self.admin_url(&[realm, "clients"])?;
        url.query_pairs_mut().append_pair("clientId", client_id);

        let clients: Vec<ClientRepresentation> =
            self.get_json(url, &format!("client {client_id:?}")).await?;
        clients
            .into_iter()
            .find(|c| c.client_id.as_deref() == Some(client_id))
            .ok_or_else(|| CliError::NotFound(format!("client {client_id:?} not found")))
    }

    /// Internal id of a client, looked up by clientId
    pub async fn client_uuid(&self, realm: &str, client_id: &str) -> CliResult<String> {
        self.find_client(realm, client_id)
            .await?
            .id
            .ok_or_else(|| CliError::NotFound(format!("client {client_id:?} has no id")))
    }

    /// List clients
    pub async fn list_clients(&self, realm: &str) -> CliResult<Vec<ClientRepresentation>> {
        let url = self.admin_url(&[realm, "clients"])?;
        self.get_json(url, "client list").await
    }

    /// Create a client; returns the new internal id when reported
    pub async fn create_client(
        &self,
        realm: &str,
        client: &ClientRepresentation,
    ) -> CliResult<Option<String>> {
        let url = self.admin_url(&[realm, "clients"])?;
        let name = client.client_id.as_deref().unwrap_or_default();
        self.post_json(url, client, &format!("client {name:?}")).await
    }

    /// Replace a client representation
    pub async fn update_client(
        &self,
        realm: &str,
        client_uuid: &str,
        client: &ClientRepresentation,
    ) -> CliResult<()> {
        let url = self.admin_url(&[realm, "clients", client_uuid])?;
        self.put_json(url, client, &format!("client {client_uuid}"))
            .await
    }

    /// Delete a client by internal id
    pub async fn delete_client(&self, realm: &str, client_uuid: &str) -> CliResult<()> {
        let url = self.admin_url(&[realm, "clients", client_uuid])?;
        self.delete(url, &format!("client {client_uuid}")).await
    }

    /// Client scopes currently attached to a client
    pub async fn client_assigned_scopes(
        &self,
        realm: &str,
        client_uuid: &str,
        kind: ScopeAssignment,
    ) -> CliResult<Vec<ClientScopeRepresentation>> {
        let url = self.admin_url(&[realm, "clients", client_uuid, kind.path_segment()])?;
        self.get_json(url, "client scope assignments").await
    }

    /// Attach a realm client scope to a client
    pub async fn assign_client_scope(
        &self,
        realm: &str,
        client_uuid: &str,
        kind: ScopeAssignment,
        scope_id: &str,
    ) -> CliResult<()> {
        let url = self.admin_url(&[realm, "clients", client_uuid, kind.path_segment(), scope_id])?;
        self.put_empty(url, &format!("{} client scope {scope_id}", kind.as_str()))
            .await
    }

    /// Detach a client scope from a client
    pub async fn remove_client_scope(
        &self,
        realm: &str,
        client_uuid: &str,
        kind: ScopeAssignment,
        scope_id: &str,
    ) -> CliResult<()> {
        let url = self.admin_url(&[realm, "clients", client_uuid, kind.path_segment(), scope_id])?;
        self.delete(url, &format!("{} client scope {scope_id}", kind.as_str()))
            .await
    }
}
