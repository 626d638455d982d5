//! Client scope API client methods

use crate::api::ApiClient;
use crate::error::{CliError, CliResult};
use crate::models::ClientScopeRepresentation;

/// How a client scope is attached to a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScopeAssignment {
    Default,
    Optional,
}

impl ScopeAssignment {
    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            ScopeAssignment::Default => "default-client-scopes",
            ScopeAssignment::Optional => "optional-client-scopes",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeAssignment::Default => "default",
            ScopeAssignment::Optional => "optional",
        }
    }
}

impl ApiClient {
    /// List realm client scopes
    pub async fn list_client_scopes(
        &self,
        realm: &str,
    ) -> CliResult<Vec<ClientScopeRepresentation>> {
        let url = self.admin_url(&[realm, "client-scopes"])?;
        self.get_json(url, "client scope list").await
    }

    /// Find a client scope by name
    ///
    /// The admin API has no name lookup, so this lists and filters.
    pub async fn find_client_scope(
        &self,
        realm: &str,
        name: &str,
    ) -> CliResult<ClientScopeRepresentation> {
        self.list_client_scopes(realm)
            .await?
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| CliError::NotFound(format!("client scope {name:?} not found")))
    }

    /// Create a client scope; returns the new id when reported
    pub async fn create_client_scope(
        &self,
        realm: &str,
        scope: &ClientScopeRepresentation,
    ) -> CliResult<Option<String>> {
        let url = self.admin_url(&[realm, "client-scopes"])?;
        self.post_json(url, scope, &format!("client scope {:?}", scope.name))
            .await
    }

    /// Replace a client scope representation
    pub async fn update_client_scope(
        &self,
        realm: &str,
        scope_id: &str,
        scope: &ClientScopeRepresentation,
    ) -> CliResult<()> {
        let url = self.admin_url(&[realm, "client-scopes", scope_id])?;
        self.put_json(url, scope, &format!("client scope {scope_id}"))
            .await
    }

    /// Delete a client scope by id
    pub async fn delete_client_scope(&self, realm: &str, scope_id: &str) -> CliResult<()> {
        let url = self.admin_url(&[realm, "client-scopes", scope_id])?;
        self.delete(url, &format!("client scope {scope_id}")).await
    }
}
