//! User API client methods

use crate::api::ApiClient;
use crate::error::{CliError, CliResult};
use crate::models::{CredentialRepresentation, RoleRepresentation, UserRepresentation};

impl ApiClient {
    /// Look up a user by exact username
    ///
    /// Keycloak stores usernames lower-cased, so the match is case-insensitive.
    pub async fn find_user(&self, realm: &str, username: &str) -> CliResult<UserRepresentation> {
        let mut url = self.admin_url(&[realm, "users"])?;
        url.query_pairs_mut()
            .append_pair("username", username)
            .append_pair("exact", "true");

        let users: Vec<UserRepresentation> =
            self.get_json(url, &format!("user {username:?}")).await?;
        users
            .into_iter()
            .find(|u| {
                u.username
                    .as_deref()
                    .is_some_and(|name| name.eq_ignore_ascii_case(username))
            })
            .ok_or_else(|| CliError::NotFound(format!("user {username:?} not found")))
    }

    /// List users (first page as returned by the server)
    pub async fn list_users(&self, realm: &str) -> CliResult<Vec<UserRepresentation>> {
        let url = self.admin_url(&[realm, "users"])?;
        self.get_json(url, "user list").await
    }

    /// Create a user; returns the new id when the server reports it
    pub async fn create_user(
        &self,
        realm: &str,
        user: &UserRepresentation,
    ) -> CliResult<Option<String>> {
        let url = self.admin_url(&[realm, "users"])?;
        let name = user.username.as_deref().unwrap_or_default();
        self.post_json(url, user, &format!("user {name:?}")).await
    }

    /// Update user attributes
    pub async fn update_user(
        &self,
        realm: &str,
        user_id: &str,
        user: &UserRepresentation,
    ) -> CliResult<()> {
        let url = self.admin_url(&[realm, "users", user_id])?;
        self.put_json(url, user, &format!("user {user_id}")).await
    }

    /// Delete a user by id
    pub async fn delete_user(&self, realm: &str, user_id: &str) -> CliResult<()> {
        let url = self.admin_url(&[realm, "users", user_id])?;
        self.delete(url, &format!("user {user_id}")).await
    }

    /// Set a non-temporary password
    pub async fn reset_password(&self, realm: &str, user_id: &str, password: &str) -> CliResult<()> {
        let url = self.admin_url(&[realm, "users", user_id, "reset-password"])?;
        let credential = CredentialRepresentation::password(password);
        self.put_json(url, &credential, &format!("user {user_id}"))
            .await
    }

    /// Grant realm roles to a user
    pub async fn add_realm_role_mappings(
        &self,
        realm: &str,
        user_id: &str,
        roles: &[RoleRepresentation],
    ) -> CliResult<()> {
        let url = self.admin_url(&[realm, "users", user_id, "role-mappings", "realm"])?;
        self.post_json(url, roles, "realm role mapping")
            .await
            .map(|_| ())
    }

    /// Grant client roles to a user
    pub async fn add_client_role_mappings(
        &self,
        realm: &str,
        user_id: &str,
        client_uuid: &str,
        roles: &[RoleRepresentation],
    ) -> CliResult<()> {
        let url = self.admin_url(&[
            realm,
            "users",
            user_id,
            "role-mappings",
            "clients",
            client_uuid,
        ])?;
        self.post_json(url, roles, "client role mapping")
            .await
            .map(|_| ())
    }
}
