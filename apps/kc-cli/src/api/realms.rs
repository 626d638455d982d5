//! Realm API client methods

use crate::api::ApiClient;
use crate::error::CliResult;
use crate::models::RealmRepresentation;

impl ApiClient {
    /// List realm names in the order the server returns them
    pub async fn list_realms(&self) -> CliResult<Vec<String>> {
        let url = self.admin_url(&[])?;
        let realms: Vec<RealmRepresentation> = self.get_json(url, "realm list").await?;
        Ok(realms.into_iter().filter_map(|r| r.realm).collect())
    }
}
