//! Realm representation

use serde::{Deserialize, Serialize};

/// Subset of Keycloak's RealmRepresentation used by the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealmRepresentation {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub realm: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
}
