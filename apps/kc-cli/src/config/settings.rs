//! Backend connection settings loaded from config.json

use super::{DEFAULT_ADMIN_CLIENT, DEFAULT_AUTH_REALM};
use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// OAuth grant used to obtain the admin token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrantType {
    /// Machine credentials (`client_id` + `client_secret`)
    #[default]
    ClientCredentials,
    /// Admin user credentials (`username` + `password`)
    Password,
}

impl GrantType {
    /// Parse the configured selector; unknown values fall back to client credentials
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("password") => GrantType::Password,
            _ => GrantType::ClientCredentials,
        }
    }

    /// Wire name for the token endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantType::ClientCredentials => "client_credentials",
            GrantType::Password => "password",
        }
    }
}

/// Keycloak connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Keycloak base URL, e.g. `https://sso.example.com`
    #[serde(default)]
    pub server_url: String,

    /// Realm the admin credentials live in
    #[serde(default)]
    pub auth_realm: Option<String>,

    /// Default target realm
    #[serde(default)]
    pub realm: Option<String>,

    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// `client_credentials` (default) or `password`
    #[serde(default)]
    pub grant_type: Option<String>,

    /// Per-request HTTP timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            auth_realm: None,
            realm: None,
            client_id: None,
            client_secret: None,
            username: None,
            password: None,
            grant_type: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load and validate config from a JSON file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate config from JSON text
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.normalized()
    }

    /// Blank strings count as unset; server_url is mandatory
    fn normalized(mut self) -> CliResult<Self> {
        self.server_url = self.server_url.trim().trim_end_matches('/').to_string();
        if self.server_url.is_empty() {
            return Err(CliError::Config("server_url is required".to_string()));
        }

        for field in [
            &mut self.auth_realm,
            &mut self.realm,
            &mut self.client_id,
            &mut self.client_secret,
            &mut self.username,
            &mut self.password,
            &mut self.grant_type,
        ] {
            if field.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *field = None;
            }
        }

        Ok(self)
    }

    /// Realm the token is requested from
    pub fn auth_realm(&self) -> &str {
        self.auth_realm.as_deref().unwrap_or(DEFAULT_AUTH_REALM)
    }

    /// Grant selected by `grant_type`
    pub fn grant_type(&self) -> GrantType {
        GrantType::parse(self.grant_type.as_deref())
    }

    /// Client presented on the token request
    pub fn token_client_id(&self) -> &str {
        match (self.grant_type(), self.client_id.as_deref()) {
            (_, Some(id)) => id,
            (GrantType::Password, None) => DEFAULT_ADMIN_CLIENT,
            (GrantType::ClientCredentials, None) => "",
        }
    }

    /// OpenID Connect token endpoint
    pub fn token_url(&self) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.server_url,
            self.auth_realm()
        )
    }
}
