//! HTTP client wrapper for the Keycloak admin REST API

use crate::config::{Config, GrantType};
use crate::error::{CliError, CliResult};
use crate::models::{OAuthError, TokenResponse};
use reqwest::header::LOCATION;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;

/// API client for making authenticated admin requests
///
/// The admin token is requested lazily on the first call and reused for the
/// rest of the invocation.
pub struct ApiClient {
    client: Client,
    config: Config,
    token: OnceCell<String>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: Config) -> CliResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CliError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            token: OnceCell::new(),
        })
    }

    /// Get a reference to the config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Access token for admin calls, logging in on first use
    pub async fn access_token(&self) -> CliResult<&str> {
        let token = self.token.get_or_try_init(|| self.login()).await?;
        Ok(token.as_str())
    }

    async fn login(&self) -> CliResult<String> {
        let grant = self.config.grant_type();
        let mut form: Vec<(&str, &str)> = vec![
            ("grant_type", grant.as_str()),
            ("client_id", self.config.token_client_id()),
        ];
        match grant {
            GrantType::ClientCredentials => {
                form.push((
                    "client_secret",
                    self.config.client_secret.as_deref().unwrap_or_default(),
                ));
            }
            GrantType::Password => {
                form.push(("username", self.config.username.as_deref().unwrap_or_default()));
                form.push(("password", self.config.password.as_deref().unwrap_or_default()));
                if let Some(secret) = self.config.client_secret.as_deref() {
                    form.push(("client_secret", secret));
                }
            }
        }

        tracing::debug!(
            grant = grant.as_str(),
            realm = self.config.auth_realm(),
            "requesting admin token"
        );
        let response = self
            .client
            .post(self.config.token_url())
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OAuthError>(&body)
                .map(|e| e.message())
                .unwrap_or_else(|_| format!("token endpoint returned {status}"));
            return Err(CliError::AuthenticationFailed(message));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// Build an admin URL under `/admin/realms` from raw path segments
    ///
    /// Segments are percent-encoded individually, so names containing `/` or
    /// spaces address a single path element.
    pub fn admin_url(&self, segments: &[&str]) -> CliResult<Url> {
        let mut url = Url::parse(&self.config.server_url)
            .map_err(|e| CliError::Config(format!("invalid server_url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| CliError::Config("server_url cannot be used as a base URL".to_string()))?
            .pop_if_empty()
            .extend(["admin", "realms"])
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> CliResult<Response> {
        let token = self.access_token().await?;
        let request = request
            .bearer_auth(token)
            .build()
            .map_err(|e| CliError::Network(e.to_string()))?;
        let method = request.method().clone();
        let url = request.url().clone();

        tracing::debug!(%method, %url, "request");
        let started = Instant::now();
        let response = self.client.execute(request).await?;
        tracing::debug!(
            %method,
            %url,
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "response"
        );

        check_status(response, what).await
    }

    /// GET and decode a JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> CliResult<T> {
        let response = self.send(self.client.get(url), what).await?;
        response.json().await.map_err(Into::into)
    }

    /// POST a JSON body; returns the id from the `Location` header when present
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
        what: &str,
    ) -> CliResult<Option<String>> {
        let response = self.send(self.client.post(url).json(body), what).await?;
        Ok(created_id(&response))
    }

    /// PUT a JSON body
    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
        what: &str,
    ) -> CliResult<()> {
        self.send(self.client.put(url).json(body), what).await?;
        Ok(())
    }

    /// PUT without a body (scope assignment endpoints)
    pub async fn put_empty(&self, url: Url, what: &str) -> CliResult<()> {
        self.send(self.client.put(url), what).await?;
        Ok(())
    }

    /// DELETE a resource
    pub async fn delete(&self, url: Url, what: &str) -> CliResult<()> {
        self.send(self.client.delete(url), what).await?;
        Ok(())
    }
}

/// Map a response to the typed error taxonomy
///
/// 404 and 409 are surfaced as their own variants so callers can apply
/// skip policy without looking at message text.
async fn check_status(response: Response, what: &str) -> CliResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::NOT_FOUND => Err(CliError::NotFound(format!("{what} not found"))),
        StatusCode::CONFLICT => Err(CliError::Conflict(format!("{what} already exists"))),
        _ => Err(CliError::Api {
            status: status.as_u16(),
            message: if body.is_empty() {
                status.to_string()
            } else {
                body
            },
        }),
    }
}

/// Error for a representation the server returned without an id
pub(crate) fn missing_id(what: &str) -> CliError {
    CliError::Api {
        status: 0,
        message: format!("{what} returned without an id"),
    }
}

fn created_id(response: &Response) -> Option<String> {
    response
        .headers()
        .get(LOCATION)?
        .to_str()
        .ok()?
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server_url: &str) -> ApiClient {
        let config = Config::from_json(&format!(r#"{{"server_url": "{server_url}"}}"#)).unwrap();
        ApiClient::new(config).unwrap()
    }

    #[test]
    fn test_admin_url_encodes_segments() {
        let client = client_for("http://kc:8080");
        let url = client.admin_url(&["demo", "roles", "ops team"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://kc:8080/admin/realms/demo/roles/ops%20team"
        );
    }

    #[test]
    fn test_admin_url_keeps_context_path() {
        let client = client_for("http://kc:8080/auth/");
        let url = client.admin_url(&["demo", "users"]).unwrap();
        assert_eq!(url.as_str(), "http://kc:8080/auth/admin/realms/demo/users");
    }
}
