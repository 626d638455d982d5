//! Token endpoint models

use serde::{Deserialize, Serialize};

/// Response from the OpenID Connect token endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// JWT access token
    pub access_token: String,

    /// Token type (always "Bearer")
    #[serde(default)]
    pub token_type: Option<String>,

    /// Seconds until access token expires
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// OAuth error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthError {
    /// Error code
    pub error: String,

    /// Human-readable error description
    pub error_description: Option<String>,
}

impl OAuthError {
    /// Best available message for the operator
    pub fn message(&self) -> String {
        match &self.error_description {
            Some(desc) => format!("{} ({})", self.error, desc),
            None => self.error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_minimal() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token": "abc", "expires_in": 60}"#).unwrap();
        assert_eq!(token.access_token, "abc");
        assert_eq!(token.expires_in, Some(60));
    }

    #[test]
    fn test_oauth_error_message() {
        let err: OAuthError = serde_json::from_str(
            r#"{"error": "unauthorized_client", "error_description": "Invalid client secret"}"#,
        )
        .unwrap();
        assert_eq!(err.message(), "unauthorized_client (Invalid client secret)");
    }
}
