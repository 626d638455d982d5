//! CLI error types and exit codes

use crate::logging::Console;
use std::time::Duration;
use thiserror::Error;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General error (configuration, local I/O)
/// - 2: Authentication failed
/// - 3: Network error or deadline exceeded
/// - 4: Validation, resolution, not-found or conflict
/// - 5: Server error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Connection failed: {0}\n\nTroubleshooting:\n  - Verify server_url in config.json\n  - Check that Keycloak is reachable from this host")]
    ConnectionFailed(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Resolution(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Command timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::AuthenticationFailed(_) => 2,
            CliError::Network(_) | CliError::ConnectionFailed(_) | CliError::Timeout(_) => 3,
            CliError::Validation(_)
            | CliError::Resolution(_)
            | CliError::NotFound(_)
            | CliError::Conflict(_) => 4,
            CliError::Api { status, .. } => {
                if *status >= 500 {
                    5
                } else if *status == 401 || *status == 403 {
                    2
                } else {
                    4
                }
            }
            CliError::Config(_) | CliError::Io(_) => 1,
        }
    }

    /// Whether the error came back from the remote side as "target absent"
    pub fn is_not_found(&self) -> bool {
        matches!(self, CliError::NotFound(_))
    }

    /// Whether the error came back from the remote side as "already present"
    pub fn is_conflict(&self) -> bool {
        matches!(self, CliError::Conflict(_))
    }

    /// Prefix the message with the item/realm the failure belongs to
    ///
    /// The variant is preserved so exit codes and skip policy still apply.
    pub fn context(self, prefix: impl std::fmt::Display) -> Self {
        match self {
            CliError::Api { status, message } => CliError::Api {
                status,
                message: format!("{prefix}: {message}"),
            },
            CliError::Network(m) => CliError::Network(format!("{prefix}: {m}")),
            CliError::NotFound(m) => CliError::NotFound(format!("{prefix}: {m}")),
            CliError::Conflict(m) => CliError::Conflict(format!("{prefix}: {m}")),
            CliError::Validation(m) => CliError::Validation(format!("{prefix}: {m}")),
            other => other,
        }
    }

    /// Print the error (and a hint, if any) through the mirrored console
    pub fn print(&self, console: &Console) {
        console.err_labeled("Error", "31", &self.to_string());
        if let Some(suggestion) = self.suggestion() {
            console.err("");
            console.err_labeled("Suggestion", "33", suggestion);
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::Resolution(_) => {
                Some("Pass --realm, use --all-realms, or set \"realm\" in config.json.")
            }
            CliError::NotFound(_) => Some("Re-run with --ignore-missing to skip absent items."),
            CliError::AuthenticationFailed(_) => {
                Some("Check client_id/client_secret or username/password in config.json.")
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CliError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            CliError::ConnectionFailed(e.to_string())
        } else if e.is_timeout() {
            CliError::Network("Request timed out".to_string())
        } else {
            CliError::Network(e.to_string())
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Config(format!("JSON error: {}", e))
    }
}

impl From<csv::Error> for CliError {
    fn from(e: csv::Error) -> Self {
        CliError::Io(format!("audit store: {}", e))
    }
}
