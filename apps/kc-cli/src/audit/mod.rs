//! Audit trail
//!
//! One CSV row per top-level invocation, appended to `kc_audit.csv` (or
//! `--audit-file`). The header is written when the file is first created.

use crate::config::{Config, GrantType};
use crate::error::CliResult;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Terminal status of an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Ok,
    Error,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Ok => "ok",
            AuditStatus::Error => "error",
        }
    }
}

/// Who performed the change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub kind: &'static str,
    pub id: String,
}

impl Actor {
    /// Password grant with a username → user; else configured client → client
    pub fn from_config(config: &Config) -> Self {
        match (config.grant_type(), config.username.as_deref(), config.client_id.as_deref()) {
            (GrantType::Password, Some(username), _) => Self {
                kind: "user",
                id: username.to_string(),
            },
            (_, _, Some(client_id)) => Self {
                kind: "client",
                id: client_id.to_string(),
            },
            _ => Self {
                kind: "unknown",
                id: String::new(),
            },
        }
    }
}

/// One row of the audit file
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub timestamp: String,
    pub status: AuditStatus,
    pub command_path: String,
    pub raw_command: String,
    pub jira: String,
    pub actor_type: String,
    pub actor_id: String,
    pub auth_realm: String,
    pub change_kind: String,
    pub target_realms: String,
    pub duration: String,
    pub details: String,
}

impl AuditEntry {
    /// Build an entry for a finished invocation
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        finished_at: DateTime<Utc>,
        status: AuditStatus,
        command_path: &str,
        raw_command: &str,
        jira: Option<&str>,
        actor: &Actor,
        auth_realm: &str,
        target_realms: &str,
        duration: Duration,
        details: &[String],
    ) -> Self {
        Self {
            timestamp: finished_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            status,
            command_path: command_path.to_string(),
            raw_command: raw_command.to_string(),
            jira: jira.unwrap_or_default().to_string(),
            actor_type: actor.kind.to_string(),
            actor_id: actor.id.clone(),
            auth_realm: auth_realm.to_string(),
            change_kind: change_kind(command_path),
            target_realms: target_realms.to_string(),
            duration: format_duration(duration),
            details: details.join("; "),
        }
    }
}

/// Appends entries to the audit file
#[derive(Debug, Clone)]
pub struct AuditRecorder {
    path: PathBuf,
}

impl AuditRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, creating the file with a header row if needed
    pub fn append(&self, entry: &AuditEntry) -> CliResult<()> {
        let needs_header = std::fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(entry)?;
        writer.flush()?;

        tracing::debug!(path = %self.path.display(), status = entry.status.as_str(), "audit entry appended");
        Ok(())
    }
}

/// Classification tag for a command path
///
/// Unknown paths are recorded as given.
pub fn change_kind(command_path: &str) -> String {
    let kind = match command_path {
        "kc realms list" => "realms_list",
        "kc roles create" => "roles_create",
        "kc roles update" => "roles_update",
        "kc roles delete" => "roles_delete",
        "kc roles list" => "roles_list",
        "kc users create" => "users_create",
        "kc users update" => "users_update",
        "kc users delete" => "users_delete",
        "kc users list" => "users_list",
        "kc clients create" => "clients_create",
        "kc clients update" => "clients_update",
        "kc clients delete" => "clients_delete",
        "kc clients list" => "clients_list",
        "kc clients scopes assign" => "clients_scopes_assign",
        "kc clients scopes remove" => "clients_scopes_remove",
        "kc client-roles create" => "client_roles_create",
        "kc client-roles update" => "client_roles_update",
        "kc client-roles delete" => "client_roles_delete",
        "kc client-roles list" => "client_roles_list",
        "kc client-scopes create" => "client_scopes_create",
        "kc client-scopes update" => "client_scopes_update",
        "kc client-scopes delete" => "client_scopes_delete",
        "kc client-scopes list" => "client_scopes_list",
        other => other,
    };
    kind.to_string()
}

/// Duration as seconds with millisecond precision, e.g. `1.234s`
pub fn format_duration(duration: Duration) -> String {
    format!("{:.3}s", duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(json: &str) -> Config {
        Config::from_json(json).unwrap()
    }

    #[test]
    fn test_actor_password_grant_user() {
        let actor = Actor::from_config(&config(
            r#"{"server_url": "http://kc", "grant_type": "password", "username": "root", "client_id": "ops"}"#,
        ));
        assert_eq!(actor.kind, "user");
        assert_eq!(actor.id, "root");
    }

    #[test]
    fn test_actor_client() {
        let actor = Actor::from_config(&config(
            r#"{"server_url": "http://kc", "client_id": "ops", "username": "root"}"#,
        ));
        assert_eq!(actor.kind, "client");
        assert_eq!(actor.id, "ops");
    }

    #[test]
    fn test_actor_unknown() {
        let actor = Actor::from_config(&config(r#"{"server_url": "http://kc"}"#));
        assert_eq!(actor.kind, "unknown");
        assert_eq!(actor.id, "");
    }

    #[test]
    fn test_change_kind_mapping() {
        assert_eq!(change_kind("kc roles create"), "roles_create");
        assert_eq!(change_kind("kc client-scopes list"), "client_scopes_list");
        assert_eq!(change_kind("kc clients scopes assign"), "clients_scopes_assign");
        assert_eq!(change_kind("kc something else"), "kc something else");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(1234)), "1.234s");
        assert_eq!(format_duration(Duration::ZERO), "0.000s");
    }
}
