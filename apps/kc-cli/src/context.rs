//! Per-invocation state
//!
//! Built once in the entry point and passed down to command handlers; there
//! is no process-wide flag state.

use crate::api::ApiClient;
use crate::audit::{format_duration, Actor, AuditEntry, AuditRecorder, AuditStatus};
use crate::batch::{resolve_realms, BatchReport, RealmDefaults, RealmSelection, TargetRealms};
use crate::config::Config;
use crate::error::CliResult;
use crate::logging::Console;
use crate::output::{render_box, BoxHeader};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;

/// Top-level flags that apply to every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Global default realm
    pub realm: Option<String>,
    /// Ticket reference for the header and audit record
    pub jira: Option<String>,
}

/// One run of the CLI
pub struct Invocation {
    api: Arc<ApiClient>,
    global: GlobalOptions,
    console: Console,
    command_path: String,
    raw_command: String,
    started: Instant,
    target_label: Option<String>,
}

impl Invocation {
    pub fn new(
        config: Config,
        global: GlobalOptions,
        console: Console,
        command_path: impl Into<String>,
        raw_command: impl Into<String>,
    ) -> CliResult<Self> {
        Ok(Self {
            api: Arc::new(ApiClient::new(config)?),
            global,
            console,
            command_path: command_path.into(),
            raw_command: raw_command.into(),
            started: Instant::now(),
            target_label: None,
        })
    }

    /// Shared handle to the admin API client
    pub fn api(&self) -> Arc<ApiClient> {
        Arc::clone(&self.api)
    }

    pub fn config(&self) -> &Config {
        self.api.config()
    }

    /// Write the START marker
    pub fn begin(&self) {
        self.console.start(&self.raw_command);
    }

    /// Resolve target realms and remember the label for header and audit
    pub async fn resolve(
        &mut self,
        selection: &RealmSelection,
        command_realm: Option<&str>,
    ) -> CliResult<TargetRealms> {
        let defaults = RealmDefaults {
            command: command_realm.map(String::from),
            global: self.global.realm.clone(),
            config: self.config().realm.clone(),
        };
        let target = resolve_realms(selection, &defaults, self.api.as_ref()).await?;
        tracing::debug!(realms = ?target.realms, "resolved target realms");
        self.target_label = Some(target.label.clone());
        Ok(target)
    }

    /// Realm label for header and audit; falls back when resolution never ran
    pub fn target_label(&self) -> String {
        self.target_label
            .clone()
            .or_else(|| self.global.realm.clone())
            .or_else(|| self.config().realm.clone())
            .unwrap_or_default()
    }

    /// Print the summary box for whatever the command produced
    pub fn render(&self, report: &BatchReport) {
        let label = self.target_label();
        let header = BoxHeader {
            jira: self.global.jira.as_deref(),
            realm: Some(label.as_str()),
        };
        for line in render_box(report.lines(), header) {
            self.console.out(&line);
        }
    }

    /// Close out the run: error output, END marker and the audit entry
    ///
    /// Returns the process exit code. The log file is released when `self`
    /// is dropped at the end of this call.
    pub fn finish(
        self,
        result: CliResult<()>,
        report: &BatchReport,
        recorder: &AuditRecorder,
    ) -> i32 {
        let duration = self.started.elapsed();
        let (status, code) = match &result {
            Ok(()) => (AuditStatus::Ok, 0),
            Err(e) => {
                e.print(&self.console);
                self.console.error(&e.to_string());
                (AuditStatus::Error, e.exit_code())
            }
        };
        self.console.end(status.as_str(), &format_duration(duration));

        let entry = self.audit_entry(Utc::now(), status, report);
        if let Err(e) = recorder.append(&entry) {
            self.console.warn(&format!(
                "could not write audit entry to {}: {e}",
                recorder.path().display()
            ));
        }
        code
    }

    fn audit_entry(
        &self,
        finished_at: DateTime<Utc>,
        status: AuditStatus,
        report: &BatchReport,
    ) -> AuditEntry {
        let details = if report.details().is_empty() {
            Vec::new()
        } else {
            vec![format!("passwords: {}", report.details().join(", "))]
        };
        AuditEntry::new(
            finished_at,
            status,
            &self.command_path,
            &self.raw_command,
            self.global.jira.as_deref(),
            &Actor::from_config(self.config()),
            self.config().auth_realm(),
            &self.target_label(),
            self.started.elapsed(),
            &details,
        )
    }
}

/// Rebuild the invocation as typed, e.g. `./kc roles create --name admin`
pub fn raw_command<S: AsRef<str>>(args: &[S]) -> String {
    let mut raw = String::from("./kc");
    for arg in args {
        raw.push(' ');
        raw.push_str(arg.as_ref());
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(global: GlobalOptions, config_realm: Option<&str>) -> Invocation {
        let mut config = Config::from_json(r#"{"server_url": "http://kc"}"#).unwrap();
        config.realm = config_realm.map(String::from);
        Invocation::new(
            config,
            global,
            Console::terminal_only().silent(),
            "kc roles create",
            "./kc roles create --name admin",
        )
        .unwrap()
    }

    #[test]
    fn test_raw_command() {
        assert_eq!(
            raw_command(&["roles", "create", "--name", "admin"]),
            "./kc roles create --name admin"
        );
        assert_eq!(raw_command::<&str>(&[]), "./kc");
    }

    #[test]
    fn test_target_label_fallbacks() {
        let inv = invocation(GlobalOptions::default(), Some("cfg"));
        assert_eq!(inv.target_label(), "cfg");

        let inv = invocation(
            GlobalOptions {
                realm: Some("global".to_string()),
                jira: None,
            },
            Some("cfg"),
        );
        assert_eq!(inv.target_label(), "global");

        let inv = invocation(GlobalOptions::default(), None);
        assert_eq!(inv.target_label(), "");
    }

    #[tokio::test]
    async fn test_resolve_records_label() {
        let mut inv = invocation(GlobalOptions::default(), Some("cfg"));
        let target = inv
            .resolve(&RealmSelection::realms(&["a", "b"]), Some("cmd"))
            .await
            .unwrap();
        assert_eq!(target.realms, vec!["a", "b"]);
        assert_eq!(inv.target_label(), "a,b");
    }

    #[test]
    fn test_details_formatting() {
        let inv = invocation(GlobalOptions::default(), Some("demo"));
        let mut report = BatchReport::new();
        report.push_detail("bob=Xy1!abcd@demo");
        report.push_detail("amy=Zz9?qwer@demo");
        let entry = inv.audit_entry(Utc::now(), AuditStatus::Ok, &report);
        assert_eq!(entry.details, "passwords: bob=Xy1!abcd@demo, amy=Zz9?qwer@demo");
        assert_eq!(entry.change_kind, "roles_create");
        assert_eq!(entry.target_realms, "demo");
        assert_eq!(entry.actor_type, "unknown");
    }
}
