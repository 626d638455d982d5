//! Shared fixtures for integration tests
//!
//! A wiremock server stands in for Keycloak; config, log and audit files live
//! in a temporary directory.

#![allow(dead_code)]

use clap::Parser;
use kc_cli::cli::{run, Cli};
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/realms/master/protocol/openid-connect/token";

pub struct TestContext {
    pub server: MockServer,
    pub dir: TempDir,
}

impl TestContext {
    /// Mock server with a working client-credentials token endpoint
    pub async fn new() -> Self {
        let ctx = Self::without_token().await;
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "test-token",
                "token_type": "Bearer",
                "expires_in": 300
            })))
            .mount(&ctx.server)
            .await;
        ctx
    }

    /// Mock server with nothing mounted
    pub async fn without_token() -> Self {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let config = json!({
            "server_url": server.uri(),
            "client_id": "kc-batch",
            "client_secret": "s3cret",
            "realm": "demo"
        });
        std::fs::write(dir.path().join("config.json"), config.to_string()).unwrap();
        Self { server, dir }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.path().join("kc.log")
    }

    pub fn audit_path(&self) -> PathBuf {
        self.dir.path().join("kc_audit.csv")
    }

    /// Admin API path, e.g. `admin("demo/roles")`
    pub fn admin(&self, rest: &str) -> String {
        format!("/admin/realms/{rest}")
    }

    /// Run `kc` with the fixture's config, log and audit files
    pub async fn run(&self, args: &[&str]) -> i32 {
        let config = self.config_path().display().to_string();
        let log = self.log_path().display().to_string();
        let audit = self.audit_path().display().to_string();

        let mut argv = vec![
            "kc".to_string(),
            "--config".to_string(),
            config,
            "--log-file".to_string(),
            log,
            "--audit-file".to_string(),
            audit,
        ];
        argv.extend(args.iter().map(|a| a.to_string()));

        let cli = Cli::try_parse_from(&argv).unwrap();
        run(cli, &argv[1..]).await
    }

    pub fn log(&self) -> String {
        std::fs::read_to_string(self.log_path()).unwrap_or_default()
    }

    /// Audit rows (header excluded)
    pub fn audit_rows(&self) -> Vec<csv::StringRecord> {
        let mut reader = csv::Reader::from_path(self.audit_path()).unwrap();
        reader.records().map(|r| r.unwrap()).collect()
    }

    pub async fn request_count(&self) -> usize {
        self.server.received_requests().await.unwrap_or_default().len()
    }

    /// Requests other than GET and token calls
    pub async fn mutating_requests(&self) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() != TOKEN_PATH && r.method.as_str() != "GET")
            .count()
    }
}

/// Audit column indexes
pub mod col {
    pub const STATUS: usize = 1;
    pub const COMMAND_PATH: usize = 2;
    pub const RAW_COMMAND: usize = 3;
    pub const JIRA: usize = 4;
    pub const ACTOR_TYPE: usize = 5;
    pub const ACTOR_ID: usize = 6;
    pub const AUTH_REALM: usize = 7;
    pub const CHANGE_KIND: usize = 8;
    pub const TARGET_REALMS: usize = 9;
    pub const DURATION: usize = 10;
    pub const DETAILS: usize = 11;
}
