//! Integration tests for the audit trail, execution log and configuration

mod common;

use common::{col, TestContext, TOKEN_PATH};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mount_realms(ctx: &TestContext) {
    Mock::given(method("GET"))
        .and(path("/admin/realms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "1", "realm": "master"},
            {"id": "2", "realm": "demo"}
        ])))
        .mount(&ctx.server)
        .await;
}

#[tokio::test]
async fn test_realms_list_writes_log_and_audit() {
    let ctx = TestContext::new().await;
    mount_realms(&ctx).await;

    let code = ctx.run(&["--jira", "OPS-1", "realms", "list"]).await;

    assert_eq!(code, 0);
    let log = ctx.log();
    let lines: Vec<&str> = log.lines().collect();
    assert!(lines[0].starts_with('['));
    assert!(lines[0].contains("] START: ./kc "));
    assert!(log.contains("| master "));
    assert!(log.contains("Total: 2"));
    assert!(log.contains("END: status=ok dur="));

    let rows = ctx.audit_rows();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(&row[col::STATUS], "ok");
    assert_eq!(&row[col::COMMAND_PATH], "kc realms list");
    assert!(row[col::RAW_COMMAND].starts_with("./kc "));
    assert!(row[col::RAW_COMMAND].ends_with("--jira OPS-1 realms list"));
    assert_eq!(&row[col::JIRA], "OPS-1");
    assert_eq!(&row[col::ACTOR_TYPE], "client");
    assert_eq!(&row[col::ACTOR_ID], "kc-batch");
    assert_eq!(&row[col::AUTH_REALM], "master");
    assert_eq!(&row[col::CHANGE_KIND], "realms_list");
    assert_eq!(&row[col::TARGET_REALMS], "demo");
    assert!(row[col::DURATION].ends_with('s'));
    assert_eq!(&row[col::DETAILS], "");
}

#[tokio::test]
async fn test_audit_header_written_once() {
    let ctx = TestContext::new().await;
    mount_realms(&ctx).await;

    assert_eq!(ctx.run(&["realms", "list"]).await, 0);
    assert_eq!(ctx.run(&["realms", "list"]).await, 0);

    let content = std::fs::read_to_string(ctx.audit_path()).unwrap();
    assert_eq!(content.matches("timestamp,status").count(), 1);
    assert_eq!(ctx.audit_rows().len(), 2);

    let log = ctx.log();
    assert_eq!(log.matches("START: ").count(), 2);
    assert_eq!(log.matches("END: status=ok").count(), 2);
}

#[tokio::test]
async fn test_missing_config_exits_without_audit() {
    let ctx = TestContext::new().await;
    std::fs::remove_file(ctx.config_path()).unwrap();

    let code = ctx.run(&["realms", "list"]).await;

    assert_eq!(code, 1);
    assert_eq!(ctx.request_count().await, 0);
    assert!(!ctx.audit_path().exists());
}

#[tokio::test]
async fn test_config_without_server_url_exits() {
    let ctx = TestContext::new().await;
    std::fs::write(ctx.config_path(), r#"{"realm": "demo"}"#).unwrap();

    let code = ctx.run(&["realms", "list"]).await;

    assert_eq!(code, 1);
    assert!(!ctx.audit_path().exists());
}

#[tokio::test]
async fn test_rejected_credentials() {
    let ctx = TestContext::without_token().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "unauthorized_client",
            "error_description": "Invalid client secret"
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let code = ctx.run(&["realms", "list"]).await;

    assert_eq!(code, 2);
    let log = ctx.log();
    assert!(log.contains("Authentication failed: unauthorized_client (Invalid client secret)"));
    assert!(log.contains("END: status=error"));
    assert_eq!(&ctx.audit_rows()[0][col::STATUS], "error");
}

#[tokio::test]
async fn test_password_grant_actor() {
    let ctx = TestContext::without_token().await;
    let config = json!({
        "server_url": ctx.server.uri(),
        "grant_type": "password",
        "username": "ops-admin",
        "password": "pw",
        "realm": "demo"
    });
    std::fs::write(ctx.config_path(), config.to_string()).unwrap();

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("username=ops-admin"))
        .and(body_string_contains("client_id=admin-cli"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "user-token"
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;
    mount_realms(&ctx).await;

    let code = ctx.run(&["realms", "list"]).await;

    assert_eq!(code, 0);
    let row = &ctx.audit_rows()[0];
    assert_eq!(&row[col::ACTOR_TYPE], "user");
    assert_eq!(&row[col::ACTOR_ID], "ops-admin");
}

#[tokio::test]
async fn test_unresolvable_realm() {
    let ctx = TestContext::new().await;
    let config = json!({
        "server_url": ctx.server.uri(),
        "client_id": "kc-batch",
        "client_secret": "s3cret"
    });
    std::fs::write(ctx.config_path(), config.to_string()).unwrap();

    let code = ctx.run(&["roles", "create", "--name", "admin"]).await;

    assert_eq!(code, 4);
    assert_eq!(ctx.request_count().await, 0);
    assert!(ctx.log().contains("target realm not specified"));
    assert_eq!(&ctx.audit_rows()[0][col::TARGET_REALMS], "");
}

#[tokio::test]
async fn test_token_fetched_once_per_invocation() {
    let ctx = TestContext::without_token().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "once"
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;
    for name in ["a", "b", "c"] {
        Mock::given(method("GET"))
            .and(path(ctx.admin(&format!("demo/roles/{name}"))))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": name})))
            .mount(&ctx.server)
            .await;
    }

    let code = ctx.run(&["roles", "create", "--name", "a,b,c"]).await;

    assert_eq!(code, 0);
    assert!(ctx.log().contains("Done. Created: 0, Skipped: 3."));
}
