//! Integration tests for realm role batches

mod common;

use common::{col, TestContext};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_create_role_in_realm() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path(ctx.admin("demo/roles/admin")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path(ctx.admin("demo/roles")))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({"name": "admin", "description": "Administrators"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let code = ctx
        .run(&[
            "roles", "create", "--name", "admin", "--description", "Administrators", "--realm",
            "demo",
        ])
        .await;

    assert_eq!(code, 0);
    let log = ctx.log();
    assert!(log.contains("Created role \"admin\" in realm \"demo\"."));
    assert!(log.contains("Done. Created: 1, Skipped: 0."));
    assert!(log.contains("Current realm: demo"));

    let rows = ctx.audit_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][col::STATUS], "ok");
    assert_eq!(&rows[0][col::CHANGE_KIND], "roles_create");
    assert_eq!(&rows[0][col::TARGET_REALMS], "demo");
}

#[tokio::test]
async fn test_create_existing_role_is_skipped() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path(ctx.admin("demo/roles/admin")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "r-1",
            "name": "admin"
        })))
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path(ctx.admin("demo/roles")))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let code = ctx.run(&["roles", "create", "--name", "admin"]).await;

    assert_eq!(code, 0);
    assert_eq!(ctx.mutating_requests().await, 0);
    let log = ctx.log();
    assert!(log.contains("Role \"admin\" already exists in realm \"demo\". Skipped."));
    assert!(log.contains("Done. Created: 0, Skipped: 1."));
}

#[tokio::test]
async fn test_description_cardinality_rejected_before_any_request() {
    let ctx = TestContext::new().await;

    let code = ctx
        .run(&[
            "roles", "create", "--name", "a", "--name", "b", "--description", "1",
            "--description", "2", "--description", "3",
        ])
        .await;

    assert_eq!(code, 4);
    assert_eq!(ctx.request_count().await, 0);
    assert!(ctx.log().contains("ERROR: invalid --description"));

    let rows = ctx.audit_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][col::STATUS], "error");
    assert_eq!(&rows[0][col::TARGET_REALMS], "demo");
}

#[tokio::test]
async fn test_update_missing_role_with_ignore_missing() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path(ctx.admin("demo/roles/ghost")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&ctx.server)
        .await;

    let code = ctx
        .run(&[
            "roles", "update", "--name", "ghost", "--description", "x", "--ignore-missing",
        ])
        .await;

    assert_eq!(code, 0);
    assert_eq!(ctx.mutating_requests().await, 0);
    let log = ctx.log();
    assert!(log.contains("Role \"ghost\" not found in realm \"demo\". Skipped."));
    assert!(log.contains("Done. Updated: 0, Skipped: 1."));
}

#[tokio::test]
async fn test_delete_missing_role_aborts() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path(ctx.admin("demo/roles/ghost")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&ctx.server)
        .await;

    let code = ctx.run(&["roles", "delete", "--name", "ghost"]).await;

    assert_eq!(code, 4);
    assert_eq!(ctx.mutating_requests().await, 0);
    let log = ctx.log();
    assert!(log.contains("ERROR: role \"ghost\" not found in realm \"demo\""));
    assert!(log.contains("END: status=error"));

    let rows = ctx.audit_rows();
    assert_eq!(&rows[0][col::STATUS], "error");
    assert_eq!(&rows[0][col::CHANGE_KIND], "roles_delete");
}

#[tokio::test]
async fn test_update_renames_role() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path(ctx.admin("demo/roles/ops")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "r-2",
            "name": "ops",
            "description": "old"
        })))
        .mount(&ctx.server)
        .await;
    Mock::given(method("PUT"))
        .and(path(ctx.admin("demo/roles/ops")))
        .and(body_partial_json(json!({"name": "operators", "description": "old"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let code = ctx
        .run(&["roles", "update", "--name", "ops", "--new-name", "operators"])
        .await;

    assert_eq!(code, 0);
    assert!(ctx.log().contains("Updated role \"ops\" in realm \"demo\"."));
}

#[tokio::test]
async fn test_server_error_stops_batch_and_keeps_earlier_changes() {
    let ctx = TestContext::new().await;

    for name in ["first", "second", "third"] {
        Mock::given(method("GET"))
            .and(path(ctx.admin(&format!("demo/roles/{name}"))))
            .respond_with(ResponseTemplate::new(404))
            .mount(&ctx.server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path(ctx.admin("demo/roles")))
        .and(body_partial_json(json!({"name": "first"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path(ctx.admin("demo/roles")))
        .and(body_partial_json(json!({"name": "second"})))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path(ctx.admin("demo/roles")))
        .and(body_partial_json(json!({"name": "third"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let code = ctx
        .run(&["roles", "create", "--name", "first,second,third"])
        .await;

    assert_eq!(code, 5);
    let log = ctx.log();
    assert!(log.contains("Created role \"first\" in realm \"demo\"."));
    assert!(log.contains("Failed to create role \"second\" in realm \"demo\""));
    assert!(!log.contains("Done."));
    assert_eq!(&ctx.audit_rows()[0][col::STATUS], "error");
}

#[tokio::test]
async fn test_conflict_on_create_is_skipped() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path(ctx.admin("demo/roles/racy")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path(ctx.admin("demo/roles")))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "errorMessage": "Role with name racy already exists"
        })))
        .mount(&ctx.server)
        .await;

    let code = ctx.run(&["roles", "create", "--name", "racy"]).await;

    assert_eq!(code, 0);
    assert!(ctx.log().contains("Done. Created: 0, Skipped: 1."));
}

#[tokio::test]
async fn test_all_realms_lists_every_realm() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/admin/realms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "1", "realm": "master"},
            {"id": "2", "realm": "demo"}
        ])))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path(ctx.admin("master/roles")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "admin", "description": "Administrators"}
        ])))
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path(ctx.admin("demo/roles")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "viewer"},
            {"name": "editor"}
        ])))
        .mount(&ctx.server)
        .await;

    let code = ctx.run(&["--jira", "OPS-7", "roles", "list", "--all-realms"]).await;

    assert_eq!(code, 0);
    let log = ctx.log();
    assert!(log.contains("Jira Ticket: OPS-7 ::: Current realm: all realms"));
    assert!(log.contains("Roles in realm \"master\":"));
    assert!(log.contains("admin - Administrators"));
    assert!(log.contains("Total: 3"));

    let rows = ctx.audit_rows();
    assert_eq!(&rows[0][col::TARGET_REALMS], "all realms");
    assert_eq!(&rows[0][col::JIRA], "OPS-7");
    assert_eq!(&rows[0][col::CHANGE_KIND], "roles_list");
}

#[tokio::test]
async fn test_group_realm_beats_config_realm() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path(ctx.admin("staging/roles")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let code = ctx.run(&["roles", "--realm", "staging", "list"]).await;

    assert_eq!(code, 0);
    assert_eq!(&ctx.audit_rows()[0][col::TARGET_REALMS], "staging");
}

#[tokio::test]
async fn test_rename_collision_aborts() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path(ctx.admin("demo/roles/a")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "r-a", "name": "a"})))
        .mount(&ctx.server)
        .await;
    Mock::given(method("PUT"))
        .and(path(ctx.admin("demo/roles/a")))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "errorMessage": "Role with name b already exists"
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let code = ctx
        .run(&["roles", "update", "--name", "a", "--new-name", "b"])
        .await;

    assert_eq!(code, 4);
    let log = ctx.log();
    assert!(log.contains("Failed to update role \"a\" in realm \"demo\""));
    assert!(!log.contains("Skipped."));
    assert!(!log.contains("Done."));
    assert_eq!(&ctx.audit_rows()[0][col::STATUS], "error");
}

#[tokio::test]
async fn test_deadline_keeps_applied_changes() {
    let ctx = TestContext::new().await;

    for name in ["first", "second"] {
        Mock::given(method("GET"))
            .and(path(ctx.admin(&format!("demo/roles/{name}"))))
            .respond_with(ResponseTemplate::new(404))
            .mount(&ctx.server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path(ctx.admin("demo/roles")))
        .and(body_partial_json(json!({"name": "first"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path(ctx.admin("demo/roles")))
        .and(body_partial_json(json!({"name": "second"})))
        .respond_with(ResponseTemplate::new(201).set_delay(Duration::from_secs(5)))
        .mount(&ctx.server)
        .await;

    let code = ctx
        .run(&["--timeout-ms", "1000", "roles", "create", "--name", "first,second"])
        .await;

    assert_eq!(code, 3);
    let log = ctx.log();
    assert!(log.contains("| Current realm: demo "));
    assert!(log.contains("| Created role \"first\" in realm \"demo\". "));
    assert!(!log.contains("Done."));
    assert_eq!(log.matches("] ERROR: ").count(), 1);
    assert!(log.contains("] ERROR: Command timed out after 1s"));
    assert!(log.contains("END: status=error"));

    let rows = ctx.audit_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][col::STATUS], "error");
}
