//! Scripted sessions against a mock REST backend.

use std::io;
use std::sync::Arc;

use ci_core::config::AppConfig;
use ci_core::ports::AuthSessionPort;
use ci_core::wizard::{AuthGate, RegisterStage, WizardStep};
use consult_intake::bootstrap::{wire_dependencies, JsonLinesEventPort};
use consult_intake::script::{parse_script, run_script};
use mockito::{Matcher, Server};
use serde_json::json;
use tempfile::TempDir;

fn config_for(server: &Server, snapshot_dir: Option<&TempDir>) -> AppConfig {
    let mut config = AppConfig::default();
    config.api.base_url = format!("{}/api", server.url());
    config.api.timeout_secs = 5;
    config.storage.snapshot_dir = snapshot_dir.map(|dir| dir.path().to_path_buf());
    config
}

const PROJECT: &str = r#"{"op": "project", "projectName": "Shop", "projectType": "web-app",
    "description": "An online shop for a bakery with ordering, delivery slots and payments.",
    "timeline": "1-month", "budget": "5k-15k"}"#;

#[tokio::test]
async fn new_client_registers_and_submits() {
    let mut server = Server::new_async().await;
    let check = server
        .mock("POST", "/api/consultation/check-email")
        .match_body(Matcher::Json(json!({ "email": "new@x.com" })))
        .with_body(r#"{"exists":false}"#)
        .expect(1)
        .create_async()
        .await;
    let register = server
        .mock("POST", "/api/auth/register")
        .match_body(Matcher::Json(json!({
            "email": "new@x.com",
            "name": "Ada Lovelace",
            "password": "correct horse"
        })))
        .with_header("set-cookie", "token=abc; Path=/")
        .with_body(r#"{"success":true}"#)
        .expect(1)
        .create_async()
        .await;
    let upload = server
        .mock("POST", "/api/file/upload")
        .with_body(r#"{"success":true,"url":"https://cdn.test/brief.txt","publicId":"brief"}"#)
        .expect(1)
        .create_async()
        .await;
    let submit = server
        .mock("POST", "/api/consultation/create-consultation")
        .match_header("cookie", Matcher::Regex("token=abc".into()))
        .match_body(Matcher::PartialJson(json!({
            "email": "new@x.com",
            "projectName": "Shop",
            "attachments": [{
                "name": "brief.txt",
                "size": 17,
                "url": "https://cdn.test/brief.txt",
                "publicId": "brief"
            }]
        })))
        .with_status(201)
        .with_body(r#"{"success":true,"consultationId":"cons-7"}"#)
        .expect(1)
        .create_async()
        .await;

    let files = TempDir::new().unwrap();
    let brief = files.path().join("brief.txt");
    std::fs::write(&brief, "Bakery shop brief").unwrap();

    let script = format!(
        r#"[
            {{"op": "open"}},
            {{"op": "contact", "email": "new@x.com"}},
            {PROJECT},
            {{"op": "next"}},
            {{"op": "full_name", "name": "Ada Lovelace"}},
            {{"op": "password", "password": "correct horse"}},
            {{"op": "confirm_password", "password": "correct horse"}},
            {{"op": "features", "features": ["Catalog", "Checkout"], "priority": "high"}},
            {{"op": "next"}},
            {{"op": "attach", "paths": [{brief:?}]}},
            {{"op": "wait_uploads"}},
            {{"op": "next"}},
            {{"op": "next"}},
            {{"op": "payment", "method": "invoice", "termsAccepted": true}},
            {{"op": "next"}}
        ]"#
    );

    let runtime = wire_dependencies(
        &config_for(&server, None),
        Arc::new(JsonLinesEventPort::new(io::sink())),
    )
    .unwrap();
    let state = run_script(
        &runtime.orchestrator,
        runtime.auth.as_ref(),
        parse_script(&script).unwrap(),
    )
    .await
    .unwrap();

    assert!(state.completed);
    assert_eq!(state.step, WizardStep::Payment);
    assert_eq!(
        runtime.auth.current_user().await.map(|user| user.email),
        Some("new@x.com".to_string())
    );
    check.assert_async().await;
    register.assert_async().await;
    upload.assert_async().await;
    submit.assert_async().await;
}

#[tokio::test]
async fn existing_client_resumes_from_parked_snapshot() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/consultation/check-email")
        .with_body(r#"{"exists":true}"#)
        .expect(1)
        .create_async()
        .await;
    let snapshots = TempDir::new().unwrap();

    // First run: the email belongs to an account, so the wizard parks its data
    // and waits for a login.
    let first = wire_dependencies(
        &config_for(&server, Some(&snapshots)),
        Arc::new(JsonLinesEventPort::new(io::sink())),
    )
    .unwrap();
    let script = format!(
        r#"[{{"op": "open"}}, {{"op": "contact", "email": "Known@Shop.test"}}, {PROJECT}, {{"op": "next"}}]"#
    );
    let state = run_script(
        &first.orchestrator,
        first.auth.as_ref(),
        parse_script(&script).unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(
        state.gate,
        AuthGate::LoginPrompt {
            email: "known@shop.test".into()
        }
    );
    assert!(snapshots
        .path()
        .join("sessionData_known@shop.test.json")
        .exists());

    // Second run: signed in, opening the wizard restores straight to files.
    let second = wire_dependencies(
        &config_for(&server, Some(&snapshots)),
        Arc::new(JsonLinesEventPort::new(io::sink())),
    )
    .unwrap();
    let script = r#"[{"op": "signed_in", "email": "known@shop.test"}, {"op": "open"}]"#;
    let state = run_script(
        &second.orchestrator,
        second.auth.as_ref(),
        parse_script(script).unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(state.step, WizardStep::Files);
    assert_eq!(state.draft.project.project_name, "Shop");
    assert!(!snapshots
        .path()
        .join("sessionData_known@shop.test.json")
        .exists());
}

#[tokio::test]
async fn short_password_stays_on_password_stage() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/consultation/check-email")
        .with_body(r#"{"exists":false}"#)
        .create_async()
        .await;
    let register = server
        .mock("POST", "/api/auth/register")
        .expect(0)
        .create_async()
        .await;

    let runtime = wire_dependencies(
        &config_for(&server, None),
        Arc::new(JsonLinesEventPort::new(io::sink())),
    )
    .unwrap();
    let script = format!(
        r#"[{{"op": "open"}}, {{"op": "contact", "email": "new@x.com"}}, {PROJECT},
            {{"op": "next"}}, {{"op": "full_name", "name": "Ada"}},
            {{"op": "password", "password": "short"}}]"#
    );
    let state = run_script(
        &runtime.orchestrator,
        runtime.auth.as_ref(),
        parse_script(&script).unwrap(),
    )
    .await
    .unwrap();

    assert!(matches!(
        state.gate,
        AuthGate::Register {
            stage: RegisterStage::Password,
            ..
        }
    ));
    assert!(!state.field_errors.is_empty());
    register.assert_async().await;
}
