use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::store::MemoryStore;
use crate::test_support::{send, test_app, ADMIN_TOKEN, ALICE_TOKEN, BOB_TOKEN, NO_EMAIL_TOKEN};

fn candidate_values() -> Value {
    json!({
        "candidateName": "Alice",
        "candidatePhone": "+1 555 0100",
        "primarySkillSet": "Rust, SQL",
        "candidateLocation": "Lisbon",
        "preferredJobLocation": "Remote",
        "experience": "7"
    })
}

async fn app_with_form() -> axum::Router {
    let app = test_app(Arc::new(MemoryStore::new()));
    let (status, _) = send(
        &app,
        "POST",
        "/forms",
        Some(ADMIN_TOKEN),
        Some(json!({"id": "123", "title": "Backend Engineer"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    app
}

async fn submit(app: &axum::Router, token: &str, static_values: Value) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/forms/123/submissions",
        Some(token),
        Some(json!({"staticValues": static_values, "extraValues": {}})),
    )
    .await
}

#[tokio::test]
async fn test_health_is_public() {
    let app = test_app(Arc::new(MemoryStore::new()));
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = test_app(Arc::new(MemoryStore::new()));
    let (status, body) = send(&app, "GET", "/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Route GET /nope not found");
}

#[tokio::test]
async fn test_authentication_states() {
    let app = test_app(Arc::new(MemoryStore::new()));

    let (status, body) = send(&app, "GET", "/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, "GET", "/me", Some("forged"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, "GET", "/me", Some(NO_EMAIL_TOKEN), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("No email"));

    let (status, body) = send(&app, "GET", "/me", Some(ALICE_TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isAdmin"], false);

    let (_, body) = send(&app, "GET", "/me", Some(ADMIN_TOKEN), None).await;
    assert_eq!(body["isAdmin"], true);
}

#[tokio::test]
async fn test_get_missing_form_returns_placeholder() {
    let app = test_app(Arc::new(MemoryStore::new()));
    let (status, body) = send(&app, "GET", "/forms/abc", Some(ALICE_TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": "abc",
            "title": "Candidate Application Form",
            "permanentFields": [],
            "extraFields": []
        })
    );
}

#[tokio::test]
async fn test_admin_only_mutations() {
    let app = test_app(Arc::new(MemoryStore::new()));
    let (status, body) = send(
        &app,
        "POST",
        "/forms",
        Some(ALICE_TOKEN),
        Some(json!({"title": "Mine"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let (status, _) = send(
        &app,
        "PUT",
        "/forms/123/fields",
        Some(BOB_TOKEN),
        Some(json!({"extraFields": []})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_replace_fields_then_render_and_submit() {
    let app = app_with_form().await;

    let (status, body) = send(
        &app,
        "PUT",
        "/forms/123/fields",
        Some(ADMIN_TOKEN),
        Some(json!({"extraFields": [
            {"id": "notice", "label": " Notice period (days) ", "type": "number", "required": true, "order": 0},
            {"id": "legacy", "label": "Legacy", "type": "text", "required": true, "active": false, "order": 1}
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["extraFields"][0]["label"], "Notice period (days)");

    let (_, template) = send(&app, "GET", "/forms/123", Some(ALICE_TOKEN), None).await;
    assert_eq!(template["title"], "Backend Engineer");
    assert_eq!(template["extraFields"].as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        "POST",
        "/forms/123/submissions",
        Some(ALICE_TOKEN),
        Some(json!({"staticValues": candidate_values(), "extraValues": {"notice": "abc"}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["details"],
        json!(["Notice period (days) must be a valid number"])
    );

    let (status, body) = send(
        &app,
        "POST",
        "/forms/123/submissions",
        Some(ALICE_TOKEN),
        Some(json!({
            "staticValues": candidate_values(),
            "extraValues": {"notice": 30, "legacy": "ignored"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["extraValues"], json!({"notice": 30}));
    assert_eq!(body["staticValues"]["experience"].to_string(), "7");
}

#[tokio::test]
async fn test_duplicate_extra_field_ids_rejected() {
    let app = app_with_form().await;
    let (status, body) = send(
        &app,
        "PUT",
        "/forms/123/fields",
        Some(ADMIN_TOKEN),
        Some(json!({"extraFields": [
            {"id": "x", "label": "One", "type": "text"},
            {"id": "x", "label": "Two", "type": "text"}
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"], json!(["Extra field IDs must be unique"]));

    let (_, template) = send(&app, "GET", "/forms/123", Some(ALICE_TOKEN), None).await;
    assert_eq!(template["extraFields"], json!([]));
}

#[tokio::test]
async fn test_submission_email_comes_from_token() {
    let app = app_with_form().await;
    let mut values = candidate_values();
    values["candidateEmail"] = json!("mallory@example.com");

    let (status, body) = submit(&app, ALICE_TOKEN, values).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["staticValues"]["candidateEmail"], "alice@example.com");
    assert_eq!(body["userEmail"], "alice@example.com");
    assert_eq!(body["userId"], "alice-uid");
}

#[tokio::test]
async fn test_missing_required_static_fields_itemized() {
    let app = app_with_form().await;
    let (status, body) = submit(
        &app,
        ALICE_TOKEN,
        json!({"candidateName": "A", "candidatePhone": "1", "experience": "5"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Static values validation failed");
    assert_eq!(
        body["error"]["details"],
        json!([
            "primarySkillSet is required",
            "candidateLocation is required",
            "preferredJobLocation is required"
        ])
    );
}

#[tokio::test]
async fn test_submission_to_unknown_form() {
    let app = test_app(Arc::new(MemoryStore::new()));
    let (status, _) = submit(&app, ALICE_TOKEN, candidate_values()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listings_and_detail() {
    let app = app_with_form().await;
    let (_, first) = submit(&app, ALICE_TOKEN, candidate_values()).await;
    let (_, _) = submit(&app, BOB_TOKEN, candidate_values()).await;

    let (status, mine) = send(&app, "GET", "/my-submissions", Some(ALICE_TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["total"], 1);
    assert_eq!(mine["submissions"][0]["id"], first["id"]);

    let (status, _) = send(
        &app,
        "GET",
        "/admin/forms/123/submissions",
        Some(ALICE_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, all) = send(
        &app,
        "GET",
        "/admin/forms/123/submissions",
        Some(ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["formId"], "123");
    assert_eq!(all["total"], 2);

    let (status, _) = send(
        &app,
        "GET",
        "/admin/forms/missing/submissions",
        Some(ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/admin/submissions/{}", first["id"].as_str().unwrap());
    let (status, detail) = send(&app, "GET", &uri, Some(ADMIN_TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["userEmail"], "alice@example.com");

    let (status, _) = send(&app, "GET", "/admin/submissions/nope", Some(ADMIN_TOKEN), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_owner_admin_and_stranger() {
    let app = app_with_form().await;
    let (_, a) = submit(&app, ALICE_TOKEN, candidate_values()).await;
    let (_, b) = submit(&app, ALICE_TOKEN, candidate_values()).await;
    let uri_a = format!("/submissions/{}", a["id"].as_str().unwrap());
    let uri_b = format!("/submissions/{}", b["id"].as_str().unwrap());

    let (status, _) = send(&app, "DELETE", &uri_a, Some(BOB_TOKEN), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "DELETE", &uri_a, Some(ALICE_TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Submission deleted successfully");

    let (status, _) = send(&app, "DELETE", &uri_b, Some(ADMIN_TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "DELETE", &uri_a, Some(ALICE_TOKEN), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_backfill_permanent_fields_endpoint() {
    let app = app_with_form().await;
    let (status, body) = send(
        &app,
        "POST",
        "/admin/forms/123/permanent-fields",
        Some(ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["permanentFields"][0]["key"], "candidateName");
    assert_eq!(body["permanentFields"][0]["locked"], true);

    let (status, _) = send(
        &app,
        "POST",
        "/admin/forms/123/permanent-fields",
        Some(ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
