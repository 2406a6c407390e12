//! KYC session HTTP Handler Tests

use super::{build_test_router, get_json, post_form, post_json, TestAppState};
use axum::http::StatusCode;
use kyc_gateway::api::{DocumentCreatedResponse, SessionCreatedResponse, SessionSummaryResponse};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

async fn create_session(app: &axum::Router) -> String {
    let (status, body): (StatusCode, Option<SessionCreatedResponse>) = post_json(
        app,
        "/v1/kyc/sessions",
        &json!({
            "kycPurpose": "ACCOUNT_OPENING",
            "jurisdiction": "IN",
            "customer": {"name": "Test User", "mobile": "9999999999"}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body.unwrap().session_id
}

// ============================================================================
// Session Tests
// ============================================================================

#[tokio::test]
async fn test_create_session_returns_201() {
    let app = build_test_router(TestAppState::new());

    let (status, body): (StatusCode, Option<SessionCreatedResponse>) = post_json(
        &app,
        "/v1/kyc/sessions",
        &json!({
            "kycPurpose": "ACCOUNT_OPENING",
            "jurisdiction": "IN",
            "customer": {"name": "Test User"}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let body = body.unwrap();
    assert!(body.session_id.starts_with("sess_"));
    assert_eq!(body.status, "CREATED");
}

#[tokio::test]
async fn test_create_session_outside_india_returns_422() {
    let app = build_test_router(TestAppState::new());

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/v1/kyc/sessions",
        &json!({
            "kycPurpose": "ACCOUNT_OPENING",
            "jurisdiction": "US",
            "customer": {}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body.unwrap()["error"], "validation");
}

#[tokio::test]
async fn test_create_session_with_non_object_customer_returns_422() {
    let app = build_test_router(TestAppState::new());

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        "/v1/kyc/sessions",
        &json!({
            "kycPurpose": "ACCOUNT_OPENING",
            "jurisdiction": "IN",
            "customer": "Test User"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// Document Tests
// ============================================================================

#[tokio::test]
async fn test_add_document_as_json_returns_201() {
    let app = build_test_router(TestAppState::new());
    let session_id = create_session(&app).await;

    let (status, body): (StatusCode, Option<DocumentCreatedResponse>) = post_json(
        &app,
        &format!("/v1/kyc/sessions/{}/documents", session_id),
        &json!({"documentType": "PAN", "side": "FRONT", "country": "IN"}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let body = body.unwrap();
    assert!(body.document_id.starts_with("doc_"));
    assert_eq!(body.status, "UPLOADED");
}

#[tokio::test]
async fn test_add_document_as_form_returns_201() {
    let app = build_test_router(TestAppState::new());
    let session_id = create_session(&app).await;

    let (status, body): (StatusCode, Option<DocumentCreatedResponse>) = post_form(
        &app,
        &format!("/v1/kyc/sessions/{}/documents", session_id),
        "documentType=AADHAAR&side=BACK&country=IN",
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.unwrap().status, "UPLOADED");
}

#[tokio::test]
async fn test_add_document_with_unknown_type_returns_422() {
    let app = build_test_router(TestAppState::new());
    let session_id = create_session(&app).await;

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        &format!("/v1/kyc/sessions/{}/documents", session_id),
        &json!({"documentType": "DRIVING_LICENSE", "side": "FRONT", "country": "IN"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_add_document_to_unknown_session_returns_404() {
    let app = build_test_router(TestAppState::new());

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/v1/kyc/sessions/sess_DEADBEEF/documents",
        &json!({"documentType": "PAN", "side": "FRONT", "country": "IN"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap()["error"], "not_found");
}

// ============================================================================
// Summary Tests
// ============================================================================

#[tokio::test]
async fn test_summary_lists_documents_in_upload_order() {
    let app = build_test_router(TestAppState::new());
    let session_id = create_session(&app).await;
    let path = format!("/v1/kyc/sessions/{}/documents", session_id);

    let mut uploaded = vec![];
    for (doc_type, side) in [("PAN", "FRONT"), ("AADHAAR", "FRONT"), ("AADHAAR", "BACK")] {
        let (status, body): (StatusCode, Option<DocumentCreatedResponse>) = post_json(
            &app,
            &path,
            &json!({"documentType": doc_type, "side": side, "country": "IN"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        uploaded.push(body.unwrap().document_id);
    }

    let (status, body): (StatusCode, Option<SessionSummaryResponse>) =
        get_json(&app, &format!("/v1/kyc/sessions/{}/summary", session_id)).await;

    assert_eq!(status, StatusCode::OK);
    let summary = body.unwrap();
    assert_eq!(summary.session_id, session_id);
    assert_eq!(summary.status, "CREATED");
    assert_eq!(summary.document_count, 3);
    let ids: Vec<_> = summary.documents.iter().map(|d| d.id.clone()).collect();
    assert_eq!(ids, uploaded);
    let types: Vec<_> = summary
        .documents
        .iter()
        .map(|d| d.document_type.as_str())
        .collect();
    assert_eq!(types, vec!["PAN", "AADHAAR", "AADHAAR"]);
    assert!(summary.documents.iter().all(|d| d.status == "UPLOADED"));
}

#[tokio::test]
async fn test_summary_of_empty_session() {
    let app = build_test_router(TestAppState::new());
    let session_id = create_session(&app).await;

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, &format!("/v1/kyc/sessions/{}/summary", session_id)).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["documentCount"], 0);
    assert_eq!(body["documents"], json!([]));
}

#[tokio::test]
async fn test_summary_keeps_sessions_apart() {
    let app = build_test_router(TestAppState::new());
    let first = create_session(&app).await;
    let second = create_session(&app).await;

    let _: (StatusCode, Option<Value>) = post_json(
        &app,
        &format!("/v1/kyc/sessions/{}/documents", first),
        &json!({"documentType": "PASSPORT", "side": "FRONT", "country": "IN"}),
    )
    .await;

    let (_, body): (StatusCode, Option<SessionSummaryResponse>) =
        get_json(&app, &format!("/v1/kyc/sessions/{}/summary", second)).await;
    assert_eq!(body.unwrap().document_count, 0);
}

#[tokio::test]
async fn test_summary_of_unknown_session_returns_404() {
    let app = build_test_router(TestAppState::new());

    let (status, _): (StatusCode, Option<Value>) =
        get_json(&app, "/v1/kyc/sessions/sess_DEADBEEF/summary").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
