//! Remote analyzer proxy tests
//!
//! Run the full router against a wiremock analyzer service.

mod fixtures;

use axum::http::StatusCode;
use serde_json::json;
use tower::util::ServiceExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fixtures::*;
use tajwid_gateway::{routes, state::AppState};

async fn app_for(server: &MockServer, token: Option<&str>) -> axum::Router {
    let config = remote_config(&server.uri(), token);
    routes::create_router(AppState::new(config).unwrap())
}

#[tokio::test]
async fn test_success_relayed_verbatim() {
    let server = MockServer::start().await;
    let document = r#"{"score_percent":78,"mistakes":[{"rule":"madd"}]}"#;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_string(document))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(&server, None).await;
    let response = app
        .oneshot(recitation_form().request("/api/analyze-tajwid"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, document);
}

#[tokio::test]
async fn test_fields_renamed_for_remote() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let app = app_for(&server, None).await;
    app.oneshot(recitation_form().request("/api/analyze-tajwid"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"audio\"; filename=\"recording.webm\""));
    assert!(body.contains("name=\"surah_raw\""));
    assert!(body.contains("name=\"ayah_number_raw\""));
}

#[tokio::test]
async fn test_token_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .and(header("x-api-token", "gateway-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(&server, Some("gateway-token")).await;
    let response = app
        .oneshot(recitation_form().request("/api/analyze-tajwid"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_non_json_error_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let app = app_for(&server, None).await;
    let response = app
        .oneshot(recitation_form().request("/api/analyze-tajwid"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Analyzer service request failed"})
    );
}

#[tokio::test]
async fn test_error_detail_extracted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"detail":"Unsupported audio format"}"#),
        )
        .mount(&server)
        .await;

    let app = app_for(&server, None).await;
    let response = app
        .oneshot(recitation_form().request("/api/analyze-tajwid"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Unsupported audio format"})
    );
}

#[tokio::test]
async fn test_missing_audio_not_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(0)
        .mount(&server)
        .await;

    let app = app_for(&server, None).await;
    let request = UploadForm::new().text("surah", "1").request("/api/analyze-tajwid");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stream_wraps_remote_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"score_percent":64}"#))
        .mount(&server)
        .await;

    let app = app_for(&server, None).await;
    let response = app
        .oneshot(recitation_form().request("/api/analyze-tajwid-stream"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let events = sse_events(&body_text(response).await);
    assert_eq!(
        events,
        vec![
            json!({"type": "start"}),
            json!({"score_percent": 64}),
            json!({"type": "done", "code": 0}),
        ]
    );
}

#[tokio::test]
async fn test_stream_wraps_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string(r#"{"error":"model crashed"}"#))
        .mount(&server)
        .await;

    let app = app_for(&server, None).await;
    let response = app
        .oneshot(recitation_form().request("/api/analyze-tajwid-stream"))
        .await
        .unwrap();

    let events = sse_events(&body_text(response).await);
    assert_eq!(events.len(), 3);
    assert_eq!(events[1]["type"], "error");
    assert!(events[1]["message"].as_str().unwrap().contains("model crashed"));
    assert_eq!(events[2], json!({"type": "done", "code": null}));
}
