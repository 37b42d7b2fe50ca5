//! Router-level tests for `/analyze-leaf` with a mock vision provider.
//!
//! No network access: requests are driven through the router with `oneshot`.

use agriscan_service::config::GatewayConfig;
use agriscan_service::services::providers::mock::{MockReply, MockVisionProvider};
use agriscan_service::services::DiagnosisService;
use agriscan_service::startup::{build_router, AppState};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::util::ServiceExt;

const BOUNDARY: &str = "agriscan-test-boundary";

fn test_config(vars: &[(&str, &str)]) -> GatewayConfig {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    GatewayConfig::from_lookup(service_core::config::Config::default(), |key| {
        vars.get(key).cloned()
    })
}

fn app_with(reply: MockReply, vars: &[(&str, &str)]) -> (Router, Arc<MockVisionProvider>) {
    let provider = Arc::new(MockVisionProvider::new(reply));
    let state = AppState {
        config: test_config(vars),
        diagnosis: DiagnosisService::new(provider.clone()),
    };
    (build_router(state), provider)
}

fn app(reply: MockReply) -> (Router, Arc<MockVisionProvider>) {
    app_with(reply, &[])
}

fn multipart_body(field: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"leaf.jpg\"\r\n\
         Content-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/analyze-leaf")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn upload_request(field: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    multipart_request(multipart_body(field, content_type, data))
}

async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("JSON body")
}

// ============================================================================
// Missing input
// ============================================================================

#[tokio::test]
async fn missing_image_field_returns_400() {
    let (app, provider) = app(MockReply::Content("{}".to_string()));

    let response = app
        .oneshot(upload_request("file", "image/jpeg", b"leaf"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "No image uploaded" }));
    assert!(provider.received().await.is_empty());
}

#[tokio::test]
async fn non_multipart_body_returns_400() {
    let (app, _) = app(MockReply::Content("{}".to_string()));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/analyze-leaf")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"image": "aGVsbG8="}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "No image uploaded" }));
}

#[tokio::test]
async fn empty_request_returns_400() {
    let (app, _) = app(MockReply::Content("{}".to_string()));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/analyze-leaf")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "No image uploaded" }));
}

#[tokio::test]
async fn empty_image_part_returns_400() {
    let (app, provider) = app(MockReply::Content("{}".to_string()));

    let response = app
        .oneshot(upload_request("image", "image/jpeg", b""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "No image uploaded" }));
    assert!(provider.received().await.is_empty());
}

#[tokio::test]
async fn upload_over_limit_is_rejected() {
    let (app, provider) = app_with(
        MockReply::Content("{}".to_string()),
        &[("MAX_UPLOAD_BYTES", "1024")],
    );

    let response = app
        .oneshot(upload_request("image", "image/jpeg", &[7u8; 4096]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to read uploaded image"));
    assert!(provider.received().await.is_empty());
}

#[tokio::test]
async fn image_text_field_without_filename_returns_400() {
    let (app, provider) = app(MockReply::Content("{}".to_string()));

    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"image\"\r\n\r\n\
         hello\r\n\
         --{BOUNDARY}--\r\n"
    );

    let response = app
        .oneshot(multipart_request(body.into_bytes()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "No image uploaded" }));
    assert!(provider.received().await.is_empty());
}

#[tokio::test]
async fn body_far_over_limit_is_rejected() {
    let (app, provider) = app_with(
        MockReply::Content("{}".to_string()),
        &[("MAX_UPLOAD_BYTES", "1024")],
    );

    let response = app
        .oneshot(upload_request("image", "image/jpeg", &vec![7u8; 256 * 1024]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to read uploaded image"));
    assert!(provider.received().await.is_empty());
}

// ============================================================================
// Successful diagnoses
// ============================================================================

#[tokio::test]
async fn diseased_answer_is_relayed_field_for_field() {
    let answer = json!({
        "crop": "tomato",
        "status": "diseased",
        "disease_name": "Early blight",
        "symptoms": "Concentric brown spots on lower leaves",
        "affected_percentage": "25%",
        "chemical_remedy": "Chlorothalonil 2 g/L",
        "organic_remedy": "Neem oil spray",
        "preventive_measures": "Crop rotation and drip irrigation",
        "recommended_action": "Remove infected parts"
    });
    let (app, provider) = app(MockReply::Content(answer.to_string()));

    let image = [0xffu8, 0xd8, 0xff, 0xe0, 0x00, 0x10];
    let response = app
        .oneshot(upload_request("image", "image/jpeg", &image))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, answer);

    let received = provider.received().await;
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].bytes, image);
    assert_eq!(received[0].mime_type, "image/jpeg");
}

#[tokio::test]
async fn image_of_exactly_the_limit_is_accepted() {
    let (app, provider) = app_with(
        MockReply::Content(r#"{"status": "healthy"}"#.to_string()),
        &[("MAX_UPLOAD_BYTES", "1024")],
    );

    let response = app
        .oneshot(upload_request("image", "image/jpeg", &[7u8; 1024]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let received = provider.received().await;
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].len(), 1024);
}

#[tokio::test]
async fn non_json_answer_is_returned_as_plain_text() {
    let (app, _) = app(MockReply::Content("Not a leaf image.".to_string()));

    let response = app
        .oneshot(upload_request("image", "image/png", b"\x89PNG"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(body_bytes(response).await, b"Not a leaf image.");
}

// ============================================================================
// Upstream failures
// ============================================================================

#[tokio::test]
async fn upstream_error_status_returns_500_with_raw_body() {
    let (app, _) = app(MockReply::ApiError {
        status: 502,
        body: "upstream exploded".to_string(),
    });

    let response = app
        .oneshot(upload_request("image", "image/jpeg", b"leaf"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({
            "error": "Failed to get response from OpenRouter",
            "details": "upstream exploded"
        })
    );
}

#[tokio::test]
async fn malformed_envelope_returns_500() {
    let (app, _) = app(MockReply::Malformed("missing field `choices`".to_string()));

    let response = app
        .oneshot(upload_request("image", "image/jpeg", b"leaf"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Unexpected response format");
    assert_eq!(body["details"], "missing field `choices`");
}

// ============================================================================
// Ambient behaviour
// ============================================================================

#[tokio::test]
async fn health_reports_service_and_model() {
    let (app, _) = app(MockReply::Content("{}".to_string()));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "agriscan-service");
    assert_eq!(body["model"], "mock-vision");
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let (app, _) = app(MockReply::Content("{}".to_string()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "leaf-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "leaf-42");
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
}

#[tokio::test]
async fn cors_allows_configured_origin_only() {
    let preflight = |origin: &str| {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/analyze-leaf")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    };

    let (app, _) = app(MockReply::Content("{}".to_string()));
    let allowed = app
        .clone()
        .oneshot(preflight("https://agri-scan-ai.vercel.app"))
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://agri-scan-ai.vercel.app"
    );

    let denied = app.oneshot(preflight("https://evil.example")).await.unwrap();
    assert!(denied
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn wildcard_origin_allows_any_origin() {
    let (app, _) = app_with(MockReply::Content("{}".to_string()), &[("ALLOWED_ORIGINS", "*")]);

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/analyze-leaf")
                .header(header::ORIGIN, "https://field-app.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
