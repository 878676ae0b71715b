use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use hrpulse_sentiment::{Capabilities, SentimentConfig, SentimentError, TextEmbedder};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::*;

struct FixedEmbedder;

#[async_trait]
impl TextEmbedder for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, SentimentError> {
        Ok(vec![0.5; 4])
    }
}

fn state_with(analyzer: FeedbackAnalyzer) -> AppState {
    AppState {
        analyzer: Arc::new(analyzer),
        max_batch_size: 3,
        batch_concurrency: 2,
    }
}

fn rule_based_app() -> Router {
    build_app(
        state_with(FeedbackAnalyzer::rule_based()),
        AuthState::disabled(),
        default_rate_limit_state(),
    )
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

#[test]
fn api_error_validation_error_maps_to_bad_request() {
    let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn api_error_unknown_code_maps_to_internal_error() {
    let response = ApiError::new("req-1", "inference_failed", "boom").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// -------------------------------------------------------------------------
// Health and capabilities
// -------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_degraded_with_rules_only() {
    let response = rule_based_app()
        .oneshot(get_request("/api/v1/health"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "degraded");
    assert_eq!(json["data"]["tiers"].as_array().map(Vec::len), Some(3));
    assert!(json["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn health_reports_ok_with_a_model_tier() {
    let analyzer = FeedbackAnalyzer::new(
        Capabilities::none().with_embedder(Arc::new(FixedEmbedder)),
        &SentimentConfig::default(),
    );
    let app = build_app(
        state_with(analyzer),
        AuthState::disabled(),
        default_rate_limit_state(),
    );

    let response = app.oneshot(get_request("/api/v1/health")).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "ok");
}

#[tokio::test]
async fn capabilities_lists_every_tier() {
    let response = rule_based_app()
        .oneshot(get_request("/api/v1/sentiment/capabilities"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json["data"],
        json!([
            { "tier": "zero_shot_classifier", "available": false },
            { "tier": "embedding_model", "available": false },
            { "tier": "rule_based", "available": true },
        ])
    );
}

// -------------------------------------------------------------------------
// Single analysis
// -------------------------------------------------------------------------

#[tokio::test]
async fn analyze_returns_flat_result_with_tier() {
    let response = rule_based_app()
        .oneshot(post_json(
            "/api/v1/sentiment",
            &json!({ "text": "Dịch vụ chậm trễ, không hài lòng với cách xử lý." }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["sentiment"], "Negative");
    assert_eq!(data["tier"], "rule_based");
    assert!(data["keywords"].is_array());
    assert!(data["topic"].is_string());
    assert!(data["predicted_rating"].is_number());
}

#[tokio::test]
async fn analyze_echoes_known_rating() {
    let response = rule_based_app()
        .oneshot(post_json(
            "/api/v1/sentiment",
            &json!({ "text": "Sếp thiên vị", "rating": 4.0 }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["predicted_rating"], 4.0);
}

#[tokio::test]
async fn analyze_empty_text_has_no_tier() {
    let response = rule_based_app()
        .oneshot(post_json("/api/v1/sentiment", &json!({ "text": "  " })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["sentiment"], "Neutral");
    assert!(json["data"]["tier"].is_null());
}

#[tokio::test]
async fn analyze_rejects_missing_text() {
    let response = rule_based_app()
        .oneshot(post_json("/api/v1/sentiment", &json!({ "rating": 3 })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn analyze_rejects_out_of_range_rating() {
    let response = rule_based_app()
        .oneshot(post_json(
            "/api/v1/sentiment",
            &json!({ "text": "ok", "rating": 6 }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyze_rejects_malformed_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/sentiment")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .expect("request");

    let response = rule_based_app().oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn request_id_header_is_propagated() {
    let request = Request::builder()
        .uri("/api/v1/health")
        .header("x-request-id", "req-abc")
        .body(Body::empty())
        .expect("request");

    let response = rule_based_app().oneshot(request).await.expect("response");

    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("req-abc")
    );
    let json = body_json(response).await;
    assert_eq!(json["meta"]["request_id"], "req-abc");
}

// -------------------------------------------------------------------------
// Batch
// -------------------------------------------------------------------------

#[tokio::test]
async fn batch_returns_results_in_order_with_summary() {
    let response = rule_based_app()
        .oneshot(post_json(
            "/api/v1/sentiment/batch",
            &json!({ "items": [
                { "text": "Tôi rất hài lòng, đồng nghiệp tuyệt vời" },
                { "text": "Lương quá thấp, tôi thất vọng", "rating": 1 },
            ]}),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let results = json["data"]["results"].as_array().expect("results");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["sentiment"], "Positive");
    assert_eq!(results[1]["sentiment"], "Negative");
    assert_eq!(results[1]["predicted_rating"], 1.0);
    assert_eq!(json["data"]["summary"]["count"], 2);
    assert_eq!(json["data"]["summary"]["by_tier"]["rule_based"], 2);
}

#[tokio::test]
async fn batch_rejects_empty_items() {
    let response = rule_based_app()
        .oneshot(post_json("/api/v1/sentiment/batch", &json!({ "items": [] })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn batch_rejects_oversize_requests() {
    let items: Vec<Value> = (0..4).map(|i| json!({ "text": format!("góp ý {i}") })).collect();
    let response = rule_based_app()
        .oneshot(post_json("/api/v1/sentiment/batch", &json!({ "items": items })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"]["message"]
        .as_str()
        .is_some_and(|m| m.contains("limit")));
}

#[tokio::test]
async fn batch_names_the_invalid_item() {
    let response = rule_based_app()
        .oneshot(post_json(
            "/api/v1/sentiment/batch",
            &json!({ "items": [{ "text": "ok" }, { "text": "ok", "rating": 0 }] }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"]["message"]
        .as_str()
        .is_some_and(|m| m.starts_with("items[1]")));
}

// -------------------------------------------------------------------------
// Middleware
// -------------------------------------------------------------------------

#[tokio::test]
async fn bearer_auth_guards_protected_routes_only() {
    let auth = AuthState::from_keys(&["secret-key".to_string()], false).expect("auth");
    let app = build_app(
        state_with(FeedbackAnalyzer::rule_based()),
        auth,
        default_rate_limit_state(),
    );

    let unauthorized = app
        .clone()
        .oneshot(get_request("/api/v1/sentiment/capabilities"))
        .await
        .expect("response");
    assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

    let authorized = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/sentiment/capabilities")
                .header("authorization", "Bearer secret-key")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(authorized.status(), StatusCode::OK);

    let health = app.oneshot(get_request("/api/v1/health")).await.expect("response");
    assert_eq!(health.status(), StatusCode::OK);
}

#[tokio::test]
async fn rate_limit_rejects_requests_over_the_window() {
    let app = build_app(
        state_with(FeedbackAnalyzer::rule_based()),
        AuthState::disabled(),
        RateLimitState::new(1, Duration::from_secs(60)),
    );

    let first = app
        .clone()
        .oneshot(get_request("/api/v1/sentiment/capabilities"))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(get_request("/api/v1/sentiment/capabilities"))
        .await
        .expect("response");
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}
