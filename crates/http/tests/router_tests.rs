#![allow(clippy::unwrap_used, reason = "test code")]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chatvec_core::{Message, StoredMessage, WriteDisposition};
use chatvec_embeddings::{EmbeddingError, EmbeddingProvider};
use chatvec_http::{AppState, create_router};
use chatvec_service::SearchService;
use chatvec_storage::{MessageStore, StorageBackend};
use serde_json::Value;
use tower::ServiceExt;

/// "alpha" and "beta" map to orthogonal axes.
struct AxisProvider;

impl EmbeddingProvider for AxisProvider {
    fn model_name(&self) -> &str {
        "axis"
    }

    fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts
            .iter()
            .map(|t| if t.contains("beta") { vec![0.0, 1.0] } else { vec![1.0, 0.0] })
            .collect())
    }
}

fn stored(id: &str, role: &str, embedding: Vec<f32>) -> StoredMessage {
    StoredMessage::new(
        Message {
            conversation_id: "Conversation".to_owned(),
            message_id: id.to_owned(),
            role: role.to_owned(),
            text: format!("text {id}"),
            create_time: Some(1_700_000_000.0),
            update_time: None,
        },
        Some(embedding),
    )
}

async fn app() -> Router {
    let storage = Arc::new(StorageBackend::new_memory());
    storage
        .write_records(
            &[
                stored("a1", "user", vec![1.0, 0.0]),
                stored("a2", "assistant", vec![0.9, 0.3]),
                stored("b1", "user", vec![0.0, 1.0]),
            ],
            WriteDisposition::Replace,
        )
        .await
        .unwrap();
    let search_service = Arc::new(SearchService::new(storage, Some(Arc::new(AxisProvider))));
    create_router(Arc::new(AppState { search_service }))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

#[tokio::test]
async fn test_root_and_health() {
    let (status, body) = send(app().await, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "chatvec vector search API");
    assert!(body["version"].is_string());

    let (status, body) = send(app().await, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_post_search() {
    let (status, body) =
        send(app().await, post_json("/api/v1/search", r#"{"query": "alpha", "limit": 2}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "alpha");
    assert_eq!(body["total"], 2);
    assert_eq!(body["limit"], 2);
    assert!(body["threshold"].is_null());
    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["message_id"], "a1");
    assert_eq!(results[0]["conversation_id"], "Conversation");
    assert_eq!(results[0]["similarity"], 1.0);
    assert_eq!(results[1]["message_id"], "a2");
}

#[tokio::test]
async fn test_get_search_with_filters() {
    let (status, body) =
        send(app().await, get("/api/v1/search?query=alpha&role=user&threshold=0.5")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["results"][0]["message_id"], "a1");
    assert_eq!(body["threshold"], 0.5);
}

#[tokio::test]
async fn test_search_metric_selection() {
    let (status, body) =
        send(app().await, get("/api/v1/search?query=beta&metric=inner_product&limit=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["message_id"], "b1");
}

#[tokio::test]
async fn test_unknown_metric_is_bad_request() {
    let (status, body) =
        send(app().await, post_json("/api/v1/search", r#"{"query": "alpha", "metric": "hamming"}"#))
            .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("hamming"));
}

#[tokio::test]
async fn test_invalid_limits_and_queries() {
    for uri in [
        "/api/v1/search?query=alpha&limit=0",
        "/api/v1/search?query=alpha&limit=101",
        "/api/v1/search?query=",
        "/api/v1/search?query=alpha&threshold=NaN",
        "/api/v1/search?query=alpha&limit=lots",
    ] {
        let (status, body) = send(app().await, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].is_string(), "{uri}");
    }
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (status, body) = send(app().await, post_json("/api/v1/search", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_stats() {
    let (status, body) = send(app().await, get("/api/v1/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_messages"], 3);
    assert_eq!(body["messages_with_embeddings"], 3);
    let roles = body["role_distribution"].as_object().unwrap();
    assert_eq!(roles.keys().next().map(String::as_str), Some("user"));
    assert_eq!(roles["user"], 2);
    assert_eq!(roles["assistant"], 1);
}

#[tokio::test]
async fn test_search_without_model_is_unavailable() {
    let storage = Arc::new(StorageBackend::new_memory());
    let search_service = Arc::new(SearchService::new(storage, None));
    let app = create_router(Arc::new(AppState { search_service }));
    let (status, _) = send(app, get("/api/v1/search?query=alpha")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
