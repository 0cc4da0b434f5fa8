use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{self, Request, StatusCode},
    Router,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use agent_match_core::test_utils::{FailingVectorStore, FixedEmbedder};
use agent_match_core::{
    AgentId, AgentMetadata, AgentRecord, CoreError, InMemoryVectorStore, MatchingService, ScoredRecord, VectorStore,
};
use agent_match_server::{build_router, build_state, AppState, ServerConfig};

async fn memory_app() -> Router {
    let config = ServerConfig::default();
    let state = build_state(&config).await.unwrap();
    build_router(state, Duration::from_secs(5))
}

async fn make_request(app: &Router, method: http::Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().uri(path).method(method);

    let body_data = match body {
        Some(value) => {
            req = req.header("Content-Type", "application/json");
            value.to_string()
        }
        None => String::new(),
    };
    let req = req.body(Body::from(body_data)).unwrap();

    let response = app.clone().oneshot(req).await.unwrap();

    let status = response.status();
    let body = body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, value)
}

fn alpha() -> Value {
    json!({
        "name": "Alpha",
        "description": "data pipeline",
        "capabilities": ["extract", "load"],
        "agent_type": "etl",
        "dependencies": ["db"]
    })
}

fn chat_bot() -> Value {
    json!({
        "name": "Chatterbox",
        "description": "chat bot answering customer questions",
        "capabilities": ["converse", "summarize"],
        "agent_type": "chat",
        "dependencies": ["llm"]
    })
}

#[tokio::test]
async fn test_register_then_match_returns_registered_agent_first() {
    let app = memory_app().await;
    let a1 = AgentId::new_v4();
    let a2 = AgentId::new_v4();

    let (status, body) = make_request(
        &app,
        http::Method::POST,
        "/api/v1/register-agent",
        Some(json!({"id": a1, "metadata": alpha()})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Agent registered successfully", "agent_id": a1}));

    let (status, _) = make_request(
        &app,
        http::Method::POST,
        "/api/v1/register-agent",
        Some(json!({"id": a2, "metadata": chat_bot()})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = make_request(
        &app,
        http::Method::POST,
        "/api/v1/match-agent?top_k=1",
        Some(json!({"metadata": alpha()})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let matches = body.as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["id"], json!(a1));
    assert_eq!(matches[0]["metadata"], alpha());
    let score = matches[0]["similarity_score"].as_f64().unwrap();
    assert!((score - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_match_defaults_to_five_results_ordered_by_similarity() {
    let app = memory_app().await;
    for i in 0..7 {
        let mut metadata = alpha();
        metadata["name"] = json!(format!("Alpha {}", i));
        let (status, _) = make_request(
            &app,
            http::Method::POST,
            "/api/v1/register-agent",
            Some(json!({"id": AgentId::new_v4(), "metadata": metadata})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = make_request(
        &app,
        http::Method::POST,
        "/api/v1/match-agent",
        Some(json!({"metadata": chat_bot()})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let scores: Vec<f64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["similarity_score"].as_f64().unwrap())
        .collect();
    assert_eq!(scores.len(), 5);
    for pair in scores.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
}

#[tokio::test]
async fn test_match_by_registered_id() {
    let app = memory_app().await;
    let a1 = AgentId::new_v4();
    make_request(
        &app,
        http::Method::POST,
        "/api/v1/register-agent",
        Some(json!({"id": a1, "metadata": alpha()})),
    )
    .await;

    let (status, body) = make_request(
        &app,
        http::Method::POST,
        "/api/v1/match-agent?top_k=3",
        Some(json!({"id": a1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], json!(a1));

    let (status, body) = make_request(
        &app,
        http::Method::POST,
        "/api/v1/match-agent",
        Some(json!({"id": AgentId::new_v4()})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "ERR_NOT_FOUND");
}

#[tokio::test]
async fn test_duplicate_registration_is_conflict() {
    let app = memory_app().await;
    let id = AgentId::new_v4();
    let request = json!({"id": id, "metadata": alpha()});

    let (status, _) = make_request(&app, http::Method::POST, "/api/v1/register-agent", Some(request.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = make_request(&app, http::Method::POST, "/api/v1/register-agent", Some(request)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_code"], "ERR_DUPLICATE_ID");
    assert!(body["detail"].as_str().unwrap().contains(&id.to_string()));
}

#[tokio::test]
async fn test_invalid_requests_are_unprocessable() {
    let app = memory_app().await;

    // Missing dependencies field
    let mut incomplete = alpha();
    incomplete.as_object_mut().unwrap().remove("dependencies");
    let (status, body) = make_request(
        &app,
        http::Method::POST,
        "/api/v1/register-agent",
        Some(json!({"id": AgentId::new_v4(), "metadata": incomplete})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], "ERR_VALIDATION");

    // Blank name
    let mut blank = alpha();
    blank["name"] = json!("  ");
    let (status, _) = make_request(
        &app,
        http::Method::POST,
        "/api/v1/register-agent",
        Some(json!({"id": AgentId::new_v4(), "metadata": blank})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Neither metadata nor id
    let (status, _) = make_request(&app, http::Method::POST, "/api/v1/match-agent", Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // top_k of zero and not a number
    for path in ["/api/v1/match-agent?top_k=0", "/api/v1/match-agent?top_k=many"] {
        let (status, body) =
            make_request(&app, http::Method::POST, path, Some(json!({"metadata": alpha()}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", path);
        assert_eq!(body["error_code"], "ERR_VALIDATION");
    }
}

#[tokio::test]
async fn test_get_agent() {
    let app = memory_app().await;
    let id = AgentId::new_v4();
    make_request(
        &app,
        http::Method::POST,
        "/api/v1/register-agent",
        Some(json!({"id": id, "metadata": alpha()})),
    )
    .await;

    let (status, body) = make_request(&app, http::Method::GET, &format!("/api/v1/agents/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(id));
    assert_eq!(body["metadata"], alpha());

    let (status, _) =
        make_request(&app, http::Method::GET, &format!("/api/v1/agents/{}", AgentId::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = make_request(&app, http::Method::GET, "/api/v1/agents/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = memory_app().await;

    let (status, body) = make_request(&app, http::Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "UP");
    assert_eq!(body["agents"], 0);
    assert_eq!(body["dimension"], 384);
    assert_eq!(body["model"], "feature-hash-v1");
}

#[tokio::test]
async fn test_storage_outage_maps_to_service_unavailable() {
    let embedder = Arc::new(FixedEmbedder::new(2).with_vector("Alpha", vec![1.0, 0.0]));
    let service = MatchingService::new(embedder, Arc::new(FailingVectorStore::new(2))).unwrap();
    let app = build_router(AppState::new(service), Duration::from_secs(5));

    let (status, body) = make_request(
        &app,
        http::Method::POST,
        "/api/v1/register-agent",
        Some(json!({"id": AgentId::new_v4(), "metadata": alpha()})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error_code"], "ERR_STORAGE_UNAVAILABLE");

    let (status, body) = make_request(&app, http::Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "DOWN");
}

#[tokio::test]
async fn test_embedding_failure_is_server_error_and_stores_nothing() {
    let store = Arc::new(InMemoryVectorStore::new(2));
    let service = MatchingService::new(Arc::new(FixedEmbedder::failing(2)), store.clone()).unwrap();
    let app = build_router(AppState::new(service), Duration::from_secs(5));

    let (status, body) = make_request(
        &app,
        http::Method::POST,
        "/api/v1/register-agent",
        Some(json!({"id": AgentId::new_v4(), "metadata": alpha()})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error_code"], "ERR_EMBEDDING");

    let (_, health) = make_request(&app, http::Method::GET, "/health", None).await;
    assert_eq!(health["agents"], 0);
}

#[tokio::test]
async fn test_build_state_rejects_unknown_store_scheme() {
    let config = ServerConfig {
        database_url: "redis://localhost".to_string(),
        ..Default::default()
    };
    assert!(build_state(&config).await.is_err());
}

/// In-memory store whose reads take longer than the test timeout.
struct SlowStore {
    inner: InMemoryVectorStore,
    delay: Duration,
}

#[async_trait]
impl VectorStore for SlowStore {
    async fn insert(&self, id: AgentId, metadata: AgentMetadata, embedding: Vec<f32>) -> Result<AgentRecord, CoreError> {
        self.inner.insert(id, metadata, embedding).await
    }

    async fn query_nearest(&self, embedding: &[f32], k: usize) -> Result<Vec<ScoredRecord>, CoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.query_nearest(embedding, k).await
    }

    async fn get(&self, id: &AgentId) -> Result<Option<AgentRecord>, CoreError> {
        self.inner.get(id).await
    }

    async fn count(&self) -> Result<usize, CoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.count().await
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}

#[tokio::test]
async fn test_request_timeout_uses_error_body() {
    let embedder = Arc::new(FixedEmbedder::new(2).with_vector("Alpha", vec![1.0, 0.0]));
    let store = Arc::new(SlowStore {
        inner: InMemoryVectorStore::new(2),
        delay: Duration::from_secs(5),
    });
    let service = MatchingService::new(embedder, store).unwrap();
    let app = build_router(AppState::new(service), Duration::from_millis(50));

    let (status, body) = make_request(
        &app,
        http::Method::POST,
        "/api/v1/match-agent",
        Some(json!({"metadata": alpha()})),
    )
    .await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body["error_code"], "ERR_TIMEOUT");
    assert_eq!(body["detail"], "Request timed out");

    let (status, body) = make_request(&app, http::Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body["error_code"], "ERR_TIMEOUT");
}

#[tokio::test]
async fn test_blank_list_entries_are_accepted() {
    let app = memory_app().await;
    let mut metadata = alpha();
    metadata["capabilities"] = json!(["extract", ""]);
    metadata["dependencies"] = json!([]);

    let (status, body) = make_request(
        &app,
        http::Method::POST,
        "/api/v1/register-agent",
        Some(json!({"id": AgentId::new_v4(), "metadata": metadata})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
}
