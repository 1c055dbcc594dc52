//! JSON API for a browser front end.

use crate::wiring::{AssistantFactory, MISSING_KEY_MESSAGE};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chatskcet_common::{ChatError, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const GENERIC_FAILURE: &str = "We have encountered some problem.";
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub query: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadQuery(String),
    MissingKey,
    Upstream,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ApiError::BadQuery(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::MissingKey => (StatusCode::UNAUTHORIZED, MISSING_KEY_MESSAGE.to_string()),
            ApiError::Upstream => (StatusCode::BAD_GATEWAY, GENERIC_FAILURE.to_string()),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

pub fn create_router(factory: AssistantFactory) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/health", get(health_handler))
        .with_state(Arc::new(factory))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn serve(factory: AssistantFactory, bind: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "server.listening");
    axum::serve(listener, create_router(factory))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("server.shutdown");
        })
        .await?;
    Ok(())
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn chat_handler(
    State(factory): State<Arc<AssistantFactory>>,
    headers: HeaderMap,
    Json(body): Json<ChatBody>,
) -> Result<Json<Response>, ApiError> {
    if body.query.trim().is_empty() {
        return Err(ApiError::BadQuery("Query cannot be empty".into()));
    }

    let key = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    let assistant = factory.assistant(key).map_err(|e| {
        tracing::info!(error = %e, "api.chat.unauthorized");
        ApiError::MissingKey
    })?;

    match assistant.generate_response(&body.query).await {
        Ok(response) => Ok(Json(response)),
        Err(ChatError::InvalidQuery(msg)) => Err(ApiError::BadQuery(msg)),
        Err(e) => {
            tracing::error!(error = %e, "api.chat.failed");
            Err(ApiError::Upstream)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use chatskcet_config::ChatConfig;
    use tower::ServiceExt;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(llm_base: &str) -> ChatConfig {
        let mut cfg = ChatConfig::default();
        cfg.llm.api_key = String::new();
        cfg.llm.base_url = llm_base.to_string();
        cfg.llm.timeout_secs = 2;
        cfg
    }

    fn router(cfg: ChatConfig, cli_key: Option<&str>) -> Router {
        create_router(AssistantFactory::from_config(cfg, cli_key).unwrap())
    }

    fn chat_request(body: serde_json::Value, key: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json");
        if let Some(k) = key {
            builder = builder.header(API_KEY_HEADER, k);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(resp: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn mount_completions(server: &MockServer, synthesis_status: u16) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({ "model": "llama-3.3-70b-versatile" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": "no search needed" } }]
            })))
            .mount(server)
            .await;
        let synthesis = if synthesis_status == 200 {
            ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": "Hello! Ask me about SKCET." } }]
            }))
        } else {
            ResponseTemplate::new(synthesis_status)
                .set_body_json(json!({ "error": { "message": "boom" } }))
        };
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({ "model": "llama-3.1-8b-instant" })))
            .respond_with(synthesis)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = router(config_for("http://127.0.0.1:9"), None);
        let resp = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn blank_query_is_bad_request() {
        let app = router(config_for("http://127.0.0.1:9"), Some("gsk_cli"));
        let resp = app
            .oneshot(chat_request(json!({ "query": "   " }), None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_key_is_unauthorized() {
        let app = router(config_for("http://127.0.0.1:9"), None);
        let resp = app
            .oneshot(chat_request(json!({ "query": "hostel fee" }), None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(resp).await["error"], MISSING_KEY_MESSAGE);
    }

    #[tokio::test]
    async fn header_key_answers_query() {
        let server = MockServer::start().await;
        mount_completions(&server, 200).await;

        let app = router(config_for(&server.uri()), None);
        let resp = app
            .oneshot(chat_request(json!({ "query": "hi" }), Some("gsk_header")))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["content"], "Hello! Ask me about SKCET.");
        assert_eq!(body["references"], json!([]));

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| {
            r.headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                == Some("Bearer gsk_header")
        }));
    }

    #[tokio::test]
    async fn synthesis_failure_is_bad_gateway() {
        let server = MockServer::start().await;
        mount_completions(&server, 500).await;

        let app = router(config_for(&server.uri()), Some("gsk_cli"));
        let resp = app
            .oneshot(chat_request(json!({ "query": "hi" }), None))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json_body(resp).await["error"], GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let app = router(config_for("http://127.0.0.1:9"), None);
        let resp = app
            .oneshot(
                Request::get("/api/health")
                    .header("origin", "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            resp.headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }
}
