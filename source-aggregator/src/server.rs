use crate::aggregator::ContentAggregator;
use crate::cache::CacheStats;
use crate::types::{AggregatorError, ForumPost, PreprintRecord, Repository, Story};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, instrument};

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<ContentAggregator>,
}

/// Fatal aggregation failure, served as a 500 with the upstream message.
pub struct ApiError {
    label: &'static str,
    message: String,
}

impl ApiError {
    fn new(label: &'static str, err: AggregatorError) -> Self {
        error!(label, error = %err, "Request failed");
        Self {
            label,
            message: err.client_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": format!("Failed to fetch {}", self.label),
            "message": self.message,
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/news", get(get_news))
        .route("/api/github", get(get_github))
        .route("/api/reddit", get(get_reddit))
        .route("/api/research", get(get_research))
        .route("/api/cache/stats", get(get_cache_stats))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "online",
        "message": "Tech Mastery Lab Backend API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "news": "/api/news",
            "github": "/api/github",
            "reddit": "/api/reddit",
            "research": "/api/research",
        }
    }))
}

#[instrument(skip(state), name = "api_get_news")]
async fn get_news(State(state): State<AppState>) -> Result<Json<Vec<Story>>, ApiError> {
    state
        .aggregator
        .get_news()
        .await
        .map(Json)
        .map_err(|e| ApiError::new("news", e))
}

#[instrument(skip(state), name = "api_get_github")]
async fn get_github(State(state): State<AppState>) -> Result<Json<Vec<Repository>>, ApiError> {
    state
        .aggregator
        .get_trending_repositories()
        .await
        .map(Json)
        .map_err(|e| ApiError::new("GitHub data", e))
}

#[instrument(skip(state), name = "api_get_reddit")]
async fn get_reddit(State(state): State<AppState>) -> Json<Vec<ForumPost>> {
    Json(state.aggregator.get_forum_posts().await)
}

#[instrument(skip(state), name = "api_get_research")]
async fn get_research(State(state): State<AppState>) -> Json<Vec<PreprintRecord>> {
    Json(state.aggregator.get_preprints().await)
}

async fn get_cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.aggregator.cache().stats())
}
