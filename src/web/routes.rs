use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use super::error::ApiError;
use super::state::AppState;
use crate::analysis::{ReplyRequest, ReplyResponse, SummarizeRequest, SummarizeResponse};

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    services: Value,
}

pub async fn root() -> Json<Value> {
    Json(json!({ "status": "running" }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        services: json!({ "cache": state.cache.health().await }),
    })
}

pub async fn generate_reply(
    State(state): State<AppState>,
    Json(request): Json<ReplyRequest>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let response = state.generator.generate(&request).await?;
    state.cache.add_recent_reply(&request.post_id, &response.reply).await;

    info!(
        "Generated reply for post {}: intents={:?}, confidence={:.2}, context={}",
        request.post_id,
        response.detected_intents,
        response.confidence,
        if response.fallback_used { "fallback" } else { "full" }
    );

    Ok(Json(response))
}

pub async fn summarize_post(
    State(state): State<AppState>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let response = state.summarizer.summarize(&request).await?;
    Ok(Json(response))
}
