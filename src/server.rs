//! HTTP surface: `/detect`, `/engage` and a health check.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::classifier::classify;
use crate::honeypot::engage;
use crate::llm::{self, Generator};

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn Generator>,
}

impl AppState {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/detect", post(detect_handler))
        .route("/engage", post(engage_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn detect_handler(
    State(state): State<AppState>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<Value>, AppError> {
    info!("/detect: \"{}\"", preview(&req.message));
    let reply = classify(&req.message, state.generator.as_ref()).await?;
    Ok(Json(json!({ "result": reply.into_value() })))
}

async fn engage_handler(
    State(state): State<AppState>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<Value>, AppError> {
    info!("/engage: \"{}\"", preview(&req.message));
    let engagement = engage(&req.message, state.generator.as_ref()).await?;
    Ok(Json(json!({
        "ai_response": engagement.ai_response.into_value(),
        "regex_extracted": engagement.regex_extracted,
    })))
}

fn preview(text: &str) -> String {
    text.chars().take(100).collect()
}

#[derive(Debug)]
pub enum AppError {
    Upstream(llm::Error),
}

impl From<llm::Error> for AppError {
    fn from(e: llm::Error) -> Self {
        AppError::Upstream(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Upstream(e) => {
                error!("Model call failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };
        (status, Json(json!({ "detail": message }))).into_response()
    }
}
