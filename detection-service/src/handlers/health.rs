use axum::{response::IntoResponse, Json};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Welcome to Object Detection API with Gemini"
    }))
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "detection-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
