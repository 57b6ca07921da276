use crate::services::get_metrics;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Hello from the site backend!" }))
}

pub async fn hello() -> impl IntoResponse {
    Json(json!({ "message": "Hello from the backend API!" }))
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "site-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.ping().await.map_err(|e| {
        tracing::warn!(error = %e, "Readiness check failed");
        AppError::ServiceUnavailable
    })?;
    Ok(StatusCode::OK)
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
