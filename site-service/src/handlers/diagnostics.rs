use crate::services::store::{StoreStatus, NOT_CONNECTED, STATUS_ERROR_CHARS};
use crate::startup::AppState;
use axum::{extract::State, Json};
use futures::FutureExt;
use serde::Serialize;
use service_core::utils::truncate_chars;
use std::any::Any;
use std::panic::AssertUnwindSafe;

const BACKEND_RUNNING: &str = "✅ Running";
const SET: &str = "✅ Set";
const NOT_SET: &str = "❌ Not Set";

#[derive(Debug, Serialize)]
pub struct DiagnosticsResponse {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

fn flag(is_set: bool) -> String {
    let text = if is_set { SET } else { NOT_SET };
    text.to_string()
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown failure")
}

/// Always answers 200. Whatever goes wrong while probing the store is
/// reported in `database`.
pub async fn diagnostics(State(state): State<AppState>) -> Json<DiagnosticsResponse> {
    let store = state.store.clone();
    let status = match AssertUnwindSafe(async move { store.describe().await })
        .catch_unwind()
        .await
    {
        Ok(status) => status,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(error = %message, "Store probe panicked");
            StoreStatus {
                database: format!(
                    "❌ Error: {}",
                    truncate_chars(message, STATUS_ERROR_CHARS)
                ),
                connection_status: NOT_CONNECTED.to_string(),
                collections: Vec::new(),
            }
        }
    };

    let database = &state.config.database;
    Json(DiagnosticsResponse {
        backend: BACKEND_RUNNING.to_string(),
        database: status.database,
        database_url: flag(database.url_is_set()),
        database_name: flag(database.name_is_set()),
        connection_status: status.connection_status,
        collections: status.collections,
    })
}
