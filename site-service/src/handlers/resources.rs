use crate::models::Resource;
use crate::services::{metrics::record_resource_created, DocumentStore};
use axum::{http::StatusCode, Json};
use serde::Serialize;
use service_core::error::AppError;

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
    pub ok: bool,
}

/// Writes an already validated resource and shapes the 201 reply.
pub async fn create_resource<R: Resource>(
    store: &dyn DocumentStore,
    resource: &R,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let id = store.insert(R::COLLECTION, resource).await.map_err(|e| {
        tracing::error!(collection = R::COLLECTION, error = %e, "Failed to store resource");
        AppError::from(e)
    })?;

    record_resource_created(R::COLLECTION);
    tracing::info!(collection = R::COLLECTION, id = %id, "Resource created");

    Ok((StatusCode::CREATED, Json(CreatedResponse { id, ok: true })))
}
