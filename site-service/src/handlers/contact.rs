use crate::handlers::resources::{create_resource, CreatedResponse};
use crate::models::ContactMessage;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, Json};
use service_core::error::AppError;
use service_core::utils::ValidatedJson;

#[tracing::instrument(skip_all)]
pub async fn create_contact_message(
    State(state): State<AppState>,
    ValidatedJson(message): ValidatedJson<ContactMessage>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    create_resource(state.store.as_ref(), &message).await
}
