use crate::handlers::resources::{create_resource, CreatedResponse};
use crate::models::PartnerLead;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, Json};
use service_core::error::AppError;
use service_core::utils::ValidatedJson;

#[tracing::instrument(skip_all)]
pub async fn create_partner_lead(
    State(state): State<AppState>,
    ValidatedJson(lead): ValidatedJson<PartnerLead>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    create_resource(state.store.as_ref(), &lead).await
}
