use crate::handlers::resources::{create_resource, CreatedResponse};
use crate::models::{BlogPost, Resource};
use crate::services::metrics::record_records_dropped;
use crate::startup::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use mongodb::bson::doc;
use serde::Deserialize;
use service_core::error::AppError;
use service_core::utils::ValidatedJson;

pub const DEFAULT_LIST_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct BlogListParams {
    pub limit: Option<i64>,
    pub lang: Option<String>,
}

/// `GET /api/blog?limit=&lang=`. `limit` defaults to 10 and is passed to the
/// store as given; `0` lists nothing and a negative or non-integer value is
/// a 422. An empty `lang` does not filter.
pub async fn list_blog_posts(
    State(state): State<AppState>,
    params: Result<Query<BlogListParams>, QueryRejection>,
) -> Result<Json<Vec<BlogPost>>, AppError> {
    let Query(params) = params.map_err(|e| AppError::InvalidPayload(e.body_text()))?;

    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    if limit < 0 {
        return Err(AppError::InvalidPayload(
            "limit must not be negative".to_string(),
        ));
    }

    let mut filter = doc! {};
    if let Some(lang) = params.lang.filter(|l| !l.is_empty()) {
        filter.insert("lang", lang);
    }

    let documents = state
        .store
        .find(BlogPost::COLLECTION, filter, limit)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list blog posts");
            AppError::from(e)
        })?;

    let fetched = documents.len();
    let posts = BlogPost::from_documents(documents);
    record_records_dropped(BlogPost::COLLECTION, fetched - posts.len());

    Ok(Json(posts))
}

#[tracing::instrument(skip_all)]
pub async fn create_blog_post(
    State(state): State<AppState>,
    ValidatedJson(post): ValidatedJson<BlogPost>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    create_resource(state.store.as_ref(), &post).await
}
