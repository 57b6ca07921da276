use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use site_service::config::{DatabaseConfig, SiteConfig};
use site_service::services::{DocumentStore, MongoStore};
use site_service::startup::{build_router, AppState, Application};
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;

pub const TEST_MONGODB_URI: &str = "mongodb://localhost:27017";

pub fn test_config(database_configured: bool) -> SiteConfig {
    let database = if database_configured {
        DatabaseConfig {
            url: Some(TEST_MONGODB_URI.to_string()),
            name: Some("site_test".to_string()),
        }
    } else {
        DatabaseConfig::default()
    };

    SiteConfig {
        common: CoreConfig {
            port: 0,
            log_level: "error".to_string(),
        },
        database,
        otlp_endpoint: None,
    }
}

pub fn router_with(store: Arc<dyn DocumentStore>, database_configured: bool) -> Router {
    build_router(AppState::new(test_config(database_configured), store))
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response body is not JSON")
    };
    (status, body)
}

/// A server bound to a random port, backed by a throwaway MongoDB database.
pub struct TestApp {
    pub address: String,
    pub store: MongoStore,
    pub db_name: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let db_name = format!("site_test_{}", Uuid::new_v4());
        let mut config = test_config(true);
        config.database.name = Some(db_name.clone());

        let store = MongoStore::connect(TEST_MONGODB_URI, &db_name)
            .await
            .expect("Failed to create MongoDB client");

        let app = Application::build_with_store(config, Arc::new(store.clone()))
            .await
            .expect("Failed to build test application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            store,
            db_name,
        }
    }

    pub async fn cleanup(&self) {
        let _ = self.store.client().database(&self.db_name).drop(None).await;
    }
}
