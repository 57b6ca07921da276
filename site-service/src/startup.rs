use crate::config::{DatabaseConfig, SiteConfig};
use crate::handlers;
use crate::services::{DocumentStore, MongoStore, UnavailableStore};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: SiteConfig,
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(config: SiteConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self { config, store }
    }
}

/// Picks the store for this process. Missing settings or a client that
/// cannot be built leave the service running on [`UnavailableStore`].
pub async fn connect_store(config: &DatabaseConfig) -> Arc<dyn DocumentStore> {
    match (&config.url, &config.name) {
        (Some(url), Some(name)) => match MongoStore::connect(url, name).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::warn!(error = %e, "Running without a database");
                Arc::new(UnavailableStore)
            }
        },
        _ => {
            tracing::warn!("DATABASE_URL or DATABASE_NAME not set, running without a database");
            Arc::new(UnavailableStore)
        }
    }
}

/// Any origin, method and header; credentials allowed. Origins are mirrored
/// because a literal `*` cannot be combined with credentials.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/api/hello", get(handlers::hello))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/test", get(handlers::diagnostics))
        .route(
            "/api/blog",
            get(handlers::list_blog_posts).post(handlers::create_blog_post),
        )
        .route("/api/partners/leads", post(handlers::create_partner_lead))
        .route(
            "/api/contact/messages",
            post(handlers::create_contact_message),
        )
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(config: SiteConfig) -> Result<Self, AppError> {
        let store = connect_store(&config.database).await;
        Self::build_with_store(config, store).await
    }

    pub async fn build_with_store(
        config: SiteConfig,
        store: Arc<dyn DocumentStore>,
    ) -> Result<Self, AppError> {
        let app = build_router(AppState::new(config.clone(), store));

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
