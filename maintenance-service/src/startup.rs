//! Application startup and lifecycle management.

use crate::config::MaintenanceConfig;
use crate::handlers::{self, maintenance, vehicles};
use crate::services::{init_metrics, Database};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::cors::cors_middleware;
use service_core::middleware::tracing::{request_id_middleware, REQUEST_ID_HEADER};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service_name: String,
    pub service_version: String,
    pub db: Option<Arc<Database>>,
}

impl AppState {
    pub fn new(
        service_name: impl Into<String>,
        service_version: impl Into<String>,
        db: Arc<Database>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            service_version: service_version.into(),
            db: Some(db),
        }
    }

    /// State with no database wired in. Every record route answers 500.
    pub fn detached(service_name: impl Into<String>, service_version: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            service_version: service_version.into(),
            db: None,
        }
    }
}

/// Build the HTTP router.
///
/// CORS is the outermost layer so preflight requests never reach routing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/vehicles", get(vehicles::list_vehicles))
        .route("/vehicle/:id", get(vehicles::get_vehicle))
        .route(
            "/vehicle/:id/viewmaintenance",
            get(maintenance::list_by_vehicle),
        )
        .route(
            "/vehicle/:vid/:sid/viewmaintenancebyvidsid",
            get(maintenance::list_by_vehicle_and_service),
        )
        .route(
            "/vehicle/:vid/:sid/addmaintenance",
            post(maintenance::add_service_record),
        )
        .fallback(handlers::not_found)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(middleware::from_fn(request_id_middleware))
        .layer(middleware::from_fn(cors_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    http_listener: TcpListener,
    state: AppState,
    db: Arc<Database>,
}

impl Application {
    /// Connect to the store and bind the listener.
    ///
    /// Fails if PostgreSQL cannot be reached; the caller decides whether to exit.
    pub async fn build(config: MaintenanceConfig) -> Result<Self, AppError> {
        init_metrics();

        let db = Database::new(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            e
        })?;
        let db = Arc::new(db);

        let state = AppState::new(
            config.service_name.clone(),
            config.service_version.clone(),
            db.clone(),
        );

        let http_addr = config.common.listen_addr()?;
        let http_listener = TcpListener::bind(http_addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %http_addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let http_port = http_listener.local_addr()?.port();

        tracing::info!(http_port = http_port, "Maintenance service listener bound");

        Ok(Self {
            http_port,
            http_listener,
            state,
            db,
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Run the application until the process is killed.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Serve until `shutdown` resolves, drain in-flight requests, then close the pool.
    pub async fn run_with_shutdown<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(
            service = %self.state.service_name,
            version = %self.state.service_version,
            http_port = self.http_port,
            "Service ready to accept connections"
        );

        let router = build_router(self.state);

        let result = axum::serve(self.http_listener, router)
            .with_graceful_shutdown(shutdown)
            .await;

        self.db.close().await;

        if let Err(e) = result {
            tracing::error!(error = %e, "HTTP server error");
            return Err(std::io::Error::other(format!("HTTP server error: {}", e)));
        }

        Ok(())
    }
}
