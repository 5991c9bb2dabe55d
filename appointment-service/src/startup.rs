//! Application startup and lifecycle management.
//!
//! Wiring happens here and nowhere else: store → service → `AppState` → router.

use crate::config::{AppointmentConfig, StoreBackend};
use crate::handlers::{appointments, health};
use crate::services::{
    init_metrics, AppointmentService, AppointmentStore, InMemoryAppointmentStore,
    PgAppointmentStore,
};
use axum::{
    body::Body,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{make_request_span, metrics_middleware, request_id_middleware};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Fixed prefix of the appointment API.
pub const BASE_PATH: &str = "/appointmentapi";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub appointments: AppointmentService,
}

impl AppState {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self {
            appointments: AppointmentService::new(store),
        }
    }
}

/// Route table of the appointment API, relative to [`BASE_PATH`].
pub fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(appointments::add_appointment))
        .route("/all", get(appointments::get_all_appointments))
        .route("/get/:id", get(appointments::get_appointment_by_id))
        .route("/update", put(appointments::update_appointment))
        .route("/delete/:id", delete(appointments::delete_appointment))
}

/// Build the full HTTP router: probes, metrics and the appointment API.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics_handler))
        .nest(BASE_PATH, appointment_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        // Any origin may call the API.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    http_listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    ///
    /// The PostgreSQL backend connects and applies pending migrations first.
    pub async fn build(config: AppointmentConfig) -> Result<Self, AppError> {
        let store: Arc<dyn AppointmentStore> = match config.store {
            StoreBackend::Postgres => {
                let db = PgAppointmentStore::new(
                    &config.database.url,
                    config.database.max_connections,
                    config.database.min_connections,
                )
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to connect to PostgreSQL");
                    e
                })?;

                db.run_migrations().await.map_err(|e| {
                    tracing::error!(error = %e, "Failed to run migrations");
                    e
                })?;

                Arc::new(db)
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory appointment store - data is lost on restart");
                Arc::new(InMemoryAppointmentStore::new())
            }
        };

        Self::build_with_store(config, store).await
    }

    /// Build the application around an already constructed store.
    pub async fn build_with_store(
        config: AppointmentConfig,
        store: Arc<dyn AppointmentStore>,
    ) -> Result<Self, AppError> {
        init_metrics();

        let state = AppState::new(store);

        // Port 0 = random port for testing
        let http_addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let http_listener = TcpListener::bind(http_addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %http_addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let http_port = http_listener.local_addr()?.port();

        tracing::info!(
            http_port = http_port,
            store = %config.store,
            "Appointment service listener bound"
        );

        Ok(Self {
            http_port,
            http_listener,
            state,
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    /// Run the application until Ctrl-C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Run the application until `shutdown` resolves, then drain in-flight
    /// requests before returning.
    pub async fn run_until<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let http_router = build_router(self.state);

        tracing::info!(
            service = "appointment-service",
            version = env!("CARGO_PKG_VERSION"),
            http_port = self.http_port,
            "Service ready to accept connections"
        );

        axum::serve(self.http_listener, http_router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "HTTP server error");
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}

/// Resolves on Ctrl-C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
