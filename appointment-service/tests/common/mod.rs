//! Common test utilities for appointment-service integration tests.

#![allow(dead_code)]

use appointment_service::config::{AppointmentConfig, DatabaseConfig, StoreBackend};
use appointment_service::models::Appointment;
use appointment_service::services::{AppointmentStore, InMemoryAppointmentStore};
use appointment_service::startup::{build_router, AppState, Application};
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, Response};
use axum::Router;
use async_trait::async_trait;
use serde_json::Value;
use service_core::config::Config as CommonConfig;
use service_core::error::AppError;
use std::sync::{Arc, Once};
use tower::util::ServiceExt;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,appointment_service=debug,sqlx=warn")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Test configuration backed by the in-memory store on a random port.
pub fn test_config() -> AppointmentConfig {
    AppointmentConfig {
        common: CommonConfig { port: 0 },
        service_name: "appointment-service-test".to_string(),
        service_version: "test".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        store: StoreBackend::Memory,
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 2,
            min_connections: 1,
        },
    }
}

/// Router over a fresh in-memory store.
pub fn memory_router() -> Router {
    init_tracing();
    let store: Arc<dyn AppointmentStore> = Arc::new(InMemoryAppointmentStore::new());
    build_router(AppState::new(store))
}

/// Store whose every call fails, as if the database were unreachable.
pub struct FailingAppointmentStore;

fn unreachable_db() -> AppError {
    AppError::DatabaseError(anyhow::anyhow!("connection refused"))
}

#[async_trait]
impl AppointmentStore for FailingAppointmentStore {
    async fn save(&self, _appointment: Appointment) -> Result<Appointment, AppError> {
        Err(unreachable_db())
    }

    async fn find_all(&self) -> Result<Vec<Appointment>, AppError> {
        Err(unreachable_db())
    }

    async fn find_by_id(&self, _id: i32) -> Result<Option<Appointment>, AppError> {
        Err(unreachable_db())
    }

    async fn delete_by_id(&self, _id: i32) -> Result<(), AppError> {
        Err(unreachable_db())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Err(unreachable_db())
    }
}

/// Router over a store that cannot be reached.
pub fn failing_router() -> Router {
    init_tracing();
    build_router(AppState::new(Arc::new(FailingAppointmentStore)))
}

/// Send one request through the router and return status plus decoded body.
///
/// JSON bodies come back as JSON values, anything else as a JSON string.
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (u16, Value) {
    let response = app.clone().oneshot(request(method, uri, body)).await.unwrap();
    read(response).await
}

pub fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn read(response: Response<Body>) -> (u16, Value) {
    let status = response.status().as_u16();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

/// Test application running on a real socket.
pub struct TestApp {
    pub http_address: String,
    pub http_port: u16,
}

/// Spawn the full application with the in-memory store.
pub async fn spawn_app() -> TestApp {
    init_tracing();

    let app = Application::build(test_config())
        .await
        .expect("Failed to build application");

    let http_port = app.http_port();
    let http_address = format!("http://127.0.0.1:{}", http_port);

    tokio::spawn(async move {
        app.run_until(std::future::pending()).await.ok();
    });

    // Wait for HTTP server to be ready by polling health endpoint
    let client = reqwest::Client::new();
    let health_url = format!("{}/health", http_address);
    for _ in 0..50 {
        if client.get(&health_url).send().await.is_ok() {
            break;
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
    }

    TestApp {
        http_address,
        http_port,
    }
}
