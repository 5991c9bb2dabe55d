//! Appointment CRUD endpoints, mounted under `/appointmentapi`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::{models::Appointment, startup::AppState};

/// Body returned by a successful delete, whether or not the id existed.
pub const DELETE_CONFIRMATION: &str = "Appointment deleted successfully.";

/// Create an appointment; the store assigns its id.
pub async fn add_appointment(
    State(state): State<AppState>,
    Json(payload): Json<Appointment>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let saved = state.appointments.add_appointment(payload).await?;

    tracing::info!(appointment_id = ?saved.id, "Appointment added");

    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn get_all_appointments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = state.appointments.get_all_appointments().await?;
    Ok(Json(appointments))
}

pub async fn get_appointment_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Appointment>, AppError> {
    state
        .appointments
        .get_appointment_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Appointment not found: {}", id)))
}

/// Replace an existing appointment. The body must carry the id.
pub async fn update_appointment(
    State(state): State<AppState>,
    Json(payload): Json<Appointment>,
) -> Result<Json<Appointment>, AppError> {
    let updated = state.appointments.update_appointment(payload).await?;

    tracing::info!(appointment_id = ?updated.id, "Appointment updated");

    Ok(Json(updated))
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, &'static str), AppError> {
    state.appointments.delete_appointment_by_id(id).await?;

    tracing::info!(appointment_id = id, "Appointment deleted");

    Ok((StatusCode::OK, DELETE_CONFIRMATION))
}
