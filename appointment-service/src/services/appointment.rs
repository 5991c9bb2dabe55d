//! Appointment operations, forwarded one-to-one to the store.

use crate::models::Appointment;
use crate::services::metrics::record_operation;
use crate::services::store::AppointmentStore;
use service_core::error::AppError;
use std::sync::Arc;
use tracing::instrument;

#[derive(Clone)]
pub struct AppointmentService {
    store: Arc<dyn AppointmentStore>,
}

impl AppointmentService {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self { store }
    }

    /// Persist a new appointment. Any id sent by the caller is discarded so the
    /// store always assigns one.
    #[instrument(skip(self, appointment))]
    pub async fn add_appointment(&self, mut appointment: Appointment) -> Result<Appointment, AppError> {
        appointment.id = None;
        track("add", self.store.save(appointment).await)
    }

    #[instrument(skip(self))]
    pub async fn get_all_appointments(&self) -> Result<Vec<Appointment>, AppError> {
        track("get_all", self.store.find_all().await)
    }

    #[instrument(skip(self))]
    pub async fn get_appointment_by_id(&self, id: i32) -> Result<Option<Appointment>, AppError> {
        track("get_by_id", self.store.find_by_id(id).await)
    }

    /// Replace every field of the appointment identified by `appointment.id`.
    #[instrument(skip(self, appointment), fields(appointment_id = ?appointment.id))]
    pub async fn update_appointment(&self, appointment: Appointment) -> Result<Appointment, AppError> {
        track("update", self.store.save(appointment).await)
    }

    #[instrument(skip(self))]
    pub async fn delete_appointment_by_id(&self, id: i32) -> Result<(), AppError> {
        track("delete", self.store.delete_by_id(id).await)
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.store.health_check().await
    }
}

fn track<T>(operation: &str, result: Result<T, AppError>) -> Result<T, AppError> {
    match &result {
        Ok(_) => {
            tracing::debug!(operation, "Appointment operation completed");
            record_operation(operation, "ok");
        }
        Err(e) => {
            tracing::warn!(operation, error = %e, "Appointment operation failed");
            record_operation(operation, e.kind());
        }
    }
    result
}
