//! Persistence seam for appointments.

use crate::models::Appointment;
use async_trait::async_trait;
use service_core::error::AppError;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Repository over the appointments table.
///
/// `save` inserts when the record has no id and overwrites otherwise;
/// `find_by_id` reports absence as `None`; `delete_by_id` ignores unknown ids.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn save(&self, appointment: Appointment) -> Result<Appointment, AppError>;
    async fn find_all(&self) -> Result<Vec<Appointment>, AppError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Appointment>, AppError>;
    async fn delete_by_id(&self, id: i32) -> Result<(), AppError>;
    async fn health_check(&self) -> Result<(), AppError>;
}

#[derive(Default)]
struct Rows {
    last_id: i32,
    by_id: BTreeMap<i32, Appointment>,
}

/// Process-local store with a SERIAL-like id sequence starting at 1.
#[derive(Default)]
pub struct InMemoryAppointmentStore {
    rows: Mutex<Rows>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> Result<MutexGuard<'_, Rows>, AppError> {
        self.rows
            .lock()
            .map_err(|_| AppError::DatabaseError(anyhow::anyhow!("In-memory store lock poisoned")))
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn save(&self, appointment: Appointment) -> Result<Appointment, AppError> {
        let mut rows = self.rows()?;

        let saved = match appointment.persisted_id() {
            None => {
                let id = rows.last_id.checked_add(1).ok_or_else(|| {
                    AppError::DatabaseError(anyhow::anyhow!(
                        "Failed to create appointment: id sequence exhausted"
                    ))
                })?;
                rows.last_id = id;
                let saved = appointment.with_id(id);
                rows.by_id.insert(id, saved.clone());
                saved
            }
            Some(id) => {
                let slot = rows.by_id.get_mut(&id).ok_or_else(|| {
                    AppError::DatabaseError(anyhow::anyhow!(
                        "Failed to update appointment: no row with id {}",
                        id
                    ))
                })?;
                *slot = appointment;
                slot.clone()
            }
        };

        Ok(saved)
    }

    async fn find_all(&self) -> Result<Vec<Appointment>, AppError> {
        let rows = self.rows()?;
        Ok(rows.by_id.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Appointment>, AppError> {
        let rows = self.rows()?;
        Ok(rows.by_id.get(&id).cloned())
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), AppError> {
        let mut rows = self.rows()?;
        rows.by_id.remove(&id);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.rows().map(|_| ())
    }
}
