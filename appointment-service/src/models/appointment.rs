//! Appointment record.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A scheduled appointment.
///
/// Apart from `id`, every field is an opaque, optional string; the service
/// stores whatever the client sends.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Assigned by the store on insert. `None` or `0` means not yet persisted.
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Appointment {
    /// The persisted id, if this record has one.
    pub fn persisted_id(&self) -> Option<i32> {
        self.id.filter(|id| *id != 0)
    }

    /// True when saving this record should insert rather than overwrite.
    pub fn is_new(&self) -> bool {
        self.persisted_id().is_none()
    }

    /// Copy of this record carrying the given id.
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }
}
