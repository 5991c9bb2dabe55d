//! Services module for appointment-service.

pub mod appointment;
pub mod database;
pub mod metrics;
pub mod store;

pub use appointment::AppointmentService;
pub use database::PgAppointmentStore;
pub use metrics::{get_metrics, init_metrics, record_operation};
pub use store::{AppointmentStore, InMemoryAppointmentStore};
