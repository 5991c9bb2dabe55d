//! Domain models for appointment-service.

mod appointment;

pub use appointment::Appointment;
