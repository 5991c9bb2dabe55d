//! HTTP handlers for appointment-service.

pub mod appointments;
pub mod health;
