//! Appointment Service - CRUD scheduling of appointments as a microservice.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

pub use startup::{build_router, AppState, Application};
