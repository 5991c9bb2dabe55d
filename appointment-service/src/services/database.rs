//! PostgreSQL store for appointment-service.

use crate::models::Appointment;
use crate::services::metrics::DB_QUERY_DURATION;
use crate::services::store::AppointmentStore;
use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info, instrument};

const APPOINTMENT_COLUMNS: &str =
    "id, patient_name, doctor_name, department, date, time, reason, status, contact, email";

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct PgAppointmentStore {
    pool: PgPool,
}

impl PgAppointmentStore {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "appointment-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    async fn insert(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["insert_appointment"])
            .start_timer();

        let sql = format!(
            r#"
            INSERT INTO appointments (patient_name, doctor_name, department, date, time, reason, status, contact, email)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            APPOINTMENT_COLUMNS
        );
        let saved = sqlx::query_as::<_, Appointment>(&sql)
            .bind(&appointment.patient_name)
            .bind(&appointment.doctor_name)
            .bind(&appointment.department)
            .bind(&appointment.date)
            .bind(&appointment.time)
            .bind(&appointment.reason)
            .bind(&appointment.status)
            .bind(&appointment.contact)
            .bind(&appointment.email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to create appointment: {}", e))
            })?;

        timer.observe_duration();

        info!(appointment_id = ?saved.id, "Appointment created");

        Ok(saved)
    }

    async fn update(&self, id: i32, appointment: &Appointment) -> Result<Appointment, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_appointment"])
            .start_timer();

        let sql = format!(
            r#"
            UPDATE appointments
            SET patient_name = $2, doctor_name = $3, department = $4, date = $5, time = $6,
                reason = $7, status = $8, contact = $9, email = $10
            WHERE id = $1
            RETURNING {}
            "#,
            APPOINTMENT_COLUMNS
        );
        let updated = sqlx::query_as::<_, Appointment>(&sql)
            .bind(id)
            .bind(&appointment.patient_name)
            .bind(&appointment.doctor_name)
            .bind(&appointment.department)
            .bind(&appointment.date)
            .bind(&appointment.time)
            .bind(&appointment.reason)
            .bind(&appointment.status)
            .bind(&appointment.contact)
            .bind(&appointment.email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to update appointment: {}", e))
            })?;

        timer.observe_duration();

        let updated = updated.ok_or_else(|| {
            AppError::DatabaseError(anyhow::anyhow!(
                "Failed to update appointment: no row with id {}",
                id
            ))
        })?;

        info!(appointment_id = id, "Appointment updated");

        Ok(updated)
    }
}

#[async_trait]
impl AppointmentStore for PgAppointmentStore {
    #[instrument(skip(self, appointment), fields(appointment_id = ?appointment.id))]
    async fn save(&self, appointment: Appointment) -> Result<Appointment, AppError> {
        match appointment.persisted_id() {
            None => self.insert(&appointment).await,
            Some(id) => self.update(id, &appointment).await,
        }
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Appointment>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_appointments"])
            .start_timer();

        let sql = format!("SELECT {} FROM appointments ORDER BY id", APPOINTMENT_COLUMNS);
        let appointments = sqlx::query_as::<_, Appointment>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list appointments: {}", e))
            })?;

        timer.observe_duration();

        Ok(appointments)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> Result<Option<Appointment>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_appointment"])
            .start_timer();

        let sql = format!("SELECT {} FROM appointments WHERE id = $1", APPOINTMENT_COLUMNS);
        let appointment = sqlx::query_as::<_, Appointment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to get appointment: {}", e))
            })?;

        timer.observe_duration();

        Ok(appointment)
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: i32) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_appointment"])
            .start_timer();

        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete appointment: {}", e))
            })?;

        timer.observe_duration();

        debug!(rows_affected = result.rows_affected(), "Appointment delete executed");

        Ok(())
    }

    /// Check database health.
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }
}
