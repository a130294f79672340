//! Database service for maintenance-service.

use crate::models::{ServiceRecord, Vehicle};
use crate::services::metrics::DB_QUERY_DURATION;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

const VEHICLE_COLUMNS: &str = "id, make, model, year, mileage";

const SERVICE_RECORD_COLUMNS: &str = "serviceid AS service_id, vehicleid AS vehicle_id, \
     service_date, partcode AS part_code, rate, taxable_amount, final_amount";

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool and verify the store answers.
    #[instrument(skip(database_url), fields(service = "maintenance-service"))]
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

        let db = Self { pool };
        db.health_check().await?;

        info!("PostgreSQL connection pool established");

        Ok(db)
    }

    /// Wrap an existing pool without touching the store.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["health_check"])
            .start_timer();

        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;

        timer.observe_duration();
        Ok(())
    }

    /// Close every pooled connection. Idempotent.
    pub async fn close(&self) {
        if !self.pool.is_closed() {
            self.pool.close().await;
            info!("PostgreSQL connection pool closed");
        }
    }

    // -------------------------------------------------------------------------
    // Vehicle Operations
    // -------------------------------------------------------------------------

    /// List every vehicle.
    #[instrument(skip(self))]
    pub async fn list_vehicles(&self) -> Result<Vec<Vehicle>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_vehicles"])
            .start_timer();

        let vehicles = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM owned_vehicles ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list vehicles: {}", e)))?;

        timer.observe_duration();

        Ok(vehicles)
    }

    /// Get a vehicle by ID.
    #[instrument(skip(self), fields(vehicle_id = %vehicle_id))]
    pub async fn get_vehicle(&self, vehicle_id: i32) -> Result<Option<Vehicle>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_vehicle"])
            .start_timer();

        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM owned_vehicles WHERE id = $1"
        ))
        .bind(vehicle_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get vehicle: {}", e)))?;

        timer.observe_duration();

        Ok(vehicle)
    }

    // -------------------------------------------------------------------------
    // Service Record Operations
    // -------------------------------------------------------------------------

    /// List the service records of one vehicle.
    #[instrument(skip(self), fields(vehicle_id = %vehicle_id))]
    pub async fn list_service_records(
        &self,
        vehicle_id: i32,
    ) -> Result<Vec<ServiceRecord>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_service_records"])
            .start_timer();

        let records = sqlx::query_as::<_, ServiceRecord>(&format!(
            r#"
            SELECT {SERVICE_RECORD_COLUMNS}
            FROM detailed_service_record
            WHERE vehicleid = $1
            ORDER BY serviceid
            "#
        ))
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list service records: {}", e))
        })?;

        timer.observe_duration();

        Ok(records)
    }

    /// List the service records matching both a vehicle and a service ID.
    #[instrument(skip(self), fields(vehicle_id = %vehicle_id, service_id = %service_id))]
    pub async fn list_service_records_by_service(
        &self,
        vehicle_id: i32,
        service_id: i32,
    ) -> Result<Vec<ServiceRecord>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_service_records_by_service"])
            .start_timer();

        let records = sqlx::query_as::<_, ServiceRecord>(&format!(
            r#"
            SELECT {SERVICE_RECORD_COLUMNS}
            FROM detailed_service_record
            WHERE vehicleid = $1 AND serviceid = $2
            ORDER BY serviceid
            "#
        ))
        .bind(vehicle_id)
        .bind(service_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list service records: {}", e))
        })?;

        timer.observe_duration();

        Ok(records)
    }

    /// Insert a service record and return the row as stored.
    #[instrument(
        skip(self, record),
        fields(vehicle_id = %record.vehicle_id, service_id = %record.service_id)
    )]
    pub async fn insert_service_record(
        &self,
        record: &ServiceRecord,
    ) -> Result<ServiceRecord, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["insert_service_record"])
            .start_timer();

        let inserted = sqlx::query_as::<_, ServiceRecord>(&format!(
            r#"
            INSERT INTO detailed_service_record
                (serviceid, vehicleid, service_date, partcode, rate, taxable_amount, final_amount)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {SERVICE_RECORD_COLUMNS}
            "#
        ))
        .bind(record.service_id)
        .bind(record.vehicle_id)
        .bind(record.service_date)
        .bind(&record.part_code)
        .bind(record.rate)
        .bind(record.taxable_amount)
        .bind(record.final_amount)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to insert service record: {}", e))
        })?;

        timer.observe_duration();

        info!(
            vehicle_id = inserted.vehicle_id,
            service_id = inserted.service_id,
            "Service record inserted"
        );

        Ok(inserted)
    }
}
