//! Maintenance record handlers.
//!
//! Path ids are parsed by hand so that a malformed id is a 400 with our error
//! body rather than axum's plain-text rejection.

use axum::{body::Bytes, extract::Path, Json};
use service_core::error::AppError;
use validator::Validate;

use crate::{
    dtos::{NewServiceRecordRequest, ServiceRecordCreatedResponse},
    handlers::track,
    middleware::Store,
    models::ServiceRecord,
};

fn parse_id(raw: &str, label: &str) -> Result<i32, AppError> {
    raw.parse::<i32>().map_err(|_| {
        tracing::warn!(raw = %raw, "Invalid {} in path", label);
        AppError::BadRequest(anyhow::anyhow!("Invalid {}", label))
    })
}

/// List every service record of a vehicle.
pub async fn list_by_vehicle(
    Store(db): Store,
    Path(raw_vid): Path<String>,
) -> Result<Json<Vec<ServiceRecord>>, AppError> {
    const OP: &str = "list_service_records";

    let vehicle_id = track(OP, parse_id(&raw_vid, "vehicle id"))?;

    tracing::debug!(vehicle_id = vehicle_id, "Listing service records");

    let records = track(OP, db.list_service_records(vehicle_id).await)?;

    Ok(Json(records))
}

/// List the service records of a vehicle with a given service id.
pub async fn list_by_vehicle_and_service(
    Store(db): Store,
    Path((raw_vid, raw_sid)): Path<(String, String)>,
) -> Result<Json<Vec<ServiceRecord>>, AppError> {
    const OP: &str = "list_service_records_by_service";

    let vehicle_id = track(OP, parse_id(&raw_vid, "vehicle id"))?;
    let service_id = track(OP, parse_id(&raw_sid, "service id"))?;

    tracing::debug!(
        vehicle_id = vehicle_id,
        service_id = service_id,
        "Listing service records"
    );

    let records = track(
        OP,
        db.list_service_records_by_service(vehicle_id, service_id)
            .await,
    )?;

    Ok(Json(records))
}

/// Insert a service record under the vehicle and service ids named in the path.
///
/// The body is decoded regardless of `Content-Type`.
pub async fn add_service_record(
    Store(db): Store,
    Path((raw_vid, raw_sid)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<ServiceRecordCreatedResponse>, AppError> {
    const OP: &str = "add_service_record";

    let vehicle_id = track(OP, parse_id(&raw_vid, "vehicle id"))?;
    let service_id = track(OP, parse_id(&raw_sid, "service id"))?;

    let request: NewServiceRecordRequest = track(
        OP,
        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(error = %e, "Undecodable service record payload");
            AppError::BadRequest(anyhow::anyhow!("Invalid request payload"))
        }),
    )?;
    track(OP, request.validate().map_err(AppError::from))?;

    let record = request.into_record(vehicle_id, service_id);

    tracing::info!(
        vehicle_id = vehicle_id,
        service_id = service_id,
        part_code = %record.part_code,
        "Inserting service record"
    );

    let inserted = track(OP, db.insert_service_record(&record).await)?;

    Ok(Json(ServiceRecordCreatedResponse::from(inserted)))
}
