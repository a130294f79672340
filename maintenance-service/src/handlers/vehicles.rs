//! Vehicle handlers.

use axum::{extract::Path, Json};
use service_core::error::AppError;

use crate::{handlers::track, middleware::Store, models::Vehicle};

/// List every vehicle.
pub async fn list_vehicles(Store(db): Store) -> Result<Json<Vec<Vehicle>>, AppError> {
    tracing::debug!("Listing vehicles");

    let vehicles = track("list_vehicles", db.list_vehicles().await)?;

    Ok(Json(vehicles))
}

/// Get one vehicle.
///
/// Any failure to produce the row is reported as 404, including a non-numeric id
/// and a failing query. Query failures are still logged.
pub async fn get_vehicle(
    Store(db): Store,
    Path(raw_id): Path<String>,
) -> Result<Json<Vehicle>, AppError> {
    let not_found = || AppError::NotFound(anyhow::anyhow!("Vehicle not found"));

    let Ok(vehicle_id) = raw_id.parse::<i32>() else {
        tracing::debug!(raw_id = %raw_id, "Vehicle id is not an integer");
        return track("get_vehicle", Err(not_found()));
    };

    let vehicle = match db.get_vehicle(vehicle_id).await {
        Ok(vehicle) => vehicle,
        Err(e) => {
            tracing::error!(error = %e, vehicle_id = vehicle_id, "Vehicle lookup failed");
            None
        }
    };

    let vehicle = track("get_vehicle", vehicle.ok_or_else(not_found))?;

    Ok(Json(vehicle))
}
