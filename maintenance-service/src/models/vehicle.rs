//! Vehicle model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An owned vehicle, as stored in `owned_vehicles`.
///
/// Read-only from this service's point of view.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i32,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub mileage: i32,
}
