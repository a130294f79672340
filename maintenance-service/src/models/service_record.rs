//! Maintenance service record model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One maintenance event for a vehicle, as stored in `detailed_service_record`.
///
/// Money columns are `NUMERIC` in the store and plain JSON numbers on the wire.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub service_id: i32,
    pub vehicle_id: i32,
    pub service_date: NaiveDate,
    pub part_code: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub taxable_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_amount: Decimal,
}
