//! Request and response bodies for the maintenance endpoints.

use crate::models::ServiceRecord;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

pub const RECORD_INSERTED_MESSAGE: &str = "Record inserted successfully";

/// Body of `POST /vehicle/:vid/:sid/addmaintenance`.
///
/// `vehicle_id` / `service_id` in the JSON are ignored; the path decides them.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewServiceRecordRequest {
    pub service_date: NaiveDate,
    #[validate(length(min = 1, message = "part_code must not be empty"))]
    pub part_code: String,
    #[serde(deserialize_with = "json_number")]
    #[validate(custom(function = "non_negative"))]
    pub rate: Decimal,
    #[serde(deserialize_with = "json_number")]
    #[validate(custom(function = "non_negative"))]
    pub taxable_amount: Decimal,
    #[serde(deserialize_with = "json_number")]
    #[validate(custom(function = "non_negative"))]
    pub final_amount: Decimal,
}

/// Money arrives as a JSON number. Strings are rejected even when they hold digits.
fn json_number<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Decimal::try_from(value).map_err(serde::de::Error::custom)
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("amount must not be negative".into());
        return Err(err);
    }
    Ok(())
}

impl NewServiceRecordRequest {
    pub fn into_record(self, vehicle_id: i32, service_id: i32) -> ServiceRecord {
        ServiceRecord {
            service_id,
            vehicle_id,
            service_date: self.service_date,
            part_code: self.part_code,
            rate: self.rate,
            taxable_amount: self.taxable_amount,
            final_amount: self.final_amount,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ServiceRecordCreatedResponse {
    pub message: &'static str,
    pub record: ServiceRecord,
}

impl From<ServiceRecord> for ServiceRecordCreatedResponse {
    fn from(record: ServiceRecord) -> Self {
        Self {
            message: RECORD_INSERTED_MESSAGE,
            record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn decode(body: &str) -> NewServiceRecordRequest {
        serde_json::from_str(body).expect("body should decode")
    }

    #[test]
    fn body_ids_are_ignored_in_favour_of_path() {
        let request = decode(
            r#"{
                "service_id": 1,
                "vehicle_id": 2,
                "service_date": "2024-03-15",
                "part_code": "BRK-01",
                "rate": 120.5,
                "taxable_amount": 100,
                "final_amount": 118.0
            }"#,
        );

        let record = request.into_record(7, 42);
        assert_eq!(record.vehicle_id, 7);
        assert_eq!(record.service_id, 42);
        assert_eq!(record.rate, dec!(120.5));
        assert_eq!(record.taxable_amount, dec!(100));
        assert_eq!(
            record.service_date,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
    }

    #[test]
    fn missing_field_fails_to_decode() {
        let result = serde_json::from_str::<NewServiceRecordRequest>(
            r#"{"service_date": "2024-03-15", "part_code": "X", "rate": 1}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn malformed_date_fails_to_decode() {
        let result = serde_json::from_str::<NewServiceRecordRequest>(
            r#"{"service_date": "15/03/2024", "part_code": "X",
                "rate": 1, "taxable_amount": 1, "final_amount": 1}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn quoted_amount_fails_to_decode() {
        for field in ["rate", "taxable_amount", "final_amount"] {
            let mut body = serde_json::json!({
                "service_date": "2024-03-15",
                "part_code": "OIL",
                "rate": 1,
                "taxable_amount": 1,
                "final_amount": 1
            });
            body[field] = serde_json::json!("5");

            let result = serde_json::from_value::<NewServiceRecordRequest>(body);
            assert!(result.is_err(), "{} given as a string should be rejected", field);
        }
    }

    #[test]
    fn negative_amount_fails_validation() {
        let request = decode(
            r#"{"service_date": "2024-03-15", "part_code": "OIL",
                "rate": -1.0, "taxable_amount": 0, "final_amount": 0}"#,
        );
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("rate"));
    }

    #[test]
    fn zero_amounts_are_accepted() {
        let request = decode(
            r#"{"service_date": "2024-03-15", "part_code": "OIL",
                "rate": 0, "taxable_amount": 0.0, "final_amount": 0}"#,
        );
        assert!(request.validate().is_ok());
    }

    #[test]
    fn empty_part_code_fails_validation() {
        let request = decode(
            r#"{"service_date": "2024-03-15", "part_code": "",
                "rate": 1, "taxable_amount": 1, "final_amount": 1}"#,
        );
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("part_code"));
    }

    #[test]
    fn created_response_serializes_amounts_as_numbers() {
        let record = ServiceRecord {
            service_id: 42,
            vehicle_id: 7,
            service_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            part_code: "CHN-9".to_string(),
            rate: dec!(10.25),
            taxable_amount: dec!(10),
            final_amount: dec!(11.8),
        };

        let json = serde_json::to_value(ServiceRecordCreatedResponse::from(record)).unwrap();
        assert_eq!(json["message"], RECORD_INSERTED_MESSAGE);
        assert_eq!(json["record"]["service_date"], "2024-01-02");
        assert_eq!(json["record"]["rate"], 10.25);
        assert_eq!(json["record"]["final_amount"], 11.8);
        assert_eq!(json["record"]["vehicle_id"], 7);
    }
}
