//! Domain models for maintenance-service.

mod service_record;
mod vehicle;

pub use service_record::ServiceRecord;
pub use vehicle::Vehicle;
