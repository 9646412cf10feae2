//! Repository layer: patient-scoped database operations.
//!
//! One sub-module per record type. Reads fetch a patient's whole
//! collection; writes are single-transaction inserts.

mod appointment;
mod lab_result;
mod medication;
mod patient;
mod vital_sign;

pub use appointment::*;
pub use lab_result::*;
pub use medication::*;
pub use patient::*;
pub use vital_sign::*;

use crate::db::DatabaseError;

/// Reject a date column value that is not `YYYY-MM-DD`.
fn check_iso_date(column: &str, raw: &str) -> Result<(), DatabaseError> {
    if crate::models::parse_iso_date(raw).is_none() {
        return Err(DatabaseError::ConstraintViolation(format!(
            "{column} must be YYYY-MM-DD, got {raw:?}"
        )));
    }
    Ok(())
}
