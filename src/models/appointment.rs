use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::AppointmentStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: String,
    /// ISO-8601 date as stored. May be malformed in legacy rows.
    pub appointment_date: String,
    pub appointment_time: String,
    pub doctor_name: String,
    pub reason: String,
    pub status: AppointmentStatus,
    pub notes: String,
}

impl Appointment {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        super::parse_iso_date(&self.appointment_date)
    }
}
