use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::Interpretation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabResult {
    pub id: i64,
    pub patient_id: String,
    /// ISO-8601 date as stored. May be malformed in legacy rows.
    pub result_date: String,
    pub test_name: String,
    pub value: f64,
    pub unit: String,
    pub reference_low: Option<f64>,
    pub reference_high: Option<f64>,
    pub interpretation: Interpretation,
}

impl LabResult {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        super::parse_iso_date(&self.result_date)
    }
}
