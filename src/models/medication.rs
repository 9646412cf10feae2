use serde::{Deserialize, Serialize};

use super::enums::MedicationStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub id: i64,
    pub patient_id: String,
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub start_date: String,
    /// Present iff the medication is discontinued.
    pub end_date: Option<String>,
    pub status: MedicationStatus,
}

impl Medication {
    pub fn is_active(&self) -> bool {
        self.status == MedicationStatus::Active
    }

    /// Check the status/end-date pairing required of stored rows.
    pub fn check_status_invariant(&self) -> Result<(), String> {
        match (self.status, self.end_date.as_deref()) {
            (MedicationStatus::Active, None) => Ok(()),
            (MedicationStatus::Active, Some(end)) => Err(format!(
                "active medication {} must not have an end date (got {end})",
                self.medication_name
            )),
            (MedicationStatus::Discontinued, None) => Err(format!(
                "discontinued medication {} requires an end date",
                self.medication_name
            )),
            (MedicationStatus::Discontinued, Some(end)) => {
                let start = super::parse_iso_date(&self.start_date);
                let end_parsed = super::parse_iso_date(end);
                match (start, end_parsed) {
                    (Some(start), Some(end_parsed)) if end_parsed >= start => Ok(()),
                    (Some(_), Some(_)) => Err(format!(
                        "medication {} ends ({end}) before it starts ({})",
                        self.medication_name, self.start_date
                    )),
                    _ => Err(format!(
                        "medication {} has unparseable dates",
                        self.medication_name
                    )),
                }
            }
        }
    }
}
