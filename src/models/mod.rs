pub mod enums;
mod appointment;
mod lab;
mod medication;
mod patient;
mod vital_sign;

pub use appointment::*;
pub use enums::*;
pub use lab::*;
pub use medication::*;
pub use patient::*;
pub use vital_sign::*;

use chrono::NaiveDate;

/// Storage format for every date column.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a stored `YYYY-MM-DD` date. Anything else is treated as malformed.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), ISO_DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn medication(status: MedicationStatus, start: &str, end: Option<&str>) -> Medication {
        Medication {
            id: 1,
            patient_id: "P001".into(),
            medication_name: "Metformin".into(),
            dosage: "1000mg".into(),
            frequency: "Twice daily".into(),
            start_date: start.into(),
            end_date: end.map(String::from),
            status,
        }
    }

    #[test]
    fn parse_iso_date_accepts_stored_format() {
        assert_eq!(
            parse_iso_date("2025-06-10"),
            NaiveDate::from_ymd_opt(2025, 6, 10)
        );
        assert_eq!(parse_iso_date("10/06/2025"), None);
        assert_eq!(parse_iso_date(""), None);
        assert_eq!(parse_iso_date("2025-02-30"), None);
    }

    #[test]
    fn active_medication_without_end_date_is_valid() {
        let med = medication(MedicationStatus::Active, "2024-03-01", None);
        assert!(med.check_status_invariant().is_ok());
        assert!(med.is_active());
    }

    #[test]
    fn active_medication_with_end_date_is_rejected() {
        let med = medication(MedicationStatus::Active, "2024-03-01", Some("2024-06-01"));
        assert!(med.check_status_invariant().is_err());
    }

    #[test]
    fn discontinued_medication_needs_ordered_end_date() {
        let ok = medication(MedicationStatus::Discontinued, "2022-01-10", Some("2022-01-10"));
        assert!(ok.check_status_invariant().is_ok());

        let missing = medication(MedicationStatus::Discontinued, "2022-01-10", None);
        assert!(missing.check_status_invariant().is_err());

        let reversed = medication(MedicationStatus::Discontinued, "2022-05-01", Some("2022-01-10"));
        assert!(reversed.check_status_invariant().is_err());
    }

    #[test]
    fn full_name_joins_first_and_last() {
        let patient = Patient {
            patient_id: "P001".into(),
            first_name: "Mary".into(),
            last_name: "Smith".into(),
            date_of_birth: None,
            age: 54,
            gender: "F".into(),
            primary_diagnosis: "Hypertension".into(),
            secondary_diagnosis: None,
            allergies: None,
            last_visit: None,
        };
        assert_eq!(patient.full_name(), "Mary Smith");
    }
}
