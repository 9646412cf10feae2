//! Record builders shared by the query tests.

use crate::models::*;

pub fn patient(id: &str, first_name: &str) -> Patient {
    Patient {
        patient_id: id.into(),
        first_name: first_name.into(),
        last_name: "Smith".into(),
        date_of_birth: Some("1970-04-12".into()),
        age: 54,
        gender: "F".into(),
        primary_diagnosis: "Type 2 Diabetes".into(),
        secondary_diagnosis: None,
        allergies: Some("Penicillin".into()),
        last_visit: Some("2025-11-20".into()),
    }
}

pub fn lab(patient_id: &str, date: &str, test: &str, value: f64, interp: Interpretation) -> LabResult {
    LabResult {
        id: 0,
        patient_id: patient_id.into(),
        result_date: date.into(),
        test_name: test.into(),
        value,
        unit: "mg/dL".into(),
        reference_low: None,
        reference_high: None,
        interpretation: interp,
    }
}

pub fn active_med(patient_id: &str, name: &str, start: &str) -> Medication {
    Medication {
        id: 0,
        patient_id: patient_id.into(),
        medication_name: name.into(),
        dosage: "10mg".into(),
        frequency: "Daily".into(),
        start_date: start.into(),
        end_date: None,
        status: MedicationStatus::Active,
    }
}

pub fn discontinued_med(patient_id: &str, name: &str, start: &str, end: &str) -> Medication {
    Medication {
        end_date: Some(end.into()),
        status: MedicationStatus::Discontinued,
        ..active_med(patient_id, name, start)
    }
}

pub fn appointment(patient_id: &str, date: &str, time: &str, status: AppointmentStatus) -> Appointment {
    Appointment {
        id: 0,
        patient_id: patient_id.into(),
        appointment_date: date.into(),
        appointment_time: time.into(),
        doctor_name: "Dr. Sarah Chen".into(),
        reason: "Follow-up".into(),
        status,
        notes: String::new(),
    }
}
