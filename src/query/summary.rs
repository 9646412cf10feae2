//! Clinical summary: a fixed-layout overview of one patient, independent
//! of any query text.

use super::format::{format_value, glyph, PATIENT_NOT_FOUND};
use super::scope::{sort_appointments_newest_first, sort_labs_newest_first, MedicationSections};
use super::source::{require_patient, rows_or_empty, PatientDataSource};
use super::QueryError;
use crate::config::QueryConfig;
use crate::models::*;

/// Summarize a patient with the default caps.
pub fn summarize<S: PatientDataSource + ?Sized>(source: &S, patient_id: &str) -> String {
    summarize_with(source, patient_id, &QueryConfig::default())
}

/// Summarize a patient. Unknown or unreadable patients yield
/// "Patient not found."; unreadable collections render as empty.
pub fn summarize_with<S: PatientDataSource + ?Sized>(
    source: &S,
    patient_id: &str,
    config: &QueryConfig,
) -> String {
    let patient = match require_patient(source, patient_id) {
        Ok(patient) => patient,
        Err(QueryError::PatientNotFound(_)) => return PATIENT_NOT_FOUND.to_string(),
        Err(e) => {
            tracing::warn!(patient_id, "Summary unavailable: {e}");
            return PATIENT_NOT_FOUND.to_string();
        }
    };

    let medications = rows_or_empty(source.medications(patient_id), "medications", patient_id);
    let mut labs = rows_or_empty(source.labs(patient_id), "lab results", patient_id);
    let mut appointments = rows_or_empty(source.appointments(patient_id), "appointments", patient_id);

    sort_labs_newest_first(&mut labs);
    labs.truncate(config.summary_lab_limit);

    sort_appointments_newest_first(&mut appointments);
    appointments.truncate(config.summary_appointment_limit);

    let mut text = demographics(&patient);
    text.push_str(&medication_section(medications));
    text.push_str(&lab_section(&labs));
    text.push_str(&appointment_section(&appointments));
    text
}

fn demographics(patient: &Patient) -> String {
    let mut text = format!("### 📋 Patient Summary: {}\n", patient.full_name());
    text.push_str(&format!("**Demographics:** {}y {}\n", patient.age, patient.gender));
    text.push_str(&format!("**Diagnosis:** {}\n", patient.primary_diagnosis));
    if let Some(ref secondary) = patient.secondary_diagnosis {
        text.push_str(&format!("**Secondary Diagnosis:** {secondary}\n"));
    }
    if let Some(ref allergies) = patient.allergies {
        text.push_str(&format!("**Allergies:** {allergies}\n"));
    }
    text.push_str(&format!(
        "**Last Visit:** {}\n",
        patient.last_visit.as_deref().unwrap_or("N/A")
    ));
    text.push_str("\n#### 🔍 Recent Clinical Data\n");
    text
}

fn medication_section(medications: Vec<Medication>) -> String {
    let mut text = String::from("\n**Current Medications:**\n");
    if medications.is_empty() {
        text.push_str("*No medication history.*\n");
        return text;
    }

    let sections = MedicationSections::split(medications);
    if sections.active.is_empty() {
        text.push_str("*No active medications.*\n");
    }
    for med in &sections.active {
        text.push_str(&format!(
            "- {} {} ({})\n",
            med.medication_name, med.dosage, med.frequency
        ));
    }
    text
}

fn lab_section(labs: &[LabResult]) -> String {
    let mut text = String::from("\n**Recent Lab Results:**\n");
    if labs.is_empty() {
        text.push_str("*No lab results found.*\n");
    }
    for lab in labs {
        text.push_str(&format!(
            "- {} {}: {} {} ({}) on {}\n",
            glyph(lab.interpretation),
            lab.test_name,
            format_value(lab.value),
            lab.unit,
            lab.interpretation,
            lab.result_date
        ));
    }
    text
}

fn appointment_section(appointments: &[Appointment]) -> String {
    let mut text = String::from("\n**Recent Appointments:**\n");
    if appointments.is_empty() {
        text.push_str("*No appointments found.*\n");
    }
    for appt in appointments {
        text.push_str(&format!(
            "- {}: {} ({})\n",
            appt.appointment_date, appt.reason, appt.status
        ));
    }
    text
}
