//! Response templates. Every answer is assembled here from already
//! filtered and ordered records; nothing is re-sorted or re-filtered.

use super::scope::{MedicationScope, MedicationSections};
use crate::models::*;

pub const NO_PATIENT_SELECTED: &str = "Please select a patient first to analyze their records.";
pub const PATIENT_NOT_FOUND: &str = "Patient not found.";
pub const NO_MATCHING_LABS: &str =
    "No matching lab results found for the specified tests or time period.";
pub const NO_UPCOMING_APPOINTMENTS: &str = "No upcoming appointments found.";

const LAB_TABLE_HEADER: &str = "| Date | Test | Value | Status |\n|---|---|---|---|\n";

/// Status marker for a stored interpretation.
pub fn glyph(interpretation: Interpretation) -> &'static str {
    if interpretation.is_normal() {
        "✅"
    } else {
        "⚠️"
    }
}

/// Integral values keep one decimal (`120.0`); others print in their
/// shortest exact form (`6.5`).
pub fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn lab_header(first_name: &str) -> String {
    format!("**Laboratory Analysis for {first_name}:**\n\n")
}

/// Table layout, used when the query named specific tests.
pub fn lab_table(first_name: &str, rows: &[LabResult]) -> String {
    let mut text = lab_header(first_name);
    text.push_str(LAB_TABLE_HEADER);
    for row in rows {
        text.push_str(&format!(
            "| {} | {} | {} {} | {} {} |\n",
            row.result_date,
            row.test_name,
            format_value(row.value),
            row.unit,
            glyph(row.interpretation),
            row.interpretation
        ));
    }
    text
}

/// Bullet layout, used for a general lab listing.
pub fn lab_list(first_name: &str, rows: &[LabResult]) -> String {
    let mut text = lab_header(first_name);
    for row in rows {
        text.push_str(&format!(
            "- {} **{}**: {} = {} {} ({})\n",
            glyph(row.interpretation),
            row.result_date,
            row.test_name,
            format_value(row.value),
            row.unit,
            row.interpretation
        ));
    }
    text
}

pub fn no_medication_history(first_name: &str) -> String {
    format!("No medication history found for {first_name}.")
}

/// Requested medication sections. A requested but empty section is still
/// rendered, with `None` in place of rows.
pub fn medications(first_name: &str, scope: MedicationScope, sections: &MedicationSections) -> String {
    let mut text = format!("**Medications for {first_name}**{}:\n", scope.header_note());

    if scope.shows_active() {
        if sections.active.is_empty() {
            text.push_str("\n*Active:* None\n");
        } else {
            text.push_str("\n*Active:*\n");
            for med in &sections.active {
                text.push_str(&format!(
                    "- **{}** {} ({})\n",
                    med.medication_name, med.dosage, med.frequency
                ));
            }
        }
    }

    if scope.shows_discontinued() {
        if sections.discontinued.is_empty() {
            text.push_str("\n*Discontinued:* None\n");
        } else {
            text.push_str("\n*Discontinued:*\n");
            for med in &sections.discontinued {
                text.push_str(&format!(
                    "- {} (Ended {})\n",
                    med.medication_name,
                    med.end_date.as_deref().unwrap_or("N/A")
                ));
            }
        }
    }

    text
}

/// Answer for a single-day question ("today", "tomorrow", "yesterday").
pub fn appointment_day(label: &str, rows: &[Appointment]) -> String {
    if rows.is_empty() {
        return format!("No appointments found for {label}.");
    }

    let mut text = format!("**Yes, there is an appointment {label}:**\n");
    for appt in rows {
        text.push_str(&format!(
            "- **{}**: {} with **{}** ({})\n",
            appt.appointment_time, appt.reason, appt.doctor_name, appt.status
        ));
    }
    text
}

pub fn upcoming_appointments(rows: &[Appointment]) -> String {
    if rows.is_empty() {
        return NO_UPCOMING_APPOINTMENTS.to_string();
    }

    let mut text = String::from("**Upcoming Appointments:**\n");
    for appt in rows {
        text.push_str(&format!(
            "- {} @ {}: {} ({})\n",
            appt.appointment_date, appt.appointment_time, appt.reason, appt.doctor_name
        ));
    }
    text
}

pub fn appointment_history(first_name: &str, rows: &[Appointment]) -> String {
    if rows.is_empty() {
        return format!("No past appointments found for {first_name}.");
    }

    let mut text = format!("**Appointment History for {first_name}:**\n");
    for appt in rows {
        text.push_str(&format!(
            "- {}: {} with {}\n",
            appt.appointment_date, appt.reason, appt.doctor_name
        ));
    }
    text
}
