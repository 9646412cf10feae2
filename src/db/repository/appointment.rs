use std::str::FromStr;

use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::*;

use super::check_iso_date;
use super::patient::{advance_last_visit, ensure_patient_exists};

/// Schedule (or record) an appointment and return its row id.
///
/// Completed appointments advance the patient's `last_visit`. The insert
/// and the update commit together or not at all.
pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<i64, DatabaseError> {
    check_iso_date("appointment_date", &appt.appointment_date)?;

    let tx = conn.unchecked_transaction()?;
    ensure_patient_exists(&tx, &appt.patient_id)?;

    tx.execute(
        "INSERT INTO appointments (patient_id, appointment_date, appointment_time,
         doctor_name, reason, status, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            appt.patient_id,
            appt.appointment_date,
            appt.appointment_time,
            appt.doctor_name,
            appt.reason,
            appt.status.as_str(),
            appt.notes,
        ],
    )?;
    let id = tx.last_insert_rowid();

    if appt.status == AppointmentStatus::Completed {
        advance_last_visit(&tx, &appt.patient_id, &appt.appointment_date)?;
    }

    tx.commit()?;
    Ok(id)
}

/// All appointments for a patient, newest first.
pub fn get_appointments_for_patient(
    conn: &Connection,
    patient_id: &str,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, appointment_date, appointment_time, doctor_name, reason, status, notes
         FROM appointments WHERE patient_id = ?1 ORDER BY appointment_date DESC, appointment_time DESC, id",
    )?;

    let rows = stmt.query_map(params![patient_id], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, String>(6)?,
            row.get::<_, String>(7)?,
        ))
    })?;

    let mut appointments = Vec::new();
    for row in rows {
        let (id, patient_id, appointment_date, appointment_time, doctor_name, reason, status, notes) =
            row?;
        appointments.push(Appointment {
            id,
            patient_id,
            appointment_date,
            appointment_time,
            doctor_name,
            reason,
            status: AppointmentStatus::from_str(&status)?,
            notes,
        });
    }
    Ok(appointments)
}
