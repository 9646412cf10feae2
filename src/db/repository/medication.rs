use std::str::FromStr;

use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::*;

use super::patient::ensure_patient_exists;

/// Insert a medication and return its row id. `med.id` is ignored.
///
/// Rejects rows that break the status/end-date pairing before touching
/// the table.
pub fn insert_medication(conn: &Connection, med: &Medication) -> Result<i64, DatabaseError> {
    med.check_status_invariant()
        .map_err(DatabaseError::ConstraintViolation)?;

    let tx = conn.unchecked_transaction()?;
    ensure_patient_exists(&tx, &med.patient_id)?;

    tx.execute(
        "INSERT INTO medications (patient_id, medication_name, dosage, frequency,
         start_date, end_date, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            med.patient_id,
            med.medication_name,
            med.dosage,
            med.frequency,
            med.start_date,
            med.end_date,
            med.status.as_str(),
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;
    Ok(id)
}

/// All medications for a patient (active first, then by start date).
pub fn get_medications_for_patient(
    conn: &Connection,
    patient_id: &str,
) -> Result<Vec<Medication>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, medication_name, dosage, frequency, start_date, end_date, status
         FROM medications WHERE patient_id = ?1 ORDER BY status ASC, start_date DESC, id",
    )?;

    let rows = stmt.query_map(params![patient_id], |row| Ok(medication_row_from_rusqlite(row)))?;

    let mut meds = Vec::new();
    for row in rows {
        meds.push(medication_from_row(row??)?);
    }
    Ok(meds)
}

struct MedicationRow {
    id: i64,
    patient_id: String,
    medication_name: String,
    dosage: String,
    frequency: String,
    start_date: String,
    end_date: Option<String>,
    status: String,
}

fn medication_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<MedicationRow, rusqlite::Error> {
    Ok(MedicationRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        medication_name: row.get(2)?,
        dosage: row.get(3)?,
        frequency: row.get(4)?,
        start_date: row.get(5)?,
        end_date: row.get(6)?,
        status: row.get(7)?,
    })
}

fn medication_from_row(row: MedicationRow) -> Result<Medication, DatabaseError> {
    Ok(Medication {
        id: row.id,
        patient_id: row.patient_id,
        medication_name: row.medication_name,
        dosage: row.dosage,
        frequency: row.frequency,
        start_date: row.start_date,
        end_date: row.end_date,
        status: MedicationStatus::from_str(&row.status)?,
    })
}
