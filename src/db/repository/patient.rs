use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::*;

/// Register a patient. The whole insert runs in one transaction and fails
/// with `DuplicatePatient` when the identifier is already taken.
pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;

    if patient_exists(&tx, &patient.patient_id)? {
        return Err(DatabaseError::DuplicatePatient(patient.patient_id.clone()));
    }

    tx.execute(
        "INSERT INTO patients (patient_id, first_name, last_name, date_of_birth, age, gender,
         primary_diagnosis, secondary_diagnosis, allergies, last_visit)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            patient.patient_id,
            patient.first_name,
            patient.last_name,
            patient.date_of_birth,
            patient.age,
            patient.gender,
            patient.primary_diagnosis,
            patient.secondary_diagnosis,
            patient.allergies,
            patient.last_visit,
        ],
    )?;

    tx.commit()?;
    Ok(())
}

pub fn get_patient(conn: &Connection, patient_id: &str) -> Result<Option<Patient>, DatabaseError> {
    let patient = conn
        .query_row(
            "SELECT patient_id, first_name, last_name, date_of_birth, age, gender,
             primary_diagnosis, secondary_diagnosis, allergies, last_visit
             FROM patients WHERE patient_id = ?1",
            params![patient_id],
            patient_from_rusqlite,
        )
        .optional()?;
    Ok(patient)
}

/// All patients ordered by identifier.
pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT patient_id, first_name, last_name, date_of_birth, age, gender,
         primary_diagnosis, secondary_diagnosis, allergies, last_visit
         FROM patients ORDER BY patient_id",
    )?;

    let rows = stmt.query_map([], patient_from_rusqlite)?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(row?);
    }
    Ok(patients)
}

pub fn patient_exists(conn: &Connection, patient_id: &str) -> Result<bool, DatabaseError> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM patients WHERE patient_id = ?1",
            params![patient_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Fail with `NotFound` unless the patient is registered.
pub(crate) fn ensure_patient_exists(
    conn: &Connection,
    patient_id: &str,
) -> Result<(), DatabaseError> {
    if !patient_exists(conn, patient_id)? {
        return Err(DatabaseError::NotFound {
            entity_type: "patient".into(),
            id: patient_id.to_string(),
        });
    }
    Ok(())
}

/// Move `last_visit` forward to `visit_date`. Earlier dates are ignored so
/// the column never regresses.
pub(crate) fn advance_last_visit(
    conn: &Connection,
    patient_id: &str,
    visit_date: &str,
) -> Result<bool, DatabaseError> {
    let affected = conn.execute(
        "UPDATE patients SET last_visit = ?2
         WHERE patient_id = ?1 AND (last_visit IS NULL OR last_visit < ?2)",
        params![patient_id, visit_date],
    )?;
    Ok(affected > 0)
}

fn patient_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<Patient, rusqlite::Error> {
    Ok(Patient {
        patient_id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        date_of_birth: row.get(3)?,
        age: row.get(4)?,
        gender: row.get(5)?,
        primary_diagnosis: row.get(6)?,
        secondary_diagnosis: row.get(7)?,
        allergies: row.get(8)?,
        last_visit: row.get(9)?,
    })
}
