use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::VitalSign;

use super::check_iso_date;
use super::patient::ensure_patient_exists;

/// Insert a vital sign record and return its row id. `vs.id` is ignored.
pub fn insert_vital_sign(conn: &Connection, vs: &VitalSign) -> Result<i64, DatabaseError> {
    check_iso_date("measurement_date", &vs.measurement_date)?;

    let tx = conn.unchecked_transaction()?;
    ensure_patient_exists(&tx, &vs.patient_id)?;

    tx.execute(
        "INSERT INTO vital_signs (patient_id, measurement_date, systolic_bp, diastolic_bp,
         heart_rate, temperature, respiratory_rate, oxygen_saturation, weight)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            vs.patient_id,
            vs.measurement_date,
            vs.systolic_bp,
            vs.diastolic_bp,
            vs.heart_rate,
            vs.temperature,
            vs.respiratory_rate,
            vs.oxygen_saturation,
            vs.weight,
        ],
    )?;
    let id = tx.last_insert_rowid();

    tx.commit()?;
    Ok(id)
}

/// Vital signs for a patient in chronological order.
pub fn get_vital_signs_for_patient(
    conn: &Connection,
    patient_id: &str,
) -> Result<Vec<VitalSign>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, measurement_date, systolic_bp, diastolic_bp, heart_rate,
         temperature, respiratory_rate, oxygen_saturation, weight
         FROM vital_signs WHERE patient_id = ?1 ORDER BY measurement_date, id",
    )?;
    let rows = stmt.query_map(params![patient_id], row_to_vital_sign)?;

    let mut vitals = Vec::new();
    for row in rows {
        vitals.push(row?);
    }
    Ok(vitals)
}

fn row_to_vital_sign(row: &rusqlite::Row) -> Result<VitalSign, rusqlite::Error> {
    Ok(VitalSign {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        measurement_date: row.get(2)?,
        systolic_bp: row.get(3)?,
        diastolic_bp: row.get(4)?,
        heart_rate: row.get(5)?,
        temperature: row.get(6)?,
        respiratory_rate: row.get(7)?,
        oxygen_saturation: row.get(8)?,
        weight: row.get(9)?,
    })
}
