use std::str::FromStr;

use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::*;

use super::check_iso_date;
use super::patient::ensure_patient_exists;

/// Insert a lab result and return its row id. `lab.id` is ignored.
pub fn insert_lab_result(conn: &Connection, lab: &LabResult) -> Result<i64, DatabaseError> {
    check_iso_date("result_date", &lab.result_date)?;

    let tx = conn.unchecked_transaction()?;
    ensure_patient_exists(&tx, &lab.patient_id)?;

    tx.execute(
        "INSERT INTO lab_results (patient_id, result_date, test_name, value, unit,
         reference_low, reference_high, interpretation)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            lab.patient_id,
            lab.result_date,
            lab.test_name,
            lab.value,
            lab.unit,
            lab.reference_low,
            lab.reference_high,
            lab.interpretation.as_str(),
        ],
    )?;
    let id = tx.last_insert_rowid();

    tx.commit()?;
    Ok(id)
}

/// All lab results for a patient, newest first.
pub fn get_lab_results_for_patient(
    conn: &Connection,
    patient_id: &str,
) -> Result<Vec<LabResult>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, result_date, test_name, value, unit,
         reference_low, reference_high, interpretation
         FROM lab_results WHERE patient_id = ?1 ORDER BY result_date DESC, id",
    )?;

    let rows = stmt.query_map(params![patient_id], |row| Ok(lab_row_from_rusqlite(row)))?;

    let mut labs = Vec::new();
    for row in rows {
        labs.push(lab_from_row(row??)?);
    }
    Ok(labs)
}

// Internal row type for LabResult mapping
struct LabRow {
    id: i64,
    patient_id: String,
    result_date: String,
    test_name: String,
    value: f64,
    unit: String,
    reference_low: Option<f64>,
    reference_high: Option<f64>,
    interpretation: String,
}

fn lab_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<LabRow, rusqlite::Error> {
    Ok(LabRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        result_date: row.get(2)?,
        test_name: row.get(3)?,
        value: row.get(4)?,
        unit: row.get(5)?,
        reference_low: row.get(6)?,
        reference_high: row.get(7)?,
        interpretation: row.get(8)?,
    })
}

fn lab_from_row(row: LabRow) -> Result<LabResult, DatabaseError> {
    Ok(LabResult {
        id: row.id,
        patient_id: row.patient_id,
        result_date: row.result_date,
        test_name: row.test_name,
        value: row.value,
        unit: row.unit,
        reference_low: row.reference_low,
        reference_high: row.reference_high,
        interpretation: Interpretation::from_str(&row.interpretation)?,
    })
}
