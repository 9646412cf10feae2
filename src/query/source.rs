//! Data access contract consumed by the query core.
//!
//! The core only reads. Each accessor returns a patient's whole collection
//! in any order; callers sort as they need.

use rusqlite::Connection;

use crate::db::repository;
use crate::db::DatabaseError;
use crate::models::*;

use super::QueryError;

/// Per-patient read accessors.
pub trait PatientDataSource {
    fn patient(&self, patient_id: &str) -> Result<Option<Patient>, DatabaseError>;

    fn labs(&self, patient_id: &str) -> Result<Vec<LabResult>, DatabaseError>;

    fn medications(&self, patient_id: &str) -> Result<Vec<Medication>, DatabaseError>;

    fn appointments(&self, patient_id: &str) -> Result<Vec<Appointment>, DatabaseError>;

    /// Optional collection. Sources without vitals return nothing.
    fn vitals(&self, _patient_id: &str) -> Result<Vec<VitalSign>, DatabaseError> {
        Ok(Vec::new())
    }
}

/// Reads straight from the SQLite record store.
pub struct SqliteSource<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteSource<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl PatientDataSource for SqliteSource<'_> {
    fn patient(&self, patient_id: &str) -> Result<Option<Patient>, DatabaseError> {
        repository::get_patient(self.conn, patient_id)
    }

    fn labs(&self, patient_id: &str) -> Result<Vec<LabResult>, DatabaseError> {
        repository::get_lab_results_for_patient(self.conn, patient_id)
    }

    fn medications(&self, patient_id: &str) -> Result<Vec<Medication>, DatabaseError> {
        repository::get_medications_for_patient(self.conn, patient_id)
    }

    fn appointments(&self, patient_id: &str) -> Result<Vec<Appointment>, DatabaseError> {
        repository::get_appointments_for_patient(self.conn, patient_id)
    }

    fn vitals(&self, patient_id: &str) -> Result<Vec<VitalSign>, DatabaseError> {
        repository::get_vital_signs_for_patient(self.conn, patient_id)
    }
}

/// Snapshot of records held in memory, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    patients: Vec<Patient>,
    labs: Vec<LabResult>,
    medications: Vec<Medication>,
    appointments: Vec<Appointment>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patient(mut self, patient: Patient) -> Self {
        self.patients.push(patient);
        self
    }

    pub fn with_lab(mut self, lab: LabResult) -> Self {
        self.labs.push(lab);
        self
    }

    pub fn with_medication(mut self, medication: Medication) -> Self {
        self.medications.push(medication);
        self
    }

    pub fn with_appointment(mut self, appointment: Appointment) -> Self {
        self.appointments.push(appointment);
        self
    }
}

fn owned_by<T: Clone>(rows: &[T], patient_id: &str, owner: impl Fn(&T) -> &str) -> Vec<T> {
    rows.iter()
        .filter(|row| owner(row) == patient_id)
        .cloned()
        .collect()
}

impl PatientDataSource for InMemorySource {
    fn patient(&self, patient_id: &str) -> Result<Option<Patient>, DatabaseError> {
        Ok(self
            .patients
            .iter()
            .find(|p| p.patient_id == patient_id)
            .cloned())
    }

    fn labs(&self, patient_id: &str) -> Result<Vec<LabResult>, DatabaseError> {
        Ok(owned_by(&self.labs, patient_id, |l| l.patient_id.as_str()))
    }

    fn medications(&self, patient_id: &str) -> Result<Vec<Medication>, DatabaseError> {
        Ok(owned_by(&self.medications, patient_id, |m| m.patient_id.as_str()))
    }

    fn appointments(&self, patient_id: &str) -> Result<Vec<Appointment>, DatabaseError> {
        Ok(owned_by(&self.appointments, patient_id, |a| a.patient_id.as_str()))
    }
}

/// Fetch a patient, treating absence as an error.
pub fn require_patient<S: PatientDataSource + ?Sized>(
    source: &S,
    patient_id: &str,
) -> Result<Patient, QueryError> {
    source
        .patient(patient_id)?
        .ok_or_else(|| QueryError::PatientNotFound(patient_id.to_string()))
}

/// Unwrap a collection read, logging a failure and continuing with no rows.
pub(crate) fn rows_or_empty<T>(
    result: Result<Vec<T>, DatabaseError>,
    collection: &str,
    patient_id: &str,
) -> Vec<T> {
    match result {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(patient_id, "Failed to read {collection}, treating as empty: {e}");
            Vec::new()
        }
    }
}
