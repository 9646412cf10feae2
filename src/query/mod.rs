//! Query resolution core.
//!
//! A free-text question about one patient is classified into an intent,
//! narrowed by time, test and status phrases, and rendered from stored
//! records through fixed templates. Nothing here writes to the store.

pub mod classify;
pub mod engine;
pub mod entity;
pub mod format;
pub mod scope;
pub mod source;
pub mod summary;
pub mod temporal;
pub mod types;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use classify::{classify_intent, IntentRule, INTENT_RULES};
pub use engine::QueryEngine;
pub use entity::{resolve_tests, TestSelection};
pub use scope::{AppointmentScope, MedicationScope};
pub use source::{InMemorySource, PatientDataSource, SqliteSource};
pub use summary::summarize;
pub use temporal::resolve_cutoff;
pub use types::*;

use crate::db::DatabaseError;

/// Errors raised between query stages. `QueryEngine::answer` turns each of
/// them into answer text rather than returning it.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Patient not found: {0}")]
    PatientNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Malformed stored date in {record}: {value:?}")]
    MalformedStoredDate { record: &'static str, value: String },
}
