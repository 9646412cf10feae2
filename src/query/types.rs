use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::*;

/// The single domain a free-text query is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Medication,
    Lab,
    Appointment,
    Summary,
    Fallback,
}

/// Per-call context. Replaces any ambient "current patient" or clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryContext {
    pub patient_id: String,
    /// The date every relative phrase ("last 2 years", "tomorrow") is
    /// resolved against.
    pub now: NaiveDate,
}

impl QueryContext {
    pub fn new(patient_id: impl Into<String>, now: NaiveDate) -> Self {
        Self {
            patient_id: patient_id.into(),
            now,
        }
    }
}

/// Records backing an answer, in the order they were rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum QueryData {
    Labs(Vec<LabResult>),
    Medications(Vec<Medication>),
    Appointments(Vec<Appointment>),
}

/// What the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryAnswer {
    pub text: String,
    /// Present only for intents that surface a record set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<QueryData>,
    /// `None` when no patient could be resolved.
    pub intent: Option<Intent>,
}

impl QueryAnswer {
    pub fn narrative(text: String, intent: Option<Intent>) -> Self {
        Self {
            text,
            data: None,
            intent,
        }
    }

    pub fn with_data(text: String, intent: Intent, data: QueryData) -> Self {
        Self {
            text,
            data: Some(data),
            intent: Some(intent),
        }
    }
}
