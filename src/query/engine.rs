use std::collections::BTreeSet;

use super::classify::{classify_intent, fallback_help};
use super::entity::resolve_tests;
use super::format;
use super::scope::{select_labs, AppointmentScope, MedicationScope, MedicationSections};
use super::source::{require_patient, rows_or_empty, PatientDataSource};
use super::summary::summarize_with;
use super::temporal::resolve_cutoff;
use super::types::{Intent, QueryAnswer, QueryContext, QueryData};
use super::QueryError;
use crate::config::QueryConfig;
use crate::models::Patient;

/// Answers free-text questions about one patient at a time.
///
/// Coordinates: patient lookup → classify → fetch → scope → format.
/// Holds no per-query state; the same context and text always produce
/// the same answer.
pub struct QueryEngine<'a, S: PatientDataSource> {
    source: &'a S,
    config: QueryConfig,
}

impl<'a, S: PatientDataSource> QueryEngine<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self::with_config(source, QueryConfig::default())
    }

    pub fn with_config(source: &'a S, config: QueryConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Answer against the configured reference date (local today unless pinned).
    pub fn answer_now(&self, patient_id: &str, query: &str) -> QueryAnswer {
        let ctx = QueryContext::new(patient_id, self.config.today());
        self.answer(&ctx, query)
    }

    /// Answer `query` for the patient in `ctx`. Never fails: missing
    /// patients and unreadable data are reported in the answer text.
    pub fn answer(&self, ctx: &QueryContext, query: &str) -> QueryAnswer {
        if ctx.patient_id.trim().is_empty() {
            return QueryAnswer::narrative(format::NO_PATIENT_SELECTED.to_string(), None);
        }

        let patient = match require_patient(self.source, &ctx.patient_id) {
            Ok(patient) => patient,
            Err(e) => {
                if !matches!(e, QueryError::PatientNotFound(_)) {
                    tracing::warn!(patient_id = %ctx.patient_id, "Patient lookup failed: {e}");
                }
                return QueryAnswer::narrative(format::PATIENT_NOT_FOUND.to_string(), None);
            }
        };

        let intent = classify_intent(query);
        tracing::info!(patient_id = %ctx.patient_id, ?intent, "Answering query");

        match intent {
            Intent::Medication => self.answer_medications(&patient, query),
            Intent::Lab => self.answer_labs(ctx, &patient, query),
            Intent::Appointment => self.answer_appointments(ctx, &patient, query),
            Intent::Summary => QueryAnswer::narrative(
                summarize_with(self.source, &patient.patient_id, &self.config),
                Some(Intent::Summary),
            ),
            Intent::Fallback => {
                QueryAnswer::narrative(fallback_help(&patient.first_name), Some(Intent::Fallback))
            }
        }
    }

    fn answer_medications(&self, patient: &Patient, query: &str) -> QueryAnswer {
        let id = &patient.patient_id;
        let medications = rows_or_empty(self.source.medications(id), "medications", id);

        if medications.is_empty() {
            return QueryAnswer::with_data(
                format::no_medication_history(&patient.first_name),
                Intent::Medication,
                QueryData::Medications(Vec::new()),
            );
        }

        let scope = MedicationScope::from_query(query);
        let sections = MedicationSections::split(medications);
        let text = format::medications(&patient.first_name, scope, &sections);

        QueryAnswer::with_data(
            text,
            Intent::Medication,
            QueryData::Medications(sections.visible(scope)),
        )
    }

    fn answer_labs(&self, ctx: &QueryContext, patient: &Patient, query: &str) -> QueryAnswer {
        let id = &patient.patient_id;
        let labs = rows_or_empty(self.source.labs(id), "lab results", id);

        // Aliases resolve against the whole history, before any time window
        let known: BTreeSet<String> = labs.iter().map(|l| l.test_name.clone()).collect();
        let selection = resolve_tests(query, &known);
        let cutoff = resolve_cutoff(query, ctx.now);

        let limit = if selection.is_specific() {
            self.config.lab_table_limit
        } else {
            self.config.lab_list_limit
        };
        let rows = select_labs(labs, cutoff, &selection, limit);

        let text = if rows.is_empty() {
            format::NO_MATCHING_LABS.to_string()
        } else if selection.is_specific() {
            format::lab_table(&patient.first_name, &rows)
        } else {
            format::lab_list(&patient.first_name, &rows)
        };

        QueryAnswer::with_data(text, Intent::Lab, QueryData::Labs(rows))
    }

    fn answer_appointments(
        &self,
        ctx: &QueryContext,
        patient: &Patient,
        query: &str,
    ) -> QueryAnswer {
        let id = &patient.patient_id;
        let appointments = rows_or_empty(self.source.appointments(id), "appointments", id);

        let scope = AppointmentScope::from_query(query, ctx.now);
        let rows = scope.select(appointments, ctx.now, self.config.appointment_history_limit);

        let text = match &scope {
            AppointmentScope::Day { label, .. } => format::appointment_day(label, &rows),
            AppointmentScope::Upcoming => format::upcoming_appointments(&rows),
            AppointmentScope::History => format::appointment_history(&patient.first_name, &rows),
        };

        QueryAnswer::with_data(text, Intent::Appointment, QueryData::Appointments(rows))
    }
}
