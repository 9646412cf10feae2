//! Time expression resolution: "last 2 years", "last year", "last 6 months".
//!
//! Patterns run in a fixed order against the same text and a later match
//! overrides an earlier one, so "last year ... last 2 months" resolves to
//! the month window.

use std::sync::LazyLock;

use chrono::{Months, NaiveDate};
use regex::Regex;

use super::QueryError;

static YEARS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"last (\d+) years?").unwrap());

static MONTHS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"last (\d+) months?").unwrap());

/// Earliest date a record may carry to stay in a time-filtered result,
/// or `None` when the query has no temporal restriction.
pub fn resolve_cutoff(query: &str, now: NaiveDate) -> Option<NaiveDate> {
    let text = query.to_lowercase();
    let mut cutoff = None;

    if let Some(years) = captured_count(&YEARS_PATTERN, &text) {
        cutoff = years
            .checked_mul(12)
            .and_then(|months| now.checked_sub_months(Months::new(months)));
    } else if text.contains("last year") {
        cutoff = now.checked_sub_months(Months::new(12));
    }

    if let Some(months) = captured_count(&MONTHS_PATTERN, &text) {
        if let Some(month_cutoff) = now.checked_sub_months(Months::new(months)) {
            cutoff = Some(month_cutoff);
        }
    }

    if let Some(date) = cutoff {
        tracing::debug!(%date, "Resolved temporal cutoff");
    }
    cutoff
}

fn captured_count(pattern: &Regex, text: &str) -> Option<u32> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Parse a stored record date, naming the record kind on failure.
pub fn parse_record_date(record: &'static str, raw: &str) -> Result<NaiveDate, QueryError> {
    crate::models::parse_iso_date(raw).ok_or_else(|| QueryError::MalformedStoredDate {
        record,
        value: raw.to_string(),
    })
}

/// Keep records dated on or after `cutoff`.
///
/// Rows whose date cannot be parsed are dropped and logged. A `None`
/// cutoff returns the input untouched.
pub fn filter_since<T>(
    records: Vec<T>,
    cutoff: Option<NaiveDate>,
    record: &'static str,
    date_of: impl Fn(&T) -> &str,
) -> Vec<T> {
    let Some(cutoff) = cutoff else {
        return records;
    };

    records
        .into_iter()
        .filter(|row| match parse_record_date(record, date_of(row)) {
            Ok(date) => date >= cutoff,
            Err(e) => {
                tracing::warn!("Excluding record from time filter: {e}");
                false
            }
        })
        .collect()
}
