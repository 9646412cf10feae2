//! Status and scope filtering: which slice of a collection a query means.

use std::cmp::Ordering;

use chrono::{Days, NaiveDate, NaiveTime};

use super::entity::TestSelection;
use super::temporal::{filter_since, parse_record_date};
use crate::models::*;

const ACTIVE_WORDS: &[&str] = &["active", "current", "taking", "now"];
const DISCONTINUED_WORDS: &[&str] = &["discontinued", "past", "history", "stopped", "old"];

/// Which medication sections a query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MedicationScope {
    ActiveOnly,
    DiscontinuedOnly,
    Both,
}

impl MedicationScope {
    pub fn from_query(query: &str) -> Self {
        let text = query.to_lowercase();
        let active = ACTIVE_WORDS.iter().any(|w| text.contains(w));
        let discontinued = DISCONTINUED_WORDS.iter().any(|w| text.contains(w));

        let scope = match (active, discontinued) {
            (true, false) => Self::ActiveOnly,
            (false, true) => Self::DiscontinuedOnly,
            _ => Self::Both,
        };
        tracing::debug!(?scope, "Resolved medication scope");
        scope
    }

    pub fn shows_active(self) -> bool {
        matches!(self, Self::ActiveOnly | Self::Both)
    }

    pub fn shows_discontinued(self) -> bool {
        matches!(self, Self::DiscontinuedOnly | Self::Both)
    }

    /// Suffix appended to the medication header.
    pub fn header_note(self) -> &'static str {
        match self {
            Self::ActiveOnly => " (Active only)",
            Self::DiscontinuedOnly => " (Discontinued only)",
            Self::Both => "",
        }
    }
}

/// A patient's medications split by status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedicationSections {
    /// Start date descending.
    pub active: Vec<Medication>,
    /// End date descending.
    pub discontinued: Vec<Medication>,
}

impl MedicationSections {
    pub fn split(medications: Vec<Medication>) -> Self {
        let (mut active, mut discontinued): (Vec<_>, Vec<_>) =
            medications.into_iter().partition(Medication::is_active);

        active.sort_by(|a, b| {
            b.start_date
                .cmp(&a.start_date)
                .then_with(|| a.medication_name.cmp(&b.medication_name))
        });
        discontinued.sort_by(|a, b| {
            b.end_date
                .cmp(&a.end_date)
                .then_with(|| a.medication_name.cmp(&b.medication_name))
        });

        Self { active, discontinued }
    }

    /// Rows visible under `scope`, active section first.
    pub fn visible(&self, scope: MedicationScope) -> Vec<Medication> {
        let mut rows = Vec::new();
        if scope.shows_active() {
            rows.extend(self.active.iter().cloned());
        }
        if scope.shows_discontinued() {
            rows.extend(self.discontinued.iter().cloned());
        }
        rows
    }
}

/// Newest first; same-day rows ordered by test name. Rows with an
/// unparseable date are logged and placed after every dated row.
pub fn sort_labs_newest_first(labs: &mut [LabResult]) {
    for lab in labs.iter() {
        if let Err(e) = parse_record_date("lab_result", &lab.result_date) {
            tracing::warn!("Ordering lab result {} last: {e}", lab.id);
        }
    }

    labs.sort_by(|a, b| {
        newest_first(a.parsed_date(), b.parsed_date())
            .then_with(|| a.result_date.cmp(&b.result_date))
            .then_with(|| a.test_name.cmp(&b.test_name))
    });
}

/// Descending by date with undated entries last.
fn newest_first(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

/// Earlier clock time first, so "9:00" precedes "14:00". Times that do
/// not parse follow parsed ones, ordered by their text.
pub fn earlier_time_first(a: &str, b: &str) -> Ordering {
    match (parse_clock(a), parse_clock(b)) {
        (Some(ta), Some(tb)) => ta.cmp(&tb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Most recent first by date then time. Appointments with an unparseable
/// date are logged and placed last.
pub fn sort_appointments_newest_first(appointments: &mut [Appointment]) {
    for appt in appointments.iter() {
        if let Err(e) = parse_record_date("appointment", &appt.appointment_date) {
            tracing::warn!("Ordering appointment {} last: {e}", appt.id);
        }
    }

    appointments.sort_by(|a, b| {
        newest_first(a.parsed_date(), b.parsed_date())
            .then_with(|| b.appointment_date.cmp(&a.appointment_date))
            .then_with(|| earlier_time_first(&b.appointment_time, &a.appointment_time))
    });
}

/// Apply the time window, then the test selection, then sort and cap.
pub fn select_labs(
    labs: Vec<LabResult>,
    cutoff: Option<NaiveDate>,
    selection: &TestSelection,
    limit: usize,
) -> Vec<LabResult> {
    let mut rows: Vec<LabResult> =
        filter_since(labs, cutoff, "lab_result", |l| l.result_date.as_str())
            .into_iter()
            .filter(|l| selection.includes(&l.test_name))
            .collect();

    sort_labs_newest_first(&mut rows);
    rows.truncate(limit);
    rows
}

/// The slice of appointments a query refers to, relative to `today`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppointmentScope {
    /// A single calendar day, labelled for display ("tomorrow (2025-06-11)").
    Day { date: NaiveDate, label: String },
    /// On or after today, soonest first.
    Upcoming,
    /// On or before today, most recent first.
    History,
}

impl AppointmentScope {
    pub fn from_query(query: &str, today: NaiveDate) -> Self {
        let text = query.to_lowercase();

        let day = if text.contains("today") {
            Some(("today", Some(today)))
        } else if text.contains("tomorrow") {
            Some(("tomorrow", today.checked_add_days(Days::new(1))))
        } else if text.contains("yesterday") {
            Some(("yesterday", today.checked_sub_days(Days::new(1))))
        } else {
            None
        };

        let scope = match day {
            Some((word, Some(date))) => Self::Day {
                date,
                label: format!("{word} ({date})"),
            },
            _ if text.contains("upcoming") || text.contains("next") => Self::Upcoming,
            _ => Self::History,
        };
        tracing::debug!(?scope, "Resolved appointment scope");
        scope
    }

    /// Filter and order `appointments` for this scope. Rows with an
    /// unparseable date never match and are logged.
    pub fn select(
        &self,
        appointments: Vec<Appointment>,
        today: NaiveDate,
        history_limit: usize,
    ) -> Vec<Appointment> {
        let mut dated: Vec<(NaiveDate, Appointment)> = appointments
            .into_iter()
            .filter_map(|a| match parse_record_date("appointment", &a.appointment_date) {
                Ok(date) => Some((date, a)),
                Err(e) => {
                    tracing::warn!("Skipping appointment {}: {e}", a.id);
                    None
                }
            })
            .collect();

        match self {
            Self::Day { date, .. } => {
                dated.retain(|(d, _)| d == date);
                dated.sort_by(|(_, a), (_, b)| {
                    earlier_time_first(&a.appointment_time, &b.appointment_time)
                });
            }
            Self::Upcoming => {
                dated.retain(|(d, _)| *d >= today);
                dated.sort_by(|(da, a), (db, b)| {
                    da.cmp(db)
                        .then_with(|| earlier_time_first(&a.appointment_time, &b.appointment_time))
                });
            }
            Self::History => {
                dated.retain(|(d, _)| *d <= today);
                dated.sort_by(|(da, a), (db, b)| {
                    db.cmp(da)
                        .then_with(|| earlier_time_first(&b.appointment_time, &a.appointment_time))
                });
                dated.truncate(history_limit);
            }
        }

        dated.into_iter().map(|(_, a)| a).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::test_fixtures::*;
    use std::collections::BTreeSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn june_10() -> NaiveDate {
        date(2025, 6, 10)
    }

    // ── Medication scope ────────────────────────────────────────────

    #[test]
    fn medication_scope_from_status_words() {
        assert_eq!(MedicationScope::from_query("current medications"), MedicationScope::ActiveOnly);
        assert_eq!(MedicationScope::from_query("what is she taking"), MedicationScope::ActiveOnly);
        assert_eq!(
            MedicationScope::from_query("medication history"),
            MedicationScope::DiscontinuedOnly
        );
        assert_eq!(
            MedicationScope::from_query("Stopped drugs"),
            MedicationScope::DiscontinuedOnly
        );
        assert_eq!(MedicationScope::from_query("medications"), MedicationScope::Both);
    }

    #[test]
    fn conflicting_status_words_show_both() {
        let scope = MedicationScope::from_query("active and discontinued medications");
        assert_eq!(scope, MedicationScope::Both);
        assert!(scope.shows_active() && scope.shows_discontinued());
        assert_eq!(scope.header_note(), "");
    }

    #[test]
    fn medication_sections_sorted_by_relevant_date() {
        let sections = MedicationSections::split(vec![
            active_med("P001", "Metformin", "2023-01-01"),
            discontinued_med("P001", "Glipizide", "2020-01-01", "2021-05-01"),
            active_med("P001", "Lisinopril", "2024-02-01"),
            active_med("P001", "Atorvastatin", "2024-02-01"),
            discontinued_med("P001", "Simvastatin", "2019-01-01", "2022-03-01"),
        ]);

        let active: Vec<&str> = sections.active.iter().map(|m| m.medication_name.as_str()).collect();
        assert_eq!(active, vec!["Atorvastatin", "Lisinopril", "Metformin"]);

        let stopped: Vec<&str> = sections
            .discontinued
            .iter()
            .map(|m| m.medication_name.as_str())
            .collect();
        assert_eq!(stopped, vec!["Simvastatin", "Glipizide"]);

        assert_eq!(sections.visible(MedicationScope::ActiveOnly).len(), 3);
        assert_eq!(sections.visible(MedicationScope::DiscontinuedOnly).len(), 2);
        assert_eq!(sections.visible(MedicationScope::Both).len(), 5);
    }

    // ── Labs ────────────────────────────────────────────────────────

    #[test]
    fn select_labs_filters_sorts_and_caps() {
        let labs = vec![
            lab("P001", "2023-01-01", "Glucose", 101.0, Interpretation::High),
            lab("P001", "2025-01-01", "Glucose", 95.0, Interpretation::Normal),
            lab("P001", "2025-01-01", "BUN", 14.0, Interpretation::Normal),
            lab("P001", "2024-06-01", "Glucose", 99.0, Interpretation::Normal),
        ];
        let only_glucose = TestSelection::Only(BTreeSet::from(["Glucose".to_string()]));

        let rows = select_labs(labs.clone(), Some(date(2024, 1, 1)), &only_glucose, 20);
        let dates: Vec<&str> = rows.iter().map(|l| l.result_date.as_str()).collect();
        assert_eq!(dates, vec!["2025-01-01", "2024-06-01"]);

        let all = select_labs(labs, None, &TestSelection::All, 2);
        assert_eq!(all.len(), 2);
        // Same date: ties broken by test name
        assert_eq!(all[0].test_name, "BUN");
        assert_eq!(all[1].test_name, "Glucose");
    }

    #[test]
    fn malformed_lab_dates_sort_after_dated_rows() {
        let mut labs: Vec<LabResult> = (1..=10)
            .map(|n| lab("P001", &format!("unknown{n}"), "BUN", 14.0, Interpretation::Normal))
            .collect();
        labs.push(lab("P001", "2025-06-01", "Glucose", 95.0, Interpretation::Normal));
        labs.push(lab("P001", "2024-01-01", "Glucose", 99.0, Interpretation::Normal));

        sort_labs_newest_first(&mut labs);
        assert_eq!(labs[0].result_date, "2025-06-01");
        assert_eq!(labs[1].result_date, "2024-01-01");
        assert!(labs[2..].iter().all(|l| l.parsed_date().is_none()));
    }

    #[test]
    fn clock_times_compare_numerically() {
        assert_eq!(earlier_time_first("9:00", "14:00"), Ordering::Less);
        assert_eq!(earlier_time_first("14:00", "09:30"), Ordering::Greater);
        assert_eq!(earlier_time_first("08:15:00", "08:15"), Ordering::Equal);
        // Unparsed times follow parsed ones
        assert_eq!(earlier_time_first("morning", "23:59"), Ordering::Greater);
        assert_eq!(earlier_time_first("afternoon", "morning"), Ordering::Less);
    }

    // ── Appointments ────────────────────────────────────────────────

    #[test]
    fn appointment_day_words_resolve_against_today() {
        assert_eq!(
            AppointmentScope::from_query("Any appointment tomorrow?", june_10()),
            AppointmentScope::Day {
                date: date(2025, 6, 11),
                label: "tomorrow (2025-06-11)".into()
            }
        );
        assert_eq!(
            AppointmentScope::from_query("visit yesterday", june_10()),
            AppointmentScope::Day {
                date: date(2025, 6, 9),
                label: "yesterday (2025-06-09)".into()
            }
        );
    }

    #[test]
    fn today_is_checked_before_tomorrow() {
        let scope = AppointmentScope::from_query("today or tomorrow?", june_10());
        assert!(matches!(scope, AppointmentScope::Day { date, .. } if date == june_10()));
    }

    #[test]
    fn upcoming_and_history_scopes() {
        assert_eq!(
            AppointmentScope::from_query("next appointment", june_10()),
            AppointmentScope::Upcoming
        );
        assert_eq!(
            AppointmentScope::from_query("upcoming visits", june_10()),
            AppointmentScope::Upcoming
        );
        assert_eq!(
            AppointmentScope::from_query("appointments", june_10()),
            AppointmentScope::History
        );
    }

    #[test]
    fn select_upcoming_includes_today_ascending() {
        let appts = vec![
            appointment("P001", "2025-07-01", "09:00", AppointmentStatus::Scheduled),
            appointment("P001", "2025-06-10", "14:00", AppointmentStatus::Scheduled),
            appointment("P001", "2025-05-01", "09:00", AppointmentStatus::Completed),
        ];
        let rows = AppointmentScope::Upcoming.select(appts, june_10(), 10);
        let dates: Vec<&str> = rows.iter().map(|a| a.appointment_date.as_str()).collect();
        assert_eq!(dates, vec!["2025-06-10", "2025-07-01"]);
    }

    #[test]
    fn select_history_descending_and_capped() {
        let appts: Vec<Appointment> = (1..=12)
            .map(|m| {
                appointment(
                    "P001",
                    &format!("2024-{m:02}-15"),
                    "09:00",
                    AppointmentStatus::Completed,
                )
            })
            .chain([appointment("P001", "2025-09-01", "09:00", AppointmentStatus::Scheduled)])
            .collect();

        let rows = AppointmentScope::History.select(appts, june_10(), 10);
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].appointment_date, "2024-12-15");
        assert_eq!(rows[9].appointment_date, "2024-03-15");
    }

    #[test]
    fn select_day_skips_malformed_dates() {
        let appts = vec![
            appointment("P001", "2025-06-11", "15:30", AppointmentStatus::Scheduled),
            appointment("P001", "11 June", "08:00", AppointmentStatus::Scheduled),
            appointment("P001", "2025-06-11", "09:00", AppointmentStatus::Scheduled),
        ];
        let scope = AppointmentScope::from_query("tomorrow", june_10());
        let times: Vec<String> = scope
            .select(appts, june_10(), 10)
            .into_iter()
            .map(|a| a.appointment_time)
            .collect();
        assert_eq!(times, vec!["09:00", "15:30"]);
    }

    #[test]
    fn unpadded_morning_time_precedes_afternoon() {
        let appts = vec![
            appointment("P001", "2025-06-11", "14:00", AppointmentStatus::Scheduled),
            appointment("P001", "2025-06-11", "9:00", AppointmentStatus::Scheduled),
        ];

        let day = AppointmentScope::from_query("tomorrow", june_10());
        let times: Vec<String> = day
            .select(appts.clone(), june_10(), 10)
            .into_iter()
            .map(|a| a.appointment_time)
            .collect();
        assert_eq!(times, vec!["9:00", "14:00"]);

        let upcoming: Vec<String> = AppointmentScope::Upcoming
            .select(appts.clone(), june_10(), 10)
            .into_iter()
            .map(|a| a.appointment_time)
            .collect();
        assert_eq!(upcoming, vec!["9:00", "14:00"]);

        let history: Vec<String> = AppointmentScope::History
            .select(appts, date(2025, 6, 12), 10)
            .into_iter()
            .map(|a| a.appointment_time)
            .collect();
        assert_eq!(history, vec!["14:00", "9:00"]);
    }
}
