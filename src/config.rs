use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Application-level constants
pub const APP_NAME: &str = "clinical-query";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable pinning the reference date (`YYYY-MM-DD`).
pub const REFERENCE_DATE_ENV: &str = "CLINICAL_QUERY_REFERENCE_DATE";

/// Most recent rows shown when a lab query names specific tests.
pub const LAB_TABLE_LIMIT: usize = 20;
/// Most recent rows shown for a generic lab listing.
pub const LAB_LIST_LIMIT: usize = 10;
/// Lab rows included in the clinical summary.
pub const SUMMARY_LAB_LIMIT: usize = 15;
/// Appointments included in the clinical summary.
pub const SUMMARY_APPOINTMENT_LIMIT: usize = 3;
/// Past appointments shown for an appointment history query.
pub const APPOINTMENT_HISTORY_LIMIT: usize = 10;

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "clinical_query=info,warn"
}

/// Get the application data directory (~/ClinicalQuery/)
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join("ClinicalQuery"))
}

/// Default location of the record store.
pub fn default_database_path() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join("clinical.db"))
}

/// Result caps and the time policy for a query engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    pub lab_table_limit: usize,
    pub lab_list_limit: usize,
    pub summary_lab_limit: usize,
    pub summary_appointment_limit: usize,
    pub appointment_history_limit: usize,
    /// Fixed "today" for every query. `None` means the local calendar date.
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            lab_table_limit: LAB_TABLE_LIMIT,
            lab_list_limit: LAB_LIST_LIMIT,
            summary_lab_limit: SUMMARY_LAB_LIMIT,
            summary_appointment_limit: SUMMARY_APPOINTMENT_LIMIT,
            appointment_history_limit: APPOINTMENT_HISTORY_LIMIT,
            reference_date: None,
        }
    }
}

impl QueryConfig {
    /// Defaults, with the reference date taken from the environment when set.
    /// An unparseable value is logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(REFERENCE_DATE_ENV) {
            match crate::models::parse_iso_date(&raw) {
                Some(date) => config.reference_date = Some(date),
                None => tracing::warn!(
                    value = %raw,
                    "Ignoring {REFERENCE_DATE_ENV}: expected YYYY-MM-DD"
                ),
            }
        }
        config
    }

    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// The date queries are resolved against.
    pub fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_caps_match_constants() {
        let config = QueryConfig::default();
        assert_eq!(config.lab_table_limit, 20);
        assert_eq!(config.lab_list_limit, 10);
        assert_eq!(config.summary_lab_limit, 15);
        assert_eq!(config.summary_appointment_limit, 3);
        assert_eq!(config.appointment_history_limit, 10);
        assert!(config.reference_date.is_none());
    }

    #[test]
    fn pinned_reference_date_wins() {
        let pinned = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        let config = QueryConfig::default().with_reference_date(pinned);
        assert_eq!(config.today(), pinned);
    }

    #[test]
    fn unpinned_reference_date_is_local_today() {
        let config = QueryConfig::default();
        assert_eq!(config.today(), Local::now().date_naive());
    }

    #[test]
    fn config_deserializes_without_reference_date() {
        let json = r#"{
            "lab_table_limit": 5,
            "lab_list_limit": 3,
            "summary_lab_limit": 15,
            "summary_appointment_limit": 3,
            "appointment_history_limit": 10
        }"#;
        let config: QueryConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.lab_table_limit, 5);
        assert!(config.reference_date.is_none());
    }

    #[test]
    fn database_path_under_app_dir() {
        if let (Some(db), Some(app)) = (default_database_path(), app_data_dir()) {
            assert!(db.starts_with(app));
            assert!(db.ends_with("clinical.db"));
        }
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
