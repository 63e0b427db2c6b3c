use std::env;

use chrono::NaiveDate;
use study_core::catalog::default_exam_date;
use study_core::time::parse_date;

pub const DEFAULT_DB_URL: &str = "sqlite:progress.sqlite3?mode=rwc";

/// Runtime settings read once at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardConfig {
    pub db_url: String,
    /// When set, talk to a remote dashboard API instead of the local database.
    pub api_url: Option<String>,
    pub exam_date: Option<NaiveDate>,
    /// Re-chain every start date after a planner edit.
    pub cascade_starts: bool,
    pub track_weekly: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            db_url: DEFAULT_DB_URL.into(),
            api_url: None,
            exam_date: default_exam_date(),
            cascade_starts: false,
            track_weekly: true,
        }
    }
}

impl DashboardConfig {
    /// Read `STUDY_*` variables, falling back to defaults for anything unset or unreadable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` with an injectable variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_url = non_empty("STUDY_DB_URL").unwrap_or(defaults.db_url);
        let api_url = non_empty("STUDY_API_URL");
        let exam_date = match non_empty("STUDY_EXAM_DATE") {
            Some(raw) => match parse_date(&raw) {
                Ok(date) => Some(date),
                Err(err) => {
                    tracing::warn!(%err, "ignoring STUDY_EXAM_DATE");
                    defaults.exam_date
                }
            },
            None => defaults.exam_date,
        };
        let cascade_starts = non_empty("STUDY_CASCADE_STARTS")
            .and_then(|raw| parse_flag(&raw))
            .unwrap_or(defaults.cascade_starts);
        let track_weekly = non_empty("STUDY_TRACK_WEEKLY")
            .and_then(|raw| parse_flag(&raw))
            .unwrap_or(defaults.track_weekly);

        Self {
            db_url,
            api_url,
            exam_date,
            cascade_starts,
            track_weekly,
        }
    }
}

/// Accepts the usual spellings of a boolean switch.
#[must_use]
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = DashboardConfig::from_lookup(lookup(&[]));
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.exam_date, NaiveDate::from_ymd_opt(2026, 8, 24));
        assert!(config.track_weekly);
        assert!(!config.cascade_starts);
    }

    #[test]
    fn reads_every_variable() {
        let config = DashboardConfig::from_lookup(lookup(&[
            ("STUDY_DB_URL", "sqlite::memory:"),
            ("STUDY_API_URL", "http://localhost:5000"),
            ("STUDY_EXAM_DATE", "2026-11-20"),
            ("STUDY_CASCADE_STARTS", "yes"),
            ("STUDY_TRACK_WEEKLY", "off"),
        ]));
        assert_eq!(config.db_url, "sqlite::memory:");
        assert_eq!(config.api_url.as_deref(), Some("http://localhost:5000"));
        assert_eq!(config.exam_date, NaiveDate::from_ymd_opt(2026, 11, 20));
        assert!(config.cascade_starts);
        assert!(!config.track_weekly);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = DashboardConfig::from_lookup(lookup(&[
            ("STUDY_EXAM_DATE", "next august"),
            ("STUDY_TRACK_WEEKLY", "maybe"),
            ("STUDY_API_URL", "   "),
        ]));
        assert_eq!(config.exam_date, default_exam_date());
        assert!(config.track_weekly);
        assert!(config.api_url.is_none());
    }
}
