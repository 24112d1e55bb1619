use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AppError;
use crate::models::ExamEntry;

/// Feature flags and branding for the dashboard.
///
/// Unknown keys are dropped on deserialization and missing keys fall back to
/// the compiled-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiConfig {
    pub show_countdown: bool,
    pub show_routine: bool,
    pub show_progress: bool,
    pub show_print: bool,
    pub show_download: bool,
    pub show_admin_icon: bool,
    pub show_reminders: bool,
    pub notification_sound: bool,
    pub telegram_enabled: bool,
    pub exam_name: String,
    pub exam_year: String,
    pub app_title: String,
    pub app_subtitle: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_countdown: true,
            show_routine: true,
            show_progress: true,
            show_print: true,
            show_download: true,
            show_admin_icon: true,
            show_reminders: true,
            notification_sound: true,
            telegram_enabled: true,
            exam_name: "Dakhil Exam".to_string(),
            exam_year: "2026".to_string(),
            app_title: "ARNS STUDY ZONE".to_string(),
            app_subtitle: "DAKHIL EXAM DASHBOARD".to_string(),
        }
    }
}

/// The countdown's zero point. Always carries an explicit UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetDate(DateTime<FixedOffset>);

impl TargetDate {
    pub fn new(at: DateTime<FixedOffset>) -> Self {
        Self(at)
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.0.with_timezone(&Utc)
    }

    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl FromStr for TargetDate {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateTime::parse_from_rfc3339(s.trim())
            .map(TargetDate)
            .map_err(|e| AppError::BadRequest(format!("invalid target date {:?}: {}", s, e)))
    }
}

impl fmt::Display for TargetDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl Serialize for TargetDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for TargetDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Partial change set submitted by the admin. Absent groups are untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(default)]
    pub routine: Option<Vec<ExamEntry>>,
    #[serde(default)]
    pub target_date: Option<TargetDate>,
    #[serde(default)]
    pub config: Option<UiConfig>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.routine.is_none() && self.target_date.is_none() && self.config.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldGroup {
    Routine,
    TargetDate,
    Config,
}

impl FieldGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldGroup::Routine => "routine",
            FieldGroup::TargetDate => "targetDate",
            FieldGroup::Config => "config",
        }
    }
}

/// Outcome of the most recent remote write for one field group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SyncStatus {
    #[default]
    Never,
    Synced { at: DateTime<Utc> },
    Failed { at: DateTime<Utc>, error: String },
}

impl SyncStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, SyncStatus::Failed { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub routine: SyncStatus,
    pub target_date: SyncStatus,
    pub config: SyncStatus,
}

impl SyncReport {
    pub fn set(&mut self, group: FieldGroup, status: SyncStatus) {
        match group {
            FieldGroup::Routine => self.routine = status,
            FieldGroup::TargetDate => self.target_date = status,
            FieldGroup::Config => self.config = status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_config_ignores_unknown_keys_and_fills_missing_ones() {
        let cfg: UiConfig = serde_json::from_str(
            r#"{"showCountdown": false, "examName": "Alim Exam", "sparkles": true}"#,
        )
        .unwrap();

        assert!(!cfg.show_countdown);
        assert_eq!(cfg.exam_name, "Alim Exam");
        assert!(cfg.show_routine);
        assert_eq!(cfg.app_title, "ARNS STUDY ZONE");
    }

    #[test]
    fn target_date_keeps_its_offset() {
        let target: TargetDate = "2026-04-21T10:00:00+06:00".parse().unwrap();

        assert_eq!(target.to_rfc3339(), "2026-04-21T10:00:00+06:00");
        assert_eq!(target.instant().to_rfc3339(), "2026-04-21T04:00:00+00:00");
    }

    #[test]
    fn target_date_rejects_strings_without_offset() {
        assert!("2026-04-21T10:00:00".parse::<TargetDate>().is_err());
        assert!("next tuesday".parse::<TargetDate>().is_err());
    }

    #[test]
    fn settings_update_accepts_partial_payloads() {
        let update: SettingsUpdate =
            serde_json::from_str(r#"{"targetDate": "2026-05-01T09:00:00+06:00"}"#).unwrap();

        assert!(update.routine.is_none());
        assert!(update.config.is_none());
        assert!(update.target_date.is_some());
        assert!(!update.is_empty());
        assert!(SettingsUpdate::default().is_empty());
    }
}
