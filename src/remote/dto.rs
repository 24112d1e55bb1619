use serde::{Deserialize, Serialize};

use crate::models::ExamEntry;

/// Row shape of the remote `routine` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineRow {
    pub id: String,
    pub date: String,
    pub day: String,
    pub subject: String,
    #[serde(alias = "subjectCode")]
    pub subject_code: String,
    pub time: String,
    pub timestamp: i64,
}

impl From<RoutineRow> for ExamEntry {
    fn from(row: RoutineRow) -> Self {
        ExamEntry {
            id: row.id,
            date: row.date,
            day: row.day,
            subject: row.subject,
            subject_code: row.subject_code,
            time: row.time,
            timestamp: row.timestamp,
        }
    }
}

impl From<&ExamEntry> for RoutineRow {
    fn from(entry: &ExamEntry) -> Self {
        RoutineRow {
            id: entry.id.clone(),
            date: entry.date.clone(),
            day: entry.day.clone(),
            subject: entry.subject.clone(),
            subject_code: entry.subject_code.clone(),
            time: entry.time.clone(),
            timestamp: entry.timestamp,
        }
    }
}

/// Row shape of the remote `configs` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigRow {
    pub key: String,
    pub value: serde_json::Value,
}

impl ConfigRow {
    /// The value as a plain string; non-string JSON is rendered as JSON text.
    pub fn value_as_string(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
