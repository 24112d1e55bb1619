use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of the exam timetable.
///
/// `timestamp` (epoch milliseconds) is the only field used for scheduling.
/// `date`, `day` and `time` are display strings and are never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamEntry {
    pub id: String,
    pub date: String,
    pub day: String,
    pub subject: String,
    pub subject_code: String,
    pub time: String,
    pub timestamp: i64,
}

impl ExamEntry {
    /// Placeholder row for the admin "add subject" action.
    pub fn blank(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            date: "New date".to_string(),
            day: "Day".to_string(),
            subject: "New subject".to_string(),
            subject_code: "000".to_string(),
            time: "10:00 AM".to_string(),
            timestamp: now.timestamp_millis(),
        }
    }
}
