use chrono::Duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReminderKind {
    #[serde(rename = "1day")]
    OneDayBefore,
    #[serde(rename = "1hour")]
    OneHourBefore,
}

impl ReminderKind {
    /// How far ahead of the exam the trigger window opens.
    pub fn lead_time(&self) -> Duration {
        match self {
            ReminderKind::OneDayBefore => Duration::hours(24),
            ReminderKind::OneHourBefore => Duration::hours(1),
        }
    }
}

/// A user's request to be reminded about one exam.
///
/// At most one subscription exists per `(exam_id, kind)`. Once `fired` is set
/// it stays set until the subscription is removed and added again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSubscription {
    pub exam_id: String,
    #[serde(rename = "type")]
    pub kind: ReminderKind,
    #[serde(rename = "notified")]
    pub fired: bool,
}

impl ReminderSubscription {
    pub fn new(exam_id: impl Into<String>, kind: ReminderKind) -> Self {
        Self {
            exam_id: exam_id.into(),
            kind,
            fired: false,
        }
    }

    pub fn matches(&self, exam_id: &str, kind: ReminderKind) -> bool {
        self.exam_id == exam_id && self.kind == kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_persisted_subscription_format() {
        let subs: Vec<ReminderSubscription> = serde_json::from_str(
            r#"[{"examId":"3","type":"1hour","notified":true},{"examId":"4","type":"1day","notified":false}]"#,
        )
        .unwrap();

        assert_eq!(subs[0].kind, ReminderKind::OneHourBefore);
        assert!(subs[0].fired);
        assert_eq!(subs[1], ReminderSubscription::new("4", ReminderKind::OneDayBefore));
    }
}
