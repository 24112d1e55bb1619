//! Compiled-in state used until (or instead of) the remote store answering.

use chrono::{DateTime, Utc};

use crate::models::{ExamEntry, TargetDate, UiConfig};

pub const DEFAULT_TARGET_DATE: &str = "2026-04-21T10:00:00+06:00";

const DEFAULT_EXAM_TIME: &str = "10:00 AM";

// (id, date, day, subject, subject code, epoch millis of 10:00 +06:00)
const DEFAULT_ROUTINE: &[(&str, &str, &str, &str, &str, i64)] = &[
    ("1", "২১ এপ্রিল, ২০২৬", "মঙ্গলবার", "Quran Mazid", "101", 1_776_744_000_000),
    ("2", "২৩ এপ্রিল, ২০২৬", "বৃহস্পতিবার", "Arabic 1st Paper", "103", 1_776_916_800_000),
    ("3", "২৬ এপ্রিল, ২০২৬", "রবিবার", "Math", "108", 1_777_176_000_000),
    ("4", "২৮ এপ্রিল, ২০২৬", "মঙ্গলবার", "Arabic 2nd Paper", "104", 1_777_348_800_000),
    ("5", "৩০ এপ্রিল, ২০২৬", "বৃহস্পতিবার", "Bangla 1st Paper", "134", 1_777_521_600_000),
    ("6", "৩ মে, ২০২৬", "রবিবার", "Bangla 2nd Paper", "135", 1_777_780_800_000),
    ("7", "৫ মে, ২০২৬", "মঙ্গলবার", "English 1st Paper", "136", 1_777_953_600_000),
    ("8", "৭ মে, ২০২৬", "বৃহস্পতিবার", "English 2nd Paper", "137", 1_778_126_400_000),
    ("10", "১০ মে, ২০২৬", "রবিবার", "Hadith", "102", 1_778_385_600_000),
    ("11", "১১ মে, ২০২৬", "সোমবার", "Akayed & Fiqh", "133", 1_778_472_000_000),
    ("12", "১২ মে, ২০২৬", "মঙ্গলবার", "Mantik", "112", 1_778_558_400_000),
    ("13", "১৩ মে, ২০২৬", "বুধবার", "Islamic History", "109", 1_778_644_800_000),
    ("14", "১৪ মে, ২০২৬", "বৃহস্পতিবার", "ICT", "140", 1_778_731_200_000),
];

pub fn default_routine() -> Vec<ExamEntry> {
    DEFAULT_ROUTINE
        .iter()
        .map(|(id, date, day, subject, code, timestamp)| ExamEntry {
            id: id.to_string(),
            date: date.to_string(),
            day: day.to_string(),
            subject: subject.to_string(),
            subject_code: code.to_string(),
            time: DEFAULT_EXAM_TIME.to_string(),
            timestamp: *timestamp,
        })
        .collect()
}

pub fn default_target_date() -> TargetDate {
    DEFAULT_TARGET_DATE
        .parse()
        .unwrap_or_else(|_| TargetDate::new(DateTime::<Utc>::default().fixed_offset()))
}

pub fn default_ui_config() -> UiConfig {
    UiConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_exam_is_the_countdown_target() {
        let routine = default_routine();
        let target = default_target_date();

        assert_eq!(routine.len(), 13);
        assert_eq!(routine[0].timestamp, target.instant().timestamp_millis());
        assert_eq!(target.to_rfc3339(), DEFAULT_TARGET_DATE);
    }

    #[test]
    fn default_routine_is_chronological_with_unique_ids() {
        let routine = default_routine();

        assert!(routine.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        let mut ids: Vec<_> = routine.iter().map(|e| e.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), routine.len());
    }
}
