use chrono::{DateTime, Utc};

use crate::models::{TargetDate, TimeLeft};

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

pub fn time_left(target: &TargetDate, now: DateTime<Utc>) -> TimeLeft {
    let difference = (target.instant() - now).num_milliseconds();
    if difference <= 0 {
        return TimeLeft::default();
    }

    TimeLeft {
        days: difference / DAY_MS,
        hours: (difference / HOUR_MS) % 24,
        minutes: (difference / MINUTE_MS) % 60,
        seconds: (difference / SECOND_MS) % 60,
        total: difference,
    }
}
