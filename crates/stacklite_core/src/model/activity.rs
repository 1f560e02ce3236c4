//! Daily activity counters and derived heatmap cells.
//!
//! # Invariants
//! - At most one `ActivityRecord` exists per calendar day.
//! - `total` is always recomputed from the two counters; it is never
//!   persisted or incremented independently.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of authored content feeding the daily counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Question,
    Answer,
}

/// Per-day counter pair persisted under the `userActivities` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub date: NaiveDate,
    pub questions_authored: u32,
    pub answers_authored: u32,
}

impl ActivityRecord {
    /// Creates a record for `date` with the matching counter at 1.
    pub fn first(date: NaiveDate, kind: ActivityKind) -> Self {
        let mut record = Self {
            date,
            questions_authored: 0,
            answers_authored: 0,
        };
        record.bump(kind);
        record
    }

    /// Increments the counter matching `kind`.
    pub fn bump(&mut self, kind: ActivityKind) {
        match kind {
            ActivityKind::Question => self.questions_authored += 1,
            ActivityKind::Answer => self.answers_authored += 1,
        }
    }

    /// Combined daily total, recomputed on every call.
    pub fn total(&self) -> u32 {
        self.questions_authored + self.answers_authored
    }
}

/// Derived heatmap cell; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityCell {
    pub date: NaiveDate,
    pub count: u32,
    /// Intensity bucket in `0..=4`.
    pub level: u8,
}

#[cfg(test)]
mod tests {
    use super::{ActivityKind, ActivityRecord};
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date")
    }

    #[test]
    fn first_record_starts_matching_counter_at_one() {
        let record = ActivityRecord::first(day(), ActivityKind::Answer);
        assert_eq!(record.questions_authored, 0);
        assert_eq!(record.answers_authored, 1);
        assert_eq!(record.total(), 1);
    }

    #[test]
    fn total_tracks_both_counters() {
        let mut record = ActivityRecord::first(day(), ActivityKind::Question);
        record.bump(ActivityKind::Question);
        record.bump(ActivityKind::Answer);
        assert_eq!(record.total(), 3);
    }

    #[test]
    fn persisted_total_field_from_older_writers_is_ignored() {
        let parsed: ActivityRecord = serde_json::from_str(
            r#"{"date":"2025-03-14","questions_authored":2,"answers_authored":1,"total":99}"#,
        )
        .expect("record parses with stray total field");
        assert_eq!(parsed.total(), 3);
    }
}
