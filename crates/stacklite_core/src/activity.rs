//! Fixed-window activity aggregation and heatmap derivation.
//!
//! # Responsibility
//! - Roll per-day authored-content counters into the `userActivities`
//!   collection, one record per calendar day.
//! - Derive the 365-cell heatmap and its weekly grid as pure functions.
//!
//! # Invariants
//! - "Today" resolves as a UTC calendar day.
//! - `build_heatmap` output depends only on its inputs; identical
//!   records and the same `today` give identical cells.

use crate::bus::{ContextBus, TOPIC_ACTIVITY_UPDATED};
use crate::model::activity::{ActivityCell, ActivityKind, ActivityRecord};
use crate::store::{keys, Store, StoreResult};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Number of cells in the fixed heatmap window.
pub const HEATMAP_DAYS: usize = 365;

/// Read-modify-write aggregator over the `userActivities` key.
pub struct ActivityAggregator {
    store: Rc<Store>,
    bus: Rc<ContextBus>,
}

impl ActivityAggregator {
    pub fn new(store: Rc<Store>, bus: Rc<ContextBus>) -> Self {
        Self { store, bus }
    }

    /// Records one authored item for the UTC calendar day of "now".
    pub fn record_now(&self, kind: ActivityKind) -> StoreResult<ActivityRecord> {
        self.record(kind, Utc::now().date_naive())
    }

    /// Records one authored item for `today`.
    ///
    /// Increments the matching counter of the day's record, or creates
    /// the record with that counter at 1. Publishes `activityUpdated`
    /// after the write lands.
    pub fn record(&self, kind: ActivityKind, today: NaiveDate) -> StoreResult<ActivityRecord> {
        let mut records: Vec<ActivityRecord> = self.store.read(keys::USER_ACTIVITIES);

        let updated = match records.iter_mut().find(|record| record.date == today) {
            Some(existing) => {
                existing.bump(kind);
                *existing
            }
            None => {
                let created = ActivityRecord::first(today, kind);
                records.push(created);
                created
            }
        };

        self.store.write(keys::USER_ACTIVITIES, &records)?;
        log::debug!(
            "event=activity_recorded module=activity status=ok date={} total={}",
            updated.date,
            updated.total()
        );
        self.bus.publish(TOPIC_ACTIVITY_UPDATED, None);
        Ok(updated)
    }

    /// Current persisted records (fail-soft).
    pub fn records(&self) -> Vec<ActivityRecord> {
        self.store.read(keys::USER_ACTIVITIES)
    }

    /// Heatmap for the window ending at the UTC calendar day of "now".
    pub fn heatmap_now(&self) -> Vec<ActivityCell> {
        build_heatmap(&self.records(), Utc::now().date_naive())
    }
}

/// Intensity bucket for a daily count.
///
/// `0→0, 1–2→1, 3–4→2, 5–6→3, ≥7→4`.
pub fn level_for_count(count: u32) -> u8 {
    match count {
        0 => 0,
        1..=2 => 1,
        3..=4 => 2,
        5..=6 => 3,
        _ => 4,
    }
}

/// Builds exactly 365 cells for the inclusive range `[today-364, today]`,
/// oldest first. Days without a record yield `count=0, level=0`.
pub fn build_heatmap(records: &[ActivityRecord], today: NaiveDate) -> Vec<ActivityCell> {
    let mut totals: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for record in records {
        // Duplicate dates should not exist; last record wins if they do.
        totals.insert(record.date, record.total());
    }

    (0..HEATMAP_DAYS as i64)
        .rev()
        .map(|age| {
            let date = today - Duration::days(age);
            let count = totals.get(&date).copied().unwrap_or(0);
            ActivityCell {
                date,
                count,
                level: level_for_count(count),
            }
        })
        .collect()
}

/// Groups heatmap cells into 7-row columns aligned to day-of-week
/// (Sunday first). The first and last columns are padded with `None`
/// placeholders so every column has exactly 7 entries; placeholders
/// carry no date and render inert.
pub fn weekly_grid(cells: &[ActivityCell]) -> Vec<[Option<ActivityCell>; 7]> {
    let mut columns = Vec::new();
    let mut column: [Option<ActivityCell>; 7] = [None; 7];
    let mut filled = false;

    for cell in cells {
        let row = cell.date.weekday().num_days_from_sunday() as usize;
        if row == 0 && filled {
            columns.push(column);
            column = [None; 7];
        }
        column[row] = Some(*cell);
        filled = true;
    }
    if filled {
        columns.push(column);
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::{build_heatmap, level_for_count, weekly_grid, HEATMAP_DAYS};
    use crate::model::activity::{ActivityKind, ActivityRecord};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn level_boundaries_are_exact() {
        assert_eq!(level_for_count(0), 0);
        assert_eq!(level_for_count(1), 1);
        assert_eq!(level_for_count(2), 1);
        assert_eq!(level_for_count(3), 2);
        assert_eq!(level_for_count(4), 2);
        assert_eq!(level_for_count(5), 3);
        assert_eq!(level_for_count(6), 3);
        assert_eq!(level_for_count(7), 4);
        assert_eq!(level_for_count(120), 4);
    }

    #[test]
    fn heatmap_spans_the_inclusive_window_oldest_first() {
        let today = date(2025, 8, 20);
        let cells = build_heatmap(&[], today);
        assert_eq!(cells.len(), HEATMAP_DAYS);
        assert_eq!(cells.first().expect("first cell").date, date(2024, 8, 21));
        assert_eq!(cells.last().expect("last cell").date, today);
        assert!(cells.iter().all(|cell| cell.count == 0 && cell.level == 0));
    }

    #[test]
    fn heatmap_is_deterministic_for_identical_inputs() {
        let today = date(2025, 8, 20);
        let records = vec![
            ActivityRecord {
                date: date(2025, 8, 19),
                questions_authored: 2,
                answers_authored: 3,
            },
            ActivityRecord {
                date: date(2025, 8, 20),
                questions_authored: 1,
                answers_authored: 0,
            },
        ];
        assert_eq!(
            build_heatmap(&records, today),
            build_heatmap(&records, today)
        );
    }

    #[test]
    fn records_outside_the_window_are_ignored() {
        let today = date(2025, 8, 20);
        let records = vec![ActivityRecord {
            date: date(2023, 1, 1),
            questions_authored: 9,
            answers_authored: 9,
        }];
        let cells = build_heatmap(&records, today);
        assert!(cells.iter().all(|cell| cell.count == 0));
    }

    #[test]
    fn weekly_grid_pads_first_and_last_columns() {
        // 2025-08-20 is a Wednesday; the window starts on a Thursday.
        let cells = build_heatmap(&[], date(2025, 8, 20));
        let grid = weekly_grid(&cells);

        let first = grid.first().expect("first column");
        assert!(first[0].is_none()); // Sun..Wed padded
        assert!(first[3].is_none());
        assert!(first[4].is_some()); // Thu holds the oldest cell

        let last = grid.last().expect("last column");
        assert!(last[3].is_some()); // Wed holds today
        assert!(last[4].is_none()); // Thu..Sat padded
        assert!(last[6].is_none());

        let placed: usize = grid
            .iter()
            .flat_map(|column| column.iter())
            .filter(|slot| slot.is_some())
            .count();
        assert_eq!(placed, HEATMAP_DAYS);
        assert!(grid.iter().all(|column| column.len() == 7));
    }

    #[test]
    fn grid_rows_align_to_day_of_week() {
        use chrono::Datelike;
        let cells = build_heatmap(&[], date(2025, 8, 20));
        let grid = weekly_grid(&cells);
        for column in &grid {
            for (row, slot) in column.iter().enumerate() {
                if let Some(cell) = slot {
                    assert_eq!(cell.date.weekday().num_days_from_sunday() as usize, row);
                }
            }
        }
    }

    #[test]
    fn aggregator_same_day_counters_accumulate() {
        use crate::bus::ContextBus;
        use crate::store::Store;
        use std::rc::Rc;

        let aggregator = super::ActivityAggregator::new(
            Rc::new(Store::in_memory()),
            Rc::new(ContextBus::new()),
        );
        let today = date(2025, 8, 20);

        for _ in 0..3 {
            aggregator
                .record(ActivityKind::Question, today)
                .expect("record question");
        }
        for _ in 0..2 {
            aggregator
                .record(ActivityKind::Answer, today)
                .expect("record answer");
        }

        let records = aggregator.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].questions_authored, 3);
        assert_eq!(records[0].answers_authored, 2);
        assert_eq!(records[0].total(), 5);
    }
}
