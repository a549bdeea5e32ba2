//! Check schedule
//!
//! The monitor wakes at a fixed list of whole hours, interpreted in
//! America/New_York (the city the monitored buildings are in, not the
//! host's timezone). The dashboard edits the list through
//! `schedule.json`; the daemon re-reads it every cycle.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::America::New_York;
use serde::{Deserialize, Serialize};

/// Hours used when no schedule file exists.
pub const DEFAULT_TIMES: [u32; 3] = [8, 12, 20];

/// An ordered list of local wake hours (0-23).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSchedule {
    times: Vec<u32>,
}

impl Default for CheckSchedule {
    fn default() -> Self {
        Self {
            times: DEFAULT_TIMES.to_vec(),
        }
    }
}

impl CheckSchedule {
    pub fn new(times: Vec<u32>) -> Self {
        Self { times }.normalized()
    }

    pub fn times(&self) -> &[u32] {
        &self.times
    }

    /// Drop out-of-range hours, sort, and dedupe; an empty result falls
    /// back to the default hours.
    pub fn normalized(mut self) -> Self {
        self.times.retain(|h| *h < 24);
        self.times.sort_unstable();
        self.times.dedup();
        if self.times.is_empty() {
            self.times = DEFAULT_TIMES.to_vec();
        }
        self
    }

    /// The next wake instant strictly after `after`: today at the first
    /// scheduled hour greater than the current New York hour, otherwise
    /// tomorrow at the earliest scheduled hour.
    pub fn next_run_after(&self, after: DateTime<Utc>) -> DateTime<Utc> {
        let local = after.with_timezone(&New_York);
        let today = local.date_naive();

        for &hour in &self.times {
            if hour > local.hour() {
                if let Some(next) = resolve_local(today, hour) {
                    return next;
                }
                // Hour does not exist on this date (DST gap); try the
                // next scheduled hour instead.
            }
        }

        let tomorrow = today + Duration::days(1);
        let first = self.times[0];
        resolve_local(tomorrow, first)
            // A DST gap at the first hour of the day; an hour's delay
            // beats never waking again.
            .unwrap_or_else(|| after + Duration::hours(1))
    }
}

fn resolve_local(date: NaiveDate, hour: u32) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(hour, 0, 0)?;
    New_York
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_pick_next_hour_later_today() {
        // Arrange: 2026-01-15 10:30 in New York is 15:30 UTC (EST)
        let after = Utc.with_ymd_and_hms(2026, 1, 15, 15, 30, 0).unwrap();
        let schedule = CheckSchedule::new(vec![8, 12, 20]);

        // Act
        let next = schedule.next_run_after(after);

        // Assert: 12:00 New York = 17:00 UTC
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 1, 15, 17, 0, 0).unwrap());
    }

    #[test]
    fn should_wrap_to_tomorrow_after_last_hour() {
        // Arrange: 21:30 New York on 2026-01-15 is 02:30 UTC on the 16th
        let after = Utc.with_ymd_and_hms(2026, 1, 16, 2, 30, 0).unwrap();
        let schedule = CheckSchedule::new(vec![8, 12, 20]);

        // Act
        let next = schedule.next_run_after(after);

        // Assert: 08:00 New York on the 16th = 13:00 UTC
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 1, 16, 13, 0, 0).unwrap());
    }

    #[test]
    fn should_skip_the_current_hour() {
        // Arrange: exactly 12:00 New York (17:00 UTC); the 12 o'clock
        // run is considered taken, the next wake is 20:00
        let after = Utc.with_ymd_and_hms(2026, 1, 15, 17, 0, 0).unwrap();
        let schedule = CheckSchedule::new(vec![8, 12, 20]);

        // Act
        let next = schedule.next_run_after(after);

        // Assert: 20:00 New York = 01:00 UTC next day
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 1, 16, 1, 0, 0).unwrap());
    }

    #[test]
    fn should_respect_daylight_saving_offset() {
        // Arrange: 2026-07-15 06:00 New York is 10:00 UTC (EDT)
        let after = Utc.with_ymd_and_hms(2026, 7, 15, 10, 0, 0).unwrap();
        let schedule = CheckSchedule::new(vec![8]);

        // Act
        let next = schedule.next_run_after(after);

        // Assert: 08:00 New York = 12:00 UTC in July
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 7, 15, 12, 0, 0).unwrap());
    }

    #[test]
    fn should_normalize_out_of_range_and_duplicate_hours() {
        let schedule = CheckSchedule::new(vec![20, 8, 8, 24, 99, 12]);
        assert_eq!(schedule.times(), &[8, 12, 20]);
    }

    #[test]
    fn should_fall_back_to_default_when_all_hours_invalid() {
        let schedule = CheckSchedule::new(vec![24, 30]);
        assert_eq!(schedule.times(), &DEFAULT_TIMES);
    }

    #[test]
    fn should_serialize_as_times_object() {
        let schedule = CheckSchedule::new(vec![6, 18]);
        let json = serde_json::to_string(&schedule).expect("Failed to serialize");
        assert_eq!(json, r#"{"times":[6,18]}"#);
    }
}
