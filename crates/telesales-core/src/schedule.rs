//! Monthly trigger times for scheduled distribution runs.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Fires once a month on `day_of_month` at `hour_utc:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySchedule {
    pub day_of_month: u32,
    pub hour_utc: u32,
}

impl Default for MonthlySchedule {
    fn default() -> Self {
        Self {
            day_of_month: 1,
            hour_utc: 0,
        }
    }
}

impl MonthlySchedule {
    /// The first trigger strictly after `now`.
    ///
    /// Returns `None` when the day/hour pair cannot occur every month
    /// (day outside `1..=28` or hour above 23).
    pub fn next_run_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if !(1..=28).contains(&self.day_of_month) || self.hour_utc > 23 {
            return None;
        }
        let this_month = self.at(now.year(), now.month())?;
        if this_month > now {
            return Some(this_month);
        }
        let (year, month) = if now.month() == 12 {
            (now.year() + 1, 1)
        } else {
            (now.year(), now.month() + 1)
        };
        self.at(year, month)
    }

    fn at(&self, year: i32, month: u32) -> Option<DateTime<Utc>> {
        Utc.with_ymd_and_hms(year, month, self.day_of_month, self.hour_utc, 0, 0)
            .single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn later_this_month() {
        let s = MonthlySchedule {
            day_of_month: 15,
            hour_utc: 6,
        };
        assert_eq!(
            s.next_run_after(utc(2026, 3, 10, 12, 0)),
            Some(utc(2026, 3, 15, 6, 0))
        );
    }

    #[test]
    fn exact_trigger_moves_to_next_month() {
        let s = MonthlySchedule::default();
        assert_eq!(
            s.next_run_after(utc(2026, 4, 1, 0, 0)),
            Some(utc(2026, 5, 1, 0, 0))
        );
    }

    #[test]
    fn december_rolls_into_january() {
        let s = MonthlySchedule {
            day_of_month: 1,
            hour_utc: 2,
        };
        assert_eq!(
            s.next_run_after(utc(2026, 12, 20, 0, 0)),
            Some(utc(2027, 1, 1, 2, 0))
        );
    }

    #[test]
    fn invalid_day_or_hour_never_fires() {
        let now = utc(2026, 1, 1, 0, 0);
        let bad_day = MonthlySchedule {
            day_of_month: 31,
            hour_utc: 0,
        };
        let bad_hour = MonthlySchedule {
            day_of_month: 1,
            hour_utc: 24,
        };
        assert_eq!(bad_day.next_run_after(now), None);
        assert_eq!(bad_hour.next_run_after(now), None);
    }
}
