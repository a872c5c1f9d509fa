//! Working-day calendar: weekends plus recurring fixed-date holidays.
//!
//! Holidays are `(month, day)` pairs that recur every year. There are no
//! moving holidays (Easter, "fourth Thursday") and no leap-year special casing.

use anyhow::{Result, bail};
use chrono::{Datelike, NaiveDate, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Upper bound on day-stepping walks. A year plus a week always contains a
/// working day unless every calendar day has been declared a holiday.
const MAX_WALK_DAYS: u32 = 373;

static HOLIDAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<month>\d{1,2})-(?P<day>\d{1,2})\s*$").expect("invalid holiday regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    holidays: BTreeSet<(u32, u32)>,
}

impl Default for Calendar {
    /// New Year's Day, Independence Day, Christmas Day.
    fn default() -> Self {
        Self::with_holidays([(1, 1), (7, 4), (12, 25)])
    }
}

impl Calendar {
    /// Calendar with weekends only.
    pub fn new() -> Self {
        Self {
            holidays: BTreeSet::new(),
        }
    }

    pub fn with_holidays(holidays: impl IntoIterator<Item = (u32, u32)>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    pub fn holidays(&self) -> &BTreeSet<(u32, u32)> {
        &self.holidays
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&(date.month(), date.day()))
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.is_holiday(date)
    }

    /// Working days strictly after `start`, up to and including `end`.
    ///
    /// Negative when `start > end` (the mirrored count, negated).
    pub fn count_working_days(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        if start > end {
            return -self.count_working_days(end, start);
        }

        // Weekdays in (start, end]: five per whole week, then the leftover days.
        let span = (end - start).num_days();
        let first = i64::from(start.weekday().num_days_from_monday());
        let leftover = (1..=span % 7).filter(|i| (first + i) % 7 < 5).count() as i64;
        let weekdays = span / 7 * 5 + leftover;

        weekdays - self.weekday_holidays_between(start, end)
    }

    /// Holidays falling on a weekday in (start, end].
    fn weekday_holidays_between(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        let mut count = 0;
        for year in start.year()..=end.year() {
            for &(month, day) in &self.holidays {
                let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                    continue;
                };
                if date > start
                    && date <= end
                    && !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
                {
                    count += 1;
                }
            }
        }
        count
    }

    /// First working day strictly after `date`.
    pub fn next_working_day(&self, date: NaiveDate) -> Option<NaiveDate> {
        let mut d = date;
        for _ in 0..MAX_WALK_DAYS {
            d = d.succ_opt()?;
            if self.is_working_day(d) {
                return Some(d);
            }
        }
        None
    }

    /// Last working day strictly before `date`.
    pub fn previous_working_day(&self, date: NaiveDate) -> Option<NaiveDate> {
        let mut d = date;
        for _ in 0..MAX_WALK_DAYS {
            d = d.pred_opt()?;
            if self.is_working_day(d) {
                return Some(d);
            }
        }
        None
    }
}

/// Parse a recurring holiday written as `MM-DD` (e.g. `"12-25"`, `"7-4"`).
///
/// `02-29` is accepted; it only matches in leap years.
pub fn parse_holiday(s: &str) -> Result<(u32, u32)> {
    let Some(caps) = HOLIDAY_RE.captures(s) else {
        bail!("invalid holiday '{s}': expected MM-DD");
    };

    let month: u32 = caps["month"].parse()?;
    let day: u32 = caps["day"].parse()?;

    // 2024 is a leap year, so every real (month, day) pair validates.
    if NaiveDate::from_ymd_opt(2024, month, day).is_none() {
        bail!("invalid holiday '{s}': no such calendar day");
    }

    Ok((month, day))
}
