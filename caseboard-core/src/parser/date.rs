//! Chinese-style date fields: `2025年10月10日` or `10月10日`.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use regex::Regex;

static FULL_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{4})年([0-9]+)月([0-9]+)日").expect("valid full date regex"));
static SHORT_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)月([0-9]+)日").expect("valid short date regex"));

/// A date as written. Month and day are not checked against the calendar;
/// `at` normalizes overflow instead of rejecting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub year: i32,
    /// 1-based
    pub month: u32,
    pub day: u32,
}

/// Find a date in `field`. The explicit-year form wins; the short form takes
/// `reference_year`.
pub fn parse_date(field: &str, reference_year: i32) -> Option<DateParts> {
    if let Some(caps) = FULL_DATE.captures(field) {
        return Some(DateParts {
            year: caps[1].parse().ok()?,
            month: caps[2].parse().ok()?,
            day: caps[3].parse().ok()?,
        });
    }

    let caps = SHORT_DATE.captures(field)?;
    Some(DateParts {
        year: reference_year,
        month: caps[1].parse().ok()?,
        day: caps[2].parse().ok()?,
    })
}

impl DateParts {
    /// Combine with a wall-clock time, rolling any overflowing field into the
    /// next larger unit: `2月30日` becomes March 2nd or 1st, `25:00` the next
    /// day at 01:00, month 0 is December of the year before.
    ///
    /// Returns `None` only when the result leaves chrono's representable range.
    pub fn at(&self, hour: u32, minute: u32) -> Option<NaiveDateTime> {
        let months = i64::from(self.year) * 12 + i64::from(self.month) - 1;
        let year = i32::try_from(months.div_euclid(12)).ok()?;
        let month = u32::try_from(months.rem_euclid(12)).ok()? + 1;

        let offset = TimeDelta::try_days(i64::from(self.day) - 1)?
            .checked_add(&TimeDelta::try_minutes(i64::from(hour) * 60 + i64::from(minute))?)?;

        NaiveDate::from_ymd_opt(year, month, 1)?
            .and_hms_opt(0, 0, 0)?
            .checked_add_signed(offset)
    }

    /// Midnight of the normalized date.
    pub fn midnight(&self) -> Option<NaiveDateTime> {
        self.at(0, 0)
    }
}
