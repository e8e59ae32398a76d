//! Calendar-aware uptime accounting.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike};
use std::fmt;

/// Elapsed time between two instants, broken into calendar components.
///
/// This is not a flat duration. Months and years have no fixed length, so the
/// breakdown subtracts calendar fields pairwise and borrows downwards:
/// seconds from minutes, minutes from hours, hours from days, days from
/// months using the length of the earlier instant's month, months from
/// years. Each component ends up non-negative and below its natural radix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Uptime {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Uptime {
    /// Break the span between two instants into calendar components.
    ///
    /// The later instant is converted into the earlier one's offset before
    /// any field is read, so mixed-offset inputs compare wall clocks in one
    /// zone. Argument order does not matter.
    pub fn between(start: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> Self {
        let mut a = start;
        let mut b = now.with_timezone(&start.timezone());
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }

        let mut years = i64::from(b.year() - a.year());
        let mut months = i64::from(b.month()) - i64::from(a.month());
        let mut days = i64::from(b.day()) - i64::from(a.day());
        let mut hours = i64::from(b.hour()) - i64::from(a.hour());
        let mut minutes = i64::from(b.minute()) - i64::from(a.minute());
        let mut seconds = i64::from(b.second()) - i64::from(a.second());

        if seconds < 0 {
            seconds += 60;
            minutes -= 1;
        }
        if minutes < 0 {
            minutes += 60;
            hours -= 1;
        }
        if hours < 0 {
            hours += 24;
            days -= 1;
        }
        if days < 0 {
            days += days_in_month(a.year(), a.month());
            months -= 1;
        }
        if months < 0 {
            months += 12;
            years -= 1;
        }

        Self {
            years,
            months,
            days,
            hours,
            minutes,
            seconds,
        }
    }
}

/// ISO-8601 duration form, `P<Y>Y<M>M<D>DT<h>H<m>M<s>S`, zero components
/// included.
impl fmt::Display for Uptime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P{}Y{}M{}DT{}H{}M{}S",
            self.years, self.months, self.days, self.hours, self.minutes, self.seconds
        )
    }
}

fn days_in_month(year: i32, month: u32) -> i64 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next)) => (next - first).num_days(),
        // Unreachable for year/month taken off a chrono date.
        _ => 30,
    }
}
