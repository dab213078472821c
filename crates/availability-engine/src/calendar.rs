//! Day-of-week and date-key utilities.
//!
//! Everything here works on naive calendar dates. The weekday of a date is
//! derived from its year/month/day components, never from a timestamp read
//! back in some time zone, so the same date always maps to the same weekday.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{AvailabilityError, Result};

/// Format used for date keys and for `specificDate` on the wire.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Day of the week, numbered Sunday-first.
///
/// The same mapping is used for the `dayOfWeek` field of stored rules and for
/// deciding which weekly rules govern a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DayOfWeek {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl DayOfWeek {
    /// All seven days, Sunday first.
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    /// Numeric index, `SUNDAY = 0` through `SATURDAY = 6`.
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Inverse of [`DayOfWeek::number`].
    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.get(n as usize).copied()
    }

    /// Upper-case English name used on the wire (`"MONDAY"`).
    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Sunday => "SUNDAY",
            DayOfWeek::Monday => "MONDAY",
            DayOfWeek::Tuesday => "TUESDAY",
            DayOfWeek::Wednesday => "WEDNESDAY",
            DayOfWeek::Thursday => "THURSDAY",
            DayOfWeek::Friday => "FRIDAY",
            DayOfWeek::Saturday => "SATURDAY",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => DayOfWeek::Sunday,
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = AvailabilityError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|day| day.as_str() == upper)
            .ok_or_else(|| AvailabilityError::InvalidDayOfWeek(s.to_string()))
    }
}

/// The weekday a calendar date falls on.
pub fn day_of_week(date: NaiveDate) -> DayOfWeek {
    date.weekday().into()
}

/// The `yyyy-MM-dd` key of a date.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a `yyyy-MM-dd` key into its calendar components.
///
/// # Errors
/// Returns `AvailabilityError::InvalidDate` for anything that is not a real
/// calendar date in that exact shape.
pub fn parse_date_key(key: &str) -> Result<NaiveDate> {
    let trimmed = key.trim();
    let invalid = || AvailabilityError::InvalidDate(key.to_string());
    let date = NaiveDate::parse_from_str(trimmed, DATE_KEY_FORMAT).map_err(|_| invalid())?;
    // chrono accepts unpadded fields such as "2024-3-4".
    if date_key(date) != trimmed {
        return Err(invalid());
    }
    Ok(date)
}
