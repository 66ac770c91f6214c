//! Reference date handling
//!
//! Every parse is evaluated against a "today" supplied by the caller. The
//! server derives it from the wall clock in a fixed UTC offset; tests pin it.

use chrono::{Datelike, FixedOffset, NaiveDate, Offset, Utc, Weekday};

/// Default offset (KST, UTC+9)
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 9;

/// Source of the reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// Wall clock, viewed in a fixed offset from UTC
    System {
        /// Hours east of UTC
        utc_offset_hours: i32,
    },

    /// Always the same date
    Fixed(NaiveDate),
}

impl Clock {
    /// Wall clock in the given offset
    pub fn system(utc_offset_hours: i32) -> Self {
        Clock::System { utc_offset_hours }
    }

    /// Today's date according to this clock
    ///
    /// An offset outside chrono's accepted range falls back to UTC.
    pub fn today(&self) -> NaiveDate {
        match *self {
            Clock::System { utc_offset_hours } => {
                let offset = FixedOffset::east_opt(utc_offset_hours * 3600)
                    .unwrap_or_else(|| Utc.fix());
                Utc::now().with_timezone(&offset).date_naive()
            }
            Clock::Fixed(date) => date,
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Clock::system(DEFAULT_UTC_OFFSET_HOURS)
    }
}

/// English name of the date's weekday
pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
