//! GPS time to calendar conversions.
//!
//! RINEX observation epochs are expressed in GPS time: leap seconds are not
//! modeled, GPS time is laid on the Gregorian calendar as is.
use serde::Deserialize;

pub const SECONDS_PER_DAY: u64 = 86_400;
pub const SECONDS_PER_WEEK: u64 = 7 * SECONDS_PER_DAY;

/// Broadcast week numbers wrap every 1024 weeks
pub const WEEK_ROLLOVER: u32 = 1024;

const DAYS_PER_MONTH: [u64; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Year of the GPS epoch
const GPS_EPOCH_YEAR: u32 = 1980;

/// 1980-01-01 to the GPS epoch (1980-01-06)
const GPS_EPOCH_DAY_OFFSET: u64 = 5;

/// Calendar date and time, whole seconds
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct DateTime {
    pub year: u32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Calendar date and time with fractional seconds
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct CalendarTime {
    pub year: u32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: f64,
}

impl CalendarTime {
    fn new(datetime: DateTime, fraction: f64) -> Self {
        Self {
            year: datetime.year,
            month: datetime.month,
            day: datetime.day,
            hour: datetime.hour,
            minute: datetime.minute,
            second: datetime.second as f64 + fraction,
        }
    }

    /// Two digit year
    pub fn short_year(&self) -> u32 {
        self.year % 100
    }
}

pub fn is_leap_year(year: u32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_year(year: u32) -> u64 {
    if is_leap_year(year) { 366 } else { 365 }
}

fn days_in_month(year: u32, month: u8) -> u64 {
    let days = DAYS_PER_MONTH[(month as usize - 1) % 12];
    if month == 2 && is_leap_year(year) {
        days + 1
    } else {
        days
    }
}

/// Day of year, January 1st being day 1
pub fn day_of_year(year: u32, month: u8, day: u8) -> u16 {
    let days = (1..month).map(|m| days_in_month(year, m)).sum::<u64>();
    (days + day as u64) as u16
}

/// Converts GPS (week, time of week) to calendar date and time.
/// Leap years are considered, leap seconds are not.
pub fn to_date_time(gps_week: u32, gps_tow: u32) -> DateTime {
    let mut remaining = gps_week as u64 * SECONDS_PER_WEEK
        + gps_tow as u64
        + GPS_EPOCH_DAY_OFFSET * SECONDS_PER_DAY;

    let mut year = GPS_EPOCH_YEAR;
    loop {
        let seconds = days_in_year(year) * SECONDS_PER_DAY;
        if seconds <= remaining {
            remaining -= seconds;
            year += 1;
        } else {
            break;
        }
    }

    let mut month = 1;
    loop {
        let seconds = days_in_month(year, month) * SECONDS_PER_DAY;
        if seconds <= remaining {
            remaining -= seconds;
            month += 1;
        } else {
            break;
        }
    }

    let day = (remaining / SECONDS_PER_DAY + 1) as u8;
    remaining %= SECONDS_PER_DAY;

    let hour = (remaining / 3600) as u8;
    remaining %= 3600;

    DateTime {
        year,
        month,
        day,
        hour,
        minute: (remaining / 60) as u8,
        second: (remaining % 60) as u8,
    }
}

/// Converts a calendar date and time back to GPS (week, time of week).
/// Returns None prior to the GPS epoch.
pub fn to_week_tow(datetime: &DateTime) -> Option<(u32, u32)> {
    let days = (GPS_EPOCH_YEAR..datetime.year)
        .map(days_in_year)
        .sum::<u64>()
        + day_of_year(datetime.year, datetime.month, datetime.day) as u64
        - 1;

    let seconds = days * SECONDS_PER_DAY
        + datetime.hour as u64 * 3600
        + datetime.minute as u64 * 60
        + datetime.second as u64;

    let seconds = seconds.checked_sub(GPS_EPOCH_DAY_OFFSET * SECONDS_PER_DAY)?;

    Some((
        (seconds / SECONDS_PER_WEEK) as u32,
        (seconds % SECONDS_PER_WEEK) as u32,
    ))
}

/// GPS week rollover era, used to restore a continuous week number
/// from the 10 bit broadcast week.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub struct Rollover {
    /// First week of the era, 1024 for the era that started on 1999-08-22
    pub era_start_week: u32,
}

impl Default for Rollover {
    fn default() -> Self {
        Self {
            era_start_week: WEEK_ROLLOVER,
        }
    }
}

impl Rollover {
    pub fn new(era_start_week: u32) -> Self {
        Self { era_start_week }
    }

    /// Continuous week number of a broadcast `week`
    pub fn continuous_week(&self, week: u32) -> u32 {
        self.era_start_week + week % WEEK_ROLLOVER
    }

    /// Calendar representation of (`week`, `tow`) within this era.
    /// `tow` is expressed in seconds and may carry a fractional part.
    pub fn calendar(&self, week: u32, tow: f64) -> CalendarTime {
        let tow = tow.max(0.0);
        let whole = tow.floor();
        let datetime = to_date_time(self.continuous_week(week), whole as u32);
        CalendarTime::new(datetime, tow - whole)
    }
}

/// Rounds `seconds` to `decimals` so a rounded field never reads 60 seconds.
pub fn round_seconds(seconds: f64, decimals: i32) -> f64 {
    let scale = 10.0_f64.powi(decimals);
    (seconds * scale).round() / scale
}
