use crate::vars::EPOCH_DAY;
use hifitime::Epoch;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum InstantError {
    #[error("month {0} out of range 1-12")]
    Month(u8),
    #[error("day {day} out of range for {year}-{month:02}")]
    Day { year: i32, month: u8, day: u8 },
    #[error("hour {0} out of range 0-23")]
    Hour(u8),
    #[error("minute {0} out of range 0-59")]
    Minute(u8),
    #[error("second {0} out of range [0, 61)")]
    Second(f64),
}

/// an absolute moment in UTC, broken down into the civil calendar
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Instant {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: f64,
}

/// exact identity of an instant, seconds compared bit for bit
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct InstantKey(i32, u8, u8, u8, u8, u64);

fn is_leap(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        2 if is_leap(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

impl Instant {
    /// build an instant without looking at the fields
    pub fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: f64) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// build an instant, refusing fields outside the civil calendar
    pub fn checked(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: f64,
    ) -> Result<Self, InstantError> {
        if !(1..=12).contains(&month) {
            return Err(InstantError::Month(month));
        }
        if day == 0 || day > days_in_month(year, month) {
            return Err(InstantError::Day { year, month, day });
        }
        if hour > 23 {
            return Err(InstantError::Hour(hour));
        }
        if minute > 59 {
            return Err(InstantError::Minute(minute));
        }
        // leap seconds may push a reading past 60
        if !second.is_finite() || !(0.0..61.0).contains(&second) {
            return Err(InstantError::Second(second));
        }
        Ok(Self::new(year, month, day, hour, minute, second))
    }

    /// fractional hour of the day
    pub fn hour_decimal(&self) -> f64 {
        self.hour as f64 + self.minute as f64 / 60.0 + self.second / 3600.0
    }

    /// continuous day count from 2000 Jan 0.0 UT
    pub fn days_since_j2000(&self) -> f64 {
        let (y, m, d) = (self.year as i64, self.month as i64, self.day as i64);
        let day_number = 367 * y - 7 * (y + (m + 9) / 12) / 4 + 275 * m / 9 + d - EPOCH_DAY;
        day_number as f64 + self.hour_decimal() / 24.0
    }

    pub fn key(&self) -> InstantKey {
        InstantKey(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second.to_bits(),
        )
    }
}

impl From<Epoch> for Instant {
    fn from(epoch: Epoch) -> Self {
        let (year, month, day, hour, minute, second, nanos) = epoch.to_gregorian_utc();
        Self::new(
            year,
            month,
            day,
            hour,
            minute,
            second as f64 + nanos as f64 * 1e-9,
        )
    }
}
