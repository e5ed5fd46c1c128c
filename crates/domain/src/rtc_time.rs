//! Clock time values.
//!
//! [`TimeFields`] is what a caller asks for; [`RtcTime`] is what the clock
//! holds. The only way from one to the other is [`TimeFields::validate`].

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

// =============================================================================
// Candidate
// =============================================================================

/// Unvalidated time/date fields, e.g. straight out of a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeFields {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub day: u8,
    pub month: u8,
    /// Two-digit year, 2000-based.
    pub year: u8,
}

impl TimeFields {
    /// Checks every field against the range the clock registers accept.
    ///
    /// No calendar logic is applied: 30/02 passes, just as the chip itself
    /// accepts it. The first offending field is reported.
    pub fn validate(self) -> Result<RtcTime, DomainError> {
        check("hour", self.hour, 0, 23)?;
        check("minute", self.minute, 0, 59)?;
        check("second", self.second, 0, 59)?;
        check("day", self.day, 1, 31)?;
        check("month", self.month, 1, 12)?;
        check("year", self.year, 0, 99)?;

        Ok(RtcTime::from_registers(
            self.hour,
            self.minute,
            self.second,
            self.day,
            self.month,
            self.year,
        ))
    }
}

fn check(field: &'static str, value: u8, min: u8, max: u8) -> Result<(), DomainError> {
    if value < min || value > max {
        return Err(DomainError::out_of_range(field, value, min, max));
    }
    Ok(())
}

// =============================================================================
// Clock Time
// =============================================================================

/// A time/date as stored in (or about to be written to) the clock.
///
/// Immutable. Built either by validating [`TimeFields`] or by decoding a
/// register read, in which case the values are whatever the chip reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RtcTime {
    hour: u8,
    minute: u8,
    second: u8,
    day: u8,
    month: u8,
    year: u8,
}

impl RtcTime {
    pub(crate) fn from_registers(
        hour: u8,
        minute: u8,
        second: u8,
        day: u8,
        month: u8,
        year: u8,
    ) -> Self {
        Self {
            hour,
            minute,
            second,
            day,
            month,
            year,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    /// Two-digit year; the full year is `2000 + year`.
    pub fn year(&self) -> u8 {
        self.year
    }

    /// Full four-digit year.
    pub fn full_year(&self) -> u16 {
        2000 + u16::from(self.year)
    }

    /// `HH:MM:SS`
    pub fn time_string(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }

    /// `DD/MM/20YY`
    pub fn date_string(&self) -> String {
        format!("{:02}/{:02}/20{:02}", self.day, self.month, self.year)
    }

    /// Back to plain fields, e.g. to re-submit a read value.
    pub fn fields(&self) -> TimeFields {
        TimeFields {
            hour: self.hour,
            minute: self.minute,
            second: self.second,
            day: self.day,
            month: self.month,
            year: self.year,
        }
    }
}

impl std::fmt::Display for RtcTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.time_string(), self.date_string())
    }
}
