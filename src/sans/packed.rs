//! Packed decimal dates, times and durations.
//!
//! Devices store most clock values one binary-coded decimal byte per unit,
//! least significant unit first. Each nibble is checked, then each unit is
//! checked against its range.

use chrono::{NaiveDate, NaiveDateTime};

use super::DecodeError;

/// Decode one packed decimal byte.
pub(crate) fn bcd(b: u8) -> Result<u8, DecodeError> {
    let (tens, units) = (b >> 4, b & 0x0F);

    if tens > 9 || units > 9 {
        Err(DecodeError::InvalidBcd(b))?;
    }

    Ok(tens * 10 + units)
}

/// Decode one packed decimal byte no greater than `max`.
fn bcd_max(b: u8, max: u8, field: &'static str) -> Result<u8, DecodeError> {
    let value = bcd(b)?;

    if value > max {
        Err(DecodeError::OutOfRange {
            field,
            value: value.into(),
        })?;
    }

    Ok(value)
}

/// Decode a start time: seconds, minutes, hours, day, month and years since
/// 2000.
pub(crate) fn date_time(r: [u8; 6]) -> Result<NaiveDateTime, DecodeError> {
    let [seconds, minutes, hours, day, month, year] = r;

    let seconds = bcd_max(seconds, 59, "start seconds")?;
    let minutes = bcd_max(minutes, 59, "start minutes")?;
    let hours = bcd_max(hours, 23, "start hours")?;
    let day = bcd_max(day, 31, "start day")?;
    let month = bcd_max(month, 12, "start month")?;
    let year = bcd(year)?;

    if month == 0 {
        Err(DecodeError::OutOfRange {
            field: "start month",
            value: 0,
        })?;
    }

    NaiveDate::from_ymd_opt(2000 + i32::from(year), month.into(), day.into())
        .and_then(|d| d.and_hms_opt(hours.into(), minutes.into(), seconds.into()))
        .ok_or(DecodeError::OutOfRange {
            field: "start day",
            value: day.into(),
        })
}

/// Decode a duration in ticks: tenths (low nibble), seconds, minutes and
/// hours.
pub(crate) fn duration(r: [u8; 4]) -> Result<u32, DecodeError> {
    let [tenths, seconds, minutes, hours] = r;

    let tenths = tenths & 0x0F;
    if tenths > 9 {
        Err(DecodeError::OutOfRange {
            field: "duration tenths",
            value: tenths.into(),
        })?;
    }

    let seconds = clock([seconds, minutes, hours])?;

    Ok(seconds * 10 + u32::from(tenths))
}

/// Decode a time span in seconds: seconds, minutes and hours.
pub(crate) fn clock(r: [u8; 3]) -> Result<u32, DecodeError> {
    let [seconds, minutes, hours] = r;

    let seconds = bcd_max(seconds, 59, "seconds")?;
    let minutes = bcd_max(minutes, 59, "minutes")?;
    let hours = bcd(hours)?;

    Ok(u32::from(hours) * 3600 + u32::from(minutes) * 60 + u32::from(seconds))
}
