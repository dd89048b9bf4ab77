//! Greenwich sidereal hour angle from a UTC calendar epoch.

use std::f64::consts::TAU;

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use hifitime::Epoch;
use serde::Serialize;

use crate::error::{GeodesyError, Result};

const J2000_JD: f64 = 2451545.0; // Julian Date for J2000.0 epoch
const JULIAN_CENTURY: f64 = 36525.0; // Days in a Julian century
const SECONDS_PER_DAY: f64 = 86400.0;

/// Largest sidereal time, in seconds, reduced by stepping whole days.
const MAX_STEPPED_SECONDS: f64 = 1000.0 * SECONDS_PER_DAY;

/// Ratio of a mean solar day to a sidereal day.
const SIDEREAL_RATE: f64 = 1.0027379093;

/// A UTC calendar date and time of day.
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
pub struct CalendarEpoch {
    pub year: i32,
    /// Month, 1 to 12.
    pub month: u32,
    /// Day of month, starting at 1.
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    /// Seconds, including any fraction.
    pub second: f64,
}

impl CalendarEpoch {
    /// Creates a new `CalendarEpoch`, validating the fields.
    ///
    /// Dates before the Gregorian reform (1582-10-15) are rejected since
    /// [`julian_day`] does not handle them.
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: f64,
    ) -> Result<Self> {
        let invalid = |reason| GeodesyError::InvalidEpoch {
            year,
            month,
            day,
            reason,
        };

        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| invalid("no such calendar date"))?;
        if date < gregorian_reform() {
            return Err(invalid("date precedes the Gregorian calendar"));
        }
        if hour >= 24 || minute >= 60 {
            return Err(invalid("time of day out of range"));
        }
        // Leap seconds may run to 60.999...
        if !(0.0..61.0).contains(&second) {
            return Err(invalid("second out of range"));
        }

        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Creates a `CalendarEpoch` at midnight.
    pub fn from_date(year: i32, month: u32, day: u32) -> Result<Self> {
        Self::new(year, month, day, 0, 0, 0.0)
    }

    /// Returns the epoch for the given UTC timestamp.
    pub fn from_datetime(time: &DateTime<Utc>) -> Self {
        Self {
            year: time.year(),
            month: time.month(),
            day: time.day(),
            hour: time.hour(),
            minute: time.minute(),
            second: time.second() as f64 + time.nanosecond() as f64 * 1e-9,
        }
    }

    /// Julian day number at the start of this epoch's date.
    pub fn julian_day(&self) -> f64 {
        julian_day(self.month, self.day, self.year)
    }

    /// Seconds elapsed since midnight.
    pub fn seconds_of_day(&self) -> f64 {
        self.hour as f64 * 3600.0 + self.minute as f64 * 60.0 + self.second
    }

    /// Greenwich sidereal hour angle in radians at this epoch plus
    /// `offset_seconds`. See [`gast`].
    pub fn hour_angle(&self, offset_seconds: f64) -> f64 {
        greenwich_angle(self.julian_day(), self.seconds_of_day(), offset_seconds)
    }
}

impl From<DateTime<Utc>> for CalendarEpoch {
    fn from(time: DateTime<Utc>) -> Self {
        Self::from_datetime(&time)
    }
}

impl From<Epoch> for CalendarEpoch {
    fn from(epoch: Epoch) -> Self {
        let (year, month, day, hour, minute, second, nanos) = epoch.to_gregorian_utc();
        Self {
            year,
            month: month.into(),
            day: day.into(),
            hour: hour.into(),
            minute: minute.into(),
            second: second as f64 + nanos as f64 * 1e-9,
        }
    }
}

fn gregorian_reform() -> NaiveDate {
    NaiveDate::from_ymd_opt(1582, 10, 15).unwrap_or(NaiveDate::MIN)
}

/// Calculates the Julian day number of a Gregorian calendar date at 0h.
///
/// Not valid before 1582-10-15.
///
/// The year and month terms are rounded to nearest rather than truncated, as
/// in the historical COSMIC processing. On dates where either rounded term has
/// a fractional part of one half or more the result is one day past the
/// astronomical Julian date.
pub fn julian_day(month: u32, day: u32, year: i32) -> f64 {
    let month = month as i32;
    let k = (12 - month).div_euclid(10); // 1 for January and February
    let iy = year - k;
    let im = month + 1 + 12 * k;
    let century = iy.div_euclid(100);
    let j = 2 - century + century.div_euclid(4)
        + (365.25 * iy as f64).round() as i32
        + (30.6001 * im as f64).round() as i32;
    (j as f64) + (day as f64) + 1720994.5
}

/// Calculates the Greenwich sidereal hour angle in radians, in [0, 2π).
///
/// Mean sidereal time at 0h of the date comes from the IAU 1982 polynomial;
/// the UTC time of day and `offset_seconds` are advanced at the sidereal rate
/// on top of it. The equation of the equinoxes is not applied.
///
/// Returns NaN for non-finite input.
pub fn gast(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: f64,
    offset_seconds: f64,
) -> f64 {
    let seconds_of_day = hour as f64 * 3600.0 + minute as f64 * 60.0 + second;
    greenwich_angle(julian_day(month, day, year), seconds_of_day, offset_seconds)
}

fn greenwich_angle(julian_day: f64, seconds_of_day: f64, offset_seconds: f64) -> f64 {
    let tu = (julian_day - J2000_JD) / JULIAN_CENTURY;
    let gmst = 24110.548410 + 8640184.812866 * tu + 0.093104 * tu.powi(2) - 6.2e-6 * tu.powi(3);

    let mut theta = gmst + (seconds_of_day + offset_seconds) * SIDEREAL_RATE;
    if !theta.is_finite() {
        return f64::NAN;
    }
    // Stepping by whole days stalls once 86400 falls below the spacing of f64.
    if theta.abs() > MAX_STEPPED_SECONDS {
        theta = theta.rem_euclid(SECONDS_PER_DAY);
    }
    while theta < 0.0 {
        theta += SECONDS_PER_DAY;
    }
    while theta >= SECONDS_PER_DAY {
        theta -= SECONDS_PER_DAY;
    }
    theta * TAU / SECONDS_PER_DAY
}

/// Calculates the Greenwich hour angle in radians, in [0, 2π), at `seconds`
/// since 1970-01-01 00:00 UT.
///
/// Uses the same sidereal time polynomial as [`gast`] evaluated at 0h of the
/// day, advanced by the Earth's rotation rate polynomial over the elapsed
/// fraction of the day.
pub fn greenwich_hour_angle_unix(seconds: f64) -> f64 {
    const J2000_FROM_UNIX_DAYS: f64 = 10957.5; // Days from 1970-01-01 0h to J2000.0

    let whole_days = (seconds / SECONDS_PER_DAY).trunc();
    let day_fraction = (seconds - whole_days * SECONDS_PER_DAY) / SECONDS_PER_DAY;
    let tu = (whole_days - J2000_FROM_UNIX_DAYS) / JULIAN_CENTURY;

    let gmst = 24110.54841 + 8640184.812866 * tu + 0.093104 * tu.powi(2) - 6.2e-6 * tu.powi(3);
    // Sidereal seconds per solar day
    let omega = 86636.55536790872 + 5.098097e-6 * tu - 5.09e-10 * tu.powi(2);

    let mut theta = (gmst + omega * day_fraction) % SECONDS_PER_DAY;
    if theta < 0.0 {
        theta += SECONDS_PER_DAY;
    }
    (theta / SECONDS_PER_DAY * 360.0).to_radians()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    #[test]
    fn test_julian_day_matches_astronomical_date() {
        // Neither rounded term has a fraction of one half here.
        assert_eq!(julian_day(3, 20, 2024), 2460389.5);
        let epoch = Epoch::from_gregorian_utc_at_midnight(2024, 3, 20);
        assert_relative_eq!(julian_day(3, 20, 2024), epoch.to_jde_utc_days(), epsilon = 1e-6);
    }

    #[test]
    fn test_julian_day_rounding_convention() {
        // 365.25 * 1999 ends in .75 and rounds up a day.
        assert_eq!(julian_day(1, 1, 2000), 2451545.5);
        assert_eq!(julian_day(12, 31, 1999), 2451545.5);
        assert_eq!(julian_day(7, 15, 2009), 2455028.5);
        assert_eq!(julian_day(1, 1, 2009), 2454832.5);
        assert_eq!(julian_day(2, 28, 1900), 2415079.5);
        assert_eq!(julian_day(10, 15, 1582), 2299162.5);
    }

    #[test]
    fn test_gast_known_values() {
        assert_relative_eq!(gast(2000, 1, 1, 0, 0, 0.0, 0.0), 1.761_969_955_135_92, epsilon = 1e-9);
        assert_relative_eq!(
            gast(2009, 7, 15, 6, 30, 15.0, 0.0),
            0.554_889_730_244_273,
            epsilon = 1e-9
        );
        assert_relative_eq!(gast(2024, 3, 20, 0, 0, 0.0, 0.0), 3.107_013_705_964_448, epsilon = 1e-9);
    }

    #[test]
    fn test_gast_negative_offset_wraps() {
        let theta = gast(2024, 3, 20, 23, 59, 59.0, -3.0 * 86400.0);
        assert_relative_eq!(theta, 3.072_535_201_833_606, epsilon = 1e-9);
        assert!((0.0..TAU).contains(&theta));
    }

    #[test]
    fn test_gast_non_finite() {
        assert!(gast(2024, 3, 20, 0, 0, 0.0, f64::INFINITY).is_nan());
        assert!(gast(2024, 3, 20, 0, 0, 0.0, f64::NAN).is_nan());
    }

    #[test]
    fn test_gast_huge_offset() {
        for offset in [1e25, -1e25, 1e16] {
            let theta = gast(2009, 7, 15, 0, 0, 0.0, offset);
            assert!((0.0..TAU).contains(&theta), "offset {offset} gave {theta}");
        }
    }

    #[test]
    fn test_gast_reduction_is_continuous_past_day_stepping() {
        // 1e9 s is well beyond the whole-day stepping range.
        let a = gast(2009, 7, 15, 0, 0, 0.0, 1e9);
        let b = gast(2009, 7, 15, 0, 0, 0.0, 1e9 + 1.0);
        assert_relative_eq!(b - a, SIDEREAL_RATE * TAU / SECONDS_PER_DAY, epsilon = 1e-9);
    }

    #[test]
    fn test_time_of_day_out_of_range_does_not_overflow() {
        let theta = gast(2009, 7, 15, u32::MAX, u32::MAX, 0.0, 0.0);
        assert!((0.0..TAU).contains(&theta));

        let mut epoch = CalendarEpoch::from_date(2009, 7, 15).unwrap();
        epoch.hour = u32::MAX;
        assert_eq!(epoch.seconds_of_day(), u32::MAX as f64 * 3600.0);
    }

    #[test]
    fn test_offset_advances_like_time_of_day() {
        let by_time = gast(2009, 7, 15, 6, 30, 15.0, 0.0);
        let by_offset = gast(2009, 7, 15, 0, 0, 0.0, 6.0 * 3600.0 + 30.0 * 60.0 + 15.0);
        assert_relative_eq!(by_time, by_offset, epsilon = 1e-12);
    }

    #[test]
    fn test_epoch_sources_agree() {
        let from_fields = CalendarEpoch::new(2009, 7, 15, 6, 30, 15.0).unwrap();
        let from_chrono = CalendarEpoch::from(Utc.with_ymd_and_hms(2009, 7, 15, 6, 30, 15).unwrap());
        let from_hifitime = CalendarEpoch::from(Epoch::from_gregorian_utc_hms(2009, 7, 15, 6, 30, 15));
        assert_eq!(from_fields, from_chrono);
        assert_eq!(from_fields, from_hifitime);
        assert_relative_eq!(
            from_fields.hour_angle(0.0),
            gast(2009, 7, 15, 6, 30, 15.0, 0.0)
        );
        assert_relative_eq!(from_fields.seconds_of_day(), 23415.0);
    }

    #[test]
    fn test_invalid_epochs() {
        for result in [
            CalendarEpoch::new(2023, 13, 1, 0, 0, 0.0),
            CalendarEpoch::new(2023, 2, 29, 0, 0, 0.0),
            CalendarEpoch::new(1582, 10, 14, 0, 0, 0.0),
            CalendarEpoch::new(2023, 1, 1, 24, 0, 0.0),
            CalendarEpoch::new(2023, 1, 1, 0, 60, 0.0),
            CalendarEpoch::new(2023, 1, 1, 0, 0, -1.0),
        ] {
            assert!(matches!(result, Err(GeodesyError::InvalidEpoch { .. })));
        }
        assert!(CalendarEpoch::from_date(1582, 10, 15).is_ok());
    }

    #[test]
    fn test_unix_hour_angle() {
        // 2000-01-01 12:00 UT is J2000.0, where mean sidereal time is 280.46061837 degrees.
        assert_relative_eq!(
            greenwich_hour_angle_unix(946_728_000.0),
            280.460_618_37_f64.to_radians(),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            greenwich_hour_angle_unix(946_684_800.0),
            1.744_767_163_330_613_2,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            greenwich_hour_angle_unix(1_247_639_415.0),
            0.537_686_938_499_687_3,
            epsilon = 1e-9
        );
    }
}
