use anyhow::{anyhow, Result};
use chrono::{Duration, Local, NaiveTime, Offset};
use std::fmt;

use crate::sun::{wrap_hours, SolarTimes};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Placeholder shown when a time of day is unknown.
pub const NO_TIME: &str = "—";
/// Placeholder shown when the daylight duration is unknown.
pub const NO_DURATION: &str = "-";

/// Offset of the host's local time from UTC in hours.
pub fn host_utc_offset() -> f64 {
    f64::from(Local::now().offset().fix().local_minus_utc()) / 3600.0
}

/// Rejects offsets that are not a finite number of hours within a day.
pub fn check_offset(utc_offset: f64) -> Result<f64> {
    if utc_offset.is_finite() && utc_offset.abs() < 24.0 {
        Ok(utc_offset)
    } else {
        Err(anyhow!("invalid UTC offset {}, expected hours in (-24, 24)", utc_offset))
    }
}

/// Converts a UTC decimal hour to a local time of day.
///
/// The offset is in hours and may be fractional for half hour zones.
pub fn to_local_time(utc_hours: f64, utc_offset: f64) -> Option<NaiveTime> {
    let local = wrap_hours(utc_hours + utc_offset);
    if !local.is_finite() {
        return None;
    }
    // floor(h) * 60 + round(frac * 60) == round(h * 60) for whole h
    let minutes = ((local * 60.0).round() as i64).rem_euclid(MINUTES_PER_DAY);
    NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0)
}

/// Sunrise and sunset on the local wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSolarTimes {
    pub sunrise: Option<NaiveTime>,
    pub sunset: Option<NaiveTime>,
}

impl LocalSolarTimes {
    pub fn new(times: &SolarTimes, utc_offset: f64) -> Self {
        if times.is_absent() {
            return Self {
                sunrise: None,
                sunset: None,
            };
        }
        Self {
            sunrise: times.sunrise.and_then(|h| to_local_time(h, utc_offset)),
            sunset: times.sunset.and_then(|h| to_local_time(h, utc_offset)),
        }
    }

    pub fn daylight(&self) -> Option<Daylight> {
        match (self.sunrise, self.sunset) {
            (Some(rise), Some(set)) => Some(Daylight::between(rise, set)),
            _ => None,
        }
    }
}

/// Elapsed time between sunrise and sunset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Daylight {
    pub hours: i64,
    pub minutes: i64,
}

impl Daylight {
    /// A sunset that falls before sunrise on the wall clock has wrapped past
    /// midnight and counts as the following day.
    pub fn between(sunrise: NaiveTime, sunset: NaiveTime) -> Self {
        let mut elapsed = sunset.signed_duration_since(sunrise);
        if elapsed < Duration::zero() {
            elapsed = elapsed + Duration::days(1);
        }
        let minutes = elapsed.num_minutes();
        Self {
            hours: minutes / 60,
            minutes: minutes % 60,
        }
    }
}

impl fmt::Display for Daylight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}min", self.hours, self.minutes)
    }
}

pub fn format_time(time: Option<NaiveTime>) -> String {
    match time {
        Some(t) => t.format("%H:%M").to_string(),
        None => NO_TIME.to_string(),
    }
}

pub fn format_daylight(daylight: Option<Daylight>) -> String {
    match daylight {
        Some(d) => d.to_string(),
        None => NO_DURATION.to_string(),
    }
}

/// Formats an offset like `UTC+2`, `UTC+5.5` or `UTC-3`.
pub fn format_offset(utc_offset: f64) -> String {
    if utc_offset >= 0.0 {
        format!("UTC+{}", utc_offset.abs())
    } else {
        format!("UTC{}", utc_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sun::compute_solar_times;
    use chrono::NaiveDate;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_to_local_time() {
        assert_eq!(Some(hm(4, 43)), to_local_time(2.7167, 2.0));
        assert_eq!(Some(hm(20, 30)), to_local_time(23.0, -2.5));
        // Half hour zone pushes past midnight
        assert_eq!(Some(hm(0, 15)), to_local_time(18.75, 5.5));
        assert_eq!(None, to_local_time(f64::NAN, 0.0));
    }

    #[test]
    fn test_minute_carry() {
        // 59.7 minutes rounds up into the next hour
        assert_eq!(Some(hm(7, 0)), to_local_time(6.995, 0.0));
        assert_eq!(Some(hm(0, 0)), to_local_time(23.999, 0.0));
    }

    #[test]
    fn test_daylight_between() {
        assert_eq!(
            Daylight {
                hours: 16,
                minutes: 50
            },
            Daylight::between(hm(4, 43), hm(21, 33))
        );
        assert_eq!(
            Daylight {
                hours: 10,
                minutes: 0
            },
            Daylight::between(hm(14, 0), hm(0, 0))
        );
    }

    #[test]
    fn test_berlin_local() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let local = LocalSolarTimes::new(&compute_solar_times(date, 52.52, 13.405), 2.0);
        let daylight = local.daylight().unwrap();
        assert_eq!(16, daylight.hours);
        assert!(local.sunrise.unwrap() < local.sunset.unwrap());
    }

    #[test]
    fn test_tokyo_local_order() {
        // sunrise is on the previous UTC day
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let utc = compute_solar_times(date, 35.68, 139.69);
        assert!(utc.sunrise.unwrap() > utc.sunset.unwrap());
        let local = LocalSolarTimes::new(&utc, 9.0);
        assert!(local.sunrise.unwrap() < local.sunset.unwrap());
        assert_eq!(14, local.daylight().unwrap().hours);
    }

    #[test]
    fn test_polar_placeholders() {
        let local = LocalSolarTimes::new(&SolarTimes::ABSENT, 1.0);
        assert_eq!(None, local.daylight());
        assert_eq!("—", format_time(local.sunrise));
        assert_eq!("-", format_daylight(local.daylight()));
    }

    #[test]
    fn test_check_offset() {
        assert_eq!(5.5, check_offset(5.5).unwrap());
        assert_eq!(-12.0, check_offset(-12.0).unwrap());
        assert!(check_offset(24.0).is_err());
        assert!(check_offset(1e9).is_err());
        assert!(check_offset(f64::INFINITY).is_err());
        assert!(check_offset(f64::NAN).is_err());
    }

    #[test]
    fn test_format() {
        assert_eq!("04:43", format_time(Some(hm(4, 43))));
        assert_eq!(
            "16h 5min",
            format_daylight(Some(Daylight {
                hours: 16,
                minutes: 5
            }))
        );
        assert_eq!("UTC+2", format_offset(2.0));
        assert_eq!("UTC+5.5", format_offset(5.5));
        assert_eq!("UTC-3", format_offset(-3.0));
        assert_eq!("UTC+0", format_offset(0.0));
    }
}
