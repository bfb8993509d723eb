use chrono::{Datelike, NaiveDate};

/// Zenith of the sun at rise/set, accounting for refraction and the solar disk.
const ZENITH: f64 = 90.833;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolarEvent {
    Sunrise,
    Sunset,
}

impl SolarEvent {
    fn anchor_hour(self) -> f64 {
        match self {
            SolarEvent::Sunrise => 6.0,
            SolarEvent::Sunset => 18.0,
        }
    }
}

/// Sunrise and sunset of a single day as UTC decimal hours.
///
/// Both are `None` when the sun does not cross the horizon that day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarTimes {
    pub sunrise: Option<f64>,
    pub sunset: Option<f64>,
}

impl SolarTimes {
    pub const ABSENT: SolarTimes = SolarTimes {
        sunrise: None,
        sunset: None,
    };

    pub fn is_absent(&self) -> bool {
        self.sunrise.is_none() || self.sunset.is_none()
    }
}

/// Why the sun does not cross the horizon on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolarCondition {
    /// The sun stays above the horizon all day.
    PolarDay,
    /// The sun stays below the horizon all day.
    PolarNight,
}

/// Intermediate values shared by the hour angle and the final time step.
#[derive(Debug)]
struct Approximation {
    t: f64,
    lng_hour: f64,
    ra_hours: f64,
    cos_h: f64,
}

/// Day of the year, January 1st being day 1.
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

/// Computes sunrise and sunset for `date` at the given position.
///
/// If either event is missing the result is [`SolarTimes::ABSENT`]; polar
/// day and polar night are not told apart here, see [`polar_condition`].
pub fn compute_solar_times(date: NaiveDate, latitude: f64, longitude: f64) -> SolarTimes {
    let sunrise = solar_event(date, latitude, longitude, SolarEvent::Sunrise);
    let sunset = solar_event(date, latitude, longitude, SolarEvent::Sunset);
    match (sunrise, sunset) {
        (Some(_), Some(_)) => SolarTimes { sunrise, sunset },
        _ => SolarTimes::ABSENT,
    }
}

/// Computes a single event as a UTC decimal hour in `[0, 24)`.
pub fn solar_event(
    date: NaiveDate,
    latitude: f64,
    longitude: f64,
    event: SolarEvent,
) -> Option<f64> {
    let approx = approximate(day_of_year(date), latitude, longitude, event);
    log::debug!("{:?} on {}: {:?}", event, date, approx);
    if !(-1.0..=1.0).contains(&approx.cos_h) {
        // Also catches NaN, e.g. from a latitude of exactly +-90.
        return None;
    }

    let h = degrees(approx.cos_h.acos());
    let h = match event {
        SolarEvent::Sunrise => (360.0 - h) / 15.0,
        SolarEvent::Sunset => h / 15.0,
    };
    let local_mean_time = h + approx.ra_hours - 0.06571 * approx.t - 6.622;
    let utc = wrap_hours(local_mean_time - approx.lng_hour);
    if utc.is_finite() {
        Some(utc)
    } else {
        None
    }
}

/// Classifies a day on which [`compute_solar_times`] finds no sunrise or sunset.
///
/// Returns `None` when both events occur.
pub fn polar_condition(date: NaiveDate, latitude: f64, longitude: f64) -> Option<PolarCondition> {
    let n = day_of_year(date);
    [SolarEvent::Sunrise, SolarEvent::Sunset]
        .iter()
        .map(|&event| approximate(n, latitude, longitude, event).cos_h)
        .find_map(|cos_h| {
            if cos_h < -1.0 {
                Some(PolarCondition::PolarDay)
            } else if cos_h > 1.0 {
                Some(PolarCondition::PolarNight)
            } else {
                None
            }
        })
}

fn approximate(n: u32, latitude: f64, longitude: f64, event: SolarEvent) -> Approximation {
    let lng_hour = longitude / 15.0;
    let t = f64::from(n) + (event.anchor_hour() - lng_hour) / 24.0;

    // mean anomaly
    let m = 0.9856 * t - 3.289;

    // true longitude
    let l = normalize_degrees(
        m + 1.916 * f64::sin(radians(m)) + 0.020 * f64::sin(2.0 * radians(m)) + 282.634,
    );

    // right ascension, moved into the same quadrant as L
    let ra = normalize_degrees(degrees(f64::atan(0.91764 * f64::tan(radians(l)))));
    let ra = ra + ((l / 90.0).floor() * 90.0 - (ra / 90.0).floor() * 90.0);
    let ra_hours = ra / 15.0;

    // declination
    let sin_dec = 0.39782 * f64::sin(radians(l));
    let cos_dec = f64::cos(f64::asin(sin_dec));

    let cos_h = (f64::cos(radians(ZENITH)) - sin_dec * f64::sin(radians(latitude)))
        / (cos_dec * f64::cos(radians(latitude)));

    Approximation {
        t,
        lng_hour,
        ra_hours,
        cos_h,
    }
}

fn normalize_degrees(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}

pub(crate) fn wrap_hours(hours: f64) -> f64 {
    let h = hours.rem_euclid(24.0);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if h >= 24.0 {
        0.0
    } else {
        h
    }
}

fn radians(deg: f64) -> f64 {
    deg * std::f64::consts::PI / 180.0
}
fn degrees(rad: f64) -> f64 {
    rad / std::f64::consts::PI * 180.0
}
