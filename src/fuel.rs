//! Fuel consumption from a `liter|km|price` parameter and detection of
//! changed input between runs.
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::check_offset;

pub const DEFAULT_PARAMS: &str = "44.5|635|1.89";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelInput {
    pub liters: f64,
    pub km: f64,
    /// Price per liter in euro.
    pub price: f64,
}

impl FuelInput {
    pub fn parse(params: &str) -> Result<Self> {
        let fields: Vec<&str> = params.split('|').map(str::trim).collect();
        if fields.len() != 3 {
            return Err(anyhow!(
                "expected parameters as liter|km|price, got {:?}",
                params
            ));
        }
        let number = |name: &str, value: &str| -> Result<f64> {
            value
                .parse::<f64>()
                .with_context(|| format!("{} is not a number: {:?}", name, value))
        };
        Ok(Self {
            liters: number("liter", fields[0])?,
            km: number("km", fields[1])?,
            price: number("price", fields[2])?,
        })
    }

    /// Liters per 100 km.
    pub fn consumption(&self) -> f64 {
        self.liters / self.km * 100.0
    }

    pub fn consumption_text(&self) -> String {
        two_decimals(self.consumption())
    }
}

/// Formats with two decimals, rounding exact halves away from zero.
///
/// Only multiples of 1/8 with an odd numerator sit exactly on a tie at two
/// decimals; `{:.2}` would round those to even.
fn two_decimals(value: f64) -> String {
    let eighths = value * 8.0;
    if eighths.is_finite() && eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        format!("{:.2}", (value * 100.0).round() / 100.0)
    } else {
        format!("{:.2}", value)
    }
}

/// State persisted between runs to notice changed input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuelMarker {
    #[serde(rename = "liter", default)]
    pub liters: Option<f64>,
    #[serde(default)]
    pub km: Option<f64>,
    #[serde(rename = "preis", default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl FuelMarker {
    pub fn new(input: &FuelInput, timestamp: DateTime<Utc>) -> Self {
        Self {
            liters: Some(input.liters),
            km: Some(input.km),
            price: Some(input.price),
            timestamp: Some(timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }

    fn matches(&self, input: &FuelInput) -> bool {
        self.liters == Some(input.liters)
            && self.km == Some(input.km)
            && self.price == Some(input.price)
    }

    fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.as_ref()?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(err) => {
                log::warn!("ignoring marker timestamp {:?}: {}", raw, err);
                None
            }
        }
    }
}

/// Outcome of comparing the current input with the previous run.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Input differs; the marker must be saved and a log line written.
    New(FuelMarker),
    /// Input is unchanged since the marker was written.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub change: Change,
    /// When the displayed values were entered.
    pub timestamp: DateTime<Utc>,
}

impl Detection {
    pub fn is_new(&self) -> bool {
        matches!(self.change, Change::New(_))
    }
}

pub fn detect_change(
    input: &FuelInput,
    previous: Option<&FuelMarker>,
    now: DateTime<Utc>,
) -> Detection {
    match previous {
        Some(marker) if marker.matches(input) => Detection {
            change: Change::Unchanged,
            timestamp: marker.parsed_timestamp().unwrap_or(now),
        },
        _ => Detection {
            change: Change::New(FuelMarker::new(input, now)),
            timestamp: now,
        },
    }
}

/// Date and time as shown on the widget, e.g. `19.08.2025 14:05`.
pub fn format_timestamp(timestamp: DateTime<Utc>, offset: FixedOffset) -> String {
    timestamp
        .with_timezone(&offset)
        .format("%d.%m.%Y %H:%M")
        .to_string()
}

pub fn log_line(input: &FuelInput, timestamp: DateTime<Utc>, offset: FixedOffset) -> String {
    format!(
        "{} | {} l {} km | {} l | {} €/l",
        format_timestamp(timestamp, offset),
        input.liters,
        input.km,
        input.consumption_text(),
        input.price
    )
}

/// Converts an offset in hours into a chrono offset, rounding to the minute.
pub fn fixed_offset(utc_offset: f64) -> Result<FixedOffset> {
    let utc_offset = check_offset(utc_offset)?;
    let seconds = (utc_offset * 60.0).round() as i32 * 60;
    FixedOffset::east_opt(seconds).ok_or_else(|| anyhow!("invalid UTC offset {}", utc_offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use expect_test::expect;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 19, h, m, 0).unwrap()
    }

    #[test]
    fn test_parse() {
        let input = FuelInput::parse(DEFAULT_PARAMS).unwrap();
        assert_eq!(
            FuelInput {
                liters: 44.5,
                km: 635.0,
                price: 1.89
            },
            input
        );
        assert_eq!("7.01", input.consumption_text());
        assert!(FuelInput::parse(" 40 | 500 |1.7 ").is_ok());
    }

    #[test]
    fn test_consumption_ties_round_up() {
        let input = FuelInput::parse("1|800|1").unwrap();
        assert_eq!(0.125, input.consumption());
        assert_eq!("0.13", input.consumption_text());
        assert_eq!("0.06", FuelInput::parse("1|1600|1").unwrap().consumption_text());
        assert_eq!("0.38", two_decimals(0.375));
        assert_eq!("-0.13", two_decimals(-0.125));
        assert_eq!("2.50", two_decimals(2.5));
        assert_eq!("1.00", two_decimals(1.005));
    }

    #[test]
    fn test_parse_errors() {
        assert!(FuelInput::parse("44.5|635").is_err());
        assert!(FuelInput::parse("44.5|635|1.89|2").is_err());
        let err = FuelInput::parse("44,5|635|1.89").unwrap_err();
        assert_eq!("liter is not a number: \"44,5\"", err.to_string());
    }

    #[test]
    fn test_first_run_is_new() {
        let input = FuelInput::parse(DEFAULT_PARAMS).unwrap();
        let detection = detect_change(&input, None, at(10, 15));
        assert!(detection.is_new());
        assert_eq!(at(10, 15), detection.timestamp);

        // an all null marker is the same as none at all
        let detection = detect_change(&input, Some(&FuelMarker::default()), at(10, 15));
        assert!(detection.is_new());
    }

    #[test]
    fn test_unchanged_keeps_timestamp() {
        let input = FuelInput::parse(DEFAULT_PARAMS).unwrap();
        let marker = FuelMarker::new(&input, at(10, 15));
        let detection = detect_change(&input, Some(&marker), at(18, 0));
        assert_eq!(Change::Unchanged, detection.change);
        assert_eq!(at(10, 15), detection.timestamp);
    }

    #[test]
    fn test_unchanged_without_timestamp() {
        let input = FuelInput::parse(DEFAULT_PARAMS).unwrap();
        let mut marker = FuelMarker::new(&input, at(10, 15));
        marker.timestamp = None;
        let detection = detect_change(&input, Some(&marker), at(18, 0));
        assert!(!detection.is_new());
        assert_eq!(at(18, 0), detection.timestamp);

        marker.timestamp = Some("yesterday".to_string());
        let detection = detect_change(&input, Some(&marker), at(18, 0));
        assert_eq!(at(18, 0), detection.timestamp);
    }

    #[test]
    fn test_changed_price() {
        let old = FuelInput::parse(DEFAULT_PARAMS).unwrap();
        let marker = FuelMarker::new(&old, at(10, 15));
        let input = FuelInput::parse("44.5|635|1.79").unwrap();
        let detection = detect_change(&input, Some(&marker), at(18, 0));
        assert_eq!(
            Change::New(FuelMarker::new(&input, at(18, 0))),
            detection.change
        );
    }

    #[test]
    fn test_marker_json() {
        let input = FuelInput::parse(DEFAULT_PARAMS).unwrap();
        let json = serde_json::to_string(&FuelMarker::new(&input, at(10, 15))).unwrap();
        expect![[r#"{"liter":44.5,"km":635.0,"preis":1.89,"timestamp":"2025-08-19T10:15:00.000Z"}"#]]
            .assert_eq(&json);

        let marker: FuelMarker =
            serde_json::from_str(r#"{"liter":null,"km":null,"preis":null,"timestamp":null}"#)
                .unwrap();
        assert_eq!(FuelMarker::default(), marker);
    }

    #[test]
    fn test_log_line() {
        let input = FuelInput::parse(DEFAULT_PARAMS).unwrap();
        let offset = fixed_offset(2.0).unwrap();
        expect![[r#"19.08.2025 12:15 | 44.5 l 635 km | 7.01 l | 1.89 €/l"#]]
            .assert_eq(&log_line(&input, at(10, 15), offset));
    }

    #[test]
    fn test_fixed_offset() {
        assert_eq!(19800, fixed_offset(5.5).unwrap().local_minus_utc());
        assert_eq!(-10800, fixed_offset(-3.0).unwrap().local_minus_utc());
        assert!(fixed_offset(30.0).is_err());
        assert!(fixed_offset(1e9).is_err());
        assert!(fixed_offset(f64::INFINITY).is_err());
        assert!(fixed_offset(f64::NAN).is_err());
    }
}
