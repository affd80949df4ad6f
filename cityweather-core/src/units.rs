//! Unit conversion and qualitative banding of raw weather values.
//!
//! Everything here is pure: the same inputs always give the same strings.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::model::DisplayUnit;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Render a Celsius reading in the requested unit.
///
/// Celsius keeps the provider's precision (`15` stays `"15°C"`, `15.3` stays
/// `"15.3°C"`); Fahrenheit is rounded half away from zero to one decimal.
pub fn to_display_temperature(celsius: f64, unit: DisplayUnit) -> String {
    match unit {
        DisplayUnit::Celsius => format!("{}°C", positive_zero(celsius)),
        DisplayUnit::Fahrenheit => {
            let fahrenheit = celsius * 9.0 / 5.0 + 32.0;
            let rounded = (fahrenheit * 10.0).round() / 10.0;
            format!("{:.1}°F", positive_zero(rounded))
        }
    }
}

fn positive_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

/// Map a bearing in degrees onto one of 16 compass points.
pub fn wind_direction_label(degrees: f64) -> &'static str {
    let index = (degrees / 22.5).round() as i64;
    COMPASS_POINTS[index.rem_euclid(16) as usize]
}

pub fn humidity_band(percent: u8, table: &BandTable) -> &str {
    table.classify(f64::from(percent))
}

pub fn visibility_band(meters: u32, table: &BandTable) -> &str {
    table.classify(f64::from(meters))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClockStyle {
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
    #[serde(rename = "12h")]
    TwelveHour,
}

/// Format a unix timestamp as hour:minute in `tz`.
///
/// Out-of-range timestamps render as `"--:--"`.
pub fn format_epoch_time<Tz>(epoch_seconds: i64, tz: &Tz, clock: ClockStyle) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let Some(utc) = DateTime::from_timestamp(epoch_seconds, 0) else {
        return "--:--".to_string();
    };

    let local = utc.with_timezone(tz);
    match clock {
        ClockStyle::TwentyFourHour => local.format("%H:%M").to_string(),
        ClockStyle::TwelveHour => local.format("%I:%M %p").to_string(),
    }
}

/// One row of a [`BandTable`]: values at or above `from` get `label`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub from: f64,
    pub label: String,
}

impl Band {
    pub fn new(from: f64, label: impl Into<String>) -> Self {
        Self { from, label: label.into() }
    }
}

/// Ordered thresholds mapping a number to a qualitative label.
///
/// Example TOML:
/// [[humidity_bands]]
/// from = 0
/// label = "Dry"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Band>", into = "Vec<Band>")]
pub struct BandTable {
    bands: Vec<Band>,
}

impl BandTable {
    pub fn new(mut bands: Vec<Band>) -> Self {
        bands.sort_by(|a, b| a.from.total_cmp(&b.from));
        Self { bands }
    }

    pub fn humidity_default() -> Self {
        Self::new(vec![
            Band::new(0.0, "Dry"),
            Band::new(30.0, "Comfortable"),
            Band::new(60.0, "Humid"),
            Band::new(80.0, "Very humid"),
        ])
    }

    pub fn visibility_default() -> Self {
        Self::new(vec![
            Band::new(0.0, "Poor"),
            Band::new(1_000.0, "Moderate"),
            Band::new(5_000.0, "Good"),
            Band::new(10_000.0, "Excellent"),
        ])
    }

    /// Label of the highest band whose lower bound is `<= value`. Values below
    /// every bound fall into the first band.
    pub fn classify(&self, value: f64) -> &str {
        self.bands
            .iter()
            .rev()
            .find(|band| value >= band.from)
            .or_else(|| self.bands.first())
            .map(|band| band.label.as_str())
            .unwrap_or("Unknown")
    }
}

impl From<Vec<Band>> for BandTable {
    fn from(bands: Vec<Band>) -> Self {
        Self::new(bands)
    }
}

impl From<BandTable> for Vec<Band> {
    fn from(table: BandTable) -> Self {
        table.bands
    }
}
