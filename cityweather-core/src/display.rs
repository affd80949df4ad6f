//! Render-ready projection of a resolved snapshot.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::{
    Config,
    config::DEFAULT_ICON_BASE_URL,
    model::{DisplayUnit, WeatherSnapshot},
    units::{
        BandTable, ClockStyle, format_epoch_time, humidity_band, to_display_temperature,
        visibility_band, wind_direction_label,
    },
};

/// Formatting knobs taken from [`Config`].
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    pub clock: ClockStyle,
    pub humidity_bands: BandTable,
    pub visibility_bands: BandTable,
    pub icon_base_url: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            clock: ClockStyle::default(),
            humidity_bands: BandTable::humidity_default(),
            visibility_bands: BandTable::visibility_default(),
            icon_base_url: DEFAULT_ICON_BASE_URL.to_string(),
        }
    }
}

impl From<&Config> for DisplayOptions {
    fn from(config: &Config) -> Self {
        Self {
            clock: config.clock,
            humidity_bands: config.humidity_bands.clone(),
            visibility_bands: config.visibility_bands.clone(),
            icon_base_url: config.icon_base_url.clone(),
        }
    }
}

/// Already-formatted strings for one resolved place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayModel {
    pub place_label: String,
    pub place_name: String,
    pub condition_main: String,
    pub condition_description: String,
    pub icon_url: String,
    pub temperature: String,
    pub humidity: String,
    pub wind: String,
    pub visibility: String,
    pub sunrise: String,
    pub sunset: String,
    pub is_day: bool,
}

impl DisplayModel {
    /// `now` decides the day/night flag, so callers pass the wall clock at
    /// render time rather than the fetch time.
    pub fn project<Tz>(
        snapshot: &WeatherSnapshot,
        label: &str,
        unit: DisplayUnit,
        now: DateTime<Utc>,
        tz: &Tz,
        options: &DisplayOptions,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let humidity = format!(
            "{}% ({})",
            snapshot.humidity_pct,
            humidity_band(snapshot.humidity_pct, &options.humidity_bands)
        );
        let wind = format!(
            "{} m/s ({})",
            snapshot.wind_speed_mps,
            wind_direction_label(snapshot.wind_direction_deg)
        );
        let visibility = snapshot
            .visibility_m
            .map(|meters| visibility_band(meters, &options.visibility_bands).to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        Self {
            place_label: label.to_string(),
            place_name: snapshot.place_name.clone(),
            condition_main: snapshot.condition_main.clone(),
            condition_description: snapshot.condition_description.clone(),
            icon_url: snapshot.icon_url(&options.icon_base_url),
            temperature: to_display_temperature(snapshot.temperature_c, unit),
            humidity,
            wind,
            visibility,
            sunrise: format_epoch_time(snapshot.sunrise, tz, options.clock),
            sunset: format_epoch_time(snapshot.sunset, tz, options.clock),
            is_day: snapshot.is_day_at(now.timestamp()),
        }
    }
}
