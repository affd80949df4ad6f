use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A place returned by the geocoding endpoint.
///
/// Two candidates with the same name may differ by region, so the
/// coordinate pair is the identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl PlaceCandidate {
    /// `"name, country[, state]"`, or `None` when the provider gave no name.
    pub fn label(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return None;
        }

        let mut label = format!("{}, {}", self.name, self.country);
        if let Some(state) = self.state.as_deref().filter(|s| !s.is_empty()) {
            label.push_str(", ");
            label.push_str(state);
        }
        Some(label)
    }

    pub fn key(&self) -> String {
        format!("{}-{}", self.latitude, self.longitude)
    }
}

/// Current conditions at one place, as fetched. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub place_name: String,
    pub condition_main: String,
    pub condition_description: String,
    pub condition_icon: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub wind_direction_deg: f64,
    pub visibility_m: Option<u32>,
    pub sunrise: i64,
    pub sunset: i64,
}

impl WeatherSnapshot {
    pub fn icon_url(&self, icon_base_url: &str) -> String {
        format!("{}/img/wn/{}@2x.png", icon_base_url.trim_end_matches('/'), self.condition_icon)
    }

    /// Daylight means strictly between sunrise and sunset.
    pub fn is_day_at(&self, epoch_seconds: i64) -> bool {
        epoch_seconds > self.sunrise && epoch_seconds < self.sunset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl DisplayUnit {
    pub fn toggled(self) -> Self {
        match self {
            DisplayUnit::Celsius => DisplayUnit::Fahrenheit,
            DisplayUnit::Fahrenheit => DisplayUnit::Celsius,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            DisplayUnit::Celsius => "°C",
            DisplayUnit::Fahrenheit => "°F",
        }
    }
}

impl std::fmt::Display for DisplayUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for DisplayUnit {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "c" | "celsius" => Ok(DisplayUnit::Celsius),
            "f" | "fahrenheit" => Ok(DisplayUnit::Fahrenheit),
            _ => Err(anyhow::anyhow!("Unknown unit '{value}'. Supported units: c, f.")),
        }
    }
}
