use chrono::{DateTime, TimeZone, Utc};

use crate::{
    display::{DisplayModel, DisplayOptions},
    model::{DisplayUnit, PlaceCandidate, WeatherSnapshot},
};

/// Shown when an explicit submit cannot reach the geocoding endpoint.
pub const SUBMIT_FAILED_MESSAGE: &str = "Unable to locate the specified city.";

/// Shown when the weather request for a chosen place fails.
pub const WEATHER_FAILED_MESSAGE: &str = "Location not found. Please try again.";

/// Where the search workflow currently stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Suggesting(Vec<PlaceCandidate>),
    Resolving(PlaceCandidate),
    Resolved { snapshot: WeatherSnapshot, label: String },
    Error(String),
}

/// Everything the render layer needs: typed text, workflow state and unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub query: String,
    pub state: SessionState,
    pub unit: DisplayUnit,
}

impl Session {
    pub fn candidates(&self) -> &[PlaceCandidate] {
        match &self.state {
            SessionState::Suggesting(candidates) => candidates,
            _ => &[],
        }
    }

    pub fn resolved(&self) -> Option<(&WeatherSnapshot, &str)> {
        match &self.state {
            SessionState::Resolved { snapshot, label } => Some((snapshot, label.as_str())),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, SessionState::Resolved { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SessionState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Project the resolved snapshot for rendering at `now`.
    pub fn display<Tz>(
        &self,
        now: DateTime<Utc>,
        tz: &Tz,
        options: &DisplayOptions,
    ) -> Option<DisplayModel>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        self.resolved()
            .map(|(snapshot, label)| DisplayModel::project(snapshot, label, self.unit, now, tz, options))
    }
}
