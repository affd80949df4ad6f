use crate::{
    Config,
    error::ClientError,
    model::{PlaceCandidate, WeatherSnapshot},
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Resolves free text into candidate places.
#[async_trait]
pub trait GeocodingClient: Send + Sync + Debug {
    /// Candidates in provider order, at most `limit` of them.
    async fn lookup(&self, query: &str, limit: u8) -> Result<Vec<PlaceCandidate>, ClientError>;
}

/// Fetches current conditions for a coordinate pair.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch_by_coordinates(&self, lat: f64, lon: f64)
    -> Result<WeatherSnapshot, ClientError>;
}

/// Construct the OpenWeather client from config.
///
/// One client serves both roles, so the returned `Arc` can be handed to the
/// controller twice.
pub fn openweather_from_config(config: &Config) -> anyhow::Result<Arc<OpenWeatherClient>> {
    let api_key = config.require_api_key()?;

    Ok(Arc::new(OpenWeatherClient::new(
        api_key,
        config.geocoding_base_url.clone(),
        config.weather_base_url.clone(),
    )))
}
