use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::ClientError,
    model::{PlaceCandidate, WeatherSnapshot},
};

use super::{GeocodingClient, WeatherClient};

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    geocoding_base_url: String,
    weather_base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String, geocoding_base_url: String, weather_base_url: String) -> Self {
        Self {
            api_key,
            geocoding_base_url: geocoding_base_url.trim_end_matches('/').to_string(),
            weather_base_url: weather_base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get_body(&self, url: &str, query: &[(&str, &str)]) -> Result<String, ClientError> {
        let res = self
            .http
            .get(url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ClientError::status(status, &body));
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    #[serde(default)]
    deg: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    weather: Vec<OwCondition>,
    main: OwMain,
    wind: OwWind,
    visibility: Option<u32>,
    sys: OwSys,
}

impl From<OwCurrentResponse> for WeatherSnapshot {
    fn from(parsed: OwCurrentResponse) -> Self {
        let (condition_main, condition_description, condition_icon) = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| (w.main, w.description, w.icon))
            .unwrap_or_else(|| ("Unknown".to_string(), "unknown".to_string(), String::new()));

        WeatherSnapshot {
            place_name: parsed.name,
            condition_main,
            condition_description,
            condition_icon,
            temperature_c: parsed.main.temp,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
            wind_direction_deg: parsed.wind.deg,
            visibility_m: parsed.visibility,
            sunrise: parsed.sys.sunrise,
            sunset: parsed.sys.sunset,
        }
    }
}

pub(crate) fn parse_candidates(body: &str) -> Result<Vec<PlaceCandidate>, ClientError> {
    Ok(serde_json::from_str(body)?)
}

pub(crate) fn parse_current(body: &str) -> Result<WeatherSnapshot, ClientError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)?;
    Ok(parsed.into())
}

#[async_trait]
impl GeocodingClient for OpenWeatherClient {
    async fn lookup(&self, query: &str, limit: u8) -> Result<Vec<PlaceCandidate>, ClientError> {
        let url = format!("{}/geo/1.0/direct", self.geocoding_base_url);
        let limit = limit.to_string();

        debug!(query, limit = %limit, "geocoding lookup");
        let body = self.get_body(&url, &[("q", query), ("limit", limit.as_str())]).await?;
        parse_candidates(&body)
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn fetch_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<WeatherSnapshot, ClientError> {
        let url = format!("{}/data/2.5/weather", self.weather_base_url);
        let lat = lat.to_string();
        let lon = lon.to_string();

        debug!(lat = %lat, lon = %lon, "current weather request");
        let body = self
            .get_body(&url, &[("lat", lat.as_str()), ("lon", lon.as_str()), ("units", "metric")])
            .await?;
        parse_current(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    const LONDON_WEATHER: &str = r#"{
        "coord": {"lon": -0.12, "lat": 51.5},
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
        "main": {"temp": 15, "feels_like": 14.2, "humidity": 60},
        "visibility": 10000,
        "wind": {"speed": 3, "deg": 90},
        "sys": {"country": "GB", "sunrise": 1700000000, "sunset": 1700040000},
        "name": "London"
    }"#;

    fn client_for(server: &MockServer) -> OpenWeatherClient {
        OpenWeatherClient::new("KEY".into(), server.uri(), format!("{}/", server.uri()))
    }

    #[test]
    fn parse_current_maps_payload() {
        let snapshot = parse_current(LONDON_WEATHER).expect("valid payload");

        assert_eq!(snapshot.place_name, "London");
        assert_eq!(snapshot.condition_main, "Clear");
        assert_eq!(snapshot.condition_description, "clear sky");
        assert_eq!(snapshot.condition_icon, "01d");
        assert_eq!(snapshot.temperature_c, 15.0);
        assert_eq!(snapshot.humidity_pct, 60);
        assert_eq!(snapshot.wind_direction_deg, 90.0);
        assert_eq!(snapshot.visibility_m, Some(10_000));
        assert_eq!(snapshot.sunrise, 1_700_000_000);
        assert_eq!(snapshot.sunset, 1_700_040_000);
    }

    #[test]
    fn parse_current_tolerates_missing_visibility_and_bearing() {
        let body = r#"{
            "weather": [{"main": "Fog", "description": "fog", "icon": "50n"}],
            "main": {"temp": -2.5, "humidity": 97},
            "wind": {"speed": 0.4},
            "sys": {"sunrise": 1, "sunset": 2},
            "name": "Nowhere"
        }"#;
        let snapshot = parse_current(body).expect("valid payload");

        assert_eq!(snapshot.visibility_m, None);
        assert_eq!(snapshot.wind_direction_deg, 0.0);
    }

    #[test]
    fn parse_current_rejects_malformed_body() {
        let err = parse_current(r#"{"cod": "404", "message": "city not found"}"#).unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
    }

    #[test]
    fn parse_candidates_preserves_provider_order() {
        let body = r#"[
            {"name": "Springfield", "lat": 39.8, "lon": -89.6, "country": "US", "state": "Illinois"},
            {"name": "Springfield", "lat": 37.2, "lon": -93.3, "country": "US", "state": "Missouri"}
        ]"#;
        let candidates = parse_candidates(body).expect("valid list");

        let states: Vec<_> = candidates.iter().filter_map(|c| c.state.as_deref()).collect();
        assert_eq!(states, ["Illinois", "Missouri"]);
    }

    #[tokio::test]
    async fn lookup_sends_query_limit_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "São Paulo"))
            .and(query_param("limit", "5"))
            .and(query_param("appid", "KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"name":"São Paulo","lat":-23.55,"lon":-46.63,"country":"BR","state":"São Paulo"}]"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let candidates = client_for(&server).lookup("São Paulo", 5).await.expect("lookup");

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].country, "BR");
    }

    #[tokio::test]
    async fn lookup_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .mount(&server)
            .await;

        let err = client_for(&server).lookup("London", 5).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound { status: 401, .. }));
    }

    #[tokio::test]
    async fn fetch_requests_metric_units() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("lat", "51.5"))
            .and(query_param("lon", "-0.12"))
            .and(query_param("units", "metric"))
            .and(query_param("appid", "KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LONDON_WEATHER))
            .expect(1)
            .mount(&server)
            .await;

        let snapshot = client_for(&server).fetch_by_coordinates(51.5, -0.12).await.expect("fetch");
        assert_eq!(snapshot.place_name, "London");
    }

    #[tokio::test]
    async fn fetch_maps_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string(r#"{"cod":"404","message":"not found"}"#),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_by_coordinates(0.0, 0.0).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound { status: 404, .. }));
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        // Nothing listens on the discard port.
        let client =
            OpenWeatherClient::new("KEY".into(), "http://127.0.0.1:9".into(), "http://127.0.0.1:9".into());

        let err = client.lookup("London", 5).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
