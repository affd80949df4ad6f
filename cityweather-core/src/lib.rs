//! Core library for the `cityweather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - OpenWeather geocoding and current-weather clients behind traits
//! - The debounced search state machine ([`SearchController`])
//! - Unit conversion and the render-ready [`DisplayModel`]
//!
//! It is used by `cityweather-cli`, but the controller can drive any render
//! layer that subscribes to [`Session`] changes.

pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod model;
pub mod provider;
pub mod session;
pub mod units;

pub use config::Config;
pub use controller::{SearchController, SearchOptions};
pub use display::{DisplayModel, DisplayOptions};
pub use error::ClientError;
pub use model::{DisplayUnit, PlaceCandidate, WeatherSnapshot};
pub use provider::{GeocodingClient, WeatherClient};
pub use session::{Session, SessionState};
