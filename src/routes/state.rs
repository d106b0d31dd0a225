use std::sync::Arc;

use crate::services::{Authenticator, PlacesProvider, RecommendationSettings, WeatherProvider};

/// Shared application state
///
/// Providers sit behind trait objects so the router can run against fakes.
pub struct AppState {
    pub places_provider: Arc<dyn PlacesProvider>,
    pub weather_provider: Arc<dyn WeatherProvider>,
    pub authenticator: Arc<dyn Authenticator>,
    pub settings: RecommendationSettings,
}

impl AppState {
    pub fn new(
        places_provider: Arc<dyn PlacesProvider>,
        weather_provider: Arc<dyn WeatherProvider>,
        authenticator: Arc<dyn Authenticator>,
        settings: RecommendationSettings,
    ) -> Self {
        Self {
            places_provider,
            weather_provider,
            authenticator,
            settings,
        }
    }
}
